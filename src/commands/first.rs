//! First-interaction check for comments that carry no command.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::commands::registry::CommentCallback;
use crate::error::{CallbackError, HandlerError};
use crate::event::EventContext;

/// Runs when a comment contains no known command.
#[async_trait]
pub trait FirstInteractionCheck: Send + Sync {
    async fn verify(&self, ctx: &EventContext) -> Result<(), HandlerError>;
}

/// Answers how active a user has been in a repository.
#[async_trait]
pub trait ContributionLookup: Send + Sync {
    /// Number of issues and pull requests in `repo` (`owner/name`) that
    /// `login` has commented on.
    async fn commented_count(&self, repo: &str, login: &str) -> Result<u64, CallbackError>;
}

/// Greets a commenter the first time they take part in the repository.
pub struct GreetNewContributor {
    lookup: Arc<dyn ContributionLookup>,
    callback: Arc<dyn CommentCallback>,
}

impl GreetNewContributor {
    pub fn new(lookup: Arc<dyn ContributionLookup>, callback: Arc<dyn CommentCallback>) -> Self {
        Self { lookup, callback }
    }
}

#[async_trait]
impl FirstInteractionCheck for GreetNewContributor {
    async fn verify(&self, ctx: &EventContext) -> Result<(), HandlerError> {
        let greeting = &ctx.config.comments.new_contributor_greeting;
        if !greeting.enabled || greeting.text.is_empty() {
            debug!("New contributor greeting disabled");
            return Ok(());
        }
        let (Some(issue), Some(comment)) = (ctx.issue(), ctx.comment()) else {
            return Ok(());
        };

        let login = &comment.user.login;
        let repo = &ctx.payload.repository.full_name;
        let count = match self.lookup.commented_count(repo, login).await {
            Ok(count) => count,
            Err(e) => {
                warn!(user = %login, error = %e, "Contribution lookup failed, not greeting");
                return Ok(());
            }
        };

        if count != 1 {
            debug!(user = %login, count, "Returning contributor");
            return Ok(());
        }

        info!(user = %login, issue = issue.number, "Greeting first-time contributor");
        let text = format!("@{login} {}", greeting.text);
        self.callback
            .post(ctx, issue.number, &text, ctx.action(), Some(comment))
            .await?;
        Ok(())
    }
}
