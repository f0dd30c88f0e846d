//! Comment dispatcher: runs the slash commands found in a new comment.
//!
//! Reply contract per command:
//! - success: the handler's response, else the success text, else nothing
//! - failure: the failure text when configured, then always `Error: {err}`
//!
//! Commands are isolated from each other. A failing command is reported and
//! the next one still runs.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::commands::first::FirstInteractionCheck;
use crate::commands::parser::parse_commands;
use crate::commands::registry::{CommandDescriptor, CommandRegistry};
use crate::error::HandlerError;
use crate::event::{Comment, EventContext, Issue};
use crate::pipeline::Handler;

/// Pipeline handler for `issue_comment.created` events.
pub struct CommentDispatcher {
    commands: CommandRegistry,
    first: Arc<dyn FirstInteractionCheck>,
}

impl CommentDispatcher {
    pub fn new(commands: CommandRegistry, first: Arc<dyn FirstInteractionCheck>) -> Self {
        Self { commands, first }
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    /// Run one command and post its outcome.
    ///
    /// Only a callback failure while reporting an error escapes.
    async fn run_command(
        &self,
        ctx: &EventContext,
        command: &CommandDescriptor,
        issue: &Issue,
        comment: &Comment,
    ) -> Result<(), HandlerError> {
        let action = ctx.action();
        let outcome = match command.handler.handle(ctx, &comment.body).await {
            Ok(response) => {
                let text = response
                    .or_else(|| command.success_text.clone())
                    .unwrap_or_default();
                if text.is_empty() {
                    Ok(())
                } else {
                    command
                        .callback
                        .post(ctx, issue.number, &text, action, Some(comment))
                        .await
                        .map_err(anyhow::Error::from)
                }
            }
            Err(e) => Err(e),
        };

        let Err(err) = outcome else {
            return Ok(());
        };

        warn!(command = %command.id, error = %err, "Command failed");
        if let Some(failure) = &command.failure_text {
            command
                .callback
                .post(ctx, issue.number, failure, action, Some(comment))
                .await?;
        }
        command
            .callback
            .post(ctx, issue.number, &format!("Error: {err}"), action, Some(comment))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Handler for CommentDispatcher {
    fn name(&self) -> &str {
        "comment_dispatcher"
    }

    async fn handle(&self, ctx: &EventContext) -> Result<(), HandlerError> {
        let issue_number = ctx.issue().map(|i| i.number);
        info!(issue = ?issue_number, "Handling an issue comment");

        let Some(comment) = ctx.comment() else {
            info!("Comment is missing, skipping");
            return Ok(());
        };

        let parsed = parse_commands(&comment.body);
        if parsed.is_empty() {
            return self.first.verify(ctx).await;
        }

        for id in parsed {
            let Some(command) = self.commands.find(id) else {
                info!(command = %id, "Skipping unregistered command");
                continue;
            };
            let Some(issue) = ctx.issue() else {
                continue;
            };

            info!(command = %id, issue = issue.number, "Running comment command");
            self.run_command(ctx, command, issue, comment).await?;
        }
        Ok(())
    }
}
