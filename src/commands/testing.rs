//! Hand-written command doubles shared by the command tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::commands::registry::{CommandHandler, CommentCallback};
use crate::error::CallbackError;
use crate::event::{Comment, EventContext};
use crate::pipeline::ActionKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub issue_number: u64,
    pub text: String,
    pub action: ActionKind,
    pub source_comment: Option<u64>,
}

/// Records every post. A failing callback records the attempt, then errors.
#[derive(Default)]
pub struct RecordingCallback {
    posts: Mutex<Vec<Post>>,
    fail: bool,
}

impl RecordingCallback {
    pub fn failing() -> Self {
        Self {
            posts: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn posts(&self) -> Vec<Post> {
        self.posts.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.posts().into_iter().map(|p| p.text).collect()
    }
}

#[async_trait]
impl CommentCallback for RecordingCallback {
    async fn post(
        &self,
        _ctx: &EventContext,
        issue_number: u64,
        text: &str,
        action: ActionKind,
        source: Option<&Comment>,
    ) -> Result<(), CallbackError> {
        self.posts.lock().unwrap().push(Post {
            issue_number,
            text: text.to_string(),
            action,
            source_comment: source.map(|c| c.id),
        });
        if self.fail {
            return Err(CallbackError::Http("connection refused".into()));
        }
        Ok(())
    }
}

/// Returns a fixed response or error and counts its calls.
pub struct StaticHandler {
    response: Result<Option<String>, String>,
    calls: AtomicUsize,
}

impl StaticHandler {
    pub fn ok(response: Option<&str>) -> Self {
        Self {
            response: Ok(response.map(str::to_string)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn err(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommandHandler for StaticHandler {
    async fn handle(&self, _ctx: &EventContext, _body: &str) -> anyhow::Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            Ok(response) => Ok(response.clone()),
            Err(message) => Err(anyhow::anyhow!("{message}")),
        }
    }
}
