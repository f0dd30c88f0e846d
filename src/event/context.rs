//! Per-event context threaded through the pipeline.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::BotConfig;
use crate::event::payload::{Comment, Issue, Payload};
use crate::pipeline::ActionKind;

/// Everything a handler may read about the event being processed.
///
/// Built once per dispatch after the payload is admitted and the
/// configuration is loaded, then passed by reference to every stage
/// handler, skip policy, command and callback. Nothing is shared between
/// events, so several contexts can be in flight at once.
#[derive(Debug, Clone)]
pub struct EventContext {
    /// Unique id for this dispatch, used to correlate log lines.
    pub delivery_id: Uuid,
    /// Webhook event name (`issues`, `issue_comment`, ...).
    pub event_name: String,
    pub received_at: DateTime<Utc>,
    pub payload: Payload,
    pub config: BotConfig,
}

impl EventContext {
    pub fn new(event_name: impl Into<String>, payload: Payload, config: BotConfig) -> Self {
        Self {
            delivery_id: Uuid::new_v4(),
            event_name: event_name.into(),
            received_at: Utc::now(),
            payload,
            config,
        }
    }

    /// Reuse an id allocated earlier, so logs emitted before the context
    /// existed share it.
    pub fn with_delivery_id(mut self, delivery_id: Uuid) -> Self {
        self.delivery_id = delivery_id;
        self
    }

    pub fn action(&self) -> ActionKind {
        self.payload.action
    }

    pub fn issue(&self) -> Option<&Issue> {
        self.payload.issue.as_ref()
    }

    pub fn comment(&self) -> Option<&Comment> {
        self.payload.comment.as_ref()
    }
}
