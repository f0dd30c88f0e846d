//! Shared types for the event processing pipeline.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::HandlerError;
use crate::event::EventContext;

// ── Action kinds ────────────────────────────────────────────────────

/// Webhook `action` values the agent understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Opened,
    Edited,
    Closed,
    Reopened,
    Labeled,
    Unlabeled,
    Assigned,
    Unassigned,
    Created,
    Deleted,
}

impl ActionKind {
    pub const ALL: [ActionKind; 10] = [
        ActionKind::Opened,
        ActionKind::Edited,
        ActionKind::Closed,
        ActionKind::Reopened,
        ActionKind::Labeled,
        ActionKind::Unlabeled,
        ActionKind::Assigned,
        ActionKind::Unassigned,
        ActionKind::Created,
        ActionKind::Deleted,
    ];

    /// Wire name, as it appears in the payload.
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Opened => "opened",
            ActionKind::Edited => "edited",
            ActionKind::Closed => "closed",
            ActionKind::Reopened => "reopened",
            ActionKind::Labeled => "labeled",
            ActionKind::Unlabeled => "unlabeled",
            ActionKind::Assigned => "assigned",
            ActionKind::Unassigned => "unassigned",
            ActionKind::Created => "created",
            ActionKind::Deleted => "deleted",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionKind::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| format!("unknown action: {s}"))
    }
}

// ── Handlers ────────────────────────────────────────────────────────

/// One unit of work run against an admitted event.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    async fn handle(&self, ctx: &EventContext) -> Result<(), HandlerError>;
}

/// The three ordered phases of a processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Pre,
    Action,
    Post,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Pre => "pre",
            Stage::Action => "action",
            Stage::Post => "post",
        }
    }
}

/// Handlers registered for a single action kind, grouped by stage.
#[derive(Clone, Default)]
pub struct ProcessorEntry {
    pub pre: Vec<Arc<dyn Handler>>,
    pub action: Vec<Arc<dyn Handler>>,
    pub post: Vec<Arc<dyn Handler>>,
}

impl ProcessorEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pre(mut self, handler: Arc<dyn Handler>) -> Self {
        self.pre.push(handler);
        self
    }

    pub fn with_action(mut self, handler: Arc<dyn Handler>) -> Self {
        self.action.push(handler);
        self
    }

    pub fn with_post(mut self, handler: Arc<dyn Handler>) -> Self {
        self.post.push(handler);
        self
    }

    /// Stages in execution order.
    pub fn stages(&self) -> [(Stage, &[Arc<dyn Handler>]); 3] {
        [
            (Stage::Pre, self.pre.as_slice()),
            (Stage::Action, self.action.as_slice()),
            (Stage::Post, self.post.as_slice()),
        ]
    }

    pub fn len(&self) -> usize {
        self.pre.len() + self.action.len() + self.post.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ProcessorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |hs: &[Arc<dyn Handler>]| {
            hs.iter()
                .map(|h| h.name().to_string())
                .collect::<Vec<_>>()
        };
        f.debug_struct("ProcessorEntry")
            .field("pre", &names(self.pre.as_slice()))
            .field("action", &names(self.action.as_slice()))
            .field("post", &names(self.post.as_slice()))
            .finish()
    }
}

/// Maps each action kind to its processor.
#[derive(Debug, Clone, Default)]
pub struct ProcessorRegistry {
    processors: HashMap<ActionKind, ProcessorEntry>,
}

impl ProcessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the processor for an action, replacing any previous one.
    pub fn register(&mut self, action: ActionKind, entry: ProcessorEntry) {
        tracing::debug!(action = %action, handlers = entry.len(), "Registered processor");
        self.processors.insert(action, entry);
    }

    pub fn get(&self, action: ActionKind) -> Option<&ProcessorEntry> {
        self.processors.get(&action)
    }

    pub fn contains(&self, action: ActionKind) -> bool {
        self.processors.contains_key(&action)
    }
}
