//! Registry of comment commands and the traits they are built from.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::commands::parser::CommandId;
use crate::error::CallbackError;
use crate::event::{Comment, EventContext};
use crate::pipeline::ActionKind;

/// Runs one comment command.
///
/// `Ok(Some(text))` is posted back as the reply. `Ok(None)` falls back to the
/// descriptor's success text. Any error is reported on the issue.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, ctx: &EventContext, body: &str) -> anyhow::Result<Option<String>>;
}

/// Posts a reply on the issue an event belongs to.
#[async_trait]
pub trait CommentCallback: Send + Sync {
    async fn post(
        &self,
        ctx: &EventContext,
        issue_number: u64,
        text: &str,
        action: ActionKind,
        source: Option<&Comment>,
    ) -> Result<(), CallbackError>;
}

/// A registered command: what runs and how its outcome is reported.
#[derive(Clone)]
pub struct CommandDescriptor {
    pub id: CommandId,
    /// One line shown by `/help`.
    pub description: String,
    pub handler: Arc<dyn CommandHandler>,
    pub callback: Arc<dyn CommentCallback>,
    pub success_text: Option<String>,
    pub failure_text: Option<String>,
}

impl CommandDescriptor {
    pub fn new(
        id: CommandId,
        description: impl Into<String>,
        handler: Arc<dyn CommandHandler>,
        callback: Arc<dyn CommentCallback>,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            handler,
            callback,
            success_text: None,
            failure_text: None,
        }
    }

    pub fn with_success_text(mut self, text: impl Into<String>) -> Self {
        self.success_text = Some(text.into());
        self
    }

    pub fn with_failure_text(mut self, text: impl Into<String>) -> Self {
        self.failure_text = Some(text.into());
        self
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("id", &self.id)
            .field("description", &self.description)
            .field("success_text", &self.success_text)
            .field("failure_text", &self.failure_text)
            .finish_non_exhaustive()
    }
}

/// Ordered collection of command descriptors, looked up by id.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: Vec<CommandDescriptor>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command. Re-registering an id replaces the earlier
    /// descriptor in place.
    pub fn register(&mut self, descriptor: CommandDescriptor) {
        if let Some(existing) = self.commands.iter_mut().find(|c| c.id == descriptor.id) {
            tracing::warn!(command = %descriptor.id, "Replacing registered command");
            *existing = descriptor;
            return;
        }
        tracing::debug!(command = %descriptor.id, "Registered command");
        self.commands.push(descriptor);
    }

    pub fn find(&self, id: CommandId) -> Option<&CommandDescriptor> {
        self.commands.iter().find(|c| c.id == id)
    }

    pub fn descriptors(&self) -> &[CommandDescriptor] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{RecordingCallback, StaticHandler};

    fn descriptor(id: CommandId, description: &str) -> CommandDescriptor {
        CommandDescriptor::new(
            id,
            description,
            Arc::new(StaticHandler::ok(None)),
            Arc::new(RecordingCallback::default()),
        )
    }

    #[test]
    fn finds_by_id() {
        let mut registry = CommandRegistry::new();
        registry.register(descriptor(CommandId::Start, "Assign yourself"));
        registry.register(descriptor(CommandId::Stop, "Unassign yourself"));

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.find(CommandId::Stop).unwrap().description,
            "Unassign yourself"
        );
        assert!(registry.find(CommandId::Pay).is_none());
    }

    #[test]
    fn re_registering_keeps_position() {
        let mut registry = CommandRegistry::new();
        registry.register(descriptor(CommandId::Start, "first"));
        registry.register(descriptor(CommandId::Stop, "stop"));
        registry.register(descriptor(CommandId::Start, "second").with_success_text("ok"));

        let ids: Vec<CommandId> = registry.descriptors().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![CommandId::Start, CommandId::Stop]);

        let start = registry.find(CommandId::Start).unwrap();
        assert_eq!(start.description, "second");
        assert_eq!(start.success_text.as_deref(), Some("ok"));
        assert!(start.failure_text.is_none());
    }

    #[test]
    fn debug_omits_trait_objects() {
        let rendered = format!("{:?}", descriptor(CommandId::Pay, "Pay out"));
        assert!(rendered.contains("Pay"));
        assert!(rendered.contains(".."));
    }
}
