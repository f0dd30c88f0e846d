//! Built-in `/help` command.

use std::sync::Arc;

use async_trait::async_trait;

use crate::commands::parser::CommandId;
use crate::commands::registry::{
    CommandDescriptor, CommandHandler, CommandRegistry, CommentCallback,
};
use crate::event::EventContext;

pub const HELP_DESCRIPTION: &str = "List all available commands.";

/// Replies with a markdown table of the registered commands.
#[derive(Debug, Clone)]
pub struct HelpCommand {
    entries: Vec<(CommandId, String)>,
}

impl HelpCommand {
    pub fn new(entries: Vec<(CommandId, String)>) -> Self {
        Self { entries }
    }

    pub fn render(&self) -> String {
        let mut out = String::from("### Available Commands\n\n");
        out.push_str("| Command | Description |\n| --- | --- |\n");
        for (id, description) in &self.entries {
            out.push_str(&format!("| `{id}` | {} |\n", description.replace('|', "\\|")));
        }
        out
    }
}

#[async_trait]
impl CommandHandler for HelpCommand {
    async fn handle(&self, _ctx: &EventContext, _body: &str) -> anyhow::Result<Option<String>> {
        Ok(Some(self.render()))
    }
}

/// Register `/help`, listing itself and every command already in `registry`.
/// Call after the other commands are registered.
pub fn register_help(registry: &mut CommandRegistry, callback: Arc<dyn CommentCallback>) {
    let mut entries = vec![(CommandId::Help, HELP_DESCRIPTION.to_string())];
    entries.extend(
        registry
            .descriptors()
            .iter()
            .filter(|c| c.id != CommandId::Help)
            .map(|c| (c.id, c.description.clone())),
    );

    let help = Arc::new(HelpCommand::new(entries));
    registry.register(CommandDescriptor::new(
        CommandId::Help,
        HELP_DESCRIPTION,
        help,
        callback,
    ));
}
