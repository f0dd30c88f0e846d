//! Slash commands posted in issue comments.
//!
//! A new comment flows through:
//! 1. `parse_commands()` extracts known `/commands` in order
//! 2. `CommentDispatcher` looks each one up in the `CommandRegistry`
//! 3. the command's handler runs and its outcome is posted back through
//!    the command's `CommentCallback`
//!
//! A comment without any command goes to the `FirstInteractionCheck`.

pub mod comment;
pub mod first;
pub mod help;
pub mod parser;
pub mod registry;

#[cfg(test)]
pub(crate) mod testing;

pub use comment::CommentDispatcher;
pub use first::{ContributionLookup, FirstInteractionCheck, GreetNewContributor};
pub use help::{HelpCommand, register_help};
pub use parser::{CommandId, parse_commands};
pub use registry::{CommandDescriptor, CommandHandler, CommandRegistry, CommentCallback};
