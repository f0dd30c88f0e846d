//! Parser for slash commands in comment text.
//!
//! Pure: turns an unstructured comment body into the ordered list of known
//! commands it mentions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A slash command the agent knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandId {
    #[serde(rename = "/help")]
    Help,
    #[serde(rename = "/start")]
    Start,
    #[serde(rename = "/stop")]
    Stop,
    #[serde(rename = "/wallet")]
    Wallet,
    #[serde(rename = "/pay")]
    Pay,
    #[serde(rename = "/multiplier")]
    Multiplier,
    #[serde(rename = "/query")]
    Query,
    #[serde(rename = "/allow")]
    Allow,
    #[serde(rename = "/autopay")]
    Autopay,
}

impl CommandId {
    pub const ALL: [CommandId; 9] = [
        CommandId::Help,
        CommandId::Start,
        CommandId::Stop,
        CommandId::Wallet,
        CommandId::Pay,
        CommandId::Multiplier,
        CommandId::Query,
        CommandId::Allow,
        CommandId::Autopay,
    ];

    /// The command as typed in a comment, leading slash included.
    pub fn as_str(self) -> &'static str {
        match self {
            CommandId::Help => "/help",
            CommandId::Start => "/start",
            CommandId::Stop => "/stop",
            CommandId::Wallet => "/wallet",
            CommandId::Pay => "/pay",
            CommandId::Multiplier => "/multiplier",
            CommandId::Query => "/query",
            CommandId::Allow => "/allow",
            CommandId::Autopay => "/autopay",
        }
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandId {
    type Err = String;

    /// Case-insensitive, slash required.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown command: {s}"))
    }
}

/// Extract every known command from `body`, in order of appearance.
///
/// # Parsing Rules
///
/// - Tokens are whitespace delimited; only tokens starting with `/` count
/// - A token may appear anywhere in the body, not only at the start
/// - Command names are case-insensitive
/// - Repeated commands are kept, each occurrence runs separately
/// - Unknown `/tokens` are dropped
///
/// An empty result means the comment carries no command at all.
///
/// ```
/// use bounty_agent::commands::{CommandId, parse_commands};
///
/// assert_eq!(
///     parse_commands("/pay /nonexistent /pay"),
///     vec![CommandId::Pay, CommandId::Pay]
/// );
/// assert!(parse_commands("thanks, looks good").is_empty());
/// ```
pub fn parse_commands(body: &str) -> Vec<CommandId> {
    body.split_whitespace()
        .filter(|token| token.starts_with('/'))
        .filter_map(|token| match token.parse::<CommandId>() {
            Ok(id) => Some(id),
            Err(_) => {
                debug!(token, "Ignoring unknown command");
                None
            }
        })
        .collect()
}
