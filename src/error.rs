//! Error types for the bounty agent.

use crate::schema::ValidationReport;

/// Top-level error type for event processing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),
}

/// Configuration-related errors. All of these are fatal for the current event.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}. {hint}")]
    MissingRequired { key: String, hint: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Configuration failed schema validation: {0}")]
    Schema(String),

    #[error("No payout config set up for network id {0}")]
    UnknownNetwork(u64),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Inbound payload errors. Dropping the event is the only consequence.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("Payload failed schema validation: {}", .0.summary())]
    Schema(ValidationReport),

    #[error("Payload could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors raised by pipeline stage handlers.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("Handler {name} failed: {reason}")]
    Failed { name: String, reason: String },

    #[error(transparent)]
    Callback(#[from] CallbackError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors raised while posting a response back to an issue.
#[derive(Debug, thiserror::Error)]
pub enum CallbackError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Comment rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Result type alias for the agent.
pub type Result<T> = std::result::Result<T, Error>;
