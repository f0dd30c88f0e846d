use std::sync::Arc;

use anyhow::Context;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

use bounty_agent::commands::{
    CommandRegistry, CommentDispatcher, GreetNewContributor, register_help,
};
use bounty_agent::config::ConfigLoader;
use bounty_agent::github::GitHubClient;
use bounty_agent::pipeline::{
    ActionKind, EventDispatcher, ProcessorEntry, ProcessorRegistry, SkipRules,
};

/// Usage: `bounty-agent [EVENT_NAME] [PAYLOAD_PATH]`.
///
/// Missing arguments fall back to `GITHUB_EVENT_NAME` / `GITHUB_EVENT_PATH`;
/// without a path the payload is read from stdin.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (RUST_LOG, else LOG_LEVEL, else info)
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stderr());
    let level = std::env::var("LOG_LEVEL")
        .ok()
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| "info".to_string());
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(writer)
        .init();

    let mut args = std::env::args().skip(1);
    let event_name = args
        .next()
        .or_else(|| std::env::var("GITHUB_EVENT_NAME").ok())
        .context("No event name: pass it as the first argument or set GITHUB_EVENT_NAME")?;
    let payload_path = args
        .next()
        .or_else(|| std::env::var("GITHUB_EVENT_PATH").ok());
    let raw = read_payload(payload_path.as_deref()).await?;

    let github = Arc::new(GitHubClient::from_env());

    let mut commands = CommandRegistry::new();
    register_help(&mut commands, github.clone());
    let first = Arc::new(GreetNewContributor::new(github.clone(), github));

    let mut processors = ProcessorRegistry::new();
    processors.register(
        ActionKind::Created,
        ProcessorEntry::new().with_action(Arc::new(CommentDispatcher::new(commands, first))),
    );

    let dispatcher = EventDispatcher::new(
        ConfigLoader::from_env(),
        processors,
        Arc::new(SkipRules::default_rules()),
    );

    let outcome = dispatcher.dispatch(&event_name, raw).await?;
    tracing::info!(outcome = outcome.label(), "Dispatch finished");
    Ok(())
}

async fn read_payload(path: Option<&str>) -> anyhow::Result<serde_json::Value> {
    let text = match path {
        Some(path) if !path.is_empty() => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read payload from {path}"))?,
        _ => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("Failed to read payload from stdin")?;
            buf
        }
    };
    serde_json::from_str(&text).context("Payload is not valid JSON")
}
