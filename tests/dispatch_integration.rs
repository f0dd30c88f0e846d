//! End-to-end dispatch tests through the public API.
//!
//! Each test wires a dispatcher the way the binary does, but with an
//! in-memory environment, a wide config file on disk and a recording
//! callback in place of GitHub.

use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};

use bounty_agent::commands::{
    CommandDescriptor, CommandHandler, CommandId, CommandRegistry, CommentCallback,
    CommentDispatcher, FirstInteractionCheck, register_help,
};
use bounty_agent::config::{ConfigLoader, JsonFileWideConfig};
use bounty_agent::error::{CallbackError, ConfigError, Error, HandlerError};
use bounty_agent::event::{Comment, EventContext};
use bounty_agent::pipeline::{
    ActionKind, DispatchOutcome, EventDispatcher, Handler, ProcessorEntry, ProcessorRegistry,
    SkipRules,
};

#[derive(Default)]
struct Recorder {
    posts: Mutex<Vec<(u64, String)>>,
}

impl Recorder {
    fn texts(&self) -> Vec<String> {
        self.posts.lock().unwrap().iter().map(|(_, t)| t.clone()).collect()
    }
}

#[async_trait]
impl CommentCallback for Recorder {
    async fn post(
        &self,
        _ctx: &EventContext,
        issue_number: u64,
        text: &str,
        _action: ActionKind,
        _source: Option<&Comment>,
    ) -> Result<(), CallbackError> {
        self.posts
            .lock()
            .unwrap()
            .push((issue_number, text.to_string()));
        Ok(())
    }
}

/// `/multiplier` echoes the configured base multiplier.
struct MultiplierCommand;

#[async_trait]
impl CommandHandler for MultiplierCommand {
    async fn handle(&self, ctx: &EventContext, _body: &str) -> anyhow::Result<Option<String>> {
        Ok(Some(format!(
            "Base multiplier is {}",
            ctx.config.price.base_multiplier
        )))
    }
}

/// `/pay` always fails.
struct PayCommand;

#[async_trait]
impl CommandHandler for PayCommand {
    async fn handle(&self, _ctx: &EventContext, _body: &str) -> anyhow::Result<Option<String>> {
        anyhow::bail!("no permit could be generated")
    }
}

struct QuietCheck;

#[async_trait]
impl FirstInteractionCheck for QuietCheck {
    async fn verify(&self, _ctx: &EventContext) -> Result<(), HandlerError> {
        Ok(())
    }
}

/// Records the issue labels seen on label events.
#[derive(Default)]
struct LabelWatcher {
    seen: Mutex<Vec<String>>,
}

#[async_trait]
impl Handler for LabelWatcher {
    fn name(&self) -> &str {
        "label_watcher"
    }

    async fn handle(&self, ctx: &EventContext) -> Result<(), HandlerError> {
        let label = ctx
            .payload
            .label
            .as_ref()
            .map(|l| l.name.clone())
            .ok_or_else(|| HandlerError::Failed {
                name: "label_watcher".into(),
                reason: "label event without label".into(),
            })?;
        self.seen.lock().unwrap().push(label);
        Ok(())
    }
}

struct Setup {
    dispatcher: EventDispatcher,
    callback: Arc<Recorder>,
    labels: Arc<LabelWatcher>,
    _config_file: tempfile::NamedTempFile,
}

fn setup(env: &[(&str, &str)], wide: Value) -> Setup {
    let mut config_file = tempfile::NamedTempFile::new().unwrap();
    config_file
        .write_all(wide.to_string().as_bytes())
        .unwrap();

    let env: HashMap<String, String> = env
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let loader = ConfigLoader::new(
        Arc::new(env),
        Arc::new(JsonFileWideConfig::new(config_file.path())),
    );

    let callback = Arc::new(Recorder::default());
    let mut commands = CommandRegistry::new();
    commands.register(CommandDescriptor::new(
        CommandId::Multiplier,
        "Show the price multiplier.",
        Arc::new(MultiplierCommand),
        callback.clone(),
    ));
    commands.register(
        CommandDescriptor::new(
            CommandId::Pay,
            "Generate a payout permit.",
            Arc::new(PayCommand),
            callback.clone(),
        )
        .with_failure_text("Payout failed."),
    );
    register_help(&mut commands, callback.clone());

    let labels = Arc::new(LabelWatcher::default());
    let mut processors = ProcessorRegistry::new();
    processors.register(
        ActionKind::Created,
        ProcessorEntry::new()
            .with_action(Arc::new(CommentDispatcher::new(commands, Arc::new(QuietCheck)))),
    );
    processors.register(
        ActionKind::Labeled,
        ProcessorEntry::new().with_action(labels.clone()),
    );

    let dispatcher = EventDispatcher::new(
        loader,
        processors,
        Arc::new(SkipRules::default_rules()),
    );

    Setup {
        dispatcher,
        callback,
        labels,
        _config_file: config_file,
    }
}

fn event(action: &str, body: Option<&str>) -> Value {
    let mut raw = json!({
        "action": action,
        "sender": { "login": "dana", "id": 4, "type": "User" },
        "repository": {
            "name": "widgets",
            "full_name": "acme/widgets",
            "owner": { "login": "acme", "type": "Organization" }
        },
        "issue": {
            "number": 7,
            "title": "Add dark mode",
            "body": null,
            "state": "open",
            "labels": [],
            "assignees": []
        },
        "label": { "name": "Time: <1 Week" }
    });
    if let Some(body) = body {
        raw["comment"] = json!({
            "id": 55,
            "body": body,
            "user": { "login": "dana", "type": "User" }
        });
    }
    raw
}

const ENV: &[(&str, &str)] = &[("LOG_INGESTION_KEY", "integration-key")];

#[tokio::test]
async fn comment_commands_reply_on_the_issue() {
    let s = setup(ENV, json!({ "baseMultiplier": 1.5 }));

    let outcome = s
        .dispatcher
        .dispatch("issue_comment", event("created", Some("/multiplier then /pay")))
        .await
        .unwrap();

    assert!(matches!(outcome, DispatchOutcome::Completed { handlers_run: 1 }));
    assert_eq!(
        s.callback.texts(),
        vec![
            "Base multiplier is 1.5".to_string(),
            "Payout failed.".to_string(),
            "Error: no permit could be generated".to_string(),
        ]
    );
    assert!(s.callback.posts.lock().unwrap().iter().all(|(n, _)| *n == 7));
}

#[tokio::test]
async fn help_lists_every_command() {
    let s = setup(ENV, json!({}));

    s.dispatcher
        .dispatch("issue_comment", event("created", Some("/help")))
        .await
        .unwrap();

    let texts = s.callback.texts();
    assert_eq!(texts.len(), 1);
    for command in ["/help", "/multiplier", "/pay"] {
        assert!(texts[0].contains(&format!("`{command}`")), "{}", texts[0]);
    }
}

#[tokio::test]
async fn label_events_reach_their_processor() {
    let s = setup(ENV, json!({}));

    let outcome = s
        .dispatcher
        .dispatch("issues", event("labeled", None))
        .await
        .unwrap();

    assert_eq!(outcome.label(), "completed");
    assert_eq!(*s.labels.seen.lock().unwrap(), vec!["Time: <1 Week".to_string()]);
    assert!(s.callback.texts().is_empty());
}

#[tokio::test]
async fn bot_comments_are_ignored() {
    let s = setup(ENV, json!({}));
    let mut raw = event("created", Some("/help"));
    raw["sender"] = json!({ "login": "ubiquibot[bot]", "type": "Bot" });

    let outcome = s.dispatcher.dispatch("issue_comment", raw).await.unwrap();

    assert!(matches!(outcome, DispatchOutcome::Skipped { .. }));
    assert!(s.callback.texts().is_empty());
}

#[tokio::test]
async fn invalid_config_stops_the_event() {
    let s = setup(ENV, json!({ "baseMultiplier": -2 }));

    let err = s
        .dispatcher
        .dispatch("issue_comment", event("created", Some("/help")))
        .await
        .unwrap_err();

    match err {
        Error::Config(ConfigError::Schema(summary)) => {
            assert!(summary.contains("/price/baseMultiplier"), "{summary}")
        }
        other => panic!("expected schema error, got {other:?}"),
    }
    assert!(s.callback.texts().is_empty());
}

#[tokio::test]
async fn missing_ingestion_key_stops_the_event() {
    let s = setup(&[], json!({}));

    let err = s
        .dispatcher
        .dispatch("issues", event("labeled", None))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Config(ConfigError::MissingRequired { .. })));
    assert!(s.labels.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unreadable_wide_config_is_a_config_error() {
    let s = setup(ENV, json!({}));
    std::fs::write(s._config_file.path(), "{ not json").unwrap();

    let err = s
        .dispatcher
        .dispatch("issues", event("labeled", None))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Config(ConfigError::ParseError(_))));
}

#[tokio::test]
async fn unlabeled_without_processor_is_reported() {
    let s = setup(ENV, json!({}));

    let outcome = s
        .dispatcher
        .dispatch("issues", event("unlabeled", None))
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        DispatchOutcome::NoProcessor {
            action: ActionKind::Unlabeled
        }
    ));
}
