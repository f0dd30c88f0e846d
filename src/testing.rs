//! Shared fixtures for unit tests.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Value, json};

use crate::config::{BotConfig, ConfigLoader, StaticWideConfig, WideConfig};
use crate::event::{EventContext, Payload};

/// Environment with only the required key set.
pub fn env() -> HashMap<String, String> {
    HashMap::from([("LOG_INGESTION_KEY".to_string(), "test-ingest".to_string())])
}

pub fn loader() -> ConfigLoader {
    ConfigLoader::new(Arc::new(env()), Arc::new(StaticWideConfig::default()))
}

pub fn bot_config() -> BotConfig {
    loader().build(WideConfig::default()).unwrap()
}

fn repository() -> Value {
    json!({
        "name": "widgets",
        "full_name": "acme/widgets",
        "owner": { "login": "acme", "type": "Organization" }
    })
}

fn issue() -> Value {
    json!({
        "number": 42,
        "title": "Fix the frobnicator",
        "body": "It is broken.",
        "state": "open",
        "user": { "login": "carol", "type": "User" },
        "labels": [{ "name": "Time: <1 Day" }],
        "assignees": []
    })
}

/// A raw `issues.labeled` payload from a human sender.
pub fn label_payload() -> Value {
    json!({
        "action": "labeled",
        "sender": { "login": "alice", "id": 1, "type": "User" },
        "repository": repository(),
        "issue": issue(),
        "label": { "name": "Priority: 1 (Medium)" }
    })
}

/// A raw `issue_comment.created` payload with the given body.
pub fn comment_payload(body: &str) -> Value {
    json!({
        "action": "created",
        "sender": { "login": "bob", "id": 2, "type": "User" },
        "repository": repository(),
        "issue": issue(),
        "comment": {
            "id": 9001,
            "body": body,
            "user": { "login": "bob", "id": 2, "type": "User" }
        }
    })
}

/// Context for a raw payload with the default config.
pub fn context(raw: Value) -> EventContext {
    let payload: Payload = serde_json::from_value(raw).unwrap();
    EventContext::new("issues", payload, bot_config())
}
