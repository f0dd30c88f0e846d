//! Schemas for the inbound event payload and the configuration snapshot.

use std::sync::LazyLock;

use jsonschema::Validator;
use serde_json::{Value, json};

use crate::pipeline::ActionKind;

/// Schema every inbound payload must satisfy before it is decoded.
pub static PAYLOAD_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    let user = json!({
        "type": "object",
        "required": ["login"],
        "properties": {
            "login": { "type": "string" },
            "id": { "type": "integer" },
            "type": { "type": "string" }
        }
    });
    let label = json!({
        "type": "object",
        "required": ["name"],
        "properties": { "name": { "type": "string" } }
    });
    let actions: Vec<&str> = ActionKind::ALL.iter().map(|a| a.as_str()).collect();

    json!({
        "type": "object",
        "required": ["action", "sender", "repository"],
        "properties": {
            "action": { "type": "string", "enum": actions },
            "sender": user,
            "repository": {
                "type": "object",
                "required": ["name", "full_name", "owner"],
                "properties": {
                    "name": { "type": "string" },
                    "full_name": { "type": "string" },
                    "owner": user
                }
            },
            "issue": {
                "type": "object",
                "required": ["number", "title", "state"],
                "properties": {
                    "number": { "type": "integer", "minimum": 1 },
                    "title": { "type": "string" },
                    "body": { "type": ["string", "null"] },
                    "state": { "type": "string" },
                    "user": user,
                    "labels": { "type": "array", "items": label },
                    "assignees": { "type": "array", "items": user }
                }
            },
            "comment": {
                "type": "object",
                "required": ["id", "body", "user"],
                "properties": {
                    "id": { "type": "integer" },
                    "body": { "type": "string" },
                    "user": user
                }
            },
            "label": label
        }
    })
});

/// Schema for [`BotConfig::validation_document`](crate::config::BotConfig::validation_document).
pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    let price_label = json!({
        "type": "object",
        "required": ["name", "weight"],
        "properties": {
            "name": { "type": "string" },
            "weight": { "type": "number", "minimum": 0 },
            "value": { "type": "number" }
        }
    });
    let string = json!({ "type": "string" });
    let boolean = json!({ "type": "boolean" });

    json!({
        "type": "object",
        "required": [
            "log", "price", "comments", "payout", "unassign", "supabase",
            "telegram", "mode", "assign", "sodium", "wallet"
        ],
        "properties": {
            "log": {
                "type": "object",
                "required": ["level", "ingestionKey"],
                "properties": {
                    "level": { "enum": ["error", "warn", "info", "debug", "trace"] },
                    "ingestionKey": string
                }
            },
            "price": {
                "type": "object",
                "required": [
                    "baseMultiplier", "issueCreatorMultiplier", "timeLabels",
                    "priorityLabels", "commentElementPricing", "defaultLabels"
                ],
                "properties": {
                    "baseMultiplier": { "type": "number", "minimum": 0 },
                    "issueCreatorMultiplier": { "type": "number", "minimum": 0 },
                    "timeLabels": { "type": "array", "items": price_label },
                    "priorityLabels": { "type": "array", "items": price_label },
                    "commentElementPricing": {
                        "type": "object",
                        "additionalProperties": { "type": "number", "minimum": 0 }
                    },
                    "defaultLabels": { "type": "array", "items": string }
                }
            },
            "comments": {
                "type": "object",
                "required": ["promotionComment", "newContributorGreeting"],
                "properties": {
                    "promotionComment": string,
                    "newContributorGreeting": {
                        "type": "object",
                        "required": ["enabled", "text"],
                        "properties": { "enabled": boolean, "text": string }
                    }
                }
            },
            "payout": {
                "type": "object",
                "required": ["networkId", "rpc", "privateKey", "paymentToken", "permitBaseUrl"],
                "properties": {
                    "networkId": { "type": "integer" },
                    "rpc": { "type": "string", "minLength": 1 },
                    "privateKey": string,
                    "paymentToken": { "type": "string", "minLength": 1 },
                    "permitBaseUrl": { "type": "string", "pattern": "^https?://" }
                }
            },
            "unassign": {
                "type": "object",
                "required": ["followUpTime", "disqualifyTime"],
                "properties": {
                    "followUpTime": { "type": "integer" },
                    "disqualifyTime": { "type": "integer" }
                }
            },
            "supabase": {
                "type": "object",
                "required": ["url", "key"],
                "properties": { "url": string, "key": string }
            },
            "telegram": {
                "type": "object",
                "required": ["token", "delay"],
                "properties": {
                    "token": string,
                    "delay": { "type": "integer", "minimum": 0 }
                }
            },
            "mode": {
                "type": "object",
                "required": ["autoPayMode", "disableAnalytics", "incentiveMode"],
                "properties": {
                    "autoPayMode": boolean,
                    "disableAnalytics": boolean,
                    "incentiveMode": boolean
                }
            },
            "assign": {
                "type": "object",
                "required": ["bountyHunterMax"],
                "properties": { "bountyHunterMax": { "type": "integer", "minimum": 0 } }
            },
            "sodium": {
                "type": "object",
                "required": ["privateKey", "publicKey"],
                "properties": { "privateKey": string, "publicKey": string }
            },
            "wallet": {
                "type": "object",
                "required": ["registerWalletWithVerification"],
                "properties": { "registerWalletWithVerification": boolean }
            }
        }
    })
});

/// [`PAYLOAD_SCHEMA`] compiled once for the dispatcher.
pub static PAYLOAD_VALIDATOR: LazyLock<Validator> =
    LazyLock::new(|| jsonschema::validator_for(&PAYLOAD_SCHEMA).unwrap());

/// [`CONFIG_SCHEMA`] compiled once for the loader.
pub static CONFIG_VALIDATOR: LazyLock<Validator> =
    LazyLock::new(|| jsonschema::validator_for(&CONFIG_SCHEMA).unwrap());
