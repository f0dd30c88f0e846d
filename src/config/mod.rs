//! Configuration snapshot types.
//!
//! A [`BotConfig`] is assembled once per event by [`ConfigLoader`] and is
//! read-only afterwards. Nothing here survives the event that built it.

pub mod duration;
pub mod keys;
pub mod loader;
pub mod network;
pub mod source;

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

pub use loader::ConfigLoader;
pub use source::{ConfigSource, JsonFileWideConfig, ProcessEnv, StaticWideConfig, WideConfigResolver};

/// Default log level when `LOG_LEVEL` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "debug";
/// Default permit site for payouts.
pub const DEFAULT_PERMIT_BASE_URL: &str = "https://pay.ubq.fi";
/// Default follow-up reminder interval.
pub const DEFAULT_FOLLOW_UP_TIME: &str = "4 days";
/// Default disqualification interval.
pub const DEFAULT_DISQUALIFY_TIME: &str = "7 days";
/// Default delay between Telegram messages, in milliseconds.
pub const DEFAULT_BOT_DELAY: u64 = 100;

/// Immutable, validated settings used for the duration of one event.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub log: LogConfig,
    pub price: PriceConfig,
    pub comments: CommentsConfig,
    pub payout: PayoutConfig,
    pub unassign: UnassignConfig,
    pub supabase: SupabaseConfig,
    pub telegram: TelegramConfig,
    pub mode: ModeConfig,
    pub assign: AssignConfig,
    pub sodium: SodiumConfig,
    pub wallet: WalletConfig,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: String,
    pub ingestion_key: SecretString,
}

#[derive(Debug, Clone)]
pub struct PriceConfig {
    pub base_multiplier: Decimal,
    pub issue_creator_multiplier: Decimal,
    pub time_labels: Vec<PriceLabel>,
    pub priority_labels: Vec<PriceLabel>,
    pub comment_element_pricing: BTreeMap<String, Decimal>,
    pub default_labels: Vec<String>,
}

/// A pricing label such as `Time: <1 Day` with its weight.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PriceLabel {
    pub name: String,
    pub weight: Decimal,
    /// Label duration in seconds, for time labels.
    #[serde(default)]
    pub value: Option<Decimal>,
}

impl PriceLabel {
    fn new(name: &str, weight: Decimal, value: Option<Decimal>) -> Self {
        Self {
            name: name.to_string(),
            weight,
            value,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommentsConfig {
    pub promotion_comment: String,
    pub new_contributor_greeting: GreetingConfig,
}

/// Greeting posted when someone comments in the repository for the first time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GreetingConfig {
    pub enabled: bool,
    pub text: String,
}

impl Default for GreetingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            text: "Thank you for contributing! Please be sure to set your wallet address \
                   before completing your first bounty so that the automatic payout upon \
                   task completion will work for you."
                .to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PayoutConfig {
    pub network_id: u64,
    pub rpc: String,
    pub private_key: SecretString,
    pub payment_token: String,
    pub permit_base_url: String,
}

#[derive(Debug, Clone)]
pub struct UnassignConfig {
    /// Inactivity before the assignee is pinged.
    pub follow_up_time: chrono::Duration,
    /// Inactivity before the assignee is removed.
    pub disqualify_time: chrono::Duration,
}

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub key: SecretString,
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub token: SecretString,
    /// Delay between messages in milliseconds.
    pub delay: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeConfig {
    pub auto_pay_mode: bool,
    pub disable_analytics: bool,
    pub incentive_mode: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignConfig {
    pub bounty_hunter_max: u32,
}

#[derive(Debug, Clone)]
pub struct SodiumConfig {
    pub private_key: SecretString,
    pub public_key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletConfig {
    pub register_wallet_with_verification: bool,
}

impl BotConfig {
    /// JSON view of the snapshot used for schema validation.
    ///
    /// Secrets are replaced with a placeholder so validator messages never
    /// carry key material; an empty secret stays empty.
    pub fn validation_document(&self) -> serde_json::Value {
        let element_pricing: serde_json::Map<String, serde_json::Value> = self
            .price
            .comment_element_pricing
            .iter()
            .map(|(k, v)| (k.clone(), decimal(*v)))
            .collect();

        serde_json::json!({
            "log": {
                "level": self.log.level,
                "ingestionKey": redact(&self.log.ingestion_key),
            },
            "price": {
                "baseMultiplier": decimal(self.price.base_multiplier),
                "issueCreatorMultiplier": decimal(self.price.issue_creator_multiplier),
                "timeLabels": labels(&self.price.time_labels),
                "priorityLabels": labels(&self.price.priority_labels),
                "commentElementPricing": element_pricing,
                "defaultLabels": self.price.default_labels,
            },
            "comments": {
                "promotionComment": self.comments.promotion_comment,
                "newContributorGreeting": {
                    "enabled": self.comments.new_contributor_greeting.enabled,
                    "text": self.comments.new_contributor_greeting.text,
                },
            },
            "payout": {
                "networkId": self.payout.network_id,
                "rpc": self.payout.rpc,
                "privateKey": redact(&self.payout.private_key),
                "paymentToken": self.payout.payment_token,
                "permitBaseUrl": self.payout.permit_base_url,
            },
            "unassign": {
                "followUpTime": self.unassign.follow_up_time.num_milliseconds(),
                "disqualifyTime": self.unassign.disqualify_time.num_milliseconds(),
            },
            "supabase": {
                "url": self.supabase.url,
                "key": redact(&self.supabase.key),
            },
            "telegram": {
                "token": redact(&self.telegram.token),
                "delay": self.telegram.delay,
            },
            "mode": {
                "autoPayMode": self.mode.auto_pay_mode,
                "disableAnalytics": self.mode.disable_analytics,
                "incentiveMode": self.mode.incentive_mode,
            },
            "assign": {
                "bountyHunterMax": self.assign.bounty_hunter_max,
            },
            "sodium": {
                "privateKey": redact(&self.sodium.private_key),
                "publicKey": self.sodium.public_key,
            },
            "wallet": {
                "registerWalletWithVerification": self.wallet.register_wallet_with_verification,
            },
        })
    }
}

fn redact(secret: &SecretString) -> &'static str {
    if secret.expose_secret().is_empty() {
        ""
    } else {
        "[REDACTED]"
    }
}

// A value with no f64 form becomes null, which the schema rejects as a non-number.
fn decimal(value: Decimal) -> serde_json::Value {
    value.to_f64().map_or(serde_json::Value::Null, serde_json::Value::from)
}

fn labels(labels: &[PriceLabel]) -> Vec<serde_json::Value> {
    labels
        .iter()
        .map(|label| {
            let mut entry = serde_json::json!({
                "name": label.name,
                "weight": decimal(label.weight),
            });
            if let Some(value) = label.value {
                entry["value"] = decimal(value);
            }
            entry
        })
        .collect()
}

// ── Wide config ─────────────────────────────────────────────────────

/// Repository-wide settings resolved per event (pricing, labels, flags,
/// and the raw payout key).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WideConfig {
    pub base_multiplier: Decimal,
    pub issue_creator_multiplier: Decimal,
    pub time_labels: Vec<PriceLabel>,
    pub priority_labels: Vec<PriceLabel>,
    pub comment_element_pricing: BTreeMap<String, Decimal>,
    pub default_labels: Vec<String>,
    pub promotion_comment: String,
    pub new_contributor_greeting: GreetingConfig,
    pub private_key: SecretString,
    pub auto_pay_mode: bool,
    pub disable_analytics: bool,
    pub incentive_mode: bool,
    pub network_id: u64,
    pub bounty_hunter_max: u32,
    pub register_wallet_with_verification: bool,
}

impl Default for WideConfig {
    fn default() -> Self {
        Self {
            base_multiplier: dec!(1),
            issue_creator_multiplier: dec!(1),
            time_labels: vec![
                PriceLabel::new("Time: <1 Hour", dec!(0.125), Some(dec!(3600))),
                PriceLabel::new("Time: <1 Day", dec!(1), Some(dec!(86400))),
                PriceLabel::new("Time: <1 Week", dec!(2), Some(dec!(604800))),
                PriceLabel::new("Time: <2 Weeks", dec!(3), Some(dec!(1209600))),
                PriceLabel::new("Time: <1 Month", dec!(4), Some(dec!(2592000))),
            ],
            priority_labels: vec![
                PriceLabel::new("Priority: 0 (Normal)", dec!(1), None),
                PriceLabel::new("Priority: 1 (Medium)", dec!(2), None),
                PriceLabel::new("Priority: 2 (High)", dec!(3), None),
                PriceLabel::new("Priority: 3 (Urgent)", dec!(4), None),
                PriceLabel::new("Priority: 4 (Emergency)", dec!(5), None),
            ],
            comment_element_pricing: BTreeMap::from([
                ("text".to_string(), dec!(0.1)),
                ("link".to_string(), dec!(0.5)),
                ("list".to_string(), dec!(0.5)),
                ("code".to_string(), dec!(5)),
                ("img".to_string(), dec!(5)),
            ]),
            default_labels: Vec::new(),
            promotion_comment: String::new(),
            new_contributor_greeting: GreetingConfig::default(),
            private_key: SecretString::default(),
            auto_pay_mode: false,
            disable_analytics: false,
            incentive_mode: false,
            network_id: 100,
            bounty_hunter_max: 10,
            register_wallet_with_verification: false,
        }
    }
}
