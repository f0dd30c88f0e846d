//! Builds a validated [`BotConfig`] for one event.
//!
//! Order of checks after the snapshot is assembled:
//! 1. an empty log ingestion key is fatal
//! 2. an empty payout private key forces auto-pay off
//! 3. the snapshot must satisfy the config schema (all errors reported)
//! 4. unassign timers must not be negative

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::config::duration::parse_duration;
use crate::config::keys::derive_public_key;
use crate::config::network::payout_config_by_network_id;
use crate::config::source::{
    ConfigSource, JsonFileWideConfig, ProcessEnv, StaticWideConfig, WideConfigResolver,
};
use crate::config::{
    AssignConfig, BotConfig, CommentsConfig, DEFAULT_BOT_DELAY, DEFAULT_DISQUALIFY_TIME,
    DEFAULT_FOLLOW_UP_TIME, DEFAULT_LOG_LEVEL, DEFAULT_PERMIT_BASE_URL, LogConfig, ModeConfig,
    PayoutConfig, PriceConfig, SodiumConfig, SupabaseConfig, TelegramConfig, UnassignConfig,
    WalletConfig, WideConfig,
};
use crate::error::ConfigError;
use crate::schema::definitions::CONFIG_VALIDATOR;
use crate::schema::validate_with;

/// Assembles configuration snapshots from external sources.
pub struct ConfigLoader {
    env: Arc<dyn ConfigSource>,
    wide: Arc<dyn WideConfigResolver>,
}

impl ConfigLoader {
    pub fn new(env: Arc<dyn ConfigSource>, wide: Arc<dyn WideConfigResolver>) -> Self {
        Self { env, wide }
    }

    /// Loader over the process environment. The wide config comes from the
    /// JSON file at `BOT_CONFIG_PATH` when set, otherwise built-in defaults.
    pub fn from_env() -> Self {
        let wide: Arc<dyn WideConfigResolver> = match std::env::var("BOT_CONFIG_PATH") {
            Ok(path) if !path.is_empty() => Arc::new(JsonFileWideConfig::new(path)),
            _ => Arc::new(StaticWideConfig::default()),
        };
        Self::new(Arc::new(ProcessEnv), wide)
    }

    /// Resolve every source and build the snapshot for `event`.
    pub async fn load(&self, event: &serde_json::Value) -> Result<BotConfig, ConfigError> {
        let wide = self.wide.resolve(event).await?;
        self.build(wide)
    }

    /// Combine an already resolved wide config with the environment.
    pub fn build(&self, wide: WideConfig) -> Result<BotConfig, ConfigError> {
        let sodium_private_key = self.env.get("X25519_PRIVATE_KEY").unwrap_or_default();
        let public_key = derive_public_key(&sodium_private_key)?;
        let network = payout_config_by_network_id(wide.network_id)?;

        let follow_up_time = self.duration("FOLLOW_UP_TIME", DEFAULT_FOLLOW_UP_TIME)?;
        let disqualify_time = self.duration("DISQUALIFY_TIME", DEFAULT_DISQUALIFY_TIME)?;
        let delay = match self.env.get_non_empty("TELEGRAM_BOT_DELAY") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                key: "TELEGRAM_BOT_DELAY".into(),
                message: format!("{raw:?}: {e}"),
            })?,
            None => DEFAULT_BOT_DELAY,
        };

        let mut config = BotConfig {
            log: LogConfig {
                level: self
                    .env
                    .get_non_empty("LOG_LEVEL")
                    .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
                    .to_ascii_lowercase(),
                ingestion_key: self.secret("LOG_INGESTION_KEY"),
            },
            price: PriceConfig {
                base_multiplier: wide.base_multiplier,
                issue_creator_multiplier: wide.issue_creator_multiplier,
                time_labels: wide.time_labels,
                priority_labels: wide.priority_labels,
                comment_element_pricing: wide.comment_element_pricing,
                default_labels: wide.default_labels,
            },
            comments: CommentsConfig {
                promotion_comment: wide.promotion_comment,
                new_contributor_greeting: wide.new_contributor_greeting,
            },
            payout: PayoutConfig {
                network_id: wide.network_id,
                rpc: network.rpc.to_string(),
                private_key: wide.private_key,
                payment_token: network.payment_token.to_string(),
                permit_base_url: self
                    .env
                    .get_non_empty("PERMIT_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_PERMIT_BASE_URL.to_string()),
            },
            unassign: UnassignConfig {
                follow_up_time,
                disqualify_time,
            },
            supabase: SupabaseConfig {
                url: self.env.get("SUPABASE_URL").unwrap_or_default(),
                key: self.secret("SUPABASE_KEY"),
            },
            telegram: TelegramConfig {
                token: self.secret("TELEGRAM_BOT_TOKEN"),
                delay,
            },
            mode: ModeConfig {
                auto_pay_mode: wide.auto_pay_mode,
                disable_analytics: wide.disable_analytics,
                incentive_mode: wide.incentive_mode,
            },
            assign: AssignConfig {
                bounty_hunter_max: wide.bounty_hunter_max,
            },
            sodium: SodiumConfig {
                private_key: SecretString::from(sodium_private_key),
                public_key,
            },
            wallet: WalletConfig {
                register_wallet_with_verification: wide.register_wallet_with_verification,
            },
        };

        if config.log.ingestion_key.expose_secret().is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "LOG_INGESTION_KEY".into(),
                hint: "Log ingestion key missing".into(),
            });
        }

        if config.payout.private_key.expose_secret().is_empty() && config.mode.auto_pay_mode {
            debug!("Payout private key is empty, turning auto-pay mode off");
            config.mode.auto_pay_mode = false;
        }

        let report = validate_with(&CONFIG_VALIDATOR, &config.validation_document());
        if !report.is_valid() {
            return Err(ConfigError::Schema(report.summary()));
        }

        let unassign = &config.unassign;
        if unassign.follow_up_time < chrono::Duration::zero()
            || unassign.disqualify_time < chrono::Duration::zero()
        {
            return Err(ConfigError::InvalidValue {
                key: "unassign".into(),
                message: format!(
                    "Invalid time interval, followUpTime: {}, disqualifyTime: {}",
                    unassign.follow_up_time.num_milliseconds(),
                    unassign.disqualify_time.num_milliseconds(),
                ),
            });
        }

        Ok(config)
    }

    fn secret(&self, key: &str) -> SecretString {
        SecretString::from(self.env.get(key).unwrap_or_default())
    }

    fn duration(&self, key: &str, default: &str) -> Result<chrono::Duration, ConfigError> {
        let raw = self
            .env
            .get_non_empty(key)
            .unwrap_or_else(|| default.to_string());
        parse_duration(&raw).map_err(|message| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        })
    }
}
