//! Sources the configuration loader reads from.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::config::WideConfig;
use crate::error::ConfigError;

/// Environment-like key/value store.
pub trait ConfigSource: Send + Sync {
    /// Raw value for `key`, if present.
    fn get(&self, key: &str) -> Option<String>;

    /// Value for `key`, treating an empty string as absent.
    fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get(key).filter(|v| !v.is_empty())
    }
}

/// Reads from the process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl ConfigSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// Resolves the repository-wide config bundle for an event.
#[async_trait]
pub trait WideConfigResolver: Send + Sync {
    /// Resolve the bundle. `event` is the raw inbound payload, which may be
    /// used to pick per-repository settings.
    async fn resolve(&self, event: &serde_json::Value) -> Result<WideConfig, ConfigError>;
}

/// Always resolves to the same bundle.
#[derive(Debug, Clone, Default)]
pub struct StaticWideConfig(pub WideConfig);

#[async_trait]
impl WideConfigResolver for StaticWideConfig {
    async fn resolve(&self, _event: &serde_json::Value) -> Result<WideConfig, ConfigError> {
        Ok(self.0.clone())
    }
}

/// Reads the bundle from a JSON file on every event, so edits apply without
/// a restart. Missing fields fall back to [`WideConfig::default`].
#[derive(Debug, Clone)]
pub struct JsonFileWideConfig {
    path: PathBuf,
}

impl JsonFileWideConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl WideConfigResolver for JsonFileWideConfig {
    async fn resolve(&self, _event: &serde_json::Value) -> Result<WideConfig, ConfigError> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        serde_json::from_str(&raw).map_err(|e| {
            ConfigError::ParseError(format!("{}: {e}", self.path.display()))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn empty_values_count_as_absent() {
        let env = HashMap::from([
            ("A".to_string(), "".to_string()),
            ("B".to_string(), "set".to_string()),
        ]);
        assert_eq!(env.get_non_empty("A"), None);
        assert_eq!(ConfigSource::get(&env, "A"), Some(String::new()));
        assert_eq!(env.get_non_empty("B").as_deref(), Some("set"));
        assert_eq!(env.get_non_empty("C"), None);
    }

    #[tokio::test]
    async fn json_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"baseMultiplier": 3, "defaultLabels": ["bounty"]}}"#).unwrap();

        let resolver = JsonFileWideConfig::new(file.path());
        let wide = resolver.resolve(&serde_json::json!({})).await.unwrap();
        assert_eq!(wide.base_multiplier, dec!(3));
        assert_eq!(wide.default_labels, vec!["bounty".to_string()]);
        assert_eq!(wide.network_id, 100);
    }

    #[tokio::test]
    async fn json_file_parse_error_names_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = JsonFileWideConfig::new(file.path())
            .resolve(&serde_json::json!({}))
            .await
            .unwrap_err();
        match err {
            ConfigError::ParseError(msg) => {
                assert!(msg.contains(&file.path().display().to_string()));
            }
            other => panic!("Expected ParseError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn json_file_missing_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonFileWideConfig::new(dir.path().join("absent.json"))
            .resolve(&serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
