//! RON configuration for the importer binary.
//!
//! Credentials and endpoints have no sensible defaults, so the `feed` and
//! `store` sections are required; `sync` and `rules` fall back to the
//! documented defaults when absent.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use importer_core::InclusionRules;
use importer_engine::{FeedSettings, ReconcileSettings, RetryPolicy, StoreSettings};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse config file {path}: {message}")]
    Parse { path: String, message: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub rules: InclusionRules,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    pub url: String,
    pub api_key: String,
    pub bearer_token: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_feed_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub url: String,
    pub consumer_key: String,
    pub consumer_secret: String,
    #[serde(default = "default_store_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Run-behaviour knobs; every field has a default so the section can be
/// omitted entirely.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub staleness_hours: i64,
    pub request_delay_ms: u64,
    pub retry_attempts: u32,
    pub retry_delay_secs: u64,
    pub busy_status: u16,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            staleness_hours: 24,
            request_delay_ms: 1000,
            retry_attempts: 5,
            retry_delay_secs: 20,
            busy_status: 429,
        }
    }
}

fn default_language() -> String {
    "nl".to_string()
}

fn default_page_size() -> u32 {
    100
}

fn default_feed_timeout_secs() -> u64 {
    30
}

fn default_store_timeout_secs() -> u64 {
    10
}

impl AppConfig {
    pub fn feed_settings(&self) -> FeedSettings {
        FeedSettings {
            url: self.feed.url.clone(),
            api_key: self.feed.api_key.clone(),
            bearer_token: self.feed.bearer_token.clone(),
            language: self.feed.language.clone(),
            page_size: self.feed.page_size,
            request_timeout: Duration::from_secs(self.feed.request_timeout_secs),
        }
    }

    pub fn store_settings(&self) -> StoreSettings {
        let mut settings = StoreSettings::new(
            self.store.url.clone(),
            self.store.consumer_key.clone(),
            self.store.consumer_secret.clone(),
        );
        settings.request_timeout = Duration::from_secs(self.store.request_timeout_secs);
        settings
    }

    pub fn reconcile_settings(&self, dry_run: bool) -> ReconcileSettings {
        ReconcileSettings {
            staleness_threshold: ChronoDuration::hours(self.sync.staleness_hours),
            request_delay: Duration::from_millis(self.sync.request_delay_ms),
            dry_run,
            retry: RetryPolicy {
                max_attempts: self.sync.retry_attempts,
                delay: Duration::from_secs(self.sync.retry_delay_secs),
                busy_status: self.sync.busy_status,
            },
            now_utc: Arc::new(Utc::now),
        }
    }
}

pub fn load(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    ron::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn full_config_parses() {
        let file = write_config(
            r#"(
                feed: (
                    url: "https://feed.example/api",
                    api_key: "key",
                    bearer_token: "token",
                    language: "nl",
                    page_size: 50,
                ),
                store: (
                    url: "https://shop.example/wp-json/wc/v3",
                    consumer_key: "ck",
                    consumer_secret: "cs",
                ),
                sync: (
                    staleness_hours: 12,
                    request_delay_ms: 250,
                    retry_attempts: 3,
                    retry_delay_secs: 5,
                    busy_status: 443,
                ),
                rules: (
                    categories: {
                        "Vazen": ( sub_cats: ["Glas"] ),
                    },
                ),
            )"#,
        );

        let config = load(file.path()).unwrap();
        assert_eq!(config.feed.page_size, 50);
        assert_eq!(config.sync.busy_status, 443);
        assert_eq!(
            config.rules.categories["Vazen"].sub_cats,
            vec!["Glas".to_string()]
        );

        let reconcile = config.reconcile_settings(false);
        assert_eq!(reconcile.staleness_threshold, ChronoDuration::hours(12));
        assert_eq!(reconcile.retry.max_attempts, 3);
        assert!(!reconcile.dry_run);
    }

    #[test]
    fn sync_and_rules_sections_are_optional() {
        let file = write_config(
            r#"(
                feed: (
                    url: "https://feed.example/api",
                    api_key: "key",
                    bearer_token: "token",
                ),
                store: (
                    url: "https://shop.example",
                    consumer_key: "ck",
                    consumer_secret: "cs",
                ),
            )"#,
        );

        let config = load(file.path()).unwrap();
        assert_eq!(config.feed.language, "nl");
        assert_eq!(config.feed.page_size, 100);
        assert_eq!(config.sync.staleness_hours, 24);
        assert_eq!(config.sync.retry_attempts, 5);
        assert!(config.rules.is_empty());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = load(Path::new("/nonexistent/importer.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn malformed_ron_is_a_parse_error() {
        let file = write_config("( feed: oops");
        let err = load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
