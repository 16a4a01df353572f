use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

use crate::error::{GuardError, GuardResult};

/// Trust configuration sourced from the bootstrap JSON payload.
///
/// Constructed once per process. A field that is absent or empty in the
/// payload keeps its built-in default; only `whitelist_url` has no default
/// because no list can load without it.
#[derive(Debug, Clone)]
pub struct TrustConfig {
    /// Location of the trust-list payload; absolute, or relative to the
    /// process base URL.
    pub whitelist_url: String,
    pub refresh_interval_ms: u64,
    // Display/contact fields. Opaque pass-through strings, never matched
    // or validated here.
    pub support_email: String,
    pub request_button_title: String,
    pub email_subject: String,
    pub email_body: String,
    pub hover_text: String,
}

pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 60_000;
pub const DEFAULT_SUPPORT_EMAIL: &str = "support@example.com";
pub const DEFAULT_REQUEST_BUTTON_TITLE: &str = "Request to Add to Whitelist";
pub const DEFAULT_EMAIL_SUBJECT: &str = "Whitelist Request for Site";
pub const DEFAULT_EMAIL_BODY: &str =
    "Dear Admin,\n\nPlease add this site to the whitelist: ${window.location.href}.\n\nThanks!";
pub const DEFAULT_HOVER_TEXT: &str =
    "Click to request adding this site to the trusted whitelist.";

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            whitelist_url: String::new(),
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            support_email: DEFAULT_SUPPORT_EMAIL.to_string(),
            request_button_title: DEFAULT_REQUEST_BUTTON_TITLE.to_string(),
            email_subject: DEFAULT_EMAIL_SUBJECT.to_string(),
            email_body: DEFAULT_EMAIL_BODY.to_string(),
            hover_text: DEFAULT_HOVER_TEXT.to_string(),
        }
    }
}

/// Raw shape of the bootstrap payload. Every field is optional; merging
/// onto the defaults happens in `TrustConfig::from_bootstrap`.
#[derive(Debug, Deserialize)]
struct Bootstrap {
    #[serde(default, rename = "whitelistUrl")]
    whitelist_url: Option<String>,
    #[serde(default, rename = "refreshIntervalMs")]
    refresh_interval_ms: Option<u64>,
    #[serde(default, rename = "supportEmail")]
    support_email: Option<String>,
    #[serde(default, rename = "requestButtonTitle")]
    request_button_title: Option<String>,
    #[serde(default, rename = "emailSubject")]
    email_subject: Option<String>,
    #[serde(default, rename = "emailBody")]
    email_body: Option<String>,
    #[serde(default, rename = "hoverText")]
    hover_text: Option<String>,
}

fn apply(target: &mut String, value: Option<String>) {
    if let Some(v) = value {
        if !v.is_empty() {
            *target = v;
        }
    }
}

impl TrustConfig {
    /// Parses the bootstrap payload and merges it onto the built-in
    /// defaults. Absent or empty fields keep their defaults; unknown
    /// fields are ignored.
    pub fn from_bootstrap(text: &str) -> GuardResult<Self> {
        let raw: Bootstrap = serde_json::from_str(text)
            .map_err(|e| GuardError::ConfigFetch(format!("unparseable bootstrap payload: {e}")))?;

        let mut config = TrustConfig::default();
        apply(&mut config.whitelist_url, raw.whitelist_url);
        apply(&mut config.support_email, raw.support_email);
        apply(&mut config.request_button_title, raw.request_button_title);
        apply(&mut config.email_subject, raw.email_subject);
        apply(&mut config.email_body, raw.email_body);
        apply(&mut config.hover_text, raw.hover_text);

        if let Some(ms) = raw.refresh_interval_ms {
            if ms > 0 {
                config.refresh_interval_ms = ms;
            }
        }

        Ok(config)
    }
}

/// Process-level configuration (TOML file), distinct from the remotely
/// fetched `TrustConfig`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,

    /// Where the bootstrap configuration payload lives.
    #[serde(default = "default_config_url")]
    pub config_url: String,

    /// Base URL that relative whitelist URLs are resolved against.
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub query: QueryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Retry policy for the caller-facing query gateway.
#[derive(Debug, Deserialize, Clone)]
pub struct QueryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

// Defaults
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8090
}
fn default_config_url() -> String {
    "config.json".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_max_attempts() -> u32 {
    3
}
fn default_base_delay_ms() -> u64 {
    100
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            config_url: default_config_url(),
            base_url: None,
            logging: LoggingConfig::default(),
            query: QueryConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

impl AppConfig {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .await
            .context("Failed to read config file")?;
        let config: AppConfig = toml::from_str(&contents).context("Failed to parse config TOML")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_merge_overrides_and_defaults() {
        let payload = r#"{
            "whitelistUrl": "https://example.com/whitelist.txt",
            "supportEmail": "it@corp.example",
            "hoverText": ""
        }"#;

        let config = TrustConfig::from_bootstrap(payload).unwrap();
        assert_eq!(config.whitelist_url, "https://example.com/whitelist.txt");
        assert_eq!(config.support_email, "it@corp.example");
        // Absent fields keep the built-in defaults
        assert_eq!(config.email_subject, DEFAULT_EMAIL_SUBJECT);
        assert_eq!(config.refresh_interval_ms, DEFAULT_REFRESH_INTERVAL_MS);
        // Empty string behaves like absent
        assert_eq!(config.hover_text, DEFAULT_HOVER_TEXT);
    }

    #[test]
    fn test_bootstrap_zero_refresh_interval_keeps_default() {
        let config = TrustConfig::from_bootstrap(r#"{"refreshIntervalMs": 0}"#).unwrap();
        assert_eq!(config.refresh_interval_ms, DEFAULT_REFRESH_INTERVAL_MS);
    }

    #[test]
    fn test_bootstrap_rejects_garbage() {
        assert!(TrustConfig::from_bootstrap("not json").is_err());
    }

    #[test]
    fn test_app_config_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.query.max_attempts, 3);
        assert_eq!(config.query.base_delay_ms, 100);
        assert_eq!(config.logging.level, "info");
    }
}
