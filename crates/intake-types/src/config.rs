//! Process configuration for the intake assistant.
//!
//! `IntakeConfig` mirrors the optional `intake.toml` file. Every field has a
//! default so an empty (or missing) file is valid; environment variables are
//! layered on top by the infra loader.

use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct IntakeConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub whatsapp: WhatsAppConfig,

    #[serde(default)]
    pub sheets: SheetsConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            whatsapp: WhatsAppConfig::default(),
            sheets: SheetsConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

/// WhatsApp Cloud API credentials and webhook secrets.
///
/// Secrets stay wrapped in [`SecretString`]; `Debug` prints them redacted.
#[derive(Debug, Clone, Deserialize)]
pub struct WhatsAppConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default)]
    pub phone_number_id: String,

    #[serde(default = "empty_secret", deserialize_with = "secret")]
    pub access_token: SecretString,

    /// Token echoed back during the webhook subscription handshake.
    #[serde(default = "empty_secret", deserialize_with = "secret")]
    pub verify_token: SecretString,

    /// App secret for `X-Hub-Signature-256` verification. Unset disables the check.
    #[serde(default, deserialize_with = "optional_secret")]
    pub app_secret: Option<SecretString>,
}

fn default_api_base() -> String {
    "https://graph.facebook.com/v22.0".to_string()
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

fn secret<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}

fn optional_secret<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<SecretString>, D::Error> {
    Option::<String>::deserialize(deserializer).map(|v| v.map(SecretString::from))
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            phone_number_id: String::new(),
            access_token: empty_secret(),
            verify_token: empty_secret(),
            app_secret: None,
        }
    }
}

/// Spreadsheet ingestion endpoint (a Google Apps Script web app).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SheetsConfig {
    #[serde(default)]
    pub url: Option<String>,
}

/// Session retention.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionConfig {
    /// Evict sessions idle for longer than this. `None` keeps them forever.
    #[serde(default)]
    pub idle_timeout_secs: Option<u64>,

    /// How often the eviction sweep runs when enabled.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

fn default_sweep_interval_secs() -> u64 {
    60
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: None,
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}
