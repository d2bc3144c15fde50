//! Configuration loader for the intake assistant.
//!
//! Reads an optional TOML file into [`IntakeConfig`], falling back to
//! defaults when the file is missing or malformed, then layers environment
//! variables on top.

use std::path::Path;

use intake_types::config::IntakeConfig;
use intake_types::error::ConfigError;
use secrecy::SecretString;

/// Load configuration from `path`.
///
/// - Missing file: [`IntakeConfig::default()`].
/// - Unreadable or unparsable file: logs a warning and returns the default.
pub async fn load_config(path: &Path) -> IntakeConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return IntakeConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return IntakeConfig::default();
        }
    };

    match toml::from_str::<IntakeConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            IntakeConfig::default()
        }
    }
}

/// Overlay environment variables from the running process.
pub fn apply_process_env(config: IntakeConfig) -> Result<IntakeConfig, ConfigError> {
    apply_env_overrides(config, |key| std::env::var(key).ok())
}

/// Overlay environment variables read through `lookup`.
///
/// Empty values are ignored so an exported-but-blank variable never
/// clears a value set in the file.
pub fn apply_env_overrides<F>(mut config: IntakeConfig, lookup: F) -> Result<IntakeConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(host) = get("HOST") {
        config.host = host;
    }
    if let Some(port) = get("PORT") {
        config.port = parse_number("PORT", &port)?;
    }
    if let Some(v) = get("PHONE_NUMBER_ID") {
        config.whatsapp.phone_number_id = v;
    }
    if let Some(v) = get("WHATSAPP_TOKEN") {
        config.whatsapp.access_token = SecretString::from(v);
    }
    if let Some(v) = get("VERIFY_TOKEN") {
        config.whatsapp.verify_token = SecretString::from(v);
    }
    if let Some(v) = get("WHATSAPP_APP_SECRET") {
        config.whatsapp.app_secret = Some(SecretString::from(v));
    }
    if let Some(v) = get("WHATSAPP_API_BASE") {
        config.whatsapp.api_base = v.trim_end_matches('/').to_string();
    }
    if let Some(v) = get("APPS_SCRIPT_URL") {
        config.sheets.url = Some(v);
    }
    if let Some(v) = get("SESSION_IDLE_TIMEOUT_SECS") {
        config.session.idle_timeout_secs = Some(parse_number("SESSION_IDLE_TIMEOUT_SECS", &v)?);
    }

    Ok(config)
}

fn parse_number<N>(key: &str, raw: &str) -> Result<N, ConfigError>
where
    N: std::str::FromStr,
    N::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: N::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        reason: format!("'{raw}': {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("intake.toml")).await;
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.whatsapp.verify_token.expose_secret(), "");
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("intake.toml");
        tokio::fs::write(
            &path,
            r#"
port = 8080

[whatsapp]
phone_number_id = "1234567890"
verify_token = "hook-token"

[sheets]
url = "https://script.google.com/macros/s/abc/exec"

[session]
idle_timeout_secs = 3600
"#,
        )
        .await
        .unwrap();

        let config = load_config(&path).await;
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.whatsapp.phone_number_id, "1234567890");
        assert_eq!(config.whatsapp.verify_token.expose_secret(), "hook-token");
        assert_eq!(config.whatsapp.api_base, "https://graph.facebook.com/v22.0");
        assert_eq!(
            config.sheets.url.as_deref(),
            Some("https://script.google.com/macros/s/abc/exec")
        );
        assert_eq!(config.session.idle_timeout_secs, Some(3600));
        assert_eq!(config.session.sweep_interval_secs, 60);
    }

    #[tokio::test]
    async fn load_config_malformed_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("intake.toml");
        tokio::fs::write(&path, "port = \"not a number").await.unwrap();

        let config = load_config(&path).await;
        assert_eq!(config.port, 3000);
        assert!(config.sheets.url.is_none());
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let config = apply_env_overrides(
            IntakeConfig::default(),
            env(&[
                ("PORT", "4000"),
                ("WHATSAPP_TOKEN", "EAAG-secret"),
                ("VERIFY_TOKEN", "verify-me"),
                ("PHONE_NUMBER_ID", "99887766"),
                ("WHATSAPP_APP_SECRET", "app-secret"),
                ("APPS_SCRIPT_URL", "https://example.test/exec"),
                ("WHATSAPP_API_BASE", "http://127.0.0.1:9999/"),
            ]),
        )
        .unwrap();

        assert_eq!(config.port, 4000);
        assert_eq!(config.whatsapp.access_token.expose_secret(), "EAAG-secret");
        assert_eq!(config.whatsapp.verify_token.expose_secret(), "verify-me");
        assert_eq!(config.whatsapp.phone_number_id, "99887766");
        assert_eq!(config.whatsapp.api_base, "http://127.0.0.1:9999");
        assert_eq!(config.sheets.url.as_deref(), Some("https://example.test/exec"));
        assert_eq!(
            config.whatsapp.app_secret.as_ref().map(|s| s.expose_secret()),
            Some("app-secret")
        );
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut base = IntakeConfig::default();
        base.whatsapp.verify_token = SecretString::from("from-file".to_string());

        let config = apply_env_overrides(base, env(&[("VERIFY_TOKEN", "  ")])).unwrap();
        assert_eq!(config.whatsapp.verify_token.expose_secret(), "from-file");
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = apply_env_overrides(IntakeConfig::default(), env(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "PORT"));
    }

    #[test]
    fn idle_timeout_from_env() {
        let config = apply_env_overrides(
            IntakeConfig::default(),
            env(&[("SESSION_IDLE_TIMEOUT_SECS", "900")]),
        )
        .unwrap();
        assert_eq!(config.session.idle_timeout_secs, Some(900));
    }
}
