//! `intake config`: show the effective configuration.

use anyhow::Result;
use console::style;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;

use intake_types::config::IntakeConfig;

/// `"set"` or `"unset"`; secret values are never printed.
fn secret_status(secret: Option<&SecretString>) -> &'static str {
    match secret {
        Some(s) if !s.expose_secret().is_empty() => "set",
        _ => "unset",
    }
}

/// JSON view of the configuration with secrets reduced to their status.
pub fn config_json(config: &IntakeConfig) -> serde_json::Value {
    let whatsapp = &config.whatsapp;
    json!({
        "host": config.host,
        "port": config.port,
        "whatsapp": {
            "api_base": whatsapp.api_base,
            "phone_number_id": whatsapp.phone_number_id,
            "access_token": secret_status(Some(&whatsapp.access_token)),
            "verify_token": secret_status(Some(&whatsapp.verify_token)),
            "app_secret": secret_status(whatsapp.app_secret.as_ref()),
        },
        "sheets": config.sheets,
        "session": config.session,
    })
}

/// Print the configuration.
pub fn show_config(config: &IntakeConfig, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&config_json(config))?);
        return Ok(());
    }

    let or_unset = |v: &str| {
        if v.is_empty() || v == "unset" {
            style("(unset)".to_string()).dim().to_string()
        } else {
            v.to_string()
        }
    };
    let whatsapp = &config.whatsapp;

    println!();
    println!(
        "  {} intake v{}",
        style("⚙").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("  {}", style("── Server ──").dim());
    println!("  Listen:          {}:{}", config.host, config.port);
    println!();
    println!("  {}", style("── WhatsApp ──").dim());
    println!("  API base:        {}", whatsapp.api_base);
    println!("  Phone number ID: {}", or_unset(&whatsapp.phone_number_id));
    println!(
        "  Access token:    {}",
        or_unset(secret_status(Some(&whatsapp.access_token)))
    );
    println!(
        "  Verify token:    {}",
        or_unset(secret_status(Some(&whatsapp.verify_token)))
    );
    println!(
        "  App secret:      {}",
        or_unset(secret_status(whatsapp.app_secret.as_ref()))
    );
    println!();
    println!("  {}", style("── Sheets ──").dim());
    println!(
        "  Apps Script URL: {}",
        or_unset(config.sheets.url.as_deref().unwrap_or(""))
    );
    println!();
    println!("  {}", style("── Sessions ──").dim());
    match config.session.idle_timeout_secs {
        Some(secs) => println!(
            "  Idle eviction:   after {secs}s (sweep every {}s)",
            config.session.sweep_interval_secs
        ),
        None => println!("  Idle eviction:   {}", style("off").dim()),
    }
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_status_reports_presence_only() {
        assert_eq!(secret_status(None), "unset");
        assert_eq!(secret_status(Some(&SecretString::from(String::new()))), "unset");
        assert_eq!(
            secret_status(Some(&SecretString::from("EAAGsupersecret1234".to_string()))),
            "set"
        );
    }

    #[test]
    fn config_json_hides_secret_values() {
        let mut config = IntakeConfig::default();
        config.whatsapp.access_token = SecretString::from("EAAGsupersecret1234".to_string());
        config.whatsapp.app_secret = Some(SecretString::from("abcdef0123456789".to_string()));
        config.whatsapp.phone_number_id = "1098765".to_string();

        let value = config_json(&config);
        assert_eq!(value["whatsapp"]["access_token"], "set");
        assert_eq!(value["whatsapp"]["verify_token"], "unset");
        assert_eq!(value["whatsapp"]["app_secret"], "set");
        assert_eq!(value["whatsapp"]["phone_number_id"], "1098765");
        assert_eq!(value["port"], 3000);
        assert_eq!(value["session"]["sweep_interval_secs"], 60);

        let rendered = value.to_string();
        assert!(!rendered.contains("supersecret"));
        assert!(!rendered.contains("0123456789"));
    }
}
