//! Outbound text messages through the WhatsApp Cloud API.
//!
//! The access token is held as a [`SecretString`] and only exposed when the
//! `Authorization` header is built. It never appears in Debug output.

use std::time::Duration;

use intake_core::outbound::MessageSender;
use intake_types::config::WhatsAppConfig;
use intake_types::error::TransportError;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Sends plain text messages to a user's phone number.
pub struct WhatsAppSender {
    http: reqwest::Client,
    messages_url: String,
    access_token: SecretString,
}

#[derive(Serialize)]
struct OutgoingMessage<'a> {
    messaging_product: &'static str,
    to: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    text: OutgoingText<'a>,
}

#[derive(Serialize)]
struct OutgoingText<'a> {
    body: &'a str,
}

impl WhatsAppSender {
    /// Build a sender from the WhatsApp section of the configuration.
    pub fn from_config(config: &WhatsAppConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;
        Ok(Self::with_client(
            http,
            &config.api_base,
            &config.phone_number_id,
            config.access_token.clone(),
        ))
    }

    pub fn with_client(
        http: reqwest::Client,
        api_base: &str,
        phone_number_id: &str,
        access_token: SecretString,
    ) -> Self {
        let messages_url = format!(
            "{}/{}/messages",
            api_base.trim_end_matches('/'),
            phone_number_id
        );
        Self {
            http,
            messages_url,
            access_token,
        }
    }

    pub fn messages_url(&self) -> &str {
        &self.messages_url
    }
}

impl std::fmt::Debug for WhatsAppSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhatsAppSender")
            .field("messages_url", &self.messages_url)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl MessageSender for WhatsAppSender {
    async fn send_text(&self, user_id: &str, text: &str) -> Result<(), TransportError> {
        let payload = OutgoingMessage {
            messaging_product: "whatsapp",
            to: user_id,
            kind: "text",
            text: OutgoingText { body: text },
        };

        let response = self
            .http
            .post(&self.messages_url)
            .bearer_auth(self.access_token.expose_secret())
            .json(&payload)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), user_id, "WhatsApp API rejected message");
            return Err(TransportError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(user_id, "WhatsApp message sent");
        Ok(())
    }
}
