//! WhatsApp webhook envelopes and request verification.
//!
//! The Cloud API nests a message four levels deep:
//! `entry[0].changes[0].value.messages[0]`. Only the first text message of a
//! delivery is forwarded; status callbacks and empty envelopes are no-ops.

use hmac::{Hmac, Mac};
use intake_types::conversation::InboundMessage;
use serde::Deserialize;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_PREFIX: &str = "sha256=";

/// Errors from webhook verification.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("subscription verification failed")]
    SubscriptionRejected,

    #[error("missing signature header")]
    MissingSignature,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid HMAC key: {0}")]
    InvalidKey(String),
}

/// Top-level webhook delivery.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub entry: Vec<WebhookEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub changes: Vec<WebhookChange>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookChange {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub value: WebhookValue,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookValue {
    #[serde(default)]
    pub messages: Vec<WebhookMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookMessage {
    pub from: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<WebhookText>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookText {
    #[serde(default)]
    pub body: String,
}

impl WebhookPayload {
    /// The first message of the first change of the first entry, normalized
    /// to an [`InboundMessage`]. Non-text messages carry an empty text.
    pub fn first_message(&self) -> Option<InboundMessage> {
        let message = self
            .entry
            .first()?
            .changes
            .first()?
            .value
            .messages
            .first()?;
        let text = message
            .text
            .as_ref()
            .map(|t| t.body.clone())
            .unwrap_or_default();
        Some(InboundMessage::new(message.from.clone(), text))
    }
}

/// Check the `GET /webhook` subscription handshake.
///
/// Succeeds only when `mode` is `subscribe` and `token` equals the configured
/// verify token. An empty configured token never matches.
pub fn verify_subscription(
    mode: Option<&str>,
    token: Option<&str>,
    expected: &str,
) -> Result<(), WebhookError> {
    let (Some("subscribe"), Some(token)) = (mode, token) else {
        return Err(WebhookError::SubscriptionRejected);
    };
    if expected.is_empty() || !constant_time_eq(expected.as_bytes(), token.as_bytes()) {
        return Err(WebhookError::SubscriptionRejected);
    }
    Ok(())
}

/// Verify an `X-Hub-Signature-256` header (`sha256=<hex>`) against `body`.
pub fn verify_signature(
    app_secret: &[u8],
    body: &[u8],
    header: Option<&str>,
) -> Result<(), WebhookError> {
    let header = header.ok_or(WebhookError::MissingSignature)?;
    let signature_hex = header
        .strip_prefix(SIGNATURE_PREFIX)
        .ok_or(WebhookError::InvalidSignature)?;
    let expected = hex_decode(signature_hex).map_err(|_| WebhookError::InvalidSignature)?;

    let mut mac = HmacSha256::new_from_slice(app_secret)
        .map_err(|e| WebhookError::InvalidKey(e.to_string()))?;
    mac.update(body);
    mac.verify_slice(&expected).map_err(|_| WebhookError::InvalidSignature)
}

/// Compute the `X-Hub-Signature-256` header value for `body`.
pub fn sign_payload(app_secret: &[u8], body: &[u8]) -> Result<String, WebhookError> {
    let mut mac = HmacSha256::new_from_slice(app_secret)
        .map_err(|e| WebhookError::InvalidKey(e.to_string()))?;
    mac.update(body);
    let digest = mac.finalize().into_bytes();
    Ok(format!("{SIGNATURE_PREFIX}{}", hex_encode(&digest)))
}

fn hex_decode(hex: &str) -> Result<Vec<u8>, ()> {
    if hex.len() % 2 != 0 || !hex.is_ascii() {
        return Err(());
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ()))
        .collect()
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// XOR-accumulating comparison; runtime does not depend on where inputs differ.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
