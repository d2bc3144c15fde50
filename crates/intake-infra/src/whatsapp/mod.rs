//! WhatsApp Cloud API integration.
//!
//! - `client`: outbound text messages via the Graph API.
//! - `webhook`: inbound webhook envelopes, subscription handshake and
//!   payload signature verification.

pub mod client;
pub mod webhook;

pub use client::WhatsAppSender;
pub use webhook::{WebhookError, WebhookPayload};
