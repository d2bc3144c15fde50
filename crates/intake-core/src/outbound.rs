//! Outbound delivery port.

use std::future::Future;

use intake_types::error::TransportError;

/// Delivers a text message to a user over the messaging channel.
///
/// Implementations live in intake-infra (e.g., `WhatsAppSender`).
pub trait MessageSender: Send + Sync {
    fn send_text(
        &self,
        user_id: &str,
        text: &str,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}
