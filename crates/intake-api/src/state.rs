//! Application state wiring the intake service to its infra implementations.
//!
//! `IntakeService` is generic over its ports; AppState pins it to the
//! in-memory stores, the WhatsApp sender and the Apps Script sink.

use std::sync::Arc;

use intake_core::service::IntakeService;
use intake_infra::memory::{InMemorySessionStore, InMemoryTranscriptLog};
use intake_infra::sheets::AppsScriptSink;
use intake_infra::whatsapp::WhatsAppSender;
use intake_types::config::IntakeConfig;
use secrecy::ExposeSecret;

pub type ConcreteIntakeService =
    IntakeService<InMemorySessionStore, InMemoryTranscriptLog, WhatsAppSender, AppsScriptSink>;

/// Shared state handed to every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ConcreteIntakeService>,
    pub config: Arc<IntakeConfig>,
}

impl AppState {
    /// Build the service graph from configuration.
    pub fn init(config: IntakeConfig) -> anyhow::Result<Self> {
        if config.whatsapp.phone_number_id.is_empty() || config.whatsapp.access_token.expose_secret().is_empty() {
            tracing::warn!("WhatsApp phone number id or access token not set; outbound messages will fail");
        }
        if config.whatsapp.verify_token.expose_secret().is_empty() {
            tracing::warn!("VERIFY_TOKEN not set; webhook subscription handshake will be refused");
        }

        let sender = WhatsAppSender::from_config(&config.whatsapp)?;
        let sink = AppsScriptSink::from_config(&config.sheets)?;

        let service = IntakeService::new(
            InMemorySessionStore::new(),
            InMemoryTranscriptLog::new(),
            sender,
            sink,
        );

        Ok(Self {
            service: Arc::new(service),
            config: Arc::new(config),
        })
    }
}
