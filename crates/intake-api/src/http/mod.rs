//! HTTP layer: WhatsApp webhook, operator API and monitor page.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
