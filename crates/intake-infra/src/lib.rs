//! Infrastructure layer for the intake assistant.
//!
//! Contains implementations of the ports defined in `intake-core`:
//! in-memory session and transcript storage, the WhatsApp Cloud API sender
//! and webhook envelope handling, the Apps Script record sink, and the
//! configuration loader.

pub mod config;
pub mod memory;
pub mod sheets;
pub mod whatsapp;

#[cfg(test)]
mod test_server;
