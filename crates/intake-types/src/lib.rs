//! Shared domain types for the intake assistant.
//!
//! Conversation state, the collected intake record, transcript entries,
//! configuration and the error taxonomy shared by every other crate.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod conversation;
pub mod error;
pub mod transcript;
