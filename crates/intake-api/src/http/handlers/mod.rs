//! HTTP request handlers.

pub mod conversation;
pub mod monitor;
pub mod webhook;
