//! Conversation engine and orchestration for the intake assistant.
//!
//! This crate defines the "ports" (session/transcript repositories, outbound
//! sender, record sink) that the infrastructure layer implements, plus the
//! pure conversation state machine that drives an intake. It depends only on
//! `intake-types` -- never on `intake-infra` or any HTTP crate.

pub mod catalog;
pub mod dispatch;
pub mod engine;
pub mod eviction;
pub mod outbound;
pub mod prompt;
pub mod repository;
pub mod service;

#[cfg(test)]
mod testing;
