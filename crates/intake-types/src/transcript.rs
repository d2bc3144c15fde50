//! Transcript entries: the operator-facing log of every message exchanged
//! with a user. Never consulted by the conversation engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;

/// Which way a message travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// From the user to us.
    Inbound,
    /// From us (bot or operator) to the user.
    Outbound,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Inbound => write!(f, "inbound"),
            Direction::Outbound => write!(f, "outbound"),
        }
    }
}

/// A single logged message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub direction: Direction,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl TranscriptEntry {
    pub fn inbound(text: impl Into<String>) -> Self {
        Self {
            direction: Direction::Inbound,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn outbound(text: impl Into<String>) -> Self {
        Self {
            direction: Direction::Outbound,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_serde() {
        let json = serde_json::to_string(&Direction::Outbound).unwrap();
        assert_eq!(json, "\"outbound\"");
        assert_eq!(Direction::Inbound.to_string(), "inbound");
    }

    #[test]
    fn test_constructors_set_direction() {
        assert_eq!(TranscriptEntry::inbound("hola").direction, Direction::Inbound);
        assert_eq!(TranscriptEntry::outbound("hola").direction, Direction::Outbound);
    }
}
