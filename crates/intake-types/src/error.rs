use thiserror::Error;

/// An answer that does not match any option of the pending question.
///
/// Recovered locally by re-prompting; never surfaced to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("'{code}' is not a valid {question} option")]
    UnknownOption { question: String, code: String },
}

/// The ingestion sink could not accept a completed record.
///
/// The session is preserved so the user can re-send their last answer.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("ingestion sink is not configured")]
    NotConfigured,

    #[error("intake record is incomplete")]
    IncompleteRecord,

    #[error("ingestion sink unreachable: {0}")]
    Unreachable(String),

    #[error("ingestion sink rejected record ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// An outbound message could not be delivered.
///
/// Logged and swallowed by the engine; surfaced only on manual operator sends.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport request failed: {0}")]
    Request(String),

    #[error("transport rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Errors from session / transcript storage.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("storage error: {0}")]
    Storage(String),
}

/// Configuration could not be loaded or is unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::UnknownOption {
            question: "property type".to_string(),
            code: "9".to_string(),
        };
        assert_eq!(err.to_string(), "'9' is not a valid property type option");
    }

    #[test]
    fn test_dispatch_error_display() {
        let err = DispatchError::Rejected {
            status: 500,
            body: "boom".to_string(),
        };
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Storage("poisoned".to_string());
        assert_eq!(err.to_string(), "storage error: poisoned");
    }
}
