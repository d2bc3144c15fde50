//! Hand-off of completed intake records to the ingestion sink.
//!
//! `RecordSink` is the port implemented by infra (the Apps Script client).
//! `IntakeDispatcher` wraps a sink with logging; it never retries. A retry
//! only happens when the user sends another valid consent answer.

use std::future::Future;
use std::time::Instant;

use intake_types::conversation::IntakeRecord;
use intake_types::error::DispatchError;
use tracing::{error, info};

/// External collaborator that stores a completed record.
pub trait RecordSink: Send + Sync {
    fn submit_record(
        &self,
        record: &IntakeRecord,
    ) -> impl Future<Output = Result<(), DispatchError>> + Send;
}

/// Dispatches completed records to a [`RecordSink`].
pub struct IntakeDispatcher<K: RecordSink> {
    sink: K,
}

impl<K: RecordSink> IntakeDispatcher<K> {
    pub fn new(sink: K) -> Self {
        Self { sink }
    }

    /// Access the underlying sink.
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Submit `record`, logging the outcome. Failures are returned, not retried.
    pub async fn dispatch(&self, record: &IntakeRecord) -> Result<(), DispatchError> {
        let start = Instant::now();
        match self.sink.submit_record(record).await {
            Ok(()) => {
                info!(
                    user_id = %record.user_id,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "intake record dispatched"
                );
                Ok(())
            }
            Err(e) => {
                error!(
                    user_id = %record.user_id,
                    error = %e,
                    "intake record dispatch failed"
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct MockSink {
        fail: bool,
        received: Mutex<Vec<IntakeRecord>>,
    }

    impl RecordSink for MockSink {
        async fn submit_record(&self, record: &IntakeRecord) -> Result<(), DispatchError> {
            if self.fail {
                return Err(DispatchError::Unreachable("connection refused".to_string()));
            }
            self.received.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    fn record() -> IntakeRecord {
        IntakeRecord {
            user_id: "51911222333".to_string(),
            name: "ana".to_string(),
            district: "surco".to_string(),
            property_type: "casa".to_string(),
            area: "0-50 m²".to_string(),
            service: "otro servicio".to_string(),
            service_urgency: "preventivo".to_string(),
            contact_consent: "sí, por favor".to_string(),
        }
    }

    #[tokio::test]
    async fn test_dispatch_success_reaches_sink() {
        let dispatcher = IntakeDispatcher::new(MockSink {
            fail: false,
            received: Mutex::new(Vec::new()),
        });
        dispatcher.dispatch(&record()).await.unwrap();
        assert_eq!(dispatcher.sink().received.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_dispatch_failure_carries_cause() {
        let dispatcher = IntakeDispatcher::new(MockSink {
            fail: true,
            received: Mutex::new(Vec::new()),
        });
        let err = dispatcher.dispatch(&record()).await.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }
}
