//! Hand-written port implementations shared by the unit tests of this crate.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex as StdMutex;

use chrono::{DateTime, Utc};
use intake_types::conversation::{IntakeRecord, Session};
use intake_types::error::{DispatchError, RepositoryError, TransportError};
use intake_types::transcript::TranscriptEntry;

use crate::dispatch::RecordSink;
use crate::outbound::MessageSender;
use crate::repository::{SessionRepository, TranscriptRepository};

#[derive(Default)]
pub struct MockSessions {
    pub sessions: StdMutex<HashMap<String, Session>>,
}

impl SessionRepository for MockSessions {
    async fn get(&self, user_id: &str) -> Result<Option<Session>, RepositoryError> {
        Ok(self.sessions.lock().unwrap().get(user_id).cloned())
    }

    async fn put(&self, session: &Session) -> Result<(), RepositoryError> {
        // Yield so concurrent handlers for one user would interleave if unserialized.
        tokio::task::yield_now().await;
        self.sessions
            .lock()
            .unwrap()
            .insert(session.user_id.clone(), session.clone());
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> Result<bool, RepositoryError> {
        Ok(self.sessions.lock().unwrap().remove(user_id).is_some())
    }

    async fn evict_idle(&self, cutoff: DateTime<Utc>) -> Result<Vec<String>, RepositoryError> {
        let mut sessions = self.sessions.lock().unwrap();
        let idle: Vec<String> = sessions
            .values()
            .filter(|s| s.updated_at < cutoff)
            .map(|s| s.user_id.clone())
            .collect();
        for user_id in &idle {
            sessions.remove(user_id);
        }
        Ok(idle)
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.sessions.lock().unwrap().len())
    }
}

#[derive(Default)]
pub struct MockTranscripts {
    pub entries: StdMutex<BTreeMap<String, Vec<TranscriptEntry>>>,
}

impl TranscriptRepository for MockTranscripts {
    async fn append(&self, user_id: &str, entry: TranscriptEntry) -> Result<(), RepositoryError> {
        self.entries
            .lock()
            .unwrap()
            .entry(user_id.to_string())
            .or_default()
            .push(entry);
        Ok(())
    }

    async fn list_conversations(
        &self,
    ) -> Result<BTreeMap<String, Vec<TranscriptEntry>>, RepositoryError> {
        Ok(self.entries.lock().unwrap().clone())
    }

    async fn get_conversation(
        &self,
        user_id: &str,
    ) -> Result<Vec<TranscriptEntry>, RepositoryError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// Records every send; can be switched to fail.
#[derive(Default)]
pub struct RecordingSender {
    pub sent: StdMutex<Vec<(String, String)>>,
    pub fail: AtomicBool,
}

impl RecordingSender {
    pub fn texts_for(&self, user_id: &str) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(u, _)| u == user_id)
            .map(|(_, t)| t.clone())
            .collect()
    }
}

impl MessageSender for RecordingSender {
    async fn send_text(&self, user_id: &str, text: &str) -> Result<(), TransportError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(TransportError::Request("network down".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((user_id.to_string(), text.to_string()));
        Ok(())
    }
}

/// Accepts records unless switched to fail.
#[derive(Default)]
pub struct SwitchableSink {
    pub fail: AtomicBool,
    pub records: StdMutex<Vec<IntakeRecord>>,
}

impl RecordSink for SwitchableSink {
    async fn submit_record(&self, record: &IntakeRecord) -> Result<(), DispatchError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DispatchError::Unreachable("sheets offline".to_string()));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}
