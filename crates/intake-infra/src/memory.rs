//! In-memory session and transcript storage.
//!
//! Process-lifetime only: everything is lost on restart. Both stores are
//! `DashMap`-backed so different users never contend on a single lock.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use intake_core::repository::{SessionRepository, TranscriptRepository};
use intake_types::conversation::Session;
use intake_types::error::RepositoryError;
use intake_types::transcript::TranscriptEntry;

/// Sessions keyed by user id.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<String, Session>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionRepository for InMemorySessionStore {
    async fn get(&self, user_id: &str) -> Result<Option<Session>, RepositoryError> {
        Ok(self.sessions.get(user_id).map(|s| s.value().clone()))
    }

    async fn put(&self, session: &Session) -> Result<(), RepositoryError> {
        self.sessions
            .insert(session.user_id.clone(), session.clone());
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> Result<bool, RepositoryError> {
        Ok(self.sessions.remove(user_id).is_some())
    }

    async fn evict_idle(&self, cutoff: DateTime<Utc>) -> Result<Vec<String>, RepositoryError> {
        let mut evicted = Vec::new();
        self.sessions.retain(|user_id, session| {
            let keep = session.updated_at >= cutoff;
            if !keep {
                evicted.push(user_id.clone());
            }
            keep
        });
        Ok(evicted)
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.sessions.len())
    }
}

/// Append-only transcripts keyed by user id.
#[derive(Debug, Default)]
pub struct InMemoryTranscriptLog {
    conversations: DashMap<String, Vec<TranscriptEntry>>,
}

impl InMemoryTranscriptLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TranscriptRepository for InMemoryTranscriptLog {
    async fn append(&self, user_id: &str, entry: TranscriptEntry) -> Result<(), RepositoryError> {
        self.conversations
            .entry(user_id.to_string())
            .or_default()
            .push(entry);
        Ok(())
    }

    async fn list_conversations(
        &self,
    ) -> Result<BTreeMap<String, Vec<TranscriptEntry>>, RepositoryError> {
        Ok(self
            .conversations
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect())
    }

    async fn get_conversation(
        &self,
        user_id: &str,
    ) -> Result<Vec<TranscriptEntry>, RepositoryError> {
        Ok(self
            .conversations
            .get(user_id)
            .map(|r| r.value().clone())
            .unwrap_or_default())
    }
}
