//! Storage ports for sessions and transcripts.
//!
//! The infrastructure layer (intake-infra) implements these; the engine and
//! service never know which backend holds the data. Uses native async fn in
//! traits (RPITIT), like every async port in this workspace.

use std::collections::BTreeMap;
use std::future::Future;

use chrono::{DateTime, Utc};
use intake_types::conversation::Session;
use intake_types::error::RepositoryError;
use intake_types::transcript::TranscriptEntry;

/// Per-user session storage, keyed by the channel-native user address.
pub trait SessionRepository: Send + Sync {
    /// Load a user's session, or `None` if they have none in progress.
    fn get(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<Session>, RepositoryError>> + Send;

    /// Insert or replace the session for `session.user_id`.
    fn put(&self, session: &Session) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Remove a user's session. Returns `true` if one existed.
    fn delete(&self, user_id: &str) -> impl Future<Output = Result<bool, RepositoryError>> + Send;

    /// Remove every session whose `updated_at` is older than `cutoff`.
    ///
    /// Returns the user ids that were evicted.
    fn evict_idle(
        &self,
        cutoff: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<String>, RepositoryError>> + Send;

    /// Number of sessions currently held.
    fn count(&self) -> impl Future<Output = Result<usize, RepositoryError>> + Send;
}

/// Append-only per-user message log for operator visibility.
pub trait TranscriptRepository: Send + Sync {
    /// Append an entry to the end of a user's transcript.
    fn append(
        &self,
        user_id: &str,
        entry: TranscriptEntry,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Every transcript, keyed by user id. Entries are in append order.
    fn list_conversations(
        &self,
    ) -> impl Future<Output = Result<BTreeMap<String, Vec<TranscriptEntry>>, RepositoryError>> + Send;

    /// One user's transcript; empty when the user is unknown.
    fn get_conversation(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<TranscriptEntry>, RepositoryError>> + Send;
}
