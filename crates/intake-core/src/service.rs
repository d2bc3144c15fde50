//! Intake service orchestrating sessions, transcripts, delivery and dispatch.
//!
//! `IntakeService` is the entry point for every inbound message and every
//! operator action. It serializes work per user (one in-flight message per
//! user id) while leaving different users fully independent.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use intake_types::conversation::{ConversationState, InboundMessage, Session};
use intake_types::error::{DispatchError, RepositoryError, TransportError};
use intake_types::transcript::TranscriptEntry;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::dispatch::{IntakeDispatcher, RecordSink};
use crate::engine::{normalize, ConversationEngine};
use crate::outbound::MessageSender;
use crate::prompt;
use crate::repository::{SessionRepository, TranscriptRepository};

/// What handling one inbound message did to the user's session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundOutcome {
    /// The answer was accepted and the session moved forward.
    Advanced {
        from: ConversationState,
        to: ConversationState,
    },
    /// The answer was rejected; the same question was asked again.
    Reprompted { state: ConversationState },
    /// The record was dispatched and the session removed.
    Completed,
    /// Dispatch failed; the session stays in `Contact` with consent recorded.
    DispatchFailed,
}

/// Orchestrates the intake conversation.
///
/// Generic over its ports so the core never depends on intake-infra.
pub struct IntakeService<S, T, M, K>
where
    S: SessionRepository,
    T: TranscriptRepository,
    M: MessageSender,
    K: RecordSink,
{
    sessions: S,
    transcripts: T,
    sender: M,
    dispatcher: IntakeDispatcher<K>,
    engine: ConversationEngine,
    /// Per-user critical sections. Entries are dropped once nobody holds them.
    user_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl<S, T, M, K> IntakeService<S, T, M, K>
where
    S: SessionRepository,
    T: TranscriptRepository,
    M: MessageSender,
    K: RecordSink,
{
    pub fn new(sessions: S, transcripts: T, sender: M, sink: K) -> Self {
        Self {
            sessions,
            transcripts,
            sender,
            dispatcher: IntakeDispatcher::new(sink),
            engine: ConversationEngine::new(),
            user_locks: DashMap::new(),
        }
    }

    /// Access the session repository.
    pub fn sessions(&self) -> &S {
        &self.sessions
    }

    /// Access the transcript repository.
    pub fn transcripts(&self) -> &T {
        &self.transcripts
    }

    /// Access the outbound sender.
    pub fn sender(&self) -> &M {
        &self.sender
    }

    /// Access the record sink.
    pub fn sink(&self) -> &K {
        self.dispatcher.sink()
    }

    // --- Inbound ---

    /// Handle one message from a user.
    ///
    /// Messages for the same user are applied strictly one at a time, in the
    /// order they acquire the user's lock. Outbound send failures are logged
    /// and never roll back the state change. Only storage errors are returned.
    pub async fn handle_inbound(
        &self,
        message: InboundMessage,
    ) -> Result<InboundOutcome, RepositoryError> {
        let user_id = message.user_id;
        let text = normalize(&message.text);

        let lock = self.user_lock(&user_id);
        let result = {
            let _guard = lock.lock().await;
            self.process(&user_id, &text).await
        };
        drop(lock);
        self.release_user_lock(&user_id);

        result
    }

    async fn process(&self, user_id: &str, text: &str) -> Result<InboundOutcome, RepositoryError> {
        if !text.is_empty() {
            self.record(user_id, TranscriptEntry::inbound(text)).await;
        }

        let mut session = match self.sessions.get(user_id).await? {
            Some(session) => session,
            None => {
                info!(%user_id, "starting new intake session");
                Session::new(user_id)
            }
        };

        let from = session.state;
        let transition = self.engine.handle(from, text);
        let reprompt = transition.is_reprompt(from);
        transition.apply(&mut session);

        // State is persisted before any delivery so a failed send never rewinds it.
        self.sessions.put(&session).await?;

        if transition.submit {
            return self.complete(session).await;
        }

        for outbound in &transition.outbound {
            self.deliver(user_id, outbound).await;
        }

        if reprompt {
            debug!(%user_id, state = %from, "re-prompted");
            Ok(InboundOutcome::Reprompted { state: from })
        } else {
            debug!(%user_id, %from, to = %session.state, "session advanced");
            Ok(InboundOutcome::Advanced {
                from,
                to: session.state,
            })
        }
    }

    /// Dispatch a session whose consent was just recorded.
    async fn complete(&self, session: Session) -> Result<InboundOutcome, RepositoryError> {
        let user_id = session.user_id.as_str();

        let dispatched = match session.fields.to_record(user_id) {
            Some(record) => self.dispatcher.dispatch(&record).await,
            None => {
                warn!(%user_id, "consent recorded but intake fields are incomplete");
                Err(DispatchError::IncompleteRecord)
            }
        };

        match dispatched {
            Ok(()) => {
                self.sessions.delete(user_id).await?;
                info!(%user_id, "intake completed");
                self.deliver(user_id, prompt::THANK_YOU).await;
                Ok(InboundOutcome::Completed)
            }
            Err(_) => {
                self.deliver(user_id, prompt::RETRY_LATER).await;
                Ok(InboundOutcome::DispatchFailed)
            }
        }
    }

    // --- Outbound ---

    /// Send `text` and, on success, log it to the transcript.
    async fn deliver(&self, user_id: &str, text: &str) {
        match self.sender.send_text(user_id, text).await {
            Ok(()) => self.record(user_id, TranscriptEntry::outbound(text)).await,
            Err(e) => warn!(%user_id, error = %e, "outbound message not delivered"),
        }
    }

    async fn record(&self, user_id: &str, entry: TranscriptEntry) {
        if let Err(e) = self.transcripts.append(user_id, entry).await {
            warn!(%user_id, error = %e, "failed to append transcript entry");
        }
    }

    /// Send an operator-written message, bypassing the conversation engine.
    ///
    /// Never reads or writes the user's session.
    pub async fn send_manual(&self, user_id: &str, text: &str) -> Result<(), TransportError> {
        self.sender.send_text(user_id, text).await?;
        info!(%user_id, "manual message sent");
        self.record(user_id, TranscriptEntry::outbound(text)).await;
        Ok(())
    }

    // --- Queries ---

    /// Current session for a user, if one is in progress.
    pub async fn session(&self, user_id: &str) -> Result<Option<Session>, RepositoryError> {
        self.sessions.get(user_id).await
    }

    pub async fn list_conversations(
        &self,
    ) -> Result<BTreeMap<String, Vec<TranscriptEntry>>, RepositoryError> {
        self.transcripts.list_conversations().await
    }

    pub async fn get_conversation(
        &self,
        user_id: &str,
    ) -> Result<Vec<TranscriptEntry>, RepositoryError> {
        self.transcripts.get_conversation(user_id).await
    }

    // --- Retention ---

    /// Drop sessions that have not received a message for `idle_timeout`.
    ///
    /// Transcripts are kept. Returns how many sessions were evicted.
    pub async fn evict_idle(&self, idle_timeout: Duration) -> Result<usize, RepositoryError> {
        let idle = chrono::Duration::from_std(idle_timeout).unwrap_or(chrono::Duration::MAX);
        let cutoff = Utc::now()
            .checked_sub_signed(idle)
            .unwrap_or(chrono::DateTime::<Utc>::MIN_UTC);
        let evicted = self.sessions.evict_idle(cutoff).await?;
        for user_id in &evicted {
            info!(%user_id, "evicted idle session");
        }
        Ok(evicted.len())
    }

    // --- Per-user locking ---

    fn user_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        self.user_locks
            .entry(user_id.to_string())
            .or_default()
            .clone()
    }

    /// Forget the lock once the last holder or waiter has let go of it.
    fn release_user_lock(&self, user_id: &str) {
        self.user_locks
            .remove_if(user_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}
