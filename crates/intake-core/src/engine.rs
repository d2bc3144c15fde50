//! The conversation state machine.
//!
//! [`ConversationEngine::handle`] is a pure function from the current state
//! and a normalized message to a [`Transition`]: the next state, at most one
//! field to write, and the messages to send. It never touches storage or the
//! network; [`IntakeService`](crate::service::IntakeService) applies the
//! transition and performs the I/O.

use intake_types::conversation::{ConversationState, IntakeField, Session};
use tracing::debug;

use crate::catalog::{self, QuestionKind};
use crate::prompt;

/// Normalize inbound text the way every state expects it: trimmed and lowercased.
///
/// Applies to free-text answers too, so stored names and districts are always
/// lowercase.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// A field write produced by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldUpdate {
    pub field: IntakeField,
    pub value: String,
}

/// The result of handling one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next_state: ConversationState,
    pub field: Option<FieldUpdate>,
    pub outbound: Vec<String>,
    /// The record is complete and must be dispatched. Only set from `Contact`.
    pub submit: bool,
}

impl Transition {
    fn advance(from: ConversationState, field: Option<FieldUpdate>) -> Self {
        // Only `Contact` lacks a successor, and it never advances through here.
        let next_state = from.next().unwrap_or(from);
        Self {
            next_state,
            field,
            outbound: prompt::pending_prompt(next_state).into_iter().collect(),
            submit: false,
        }
    }

    fn reprompt(state: ConversationState) -> Self {
        Self {
            next_state: state,
            field: None,
            outbound: prompt::pending_prompt(state).into_iter().collect(),
            submit: false,
        }
    }

    fn submit(field: FieldUpdate) -> Self {
        Self {
            next_state: ConversationState::Contact,
            field: Some(field),
            outbound: Vec::new(),
            submit: true,
        }
    }

    /// Whether the session stays where it was without writing anything.
    pub fn is_reprompt(&self, from: ConversationState) -> bool {
        self.next_state == from && self.field.is_none() && !self.submit
    }

    /// Write the field (if any) and move the session to `next_state`.
    pub fn apply(&self, session: &mut Session) {
        if let Some(update) = &self.field {
            session.fields.set(update.field, update.value.clone());
        }
        session.state = self.next_state;
        session.updated_at = chrono::Utc::now();
    }
}

/// Decides what happens to a session for each inbound message.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConversationEngine;

impl ConversationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Handle `text` (already normalized) for a session in `state`.
    pub fn handle(&self, state: ConversationState, text: &str) -> Transition {
        match state {
            ConversationState::Start => self.on_start(),
            ConversationState::Name => self.on_free_text(state, IntakeField::Name, text),
            ConversationState::District => self.on_free_text(state, IntakeField::District, text),
            ConversationState::PropertyType => self.on_choice(
                state,
                QuestionKind::PropertyType,
                IntakeField::PropertyType,
                text,
            ),
            ConversationState::Area => {
                self.on_choice(state, QuestionKind::Area, IntakeField::Area, text)
            }
            ConversationState::Service => {
                self.on_choice(state, QuestionKind::Service, IntakeField::Service, text)
            }
            ConversationState::ServiceType => self.on_choice(
                state,
                QuestionKind::ServiceUrgency,
                IntakeField::ServiceUrgency,
                text,
            ),
            ConversationState::Contact => self.on_contact(text),
        }
    }

    /// First contact: greet regardless of what was said.
    fn on_start(&self) -> Transition {
        Transition::advance(ConversationState::Start, None)
    }

    /// Free text is accepted as-is, including the empty string.
    fn on_free_text(&self, state: ConversationState, field: IntakeField, text: &str) -> Transition {
        Transition::advance(
            state,
            Some(FieldUpdate {
                field,
                value: text.to_string(),
            }),
        )
    }

    fn on_choice(
        &self,
        state: ConversationState,
        question: QuestionKind,
        field: IntakeField,
        text: &str,
    ) -> Transition {
        match catalog::resolve(question, text) {
            Ok(value) => Transition::advance(
                state,
                Some(FieldUpdate {
                    field,
                    value: value.to_string(),
                }),
            ),
            Err(e) => {
                debug!(%state, error = %e, "answer rejected, re-prompting");
                Transition::reprompt(state)
            }
        }
    }

    /// A valid consent completes the record; dispatch is the caller's job.
    fn on_contact(&self, text: &str) -> Transition {
        match catalog::resolve(QuestionKind::ContactConsent, text) {
            Ok(value) => Transition::submit(FieldUpdate {
                field: IntakeField::ContactConsent,
                value: value.to_string(),
            }),
            Err(e) => {
                debug!(error = %e, "consent rejected, re-prompting");
                Transition::reprompt(ConversationState::Contact)
            }
        }
    }
}
