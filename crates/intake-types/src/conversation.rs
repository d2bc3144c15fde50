//! Conversation state, per-user session and intake record types.
//!
//! A session walks strictly forward through [`ConversationState`], collecting
//! one field of [`IntakeFields`] per answered question. Once every field is
//! present the fields can be frozen into an [`IntakeRecord`] for dispatch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// The single pending-question marker of a session.
///
/// Variants are declared in conversation order; [`ConversationState::next`]
/// is the only way forward and there is no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    Start,
    Name,
    District,
    PropertyType,
    Area,
    Service,
    ServiceType,
    Contact,
}

impl ConversationState {
    /// Every state, in conversation order.
    pub const ALL: [ConversationState; 8] = [
        ConversationState::Start,
        ConversationState::Name,
        ConversationState::District,
        ConversationState::PropertyType,
        ConversationState::Area,
        ConversationState::Service,
        ConversationState::ServiceType,
        ConversationState::Contact,
    ];

    /// The state that follows this one, or `None` for `Contact`.
    ///
    /// Completing `Contact` ends the session (it is removed from the store);
    /// there is no explicit terminal variant.
    pub fn next(self) -> Option<ConversationState> {
        match self {
            ConversationState::Start => Some(ConversationState::Name),
            ConversationState::Name => Some(ConversationState::District),
            ConversationState::District => Some(ConversationState::PropertyType),
            ConversationState::PropertyType => Some(ConversationState::Area),
            ConversationState::Area => Some(ConversationState::Service),
            ConversationState::Service => Some(ConversationState::ServiceType),
            ConversationState::ServiceType => Some(ConversationState::Contact),
            ConversationState::Contact => None,
        }
    }

    /// The field this state collects, if any (`Start` collects nothing).
    pub fn field(self) -> Option<IntakeField> {
        match self {
            ConversationState::Start => None,
            ConversationState::Name => Some(IntakeField::Name),
            ConversationState::District => Some(IntakeField::District),
            ConversationState::PropertyType => Some(IntakeField::PropertyType),
            ConversationState::Area => Some(IntakeField::Area),
            ConversationState::Service => Some(IntakeField::Service),
            ConversationState::ServiceType => Some(IntakeField::ServiceUrgency),
            ConversationState::Contact => Some(IntakeField::ContactConsent),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConversationState::Start => "start",
            ConversationState::Name => "name",
            ConversationState::District => "district",
            ConversationState::PropertyType => "property_type",
            ConversationState::Area => "area",
            ConversationState::Service => "service",
            ConversationState::ServiceType => "service_type",
            ConversationState::Contact => "contact",
        }
    }
}

impl fmt::Display for ConversationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConversationState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConversationState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| format!("invalid conversation state: '{s}'"))
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        ConversationState::Start
    }
}

/// Names of the collected fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IntakeField {
    Name,
    District,
    PropertyType,
    Area,
    Service,
    ServiceUrgency,
    ContactConsent,
}

/// Partially-populated intake record.
///
/// Fields of states already passed are `Some`; the rest are `None`. The one
/// exception is `contact_consent`, which is written while the session is
/// still in `Contact` when dispatch fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_urgency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_consent: Option<String>,
}

impl IntakeFields {
    /// Read a field by name.
    pub fn get(&self, field: IntakeField) -> Option<&str> {
        match field {
            IntakeField::Name => self.name.as_deref(),
            IntakeField::District => self.district.as_deref(),
            IntakeField::PropertyType => self.property_type.as_deref(),
            IntakeField::Area => self.area.as_deref(),
            IntakeField::Service => self.service.as_deref(),
            IntakeField::ServiceUrgency => self.service_urgency.as_deref(),
            IntakeField::ContactConsent => self.contact_consent.as_deref(),
        }
    }

    /// Write a field by name, replacing any previous value.
    pub fn set(&mut self, field: IntakeField, value: String) {
        let slot = match field {
            IntakeField::Name => &mut self.name,
            IntakeField::District => &mut self.district,
            IntakeField::PropertyType => &mut self.property_type,
            IntakeField::Area => &mut self.area,
            IntakeField::Service => &mut self.service,
            IntakeField::ServiceUrgency => &mut self.service_urgency,
            IntakeField::ContactConsent => &mut self.contact_consent,
        };
        *slot = Some(value);
    }

    /// Freeze the fields into a dispatchable record.
    ///
    /// Returns `None` while any field is still missing.
    pub fn to_record(&self, user_id: &str) -> Option<IntakeRecord> {
        Some(IntakeRecord {
            user_id: user_id.to_string(),
            name: self.name.clone()?,
            district: self.district.clone()?,
            property_type: self.property_type.clone()?,
            area: self.area.clone()?,
            service: self.service.clone()?,
            service_urgency: self.service_urgency.clone()?,
            contact_consent: self.contact_consent.clone()?,
        })
    }
}

/// One user's in-progress intake.
///
/// Keyed by the channel-native user address (a WhatsApp phone number).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub state: ConversationState,
    pub fields: IntakeFields,
    pub created_at: DateTime<Utc>,
    /// Last time an inbound message was applied; drives idle eviction.
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// A fresh session in `Start` with no fields collected.
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            state: ConversationState::Start,
            fields: IntakeFields::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A completed intake, handed to the ingestion sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeRecord {
    pub user_id: String,
    pub name: String,
    pub district: String,
    pub property_type: String,
    pub area: String,
    pub service: String,
    pub service_urgency: String,
    pub contact_consent: String,
}

/// A normalized inbound chat message, already lifted out of the transport
/// envelope. Missing text arrives as an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub user_id: String,
    pub text: String,
}

impl InboundMessage {
    pub fn new(user_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            text: text.into(),
        }
    }
}
