//! API request and response types

use crate::annotation;
use crate::i18n::Labels;
use crate::session::{Role, Selection, Session};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request to send a chat message
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

/// Response for a completed exchange: the model's display text and the
/// notes extracted from this reply only (the full board is in the session
/// view).
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub notes: Vec<String>,
}

/// One turn as rendered: model turns carry parsed display text.
#[derive(Debug, Serialize)]
pub struct TurnView {
    pub role: Role,
    pub text: String,
}

/// Presentation-ready session snapshot
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub selection: Selection,
    pub turns: Vec<TurnView>,
    pub notes: Vec<String>,
}

impl SessionView {
    pub fn from_session(session: &Session) -> Self {
        let turns = session
            .history()
            .iter()
            .map(|turn| TurnView {
                role: turn.role,
                text: match turn.role {
                    Role::User => turn.raw_text.clone(),
                    Role::Model => annotation::parse(&turn.raw_text).display_text,
                },
            })
            .collect();

        Self {
            id: session.id.clone(),
            created_at: session.created_at,
            selection: session.selection().clone(),
            turns,
            notes: session.notes().to_vec(),
        }
    }
}

/// Response wrapping a session snapshot
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session: SessionView,
}

/// Response for lifecycle actions
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// One locale with its full label set
#[derive(Debug, Serialize)]
pub struct LocaleView {
    pub key: &'static str,
    pub labels: &'static Labels,
}

/// Response for the locale table
#[derive(Debug, Serialize)]
pub struct LocalesResponse {
    pub locales: Vec<LocaleView>,
}

/// Response for the contact action
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub url: &'static str,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
