//! Session state: conversation history, accumulated notes, active instruction
//!
//! A [`Session`] is an owned, mutable value — never an ambient global. The
//! [`SessionManager`] hands out one independently-owned session per id, each
//! behind its own lock, so per-session actions are strictly serialized (the
//! chat handler holds the lock across the model call) while distinct
//! sessions never share state.
//!
//! Invariant maintained throughout: `notes` is exactly the concatenation, in
//! turn order, of the notes parsed out of every Model turn in `history`.
//! History and notes are only ever mutated together, so a reset can never
//! leave orphaned notes and a failed model call leaves both untouched.

use crate::annotation::{self, Parsed};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Sender of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Model,
}

/// One message in the conversation. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    pub role: Role,
    pub raw_text: String,
}

/// The active prompt selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Selection {
    /// Default: no level/topic picked, diagnostic instruction active.
    Diagnostic,
    Topic { level: String, topic: String },
}

/// Conversation state for one user.
#[derive(Debug)]
pub struct Session {
    pub id: String,
    pub created_at: DateTime<Utc>,
    history: Vec<Turn>,
    notes: Vec<String>,
    active_instruction: String,
    selection: Selection,
}

impl Session {
    /// Create a session in its initial state: empty history and notes, the
    /// diagnostic instruction active.
    pub fn new(diagnostic_instruction: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            history: Vec::new(),
            notes: Vec::new(),
            active_instruction: diagnostic_instruction,
            selection: Selection::Diagnostic,
        }
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn active_instruction(&self) -> &str {
        &self.active_instruction
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Return to the initial state. History and notes are cleared in the
    /// same call; the diagnostic instruction becomes active again.
    pub fn reset(&mut self, diagnostic_instruction: String) {
        self.history.clear();
        self.notes.clear();
        self.active_instruction = diagnostic_instruction;
        self.selection = Selection::Diagnostic;
    }

    /// Change the active instruction. History and notes are untouched; only
    /// [`Session::reset`] clears them.
    pub fn set_selection(&mut self, selection: Selection, instruction: String) {
        self.selection = selection;
        self.active_instruction = instruction;
    }

    /// Record one completed exchange: the user's message and the model's
    /// raw reply, appended together. The reply is parsed once and its notes
    /// extend the board in extraction order. Returns the parsed reply for
    /// immediate display.
    ///
    /// Callers invoke this only after the model call succeeded, so a failed
    /// call leaves no partial turn behind.
    pub fn record_exchange(&mut self, user_text: String, raw_reply: String) -> Parsed {
        let parsed = annotation::parse(&raw_reply);

        self.history.push(Turn {
            role: Role::User,
            raw_text: user_text,
        });
        self.history.push(Turn {
            role: Role::Model,
            raw_text: raw_reply,
        });
        self.notes.extend(parsed.notes.iter().cloned());

        parsed
    }
}

/// Owner of all live sessions, keyed by id.
///
/// The map lock is held only for map operations; each session's own lock is
/// what serializes its actions, so a slow model call in one session never
/// blocks another.
#[derive(Default)]
pub struct SessionManager {
    sessions: Mutex<HashMap<String, Arc<Mutex<Session>>>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and register a new session, returning its id.
    pub async fn create(&self, diagnostic_instruction: String) -> String {
        let session = Session::new(diagnostic_instruction);
        let id = session.id.clone();
        self.sessions
            .lock()
            .await
            .insert(id.clone(), Arc::new(Mutex::new(session)));
        id
    }

    /// Look up a session by id.
    pub async fn get(&self, id: &str) -> Option<Arc<Mutex<Session>>> {
        self.sessions.lock().await.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new("diagnostic".to_string())
    }

    #[test]
    fn initial_state_is_empty_with_diagnostic_instruction() {
        let s = session();
        assert!(s.history().is_empty());
        assert!(s.notes().is_empty());
        assert_eq!(s.active_instruction(), "diagnostic");
        assert_eq!(*s.selection(), Selection::Diagnostic);
    }

    #[test]
    fn record_exchange_appends_both_turns_and_notes() {
        let mut s = session();
        let parsed = s.record_exchange(
            "What color is the sky?".to_string(),
            "It's blue.<nota>'Cielo' means sky.</nota> Any questions?".to_string(),
        );

        assert_eq!(parsed.display_text, "It's blue. Any questions?");
        assert_eq!(s.history().len(), 2);
        assert_eq!(s.history()[0].role, Role::User);
        assert_eq!(s.history()[1].role, Role::Model);
        assert_eq!(s.notes(), ["'Cielo' means sky."]);
    }

    #[test]
    fn notes_accumulate_across_exchanges_in_turn_order() {
        let mut s = session();
        s.record_exchange("a".to_string(), "<nota>n1</nota>x<nota>n2</nota>".to_string());
        s.record_exchange("b".to_string(), "plain reply".to_string());
        s.record_exchange("c".to_string(), "<nota>n3</nota>".to_string());

        assert_eq!(s.notes(), ["n1", "n2", "n3"]);
        assert_eq!(s.history().len(), 6);
    }

    #[test]
    fn notes_match_reparsing_every_model_turn() {
        let mut s = session();
        s.record_exchange("a".to_string(), "<nota>n1</nota> hola".to_string());
        s.record_exchange("b".to_string(), "bien <nota>n2</nota><nota>n3</nota>".to_string());

        let reparsed: Vec<String> = s
            .history()
            .iter()
            .filter(|t| t.role == Role::Model)
            .flat_map(|t| annotation::parse(&t.raw_text).notes)
            .collect();
        assert_eq!(s.notes(), reparsed.as_slice());
    }

    #[test]
    fn reset_clears_history_and_notes_atomically() {
        let mut s = session();
        for i in 0..10 {
            s.record_exchange(format!("msg {i}"), format!("<nota>note {i}</nota> ok"));
        }
        s.set_selection(
            Selection::Topic {
                level: "Nivel A1".to_string(),
                topic: "Colores".to_string(),
            },
            "colors instruction".to_string(),
        );

        s.reset("diagnostic again".to_string());

        assert!(s.history().is_empty());
        assert!(s.notes().is_empty());
        assert_eq!(s.active_instruction(), "diagnostic again");
        assert_eq!(*s.selection(), Selection::Diagnostic);
    }

    #[test]
    fn selection_change_preserves_history_and_notes() {
        let mut s = session();
        s.record_exchange("hola".to_string(), "<nota>greeting</nota> ¡Hola!".to_string());

        s.set_selection(
            Selection::Topic {
                level: "Nivel A1".to_string(),
                topic: "Colores".to_string(),
            },
            "topic x".to_string(),
        );
        s.set_selection(
            Selection::Topic {
                level: "Nivel A1".to_string(),
                topic: "Comida".to_string(),
            },
            "topic y".to_string(),
        );

        assert_eq!(s.active_instruction(), "topic y");
        assert_eq!(s.history().len(), 2);
        assert_eq!(s.notes(), ["greeting"]);
    }

    #[tokio::test]
    async fn manager_hands_out_independent_sessions() {
        let manager = SessionManager::new();
        let a = manager.create("diag".to_string()).await;
        let b = manager.create("diag".to_string()).await;
        assert_ne!(a, b);

        {
            let handle = manager.get(&a).await.unwrap();
            let mut s = handle.lock().await;
            s.record_exchange("hi".to_string(), "reply".to_string());
        }

        let handle = manager.get(&b).await.unwrap();
        assert!(handle.lock().await.history().is_empty());
    }

    #[tokio::test]
    async fn manager_get_unknown_id_is_none() {
        let manager = SessionManager::new();
        assert!(manager.get("missing").await.is_none());
    }
}
