//! Common types for tutor model calls

use crate::session::Turn;

/// Fixed synthetic acknowledgment paired with the instruction when priming
/// the conversation context.
pub const PRIMING_ACK: &str =
    "Entendido. Configuración cargada. Estoy listo para actuar según el prompt.";

/// One completion request.
#[derive(Debug, Clone)]
pub struct TutorRequest {
    /// Active instruction text (topic brief + technical directive).
    pub instruction: String,
    /// Prior history, replayed in original order.
    pub history: Vec<Turn>,
    /// The new user message, final input of the call.
    pub message: String,
}

/// One completion.
#[derive(Debug, Clone)]
pub struct TutorReply {
    /// Raw reply text, markers included; parsing happens in the session.
    pub text: String,
    pub usage: Usage,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}
