//! Tutor model client
//!
//! Wraps the hosted chat-completion endpoint behind a small service trait.
//! One call per user turn: the active instruction and the full prior history
//! are sent with the new message, and exactly one completion comes back. No
//! retries — a failure is reported once and the caller's session state stays
//! exactly as it was.
//!
//! History replay is unbounded: every prior turn is resent on each call.
//! Acceptable for short-lived tutoring sessions; a long-session hardening
//! would need truncation or summarization.

mod error;
mod gemini;
mod types;

pub use error::{TutorError, TutorErrorKind};
pub use gemini::GeminiService;
pub use types::{TutorReply, TutorRequest, Usage};

use async_trait::async_trait;
use std::sync::Arc;

/// Default model when `GEMINI_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";

/// Configuration for the tutor client, read from the environment.
#[derive(Debug, Clone, Default)]
pub struct TutorConfig {
    /// API key for the Gemini endpoint. Absence is fatal at startup.
    pub api_key: Option<String>,
    /// Optional gateway base URL replacing the direct endpoint.
    pub gateway: Option<String>,
    /// Model name used in the endpoint path.
    pub model: String,
}

impl TutorConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
            gateway: std::env::var("LLM_GATEWAY").ok(),
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        }
    }
}

/// Common interface for tutor model backends
#[async_trait]
pub trait TutorService: Send + Sync {
    /// Request one completion for the new message given the instruction and
    /// prior history.
    async fn complete(&self, request: &TutorRequest) -> Result<TutorReply, TutorError>;

    /// Get the model name
    fn model_id(&self) -> &str;
}

/// Logging wrapper for tutor services
pub struct LoggingService {
    inner: Arc<dyn TutorService>,
    model_id: String,
}

impl LoggingService {
    pub fn new(inner: Arc<dyn TutorService>) -> Self {
        let model_id = inner.model_id().to_string();
        Self { inner, model_id }
    }
}

#[async_trait]
impl TutorService for LoggingService {
    async fn complete(&self, request: &TutorRequest) -> Result<TutorReply, TutorError> {
        let start = std::time::Instant::now();
        let result = self.inner.complete(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    history_turns = request.history.len(),
                    input_tokens = reply.usage.input_tokens,
                    output_tokens = reply.usage.output_tokens,
                    "Tutor request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    retryable = e.kind.is_retryable(),
                    "Tutor request failed"
                );
            }
        }

        result
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
