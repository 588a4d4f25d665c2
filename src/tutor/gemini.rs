//! Google Gemini backend

use super::types::{TutorReply, TutorRequest, Usage, PRIMING_ACK};
use super::{TutorError, TutorService};
use crate::session::{Role, Turn};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gemini backend for the tutor service
pub struct GeminiService {
    client: Client,
    api_key: String,
    base_url: String,
    model_id: String,
}

impl GeminiService {
    pub fn new(api_key: String, model: &str, gateway: Option<&str>) -> Result<Self, TutorError> {
        let base_url = match gateway {
            Some(gw) => format!(
                "{}/gemini/v1beta/models/{model}:generateContent",
                gw.trim_end_matches('/'),
            ),
            None => format!(
                "https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent"
            ),
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| TutorError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url,
            model_id: model.to_string(),
        })
    }

    /// Build the wire request. The context opens with a synthetic priming
    /// pair — the instruction presented as a user turn, answered by a fixed
    /// model acknowledgment — then the real history in original order, with
    /// the new message last.
    fn translate_request(request: &TutorRequest) -> GeminiRequest {
        let mut contents = Vec::with_capacity(request.history.len() + 3);

        contents.push(GeminiContent::user(&request.instruction));
        contents.push(GeminiContent::model(PRIMING_ACK));

        for turn in &request.history {
            contents.push(GeminiContent::from_turn(turn));
        }

        contents.push(GeminiContent::user(&request.message));

        GeminiRequest { contents }
    }

    fn normalize_response(resp: GeminiResponse) -> Result<TutorReply, TutorError> {
        let candidate = resp
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| TutorError::unknown("No candidates in response"))?;

        let text = candidate
            .content
            .parts
            .into_iter()
            .map(|part| part.text)
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(TutorError::unknown("Empty completion in response"));
        }

        let usage = resp.usage_metadata.map_or_else(Usage::default, |u| Usage {
            input_tokens: u64::from(u.prompt_token_count),
            output_tokens: u64::from(u.candidates_token_count),
        });

        Ok(TutorReply { text, usage })
    }
}

#[async_trait]
impl TutorService for GeminiService {
    async fn complete(&self, request: &TutorRequest) -> Result<TutorReply, TutorError> {
        let gemini_request = Self::translate_request(request);

        let url = if self.api_key.starts_with("implicit") {
            // Gateway mode - key in URL not needed
            self.base_url.clone()
        } else {
            // Direct mode - add API key to URL
            format!("{}?key={}", self.base_url, self.api_key)
        };

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&gemini_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TutorError::network(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    TutorError::network(format!("Connection failed: {e}"))
                } else {
                    TutorError::unknown(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TutorError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            if let Ok(error_resp) = serde_json::from_str::<GeminiErrorResponse>(&body) {
                let message = error_resp.error.message;
                return Err(match status.as_u16() {
                    400 => TutorError::invalid_request(format!("Invalid request: {message}")),
                    401 | 403 => TutorError::auth(format!("Authentication failed: {message}")),
                    429 => TutorError::rate_limit(format!("Rate limit exceeded: {message}")),
                    500..=599 => TutorError::server_error(format!("Server error: {message}")),
                    _ => TutorError::unknown(format!("HTTP {status}: {message}")),
                });
            }
            return Err(TutorError::unknown(format!("HTTP {status} error: {body}")));
        }

        let gemini_response: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| TutorError::unknown(format!("Failed to parse response: {e}")))?;

        Self::normalize_response(gemini_response)
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// Gemini API types

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

impl GeminiContent {
    fn user(text: &str) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![GeminiPart {
                text: text.to_string(),
            }],
        }
    }

    fn model(text: &str) -> Self {
        Self {
            role: "model".to_string(),
            parts: vec![GeminiPart {
                text: text.to_string(),
            }],
        }
    }

    fn from_turn(turn: &Turn) -> Self {
        match turn.role {
            Role::User => Self::user(&turn.raw_text),
            Role::Model => Self::model(&turn.raw_text),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiError,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}
