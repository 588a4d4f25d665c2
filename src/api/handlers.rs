//! HTTP request handlers

use super::assets::{get_index_html, serve_static};
use super::types::{
    ChatRequest, ChatResponse, ContactResponse, ErrorResponse, LocaleView, LocalesResponse,
    SessionResponse, SessionView, SuccessResponse,
};
use super::AppState;
use crate::catalog::CatalogError;
use crate::i18n::{labels, Locale};
use crate::report::{ReportPdf, REPORT_FILENAME};
use crate::session::Selection;
use crate::system_prompt;
use crate::tutor::TutorRequest;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Static external contact-form URL, surfaced as a user-facing action.
const CONTACT_URL: &str =
    "https://docs.google.com/forms/d/e/1FAIpQLSe0CbV2SvDRh7YR68IjdW-E7D0TkqomaLwYk_GvTmJIw5eLlQ/viewform?usp=header";

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Root serves the chat UI
        .route("/", get(serve_spa))
        // Static assets (embedded or filesystem fallback)
        .route("/assets/*path", get(serve_static))
        // Catalog and fixed interface data
        .route("/api/catalog", get(get_catalog))
        .route("/api/locales", get(get_locales))
        .route("/api/contact", get(get_contact))
        // Session lifecycle
        .route("/api/sessions/new", post(create_session))
        .route("/api/sessions/:id", get(get_session))
        .route("/api/sessions/:id/reset", post(reset_session))
        .route("/api/sessions/:id/select", post(select_prompt))
        // Conversation
        .route("/api/sessions/:id/chat", post(send_chat))
        // Report export
        .route("/api/sessions/:id/export", get(export_report))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// UI Delivery
// ============================================================

/// Serve the chat UI
async fn serve_spa() -> impl IntoResponse {
    match get_index_html() {
        Some(content) => Html(content).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Html("<h1>404 - UI not found</h1>".to_string()),
        )
            .into_response(),
    }
}

// ============================================================
// Catalog and Interface Data
// ============================================================

async fn get_catalog(State(state): State<AppState>) -> Response {
    Json(state.catalog.as_ref().clone()).into_response()
}

async fn get_locales() -> Json<LocalesResponse> {
    Json(LocalesResponse {
        locales: Locale::ALL
            .iter()
            .map(|l| LocaleView {
                key: l.key(),
                labels: labels(*l),
            })
            .collect(),
    })
}

async fn get_contact() -> Json<ContactResponse> {
    Json(ContactResponse { url: CONTACT_URL })
}

// ============================================================
// Session Lifecycle
// ============================================================

async fn create_session(State(state): State<AppState>) -> Result<Json<SessionResponse>, AppError> {
    let id = state
        .sessions
        .create(state.diagnostic_instruction())
        .await;

    let handle = state
        .sessions
        .get(&id)
        .await
        .ok_or_else(|| AppError::Internal("Session vanished after creation".to_string()))?;
    let session = handle.lock().await;

    Ok(Json(SessionResponse {
        session: SessionView::from_session(&session),
    }))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let handle = state.sessions.get(&id).await.ok_or_else(session_not_found)?;
    let session = handle.lock().await;

    Ok(Json(SessionResponse {
        session: SessionView::from_session(&session),
    }))
}

async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    let handle = state.sessions.get(&id).await.ok_or_else(session_not_found)?;
    let mut session = handle.lock().await;

    session.reset(state.diagnostic_instruction());

    Ok(Json(SuccessResponse { success: true }))
}

/// Change the active instruction. History and notes are untouched; a
/// resolution failure leaves the previous selection in place.
async fn select_prompt(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(selection): Json<Selection>,
) -> Result<Json<SessionResponse>, AppError> {
    let handle = state.sessions.get(&id).await.ok_or_else(session_not_found)?;

    let instruction = match &selection {
        Selection::Diagnostic => state.diagnostic_instruction(),
        Selection::Topic { level, topic } => {
            let entry = state.catalog.find_topic(level, topic).ok_or_else(|| {
                AppError::NotFound(format!("Unknown level/topic: {level} / {topic}"))
            })?;
            let brief = state.catalog.resolve(&entry.locator).map_err(|e| match e {
                CatalogError::NotFound(_) => AppError::NotFound(e.to_string()),
                CatalogError::Io { .. } => AppError::Internal(e.to_string()),
            })?;
            system_prompt::build_instruction(&brief)
        }
    };

    let mut session = handle.lock().await;
    session.set_selection(selection, instruction);

    Ok(Json(SessionResponse {
        session: SessionView::from_session(&session),
    }))
}

// ============================================================
// Conversation
// ============================================================

/// One user turn. The session lock is held across the model call, so per
/// session the call for turn N completes (success or failure) before turn
/// N+1 can start. On failure nothing is appended: history and notes are
/// exactly as they were before submission.
async fn send_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::BadRequest("Message must not be empty".to_string()));
    }

    let handle = state.sessions.get(&id).await.ok_or_else(session_not_found)?;
    let mut session = handle.lock().await;

    let request = TutorRequest {
        instruction: session.active_instruction().to_string(),
        history: session.history().to_vec(),
        message: req.text.clone(),
    };

    let reply = state
        .tutor
        .complete(&request)
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    let parsed = session.record_exchange(req.text, reply.text);

    Ok(Json(ChatResponse {
        reply: parsed.display_text,
        notes: parsed.notes,
    }))
}

// ============================================================
// Report Export
// ============================================================

async fn export_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let handle = state.sessions.get(&id).await.ok_or_else(session_not_found)?;
    let session = handle.lock().await;

    let bytes = ReportPdf::new(&session).generate();

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{REPORT_FILENAME}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("dele-tutor ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

fn session_not_found() -> AppError {
    AppError::NotFound("Session not found".to_string())
}

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    /// Tutor API failure: reported once, session state untouched
    Upstream(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
