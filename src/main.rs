//! DELE Tutor - browser-based Spanish tutoring chat
//!
//! A Rust backend serving a split-panel chat interface: conversation turns
//! go to a hosted tutor model, replies are split into chat text and
//! `<nota>` teaching annotations, and the transcript can be exported as a
//! PDF report.

mod annotation;
mod api;
mod catalog;
mod i18n;
mod report;
mod session;
mod system_prompt;
mod tutor;

use api::{create_router, AppState};
use catalog::PromptCatalog;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tutor::{GeminiService, LoggingService, TutorConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dele_tutor=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let prompts_dir =
        std::env::var("TUTOR_PROMPTS_DIR").unwrap_or_else(|_| "prompts".to_string());

    let port: u16 = std::env::var("TUTOR_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);

    let tutor_config = TutorConfig::from_env();

    // Missing credential is fatal at startup: refuse to serve rather than
    // fail every chat call later.
    let Some(api_key) = tutor_config.api_key.clone() else {
        tracing::error!("GEMINI_API_KEY is not set. Configure the API key and restart.");
        return Err("missing GEMINI_API_KEY".into());
    };

    // Build the prompt catalog once at startup
    let catalog = PromptCatalog::scan(&prompts_dir);
    if catalog.levels.is_empty() {
        tracing::warn!(path = %prompts_dir, "No prompt levels found; only diagnostic mode available");
    } else {
        tracing::info!(
            path = %prompts_dir,
            levels = catalog.levels.len(),
            "Prompt catalog loaded"
        );
    }

    // Initialize the tutor client
    let gemini = GeminiService::new(api_key, &tutor_config.model, tutor_config.gateway.as_deref())?;
    let tutor = Arc::new(LoggingService::new(Arc::new(gemini)));
    tracing::info!(model = %tutor_config.model, "Tutor client initialized");

    // Create application state
    let state = AppState::new(catalog, tutor);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new().gzip(true);

    let app = create_router(state).layer(cors).layer(compression);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("DELE Tutor server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
