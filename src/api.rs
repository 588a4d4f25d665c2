//! HTTP API for the tutor interface

mod assets;
mod handlers;
mod types;

pub use handlers::create_router;

use crate::catalog::PromptCatalog;
use crate::session::SessionManager;
use crate::system_prompt;
use crate::tutor::TutorService;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    pub catalog: Arc<PromptCatalog>,
    pub tutor: Arc<dyn TutorService>,
}

impl AppState {
    pub fn new(catalog: PromptCatalog, tutor: Arc<dyn TutorService>) -> Self {
        Self {
            sessions: Arc::new(SessionManager::new()),
            catalog: Arc::new(catalog),
            tutor,
        }
    }

    /// The instruction active when no level/topic is selected. Falls back to
    /// a built-in brief if the diagnostic document itself is missing, so a
    /// session always starts usable.
    pub fn diagnostic_instruction(&self) -> String {
        match self.catalog.resolve(&self.catalog.diagnostic_locator()) {
            Ok(brief) => system_prompt::build_instruction(&brief),
            Err(e) => {
                tracing::warn!(error = %e, "Diagnostic prompt missing, using built-in fallback");
                system_prompt::fallback_instruction()
            }
        }
    }
}
