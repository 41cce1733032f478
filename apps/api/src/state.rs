use std::sync::Arc;

use crate::llm_client::GenerativeModel;
use crate::recommend::ids::MatchIdGenerator;
use crate::session::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The generative backend. Production: `GeminiClient`; tests swap in stubs.
    pub model: Arc<dyn GenerativeModel>,
    /// Match-id source. Default: `RandomIdGenerator` (base-36, 9 chars).
    pub ids: Arc<dyn MatchIdGenerator>,
    pub sessions: SessionStore,
}
