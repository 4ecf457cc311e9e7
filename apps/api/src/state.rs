use std::sync::Arc;

use crate::llm_client::CompletionClient;
use crate::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum
/// extractors. Both collaborators sit behind trait objects so the pipelines
/// can be driven with scripted stand-ins in tests.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn CompletionClient>,
    pub store: Arc<dyn ResumeStore>,
}
