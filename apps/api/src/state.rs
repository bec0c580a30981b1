use std::sync::Arc;

use crate::config::Config;
use crate::enhance::Advisor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable advisor. `LlmAdvisor` when an API key is configured, otherwise
    /// `TemplateAdvisor`.
    pub advisor: Arc<dyn Advisor>,
}
