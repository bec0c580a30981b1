pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as scan;
use crate::enhance::handlers as advice;
use crate::state::AppState;

/// Room for multipart boundaries, headers and the job description field.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/scan-resume", post(scan::handle_scan))
        .route("/api/ai-explain", post(advice::handle_explain))
        .route("/api/suggest-improvements", post(advice::handle_suggest))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
