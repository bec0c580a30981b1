//! Axum route handlers for the advisor endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::enhance::{ExplainInput, IssueSummary, Suggestion, MAX_REWRITES};
use crate::errors::AppError;
use crate::models::analysis::RawFindings;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainRequest {
    pub ats_score: i32,
    #[serde(default)]
    pub issues: Vec<IssueSummary>,
    #[serde(default)]
    pub raw_findings: RawFindings,
}

#[derive(Debug, Serialize)]
pub struct ExplainResponse {
    pub explanation: String,
}

/// Only the line text is read; score and suggestions from the scan are ignored.
#[derive(Debug, Deserialize)]
pub struct VagueLineRef {
    pub line: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestRequest {
    #[serde(default)]
    pub vague_lines: Vec<VagueLineRef>,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub suggestions: Vec<Suggestion>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/ai-explain
///
/// Explains a score in plain language from the scan's issues and findings.
pub async fn handle_explain(
    State(state): State<AppState>,
    Json(request): Json<ExplainRequest>,
) -> Result<Json<ExplainResponse>, AppError> {
    if !(0..=100).contains(&request.ats_score) {
        return Err(AppError::Validation("atsScore must be between 0 and 100".to_string()));
    }

    let input = ExplainInput {
        ats_score: request.ats_score,
        issues: request.issues,
        raw_findings: request.raw_findings,
    };
    let explanation = state.advisor.explain(&input).await?;

    info!(
        backend = state.advisor.backend(),
        ats_score = input.ats_score,
        issues = input.issues.len(),
        "explanation generated"
    );

    Ok(Json(ExplainResponse { explanation }))
}

/// POST /api/suggest-improvements
///
/// Rewrites up to three vague lines. An empty or missing list yields no suggestions.
pub async fn handle_suggest(
    State(state): State<AppState>,
    Json(request): Json<SuggestRequest>,
) -> Result<Json<SuggestResponse>, AppError> {
    let lines: Vec<String> = request
        .vague_lines
        .into_iter()
        .map(|v| v.line)
        .take(MAX_REWRITES)
        .collect();

    if lines.is_empty() {
        return Ok(Json(SuggestResponse { suggestions: vec![] }));
    }

    let suggestions = state.advisor.suggest(&lines).await?;

    info!(
        backend = state.advisor.backend(),
        lines = lines.len(),
        suggestions = suggestions.len(),
        "rewrites generated"
    );

    Ok(Json(SuggestResponse { suggestions }))
}
