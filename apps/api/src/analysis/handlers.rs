//! Axum route handler for resume scans.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::analysis::analyze_resume;
use crate::errors::AppError;
use crate::models::analysis::{DetectedIssue, RawFindings};
use crate::parsing::{parse_document, DocumentKind};
use crate::state::AppState;

/// Issues shown before the paywall.
const PREVIEW_ISSUES: usize = 2;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanFindings {
    #[serde(flatten)]
    pub findings: RawFindings,
    pub resume_text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResponse {
    pub scan_id: Uuid,
    pub scanned_at: DateTime<Utc>,
    pub ats_score: i32,
    pub keyword_match_percentage: f64,
    pub detected_issues: Vec<DetectedIssue>,
    pub preview_issues: Vec<DetectedIssue>,
    pub raw_findings: ScanFindings,
}

struct Upload {
    content_type: String,
    data: Bytes,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/scan-resume
///
/// Multipart upload: `resume` (PDF or DOCX) and an optional `jobDescription`.
/// Parses the file on the blocking pool, then scores it.
pub async fn handle_scan(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScanResponse>, AppError> {
    let limit = state.config.max_upload_bytes;
    let mut upload: Option<Upload> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| multipart_error(e, limit))? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("resume") => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(|e| multipart_error(e, limit))?;
                upload = Some(Upload { content_type, data });
            }
            Some("jobDescription") => {
                job_description = Some(field.text().await.map_err(|e| multipart_error(e, limit))?);
            }
            _ => {}
        }
    }

    let upload = upload
        .filter(|u| !u.data.is_empty())
        .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;

    let kind = DocumentKind::from_content_type(&upload.content_type).ok_or_else(|| {
        AppError::UnsupportedMediaType("Invalid file type. Please upload a PDF or DOCX file.".to_string())
    })?;

    if upload.data.len() > limit {
        return Err(AppError::PayloadTooLarge { limit });
    }

    let scan_id = Uuid::new_v4();
    let size = upload.data.len();
    let data = upload.data;
    let resume = tokio::task::spawn_blocking(move || parse_document(kind, &data))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("parse task failed: {e}")))??;

    let analysis = analyze_resume(&resume, job_description.as_deref());

    info!(
        %scan_id,
        bytes = size,
        kind = kind.as_str(),
        ats_score = analysis.ats_score,
        issues = analysis.detected_issues.len(),
        "resume scanned"
    );

    let preview_issues = analysis
        .detected_issues
        .iter()
        .take(PREVIEW_ISSUES)
        .cloned()
        .collect();

    Ok(Json(ScanResponse {
        scan_id,
        scanned_at: Utc::now(),
        ats_score: analysis.ats_score,
        keyword_match_percentage: analysis.keyword_match_percentage,
        detected_issues: analysis.detected_issues,
        preview_issues,
        raw_findings: ScanFindings {
            findings: analysis.raw_findings,
            resume_text: resume.text,
        },
    }))
}

fn multipart_error(error: MultipartError, limit: usize) -> AppError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge { limit }
    } else {
        AppError::Validation(format!("Malformed multipart body: {}", error.body_text()))
    }
}
