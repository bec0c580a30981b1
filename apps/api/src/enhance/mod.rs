//! Advisor: turns a finished analysis into a plain-language explanation and
//! rewrites vague resume lines.
//!
//! `AppState` holds an `Arc<dyn Advisor>`, chosen at startup: `LlmAdvisor` when
//! an Anthropic key is configured, `TemplateAdvisor` otherwise.

pub mod fallback;
pub mod handlers;
pub mod llm;
pub mod prompts;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::analysis::RawFindings;

pub use fallback::TemplateAdvisor;
pub use llm::LlmAdvisor;

/// Only this many vague lines are rewritten per request.
pub const MAX_REWRITES: usize = 3;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// An issue as echoed back by the client. Severity is not needed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueSummary {
    pub title: String,
    pub description: String,
}

/// What the explanation is written from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExplainInput {
    pub ats_score: i32,
    pub issues: Vec<IssueSummary>,
    pub raw_findings: RawFindings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub original: String,
    pub improved: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait Advisor: Send + Sync {
    async fn explain(&self, input: &ExplainInput) -> Result<String, AppError>;

    /// One suggestion per line, in input order.
    async fn suggest(&self, lines: &[String]) -> Result<Vec<Suggestion>, AppError>;

    /// "template" | "llm", for logs.
    fn backend(&self) -> &'static str;
}
