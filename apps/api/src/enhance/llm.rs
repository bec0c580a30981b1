//! LLM-backed advisor. Any LLM failure degrades to the template output so the
//! endpoints keep answering.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::enhance::fallback::{template_explanation, template_suggestions};
use crate::enhance::prompts::{build_explain_prompt, build_rewrite_prompt, EXPLAIN_SYSTEM, REWRITE_SYSTEM};
use crate::enhance::{Advisor, ExplainInput, Suggestion};
use crate::errors::AppError;
use crate::llm_client::{CallParams, LlmClient};

/// Sampling temperature for both explanations and rewrites.
const ADVISOR_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Deserialize)]
struct RewriteReply {
    suggestions: Vec<Suggestion>,
}

pub struct LlmAdvisor {
    llm: LlmClient,
}

impl LlmAdvisor {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    async fn try_explain(&self, input: &ExplainInput) -> Result<String, AppError> {
        let params = CallParams::default().with_temperature(ADVISOR_TEMPERATURE);
        let text = self
            .llm
            .complete(&build_explain_prompt(input), EXPLAIN_SYSTEM, params)
            .await
            .map_err(|e| AppError::Llm(format!("Explanation call failed: {e}")))?;

        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Llm("Explanation was empty".to_string()));
        }
        Ok(text.to_string())
    }

    async fn try_suggest(&self, lines: &[String]) -> Result<Vec<Suggestion>, AppError> {
        let params = CallParams::default().with_temperature(ADVISOR_TEMPERATURE).json_object();
        let reply: RewriteReply = self
            .llm
            .complete_json(&build_rewrite_prompt(lines), REWRITE_SYSTEM, params)
            .await
            .map_err(|e| AppError::Llm(format!("Rewrite call failed: {e}")))?;
        Ok(reply.suggestions)
    }
}

#[async_trait]
impl Advisor for LlmAdvisor {
    async fn explain(&self, input: &ExplainInput) -> Result<String, AppError> {
        match self.try_explain(input).await {
            Ok(text) => Ok(text),
            Err(e) => {
                warn!(error = %e, "falling back to template explanation");
                Ok(template_explanation(input))
            }
        }
    }

    async fn suggest(&self, lines: &[String]) -> Result<Vec<Suggestion>, AppError> {
        match self.try_suggest(lines).await {
            Ok(suggestions) => {
                debug!(count = suggestions.len(), "llm rewrites received");
                Ok(suggestions)
            }
            Err(e) => {
                warn!(error = %e, "falling back to template rewrites");
                Ok(template_suggestions(lines))
            }
        }
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}
