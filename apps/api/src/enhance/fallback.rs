//! Deterministic advisor used when no LLM is configured, and as the fallback
//! whenever an LLM call fails.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::enhance::{Advisor, ExplainInput, Suggestion};
use crate::errors::AppError;

const MAX_LISTED_ISSUES: usize = 5;

struct Rewrite {
    trigger: &'static str,
    pattern: Regex,
    replacement: &'static str,
    outcome: &'static str,
}

impl Rewrite {
    fn new(trigger: &'static str, replacement: &'static str, outcome: &'static str) -> Self {
        Self {
            trigger,
            pattern: Regex::new(&format!("(?i){}", regex::escape(trigger))).expect("rewrite pattern"),
            replacement,
            outcome,
        }
    }
}

/// First matching trigger wins.
static REWRITES: Lazy<Vec<Rewrite>> = Lazy::new(|| {
    vec![
        Rewrite::new("created", "Developed and launched", " resulting in measurable improvements."),
        Rewrite::new("responsible for", "Managed", " achieving positive outcomes."),
        Rewrite::new("worked on", "Delivered", " with measurable results."),
        Rewrite::new("helped", "Enabled", " leading to improved performance."),
    ]
});

const GENERIC_OUTCOME: &str = " resulting in measurable improvements and positive impact.";

pub struct TemplateAdvisor;

#[async_trait]
impl Advisor for TemplateAdvisor {
    async fn explain(&self, input: &ExplainInput) -> Result<String, AppError> {
        Ok(template_explanation(input))
    }

    async fn suggest(&self, lines: &[String]) -> Result<Vec<Suggestion>, AppError> {
        Ok(template_suggestions(lines))
    }

    fn backend(&self) -> &'static str {
        "template"
    }
}

pub fn template_suggestions(lines: &[String]) -> Vec<Suggestion> {
    lines
        .iter()
        .map(|line| Suggestion {
            original: line.clone(),
            improved: rewrite_line(line),
        })
        .collect()
}

/// Pattern rewrite for a line without digits. A trailing period is replaced by
/// an outcome clause; lines with digits are returned as-is.
pub fn rewrite_line(line: &str) -> String {
    if line.chars().any(|c| c.is_ascii_digit()) {
        return line.to_string();
    }

    let lower = line.to_lowercase();
    match REWRITES.iter().find(|r| lower.contains(r.trigger)) {
        Some(rewrite) => {
            let replaced = rewrite.pattern.replace(line, rewrite.replacement);
            with_outcome(&replaced, rewrite.outcome)
        }
        None => with_outcome(line, GENERIC_OUTCOME),
    }
}

fn with_outcome(line: &str, outcome: &str) -> String {
    match line.strip_suffix('.') {
        Some(stem) => format!("{stem}{outcome}"),
        None => line.to_string(),
    }
}

pub fn template_explanation(input: &ExplainInput) -> String {
    let score = input.ats_score;
    let raw = &input.raw_findings;
    let mut out = format!("Your resume received an ATS score of {score}/100.\n\n");

    out.push_str(if score >= 80 {
        "Excellent! Your resume is well-optimized for ATS systems. It includes essential sections, has good formatting, and should pass most ATS screenings.\n\n"
    } else if score >= 60 {
        "Your resume is mostly ATS-friendly but has room for improvement. Address the detected issues to increase your score and chances of passing ATS screening.\n\n"
    } else {
        "Your resume needs significant improvements for ATS compatibility. Focus on addressing the detected issues to improve your chances of passing ATS screening.\n\n"
    });

    if !input.issues.is_empty() {
        out.push_str("Key Issues to Address:\n");
        for (idx, issue) in input.issues.iter().take(MAX_LISTED_ISSUES).enumerate() {
            out.push_str(&format!("{}. {}: {}\n", idx + 1, issue.title, issue.description));
        }
        out.push('\n');
    }

    out.push_str("Improvement Suggestions:\n");
    if !raw.has_skills {
        out.push_str("• Add a dedicated Skills section with relevant technical and soft skills\n");
    }
    if !raw.has_experience {
        out.push_str("• Include a Work Experience section with job titles, companies, and dates\n");
    }
    if raw.has_tables {
        out.push_str("• Remove tables and use simple bullet points instead\n");
    }
    if raw.keyword_matches > 0 && raw.total_keywords > 0 {
        let percent = raw.keyword_matches as f64 / raw.total_keywords as f64 * 100.0;
        if percent < 50.0 {
            out.push_str("• Improve keyword matching by adding more terms from the job description\n");
        }
    }
    out.push_str("• Use standard section headers (Experience, Education, Skills)\n");
    out.push_str("• Keep formatting simple and avoid complex layouts\n");

    out
}
