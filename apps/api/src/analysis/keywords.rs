//! Keyword Matcher: how much of a job description's vocabulary the resume covers.
//!
//! Keyword extraction is a heuristic stand-in, not a semantic extractor: a word
//! counts as important when it repeats within the description or carries an
//! uppercase letter, plus any common skill term the description mentions.

use std::collections::HashSet;

use crate::analysis::normalize::{char_len, tokens};

const MAX_KEYWORDS: usize = 30;

const COMMON_SKILLS: &[&str] = &[
    "javascript", "python", "java", "sql", "react", "node", "aws", "docker",
    "kubernetes", "typescript", "angular", "vue", "mongodb", "postgresql",
    "project management", "agile", "scrum", "leadership", "communication",
    "analytics", "data analysis", "machine learning", "ai", "api", "rest",
    "graphql", "git", "ci/cd", "devops", "cloud", "azure", "gcp",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordMatch {
    pub keywords: Vec<String>,
    pub matched: usize,
    /// Unrounded; thresholds are applied to this value.
    pub percentage: f64,
}

impl KeywordMatch {
    pub fn total(&self) -> usize {
        self.keywords.len()
    }

    /// Percentage rounded to one decimal place for reporting.
    pub fn rounded_percentage(&self) -> f64 {
        (self.percentage * 10.0).round() / 10.0
    }
}

/// Trimmed job description, or `None` when it is missing or blank.
pub fn normalize_job_description(job_description: Option<&str>) -> Option<&str> {
    job_description.map(str::trim).filter(|jd| !jd.is_empty())
}

/// Candidate keywords in discovery order, capped at 30.
pub fn extract_keywords(job_description: &str) -> Vec<String> {
    let job_lower = job_description.to_lowercase();

    let mut seen_words: HashSet<String> = HashSet::new();
    let mut important: Vec<String> = Vec::new();
    for token in tokens(job_description) {
        if char_len(&token) <= 3 {
            continue;
        }
        let lower = token.to_lowercase();
        let repeated = !seen_words.insert(lower.clone());
        if repeated || token.chars().any(char::is_uppercase) {
            important.push(lower);
        }
    }

    let mut unique: HashSet<String> = HashSet::new();
    important
        .into_iter()
        .chain(COMMON_SKILLS.iter().map(|s| s.to_string()))
        .filter(|k| unique.insert(k.clone()))
        .filter(|k| job_lower.contains(k.as_str()))
        .take(MAX_KEYWORDS)
        .collect()
}

/// Matches a job description against the lower-cased resume text. A keyword
/// counts when it appears verbatim, with its spaces removed, or with its spaces
/// hyphenated.
pub fn match_keywords(resume_lower: &str, job_description: &str) -> KeywordMatch {
    let keywords = extract_keywords(job_description);
    if keywords.is_empty() {
        return KeywordMatch::default();
    }

    let matched = keywords
        .iter()
        .filter(|k| keyword_present(resume_lower, k))
        .count();
    let percentage = matched as f64 / keywords.len() as f64 * 100.0;

    KeywordMatch {
        keywords,
        matched,
        percentage,
    }
}

fn keyword_present(text: &str, keyword: &str) -> bool {
    let words: Vec<&str> = keyword.split_whitespace().collect();
    text.contains(keyword) || text.contains(&words.concat()) || text.contains(&words.join("-"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordTier {
    /// Below 30%.
    Low,
    /// 30% up to 50%.
    Moderate,
    /// 50% up to 70%.
    Good,
}

/// `None` at 70% and above, or when there was nothing to match.
pub fn keyword_tier(result: &KeywordMatch) -> Option<KeywordTier> {
    if result.total() == 0 {
        return None;
    }
    match result.percentage {
        p if p < 30.0 => Some(KeywordTier::Low),
        p if p < 50.0 => Some(KeywordTier::Moderate),
        p if p < 70.0 => Some(KeywordTier::Good),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_job_description_is_absent() {
        assert_eq!(normalize_job_description(None), None);
        assert_eq!(normalize_job_description(Some("  \n ")), None);
        assert_eq!(normalize_job_description(Some(" Rust dev ")), Some("Rust dev"));
    }

    #[test]
    fn test_capitalised_and_repeated_words_are_keywords() {
        let keywords = extract_keywords("Require 3+ years Python and SQL experience");
        assert_eq!(keywords, vec!["require", "python", "sql"]);
    }

    #[test]
    fn test_repeated_lowercase_word_counted_once() {
        let keywords = extract_keywords("we build pipelines and maintain pipelines for pipelines");
        // "maintain" carries "ai" as a substring, which the common-skill filter accepts
        assert_eq!(keywords, vec!["pipelines", "ai"]);
    }

    #[test]
    fn test_multi_word_skill_matches_hyphenated_or_joined() {
        let result = match_keywords(
            "experienced in machine-learning and dataanalysis",
            "machine learning and data analysis",
        );
        assert_eq!(result.keywords, vec!["data analysis", "machine learning"]);
        assert_eq!(result.matched, 2);
        assert_eq!(result.percentage, 100.0);
    }

    #[test]
    fn test_partial_match_percentage() {
        let result = match_keywords(
            "python developer",
            "Require 3+ years Python and SQL experience",
        );
        assert_eq!(result.total(), 3);
        assert_eq!(result.matched, 1);
        assert_eq!(result.rounded_percentage(), 33.3);
        assert_eq!(keyword_tier(&result), Some(KeywordTier::Moderate));
    }

    #[test]
    fn test_caps_at_thirty_keywords() {
        let jd = (0..40).map(|i| format!("Term{i:02}x")).collect::<Vec<_>>().join(" ");
        assert_eq!(extract_keywords(&jd).len(), MAX_KEYWORDS);
    }

    #[test]
    fn test_no_keywords_means_no_tier() {
        let result = match_keywords("anything", "a b c");
        assert_eq!(result.total(), 0);
        assert_eq!(result.percentage, 0.0);
        assert_eq!(keyword_tier(&result), None);
    }

    #[test]
    fn test_tier_boundaries() {
        let at = |percentage| KeywordMatch {
            keywords: vec!["x".to_string()],
            matched: 0,
            percentage,
        };
        assert_eq!(keyword_tier(&at(29.9)), Some(KeywordTier::Low));
        assert_eq!(keyword_tier(&at(30.0)), Some(KeywordTier::Moderate));
        assert_eq!(keyword_tier(&at(50.0)), Some(KeywordTier::Good));
        assert_eq!(keyword_tier(&at(70.0)), None);
    }
}
