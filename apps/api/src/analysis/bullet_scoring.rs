//! Bullet Analyzer: scores a single achievement line and aggregates scores across
//! every bullet the extractor found.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::analysis::bullets::extract_bullets;
use crate::analysis::rules::{first_match, CLICHES, STRONG_VERB, VAGUE_PHRASES, WEAK_VERBS};
use crate::models::analysis::{BulletAnalysis, VagueLine};

// ────────────────────────────────────────────────────────────────────────────
// Deductions
// ────────────────────────────────────────────────────────────────────────────

const BASELINE: i32 = 100;
const UNQUANTIFIED_PENALTY: i32 = 30;
const WEAK_VERB_PENALTY: i32 = 15;
const VAGUE_PHRASE_PENALTY: i32 = 20;
const CLICHE_PENALTY: i32 = 10;
const PASSIVE_VOICE_PENALTY: i32 = 10;
const WEAK_OPENING_PENALTY: i32 = 15;
const STRONG_VERB_BONUS: i32 = 5;

/// Patterns that on their own mark a line as quantified.
static METRIC_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // 40%
        r"\d+%",
        // $50
        r"\$\d+",
        // 100+
        r"\d+\+",
        // 5 years, 12 clients, 3 team members
        r"(?i)\d+\s*(years?|months?|days?|weeks?|hours?|people|users|clients|customers|team members|projects|products|employees|members|students|patients|revenue|sales|budget|dollars?|percent)",
        // impact verb, then a number somewhere after it
        r"(?i)(increased|decreased|improved|reduced|grew|achieved|saved|generated|delivered|raised|lowered|boosted|enhanced|optimized|streamlined|cut|doubled|tripled|quadrupled).*\d+",
        r"from\s+\d+.*to\s+\d+",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("metric pattern"))
    .collect()
});

static BARE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{2,}\b").expect("number pattern"));
static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19|20)\d{2}\b").expect("year pattern"));
static SLASH_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{1,2}/\d{1,2}/\d{2,4}").expect("date pattern"));

static PASSIVE_VOICE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(was|were|been|being)\s+\w+ed\b").expect("passive pattern"));

static WEAK_OPENING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(responsible|worked|helped|involved|participated)").expect("opening pattern")
});

/// True when the text carries a measurable result. A bare number of two or more
/// digits only counts when the text has no year and no slash date.
pub fn is_quantified(text: &str) -> bool {
    METRIC_PATTERNS.iter().any(|re| re.is_match(text))
        || (BARE_NUMBER.is_match(text) && !YEAR.is_match(text) && !SLASH_DATE.is_match(text))
}

/// Scores one bullet from a baseline of 100. Deductions stack; each phrase
/// category only counts its first match.
pub fn analyze_bullet(bullet: &str) -> BulletAnalysis {
    let text = bullet.trim();
    let lower = text.to_lowercase();

    let quantified = is_quantified(text);
    let mut suggestions = Vec::new();
    let mut score = BASELINE;

    if !quantified {
        score -= UNQUANTIFIED_PENALTY;
    }

    let weak_verb = first_match(&WEAK_VERBS, &lower, quantified);
    if let Some(rule) = weak_verb {
        score -= WEAK_VERB_PENALTY;
        suggestions.push(format!(
            "Replace \"{}\" with stronger verbs like: {}",
            rule.phrase,
            rule.top_alternatives()
        ));
    }

    let vague = first_match(&VAGUE_PHRASES, &lower, quantified);
    if let Some(rule) = vague {
        score -= VAGUE_PHRASE_PENALTY;
        suggestions.push(format!("Replace \"{}\" with {}", rule.phrase, rule.advice));
    }

    if let Some(rule) = first_match(&CLICHES, &lower, quantified) {
        score -= CLICHE_PENALTY;
        suggestions.push(format!(
            "Avoid cliche phrase: \"{}\". Use specific examples instead.",
            rule.phrase
        ));
    }

    if PASSIVE_VOICE.is_match(text) {
        score -= PASSIVE_VOICE_PENALTY;
        suggestions.push("Use active voice instead of passive voice for stronger impact.".to_string());
    }

    if WEAK_OPENING.is_match(text) {
        score -= WEAK_OPENING_PENALTY;
        suggestions.push(
            "Start with a strong action verb instead of 'responsible for' or 'worked on'.".to_string(),
        );
    }

    if quantified && STRONG_VERB.is_match(&lower) {
        score += STRONG_VERB_BONUS;
    }

    BulletAnalysis {
        text: text.to_string(),
        is_quantified: quantified,
        has_weak_verb: weak_verb.is_some(),
        has_vague_phrase: vague.is_some(),
        suggestions,
        score: score.clamp(0, 100),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Resume-wide aggregation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulletReport {
    pub bullets: Vec<BulletAnalysis>,
    /// Mean of the clamped per-bullet scores, rounded; 0 with no bullets.
    pub average_score: i32,
    pub quantified_count: usize,
    pub weak_verb_count: usize,
    pub vague_phrase_count: usize,
    /// Worst 5 by score.
    pub vague_lines: Vec<VagueLine>,
    /// The 3 lowest-scoring unquantified bullets, lowest first.
    pub unquantified_bullets: Vec<String>,
}

/// Extracts every bullet from the resume text and scores them.
pub fn analyze_bullets(text: &str) -> BulletReport {
    let extraction = extract_bullets(text);
    let bullets: Vec<BulletAnalysis> = extraction.bullets.iter().map(|b| analyze_bullet(b)).collect();

    let report = summarize(bullets, extraction.vague_lines);
    debug!(
        bullets = report.bullets.len(),
        quantified = report.quantified_count,
        vague_lines = report.vague_lines.len(),
        average = report.average_score,
        "bullet analysis complete"
    );
    report
}

fn summarize(bullets: Vec<BulletAnalysis>, mut vague_lines: Vec<VagueLine>) -> BulletReport {
    let average_score = if bullets.is_empty() {
        0
    } else {
        let total: i32 = bullets.iter().map(|b| b.score).sum();
        (total as f64 / bullets.len() as f64).round() as i32
    };

    let mut unquantified: Vec<&BulletAnalysis> = bullets.iter().filter(|b| !b.is_quantified).collect();
    unquantified.sort_by_key(|b| b.score);
    let unquantified_bullets = unquantified.iter().take(3).map(|b| b.text.clone()).collect();

    vague_lines.sort_by_key(|v| v.score);
    vague_lines.truncate(5);

    BulletReport {
        quantified_count: bullets.iter().filter(|b| b.is_quantified).count(),
        weak_verb_count: bullets.iter().filter(|b| b.has_weak_verb).count(),
        vague_phrase_count: bullets.iter().filter(|b| b.has_vague_phrase).count(),
        average_score,
        unquantified_bullets,
        vague_lines,
        bullets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquantified_weak_verb_bullet_scores_55() {
        let a = analyze_bullet("Created a website.");
        assert!(!a.is_quantified);
        assert!(a.has_weak_verb);
        assert!(!a.has_vague_phrase);
        assert_eq!(a.score, 55);
        assert_eq!(
            a.suggestions,
            vec!["Replace \"created\" with stronger verbs like: developed, built, established"]
        );
    }

    #[test]
    fn test_quantified_strong_verb_bullet_clamps_to_100() {
        let a = analyze_bullet("Increased signups by 35% using automated campaigns.");
        assert!(a.is_quantified);
        assert!(!a.has_weak_verb);
        assert!(!a.has_vague_phrase);
        assert!(a.suggestions.is_empty());
        assert_eq!(a.score, 100);
    }

    #[test]
    fn test_quantification_patterns() {
        assert!(is_quantified("Saved $12k in licensing"));
        assert!(is_quantified("Served 500+ customers"));
        assert!(is_quantified("Mentored 3 team members"));
        assert!(is_quantified("Cut build time from 40 to 12 minutes"));
        assert!(is_quantified("Handled 45 tickets weekly"));
    }

    #[test]
    fn test_years_and_dates_are_not_metrics() {
        assert!(!is_quantified("Joined the platform team in 2019"));
        assert!(!is_quantified("Started 03/14/22 on the data team"));
        assert!(!is_quantified("Wrote documentation"));
    }

    #[test]
    fn test_year_suppresses_other_bare_numbers() {
        assert!(!is_quantified("Shipped 12 releases in 2021"));
    }

    #[test]
    fn test_deductions_stack() {
        // unquantified -30, "responsible" -15, "responsible for" -20, opening -15
        let a = analyze_bullet("Responsible for the onboarding flow");
        assert_eq!(a.score, 20);
        assert!(a.has_weak_verb);
        assert!(a.has_vague_phrase);
        assert_eq!(a.suggestions.len(), 3);
    }

    #[test]
    fn test_passive_voice_and_cliche() {
        // -30 unquantified, -10 cliche, -10 passive
        let a = analyze_bullet("Was recognized as a team player across the org");
        assert_eq!(a.score, 50);
        assert!(a.suggestions.iter().any(|s| s.contains("team player")));
        assert!(a.suggestions.iter().any(|s| s.contains("active voice")));
    }

    #[test]
    fn test_score_never_below_zero() {
        let a = analyze_bullet("Responsible for helping with a lot of things, was involved as a team player");
        assert!(a.score >= 0);
        assert!(a.score <= 100);
    }

    #[test]
    fn test_average_uses_clamped_scores() {
        let bullets = vec![
            analyze_bullet("Increased revenue 40% by launching 3 products"),
            analyze_bullet("Created a website."),
        ];
        let report = summarize(bullets, vec![]);
        // 100 (clamped from 105) and 55
        assert_eq!(report.average_score, 78);
        assert_eq!(report.quantified_count, 1);
    }

    #[test]
    fn test_no_bullets_average_is_zero() {
        let report = summarize(vec![], vec![]);
        assert_eq!(report.average_score, 0);
        assert!(report.unquantified_bullets.is_empty());
    }

    #[test]
    fn test_unquantified_bullets_lowest_first_capped_at_three() {
        let bullets = vec![
            analyze_bullet("Wrote internal documentation"),
            analyze_bullet("Responsible for the onboarding flow"),
            analyze_bullet("Created a website."),
            analyze_bullet("Helped with various migrations"),
            analyze_bullet("Grew revenue 20%"),
        ];
        let report = summarize(bullets, vec![]);
        assert_eq!(report.unquantified_bullets.len(), 3);
        assert_eq!(report.unquantified_bullets[0], "Responsible for the onboarding flow");
        assert!(!report.unquantified_bullets.contains(&"Grew revenue 20%".to_string()));
    }

    #[test]
    fn test_vague_lines_sorted_and_truncated() {
        let lines = (0..7)
            .map(|i| VagueLine {
                line: format!("line {i}"),
                score: 70 - i * 5,
                suggestions: vec![],
            })
            .collect();
        let report = summarize(vec![], lines);
        assert_eq!(report.vague_lines.len(), 5);
        assert_eq!(report.vague_lines[0].score, 40);
    }
}
