use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Issues
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    /// Sort key: high=3, medium=2, low=1.
    pub fn rank(self) -> u8 {
        match self {
            Severity::High => 3,
            Severity::Medium => 2,
            Severity::Low => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedIssue {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

// ────────────────────────────────────────────────────────────────────────────
// Per-bullet and per-phrase findings
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletAnalysis {
    pub text: String,
    pub is_quantified: bool,
    pub has_weak_verb: bool,
    pub has_vague_phrase: bool,
    pub suggestions: Vec<String>,
    /// Clamped to 0–100.
    pub score: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeakPhraseKind {
    WeakVerb,
    VaguePhrase,
    // Part of the wire vocabulary; the sentence scanner does not emit it.
    #[allow(dead_code)]
    PassiveVoice,
    Cliche,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeakPhrase {
    pub phrase: String,
    #[serde(rename = "type")]
    pub kind: WeakPhraseKind,
    pub suggestion: String,
    /// The sentence the phrase was found in.
    pub example: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordRepetition {
    pub word: String,
    pub count: usize,
    pub suggestions: Vec<String>,
}

/// A non-bullet line that reads like an achievement but scored poorly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VagueLine {
    pub line: String,
    pub score: i32,
    pub suggestions: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Final record
// ────────────────────────────────────────────────────────────────────────────

/// Every metric the scorer looked at, kept consistent with the penalties applied.
///
/// `Default` + `#[serde(default)]` let the advisor endpoints accept partial findings
/// echoed back by clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawFindings {
    pub has_contact_info: bool,
    pub has_experience: bool,
    pub has_education: bool,
    pub has_skills: bool,
    pub has_summary: bool,
    pub is_image_only: bool,
    pub has_tables: bool,
    pub has_columns: bool,
    pub page_count: f64,
    pub keyword_matches: usize,
    pub total_keywords: usize,
    pub ats_parse_rate: i32,
    /// Top 5 by count.
    pub word_repetitions: Vec<WordRepetition>,
    pub quantified_bullets: usize,
    pub total_bullets: usize,
    pub bullet_average_score: i32,
    /// First 10 in sentence order.
    pub weak_phrases: Vec<WeakPhrase>,
    pub weak_verb_count: usize,
    pub vague_phrase_count: usize,
    /// Worst 5.
    pub vague_lines: Vec<VagueLine>,
    pub detected_bullets: Vec<String>,
    /// The 3 lowest-scoring bullets without metrics.
    pub unquantified_bullets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ATSAnalysis {
    /// 0–100.
    pub ats_score: i32,
    /// 0–100, one decimal place; 0 when no job description was supplied.
    pub keyword_match_percentage: f64,
    /// Sorted high → low, discovery order within a severity.
    pub detected_issues: Vec<DetectedIssue>,
    pub raw_findings: RawFindings,
}
