//! Section Detector: presence checks for the five standard resume sections.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::rules::MONTHS;

static CONTACT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(phone|email|contact|address|@)").expect("contact pattern"));

static EXPERIENCE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(experience|work history|employment|professional experience|work experience)",
    )
    .expect("experience pattern")
});

static MONTH_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)({MONTHS})\s+\d{{4}}")).expect("month-year pattern")
});

static EDUCATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(education|degree|university|college|bachelor|master|phd|diploma)")
        .expect("education pattern")
});

static SKILLS_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(skills|technical skills|competencies|proficiencies)")
        .expect("skills pattern")
});

static TECH_TERMS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(javascript|python|java|sql|html|css|react|node|aws|docker)")
        .expect("tech terms pattern")
});

static SUMMARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(summary|objective|profile|about)").expect("summary pattern"));

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionPresence {
    pub has_contact_info: bool,
    pub has_experience: bool,
    pub has_education: bool,
    pub has_skills: bool,
    pub has_summary: bool,
}

/// Detects which standard sections the resume text contains. Signals are plain
/// substring-style matches, so a keyword anywhere in the text counts.
pub fn detect_sections(text: &str) -> SectionPresence {
    SectionPresence {
        has_contact_info: CONTACT.is_match(text),
        has_experience: EXPERIENCE_HEADER.is_match(text) || MONTH_YEAR.is_match(text),
        has_education: EDUCATION.is_match(text),
        has_skills: SKILLS_HEADER.is_match(text) || TECH_TERMS.is_match(text),
        has_summary: SUMMARY.is_match(text),
    }
}
