//! Bullet Extractor: finds achievement lines in raw resume text.
//!
//! Several independent candidate generators run in sequence over the text; each
//! sees what earlier generators already collected and the collector drops
//! case-insensitive duplicates. Lines that read like achievements but score
//! poorly are collected separately as vague lines.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::bullet_scoring::analyze_bullet;
use crate::analysis::normalize::{char_len, non_empty_lines};
use crate::analysis::rules::{first_match, ACTION_VERB_OPENING, MONTHS, VAGUE_PHRASES, WEAK_VERBS};
use crate::models::analysis::VagueLine;

/// A line below this score is reported as vague rather than promoted to a bullet.
const VAGUE_LINE_THRESHOLD: i32 = 70;

static GLYPH_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[•●◦○▪▫■□\-*]").expect("glyph pattern"));
static GLYPH_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[•●◦○▪▫■□\-*]\s*").expect("glyph prefix pattern"));
static NUMBERED_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\s+").expect("numbered prefix pattern"));
static MARKER_SWEEP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)(?:^|\n)(?:[•●◦○▪▫■□\-*]|\d+\.)\s*([^\n]+)").expect("marker sweep pattern")
});

static SLASH_DATE_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2}/\d{1,2}/\d{2,4}").expect("date start pattern"));
/// "March 2021", case-sensitive on purpose: only capitalised words.
static WORD_YEAR_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][a-z]+\s+\d{4}").expect("word-year pattern"));
static EXPERIENCE_SKIP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^(experience|education|skills|summary|objective|{MONTHS}|\d{{4}})"
    ))
    .expect("experience skip pattern")
});
static HEADER_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(experience|education|skills|summary|objective|contact|phone|email|address)")
        .expect("header start pattern")
});
static DATE_WORD_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)^(present|current|{MONTHS})")).expect("date word pattern")
});
static VERB_FORM_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[a-z]+(ed|ing)\s").expect("verb form pattern"));

static SECTION_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)experience|work experience|employment|professional experience|work history")
        .expect("section start pattern")
});
static SECTION_END: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)education|skills|projects|certifications|summary|objective")
        .expect("section end pattern")
});
static JOB_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\d{{4}}|\b({MONTHS})\b")).expect("job date pattern")
});
static COMPANY_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(inc|llc|corp|company|university|college)").expect("company pattern")
});

// ────────────────────────────────────────────────────────────────────────────
// Experience sections
// ────────────────────────────────────────────────────────────────────────────

/// Lines belonging to one job inside the experience section.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceSection {
    pub lines: Vec<String>,
}

/// Captures the text from the first experience header up to the next section
/// header (or end of text) and splits it into per-job groups. A line with a
/// year or month name, or a short line naming a company-type token, opens a
/// new group.
pub fn extract_experience_sections(text: &str) -> Vec<ExperienceSection> {
    let Some(start) = SECTION_START.find(text) else {
        return Vec::new();
    };
    let end = SECTION_END
        .find_at(text, start.end())
        .map(|m| m.start())
        .unwrap_or(text.len());

    let mut sections = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for line in non_empty_lines(&text[start.start()..end]) {
        if is_job_header(line) && !current.is_empty() {
            sections.push(ExperienceSection {
                lines: std::mem::take(&mut current),
            });
        }
        current.push(line.to_string());
    }
    if !current.is_empty() {
        sections.push(ExperienceSection { lines: current });
    }
    sections
}

fn is_job_header(line: &str) -> bool {
    JOB_DATE.is_match(line) || (char_len(line) < 80 && COMPANY_TOKEN.is_match(line))
}

// ────────────────────────────────────────────────────────────────────────────
// Collector
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub bullets: Vec<String>,
    pub vague_lines: Vec<VagueLine>,
}

enum Candidate {
    Bullet(String),
    Vague(VagueLine),
}

#[derive(Default)]
struct Collector {
    extraction: Extraction,
    bullet_keys: HashSet<String>,
    vague_keys: HashSet<String>,
}

impl Collector {
    fn insert(&mut self, candidate: Candidate) {
        match candidate {
            Candidate::Bullet(text) => {
                if self.bullet_keys.insert(dedup_key(&text)) {
                    self.extraction.bullets.push(text);
                }
            }
            Candidate::Vague(vague) => {
                if self.vague_keys.insert(dedup_key(&vague.line)) {
                    self.extraction.vague_lines.push(vague);
                }
            }
        }
    }

    fn is_bullet(&self, line: &str) -> bool {
        self.bullet_keys.contains(&dedup_key(line))
    }

    /// Exact (case-insensitive) match, marker included. A glyph-marked line
    /// whose text was collected as a bullet still gets a vague-line check.
    fn has_line(&self, line: &str) -> bool {
        let key = line.to_lowercase();
        self.bullet_keys.contains(&key) || self.vague_keys.contains(&key)
    }
}

/// Marker-insensitive, case-insensitive identity of a line.
fn dedup_key(line: &str) -> String {
    strip_marker(line).to_lowercase()
}

/// Removes a leading bullet glyph and/or list number.
fn strip_marker(line: &str) -> String {
    let line = GLYPH_PREFIX.replace(line.trim(), "");
    NUMBERED_PREFIX.replace(&line, "").trim().to_string()
}

fn within(text: &str, min: usize, max: usize) -> bool {
    let len = char_len(text);
    len > min && len < max
}

// ────────────────────────────────────────────────────────────────────────────
// Candidate generators
// ────────────────────────────────────────────────────────────────────────────

type Generator = fn(&str, &Collector) -> Vec<Candidate>;

const GENERATORS: [Generator; 5] = [
    marked_lines,
    marker_sweep,
    glyph_lines,
    experience_action_lines,
    achievement_lines,
];

/// Runs every generator over `text` and returns the deduplicated bullets and
/// vague lines in discovery order.
pub fn extract_bullets(text: &str) -> Extraction {
    GENERATORS
        .iter()
        .fold(Collector::default(), |mut collector, generate| {
            for candidate in generate(text, &collector) {
                collector.insert(candidate);
            }
            collector
        })
        .extraction
}

/// Lines opening with a bullet glyph or "N. ".
fn marked_lines(text: &str, _: &Collector) -> Vec<Candidate> {
    text.split('\n')
        .map(str::trim)
        .filter(|l| GLYPH_START.is_match(l) || NUMBERED_PREFIX.is_match(l))
        .map(strip_marker)
        .filter(|b| within(b, 5, 300))
        .map(Candidate::Bullet)
        .collect()
}

/// Whole-text sweep for markers at line starts, catching bullets whose text was
/// wrapped onto the following line.
fn marker_sweep(text: &str, _: &Collector) -> Vec<Candidate> {
    MARKER_SWEEP
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|b| within(b, 5, 300))
        .map(Candidate::Bullet)
        .collect()
}

/// Glyph-led lines with no space after the glyph.
fn glyph_lines(text: &str, _: &Collector) -> Vec<Candidate> {
    text.split('\n')
        .map(str::trim)
        .filter(|l| GLYPH_START.is_match(l))
        .map(|l| GLYPH_PREFIX.replace(l, "").trim().to_string())
        .filter(|b| within(b, 5, 300))
        .map(Candidate::Bullet)
        .collect()
}

/// Unmarked lines inside the experience section. Lines opening with an action
/// verb are bullets; the rest are scored and kept as vague lines when weak.
fn experience_action_lines(text: &str, seen: &Collector) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for section in extract_experience_sections(text) {
        for line in &section.lines {
            if !within(line, 15, 250)
                || EXPERIENCE_SKIP.is_match(line)
                || SLASH_DATE_START.is_match(line)
                || WORD_YEAR_START.is_match(line)
                || GLYPH_START.is_match(line)
                || seen.is_bullet(line)
            {
                continue;
            }

            if ACTION_VERB_OPENING.is_match(line) {
                candidates.push(Candidate::Bullet(line.clone()));
                continue;
            }

            let analysis = analyze_bullet(line);
            if analysis.score < VAGUE_LINE_THRESHOLD && !analysis.is_quantified {
                candidates.push(Candidate::Vague(VagueLine {
                    line: line.clone(),
                    score: analysis.score,
                    suggestions: analysis.suggestions,
                }));
            }
        }
    }
    candidates
}

/// Resume-wide pass over unmarked, digit-free lines that contain a weak verb or
/// vague phrase, or open with an "-ed"/"-ing" word.
fn achievement_lines(text: &str, seen: &Collector) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for line in text.split('\n').map(str::trim) {
        if !within(line, 15, 250)
            || HEADER_START.is_match(line)
            || SLASH_DATE_START.is_match(line)
            || WORD_YEAR_START.is_match(line)
            || DATE_WORD_START.is_match(line)
            || seen.has_line(line)
            || line.chars().any(|c| c.is_ascii_digit())
        {
            continue;
        }

        let lower = line.to_lowercase();
        let has_weak_verb = first_match(&WEAK_VERBS, &lower, false).is_some();
        let has_vague_phrase = first_match(&VAGUE_PHRASES, &lower, false).is_some();
        let opens_with_verb_form = VERB_FORM_START.is_match(&lower);
        if !(has_weak_verb || has_vague_phrase || opens_with_verb_form) {
            continue;
        }

        let analysis = analyze_bullet(line);
        if analysis.score < VAGUE_LINE_THRESHOLD {
            candidates.push(Candidate::Vague(VagueLine {
                line: line.to_string(),
                score: analysis.score,
                suggestions: analysis.suggestions,
            }));
        } else if opens_with_verb_form {
            candidates.push(Candidate::Bullet(line.to_string()));
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_bullet_stripped() {
        let e = extract_bullets("• Created a website.");
        assert_eq!(e.bullets, vec!["Created a website."]);
        assert_eq!(e.vague_lines.len(), 1);
        assert_eq!(e.vague_lines[0].line, "• Created a website.");
    }

    #[test]
    fn test_all_glyph_kinds_and_numbers() {
        let text = "● Shipped the billing service\n▪ Ran the on-call rotation\n2. Rebuilt the search index\n*Migrated legacy cron jobs";
        let e = extract_bullets(text);
        assert_eq!(
            e.bullets,
            vec![
                "Shipped the billing service",
                "Ran the on-call rotation",
                "Rebuilt the search index",
                "Migrated legacy cron jobs",
            ]
        );
    }

    #[test]
    fn test_duplicates_dropped_case_insensitively() {
        let text = "- Led the data platform team\n• led the data platform team\n- LED THE DATA PLATFORM TEAM";
        assert_eq!(extract_bullets(text).bullets.len(), 1);
    }

    #[test]
    fn test_short_and_long_bullets_filtered() {
        let long = format!("- {}", "x".repeat(320));
        let text = format!("- Tiny\n{long}\n- Long enough bullet");
        assert_eq!(extract_bullets(&text).bullets, vec!["Long enough bullet"]);
    }

    #[test]
    fn test_sweep_catches_bullet_wrapped_after_marker() {
        let e = extract_bullets("Projects\n-\nDesigned the payments ledger");
        assert!(e.bullets.contains(&"Designed the payments ledger".to_string()));
    }

    #[test]
    fn test_experience_action_verb_lines_become_bullets() {
        let text = "Experience\nAcme Inc, 2019 - 2022\nDeployed services to three regions\nThe office had a nice view of the bay\nEducation\nState University";
        let e = extract_bullets(text);
        assert_eq!(e.bullets, vec!["Deployed services to three regions"]);
    }

    #[test]
    fn test_experience_non_action_line_is_vague_when_weak() {
        let text = "Experience\nAcme Inc, 2019 - 2022\nThe team used many manual processes daily\nEducation";
        let e = extract_bullets(text);
        assert!(e.bullets.is_empty());
        assert_eq!(e.vague_lines.len(), 1);
        assert_eq!(e.vague_lines[0].line, "The team used many manual processes daily");
        // -30 unquantified, -15 "used", -20 "many"
        assert_eq!(e.vague_lines[0].score, 35);
    }

    #[test]
    fn test_unmarked_verb_form_line_promoted_when_clean() {
        let e = extract_bullets("Architected an event driven order pipeline");
        assert_eq!(e.bullets, vec!["Architected an event driven order pipeline"]);
    }

    #[test]
    fn test_unmarked_weak_line_recorded_as_vague() {
        let e = extract_bullets("Helped with several internal tools");
        assert!(e.bullets.is_empty());
        assert_eq!(e.vague_lines.len(), 1);
    }

    #[test]
    fn test_lines_with_digits_skip_achievement_pass() {
        let e = extract_bullets("Handled several of the 12 regional accounts");
        assert!(e.bullets.is_empty());
        assert!(e.vague_lines.is_empty());
    }

    #[test]
    fn test_marked_weak_line_is_also_vague() {
        let e = extract_bullets("• Helped with several internal tools");
        assert_eq!(e.bullets.len(), 1);
        assert_eq!(e.vague_lines.len(), 1);
    }

    #[test]
    fn test_bulleted_resume_still_reports_vague_lines() {
        let e = extract_bullets("• Helped with several internal tools\n• Created a website for the team");
        assert_eq!(e.bullets.len(), 2);
        let scores: Vec<i32> = e.vague_lines.iter().map(|v| v.score).collect();
        // -30 unquantified, -15 "helped", -20 "helped with"; then -30, -15 "created"
        assert_eq!(scores, vec![35, 55]);
    }

    #[test]
    fn test_unmarked_bullet_not_repeated_as_vague() {
        let e = extract_bullets("Experience\nHelped with several internal tools");
        assert_eq!(e.bullets, vec!["Helped with several internal tools"]);
        assert!(e.vague_lines.is_empty());
    }

    #[test]
    fn test_plain_text_without_bullets() {
        let e = extract_bullets("Jane Doe\nSan Francisco\njane@doe.dev");
        assert!(e.bullets.is_empty());
        assert!(e.vague_lines.is_empty());
    }

    #[test]
    fn test_experience_sections_split_on_job_headers() {
        let text = "Work Experience\nGlobex Corp\nBuilt things\nMarch 2020 - Present\nRan things\nSkills\nRust";
        let sections = extract_experience_sections(text);
        // "Globex Corp" is short and names a company token, so it opens a group too.
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].lines, vec!["Work Experience"]);
        assert_eq!(sections[1].lines, vec!["Globex Corp", "Built things"]);
        assert_eq!(sections[2].lines, vec!["March 2020 - Present", "Ran things"]);
    }

    #[test]
    fn test_no_experience_header_means_no_sections() {
        assert!(extract_experience_sections("Education\nMIT").is_empty());
    }
}
