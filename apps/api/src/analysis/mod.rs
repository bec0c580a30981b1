//! Resume analysis engine: section detection, bullet extraction and scoring,
//! weak-phrase and repetition scans, keyword matching, and the score aggregator.
//!
//! Every pass is a pure function of the resume text. `analyze_resume` is the
//! single entry point and never fails.

pub mod bullet_scoring;
pub mod bullets;
pub mod handlers;
pub mod keywords;
pub mod normalize;
pub mod repetition;
pub mod rules;
pub mod scorer;
pub mod sections;
pub mod weak_phrases;

use tracing::debug;

use crate::analysis::bullet_scoring::analyze_bullets;
use crate::analysis::keywords::{match_keywords, normalize_job_description};
use crate::analysis::normalize::normalize;
use crate::analysis::repetition::find_repetitions;
use crate::analysis::scorer::{ats_parse_rate, compute_score, detect_findings, ranked_issues, ScoreFeatures};
use crate::analysis::sections::detect_sections;
use crate::analysis::weak_phrases::find_weak_phrases;
use crate::models::analysis::{ATSAnalysis, RawFindings};
use crate::models::resume::ParsedResume;

/// Scores a parsed resume, optionally against a job description.
///
/// A missing or blank job description skips keyword matching and reports a
/// keyword match of 0.
pub fn analyze_resume(resume: &ParsedResume, job_description: Option<&str>) -> ATSAnalysis {
    let text = resume.text.as_str();
    let lower = normalize(text);

    let sections = detect_sections(text);
    let keywords = normalize_job_description(job_description).map(|jd| match_keywords(&lower, jd));
    let repetitions = find_repetitions(text);
    let bullets = analyze_bullets(text);
    let weak_phrases = find_weak_phrases(text);

    let features = ScoreFeatures {
        resume,
        sections,
        keywords: keywords.as_ref(),
        repetitions: &repetitions,
        bullets: &bullets,
        weak_phrases: &weak_phrases,
    };
    let findings = detect_findings(&features);
    let ats_score = compute_score(&findings, &features);
    let detected_issues = ranked_issues(&findings);
    let ats_parse_rate = ats_parse_rate(resume, &sections);

    debug!(
        findings = findings.len(),
        issues = detected_issues.len(),
        ats_score,
        ats_parse_rate,
        "resume scored"
    );

    let keyword_match_percentage = keywords.as_ref().map(|k| k.rounded_percentage()).unwrap_or(0.0);
    let (keyword_matches, total_keywords) = keywords
        .as_ref()
        .map(|k| (k.matched, k.total()))
        .unwrap_or((0, 0));

    let raw_findings = RawFindings {
        has_contact_info: sections.has_contact_info,
        has_experience: sections.has_experience,
        has_education: sections.has_education,
        has_skills: sections.has_skills,
        has_summary: sections.has_summary,
        is_image_only: resume.is_image_only,
        has_tables: resume.has_tables,
        has_columns: resume.has_columns,
        page_count: resume.page_count,
        keyword_matches,
        total_keywords,
        ats_parse_rate,
        word_repetitions: repetitions,
        quantified_bullets: bullets.quantified_count,
        total_bullets: bullets.bullets.len(),
        bullet_average_score: bullets.average_score,
        weak_verb_count: bullets.weak_verb_count,
        vague_phrase_count: bullets.vague_phrase_count,
        weak_phrases,
        detected_bullets: bullets.bullets.into_iter().map(|b| b.text).collect(),
        vague_lines: bullets.vague_lines,
        unquantified_bullets: bullets.unquantified_bullets,
    };

    ATSAnalysis {
        ats_score,
        keyword_match_percentage,
        detected_issues,
        raw_findings,
    }
}
