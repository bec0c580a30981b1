//! Score Aggregator: turns the partial results of every analysis pass into the
//! final score and a severity-ranked issue list.
//!
//! Scoring runs in separate steps over the same feature set:
//! 1. `detect_findings` lists every condition that applies, in discovery order
//! 2. `Finding::penalty` prices each condition
//! 3. `Finding::issue` words it for the user (some findings are silent)
//! 4. `perfect_score_adjustment` keeps near-perfect resumes off 100 unless they
//!    are exceptional on bullets, phrasing and keywords

use crate::analysis::bullet_scoring::BulletReport;
use crate::analysis::keywords::{keyword_tier, KeywordMatch, KeywordTier};
use crate::analysis::repetition::{repetition_tier, RepetitionTier};
use crate::analysis::sections::SectionPresence;
use crate::models::analysis::{DetectedIssue, Severity, WeakPhrase, WeakPhraseKind, WordRepetition};
use crate::models::resume::ParsedResume;

pub const BASELINE_SCORE: i32 = 100;
const PERFECT_SCORE_FLOOR: i32 = 95;
const PERFECT_SCORE_DEDUCTION: i32 = 3;

/// Everything the aggregator reads. Borrowed from the analysis passes.
pub struct ScoreFeatures<'a> {
    pub resume: &'a ParsedResume,
    pub sections: SectionPresence,
    /// `None` when no job description was supplied.
    pub keywords: Option<&'a KeywordMatch>,
    pub repetitions: &'a [WordRepetition],
    pub bullets: &'a BulletReport,
    pub weak_phrases: &'a [WeakPhrase],
}

impl ScoreFeatures<'_> {
    fn total_keywords(&self) -> usize {
        self.keywords.map(KeywordMatch::total).unwrap_or(0)
    }

    fn keyword_percentage(&self) -> f64 {
        self.keywords.map(|k| k.percentage).unwrap_or(0.0)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Findings
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Finding {
    MissingContactInfo,
    MissingExperience,
    MissingEducation,
    MissingSkills,
    ImageOnly,
    Tables,
    Columns,
    TooLong { page_count: f64 },
    TooShort,
    Keywords { tier: KeywordTier, percentage: f64 },
    Repetition(RepetitionTier),
    /// More than half of the bullets carry no metric.
    MostlyUnquantified { percentage: f64 },
    /// More than 30% and at most half.
    PartlyUnquantified { percentage: f64 },
    WeakVerbs { count: usize },
    VaguePhrases { count: usize },
    /// Average bullet score below 60.
    PoorBullets,
    /// Average bullet score from 60 up to 75. Deducts silently.
    MediocreBullets,
    /// Advisory only; names the first weak verb the sentence scan found.
    WeakVerbAdvice { phrase: String },
}

/// Lists every applicable condition in discovery order.
pub fn detect_findings(features: &ScoreFeatures) -> Vec<Finding> {
    let mut findings = Vec::new();
    let sections = &features.sections;
    let resume = features.resume;

    if !sections.has_contact_info {
        findings.push(Finding::MissingContactInfo);
    }
    if !sections.has_experience {
        findings.push(Finding::MissingExperience);
    }
    if !sections.has_education {
        findings.push(Finding::MissingEducation);
    }
    if !sections.has_skills {
        findings.push(Finding::MissingSkills);
    }

    if resume.is_image_only {
        findings.push(Finding::ImageOnly);
    }
    if resume.has_tables {
        findings.push(Finding::Tables);
    }
    if resume.has_columns {
        findings.push(Finding::Columns);
    }

    if resume.page_count > 2.0 {
        findings.push(Finding::TooLong {
            page_count: resume.page_count,
        });
    } else if resume.page_count < 0.5 {
        findings.push(Finding::TooShort);
    }

    if let Some(result) = features.keywords {
        if let Some(tier) = keyword_tier(result) {
            findings.push(Finding::Keywords {
                tier,
                percentage: result.percentage,
            });
        }
    }

    if let Some(tier) = repetition_tier(features.repetitions) {
        findings.push(Finding::Repetition(tier));
    }

    findings.extend(bullet_findings(features.bullets));

    if let Some(first) = features
        .weak_phrases
        .iter()
        .find(|p| p.kind == WeakPhraseKind::WeakVerb)
    {
        findings.push(Finding::WeakVerbAdvice {
            phrase: first.phrase.clone(),
        });
    }

    findings
}

fn bullet_findings(report: &BulletReport) -> Vec<Finding> {
    let total = report.bullets.len();
    if total == 0 {
        return Vec::new();
    }
    let share = |count: usize| count as f64 / total as f64 * 100.0;
    let mut findings = Vec::new();

    let unquantified = share(total - report.quantified_count);
    if unquantified > 50.0 {
        findings.push(Finding::MostlyUnquantified {
            percentage: unquantified,
        });
    } else if unquantified > 30.0 {
        findings.push(Finding::PartlyUnquantified {
            percentage: unquantified,
        });
    }

    if report.weak_verb_count > 0 && share(report.weak_verb_count) > 30.0 {
        findings.push(Finding::WeakVerbs {
            count: report.weak_verb_count,
        });
    }

    if report.vague_phrase_count > 0 && share(report.vague_phrase_count) > 20.0 {
        findings.push(Finding::VaguePhrases {
            count: report.vague_phrase_count,
        });
    }

    if report.average_score < 60 {
        findings.push(Finding::PoorBullets);
    } else if report.average_score < 75 {
        findings.push(Finding::MediocreBullets);
    }

    findings
}

// ────────────────────────────────────────────────────────────────────────────
// Pricing
// ────────────────────────────────────────────────────────────────────────────

impl Finding {
    /// Points deducted from the baseline.
    pub fn penalty(&self) -> i32 {
        match self {
            Finding::MissingContactInfo => 5,
            Finding::MissingExperience => 10,
            Finding::MissingEducation => 5,
            Finding::MissingSkills => 10,
            Finding::ImageOnly => 20,
            Finding::Tables => 10,
            Finding::Columns => 5,
            Finding::TooLong { .. } | Finding::TooShort => 5,
            Finding::Keywords { tier, .. } => match tier {
                KeywordTier::Low => 20,
                KeywordTier::Moderate => 10,
                KeywordTier::Good => 5,
            },
            Finding::Repetition(RepetitionTier::High) => 8,
            Finding::Repetition(RepetitionTier::Moderate) => 5,
            Finding::MostlyUnquantified { .. } => 15,
            Finding::PartlyUnquantified { .. } => 8,
            Finding::WeakVerbs { .. } => 10,
            Finding::VaguePhrases { .. } => 8,
            Finding::PoorBullets => 10,
            Finding::MediocreBullets => 5,
            Finding::WeakVerbAdvice { .. } => 0,
        }
    }

    /// The user-facing issue, or `None` for silent deductions.
    pub fn issue(&self) -> Option<DetectedIssue> {
        let (title, description, severity) = match self {
            Finding::MissingContactInfo => (
                "Missing Contact Information",
                "Your resume should include phone number, email, and optionally LinkedIn profile.".to_string(),
                Severity::High,
            ),
            Finding::MissingExperience => (
                "Missing Work Experience Section",
                "Your resume should include a Work Experience or Employment History section with job titles, companies, and dates.".to_string(),
                Severity::High,
            ),
            Finding::MissingEducation => (
                "Missing Education Section",
                "Include your educational background with degree, institution, and graduation date.".to_string(),
                Severity::Medium,
            ),
            Finding::MissingSkills => (
                "Missing Skills Section",
                "Add a dedicated Skills section listing your technical and soft skills relevant to the position.".to_string(),
                Severity::High,
            ),
            Finding::ImageOnly => (
                "Image-Only Resume Detected",
                "Your resume appears to be a scanned image or contains very little text. ATS systems cannot read image-based resumes. Use a text-based PDF or DOCX file.".to_string(),
                Severity::High,
            ),
            Finding::Tables => (
                "Tables Detected",
                "Tables in resumes can break ATS parsing. Use simple bullet points and standard formatting instead.".to_string(),
                Severity::Medium,
            ),
            Finding::Columns => (
                "Column Layout Detected",
                "Multi-column layouts can confuse ATS systems. Use a single-column format for better compatibility.".to_string(),
                Severity::Low,
            ),
            Finding::TooLong { page_count } => (
                "Resume Too Long",
                format!("Your resume appears to be {page_count} pages. Most ATS systems prefer 1-2 page resumes. Consider condensing your content."),
                Severity::Low,
            ),
            Finding::TooShort => (
                "Resume Too Short",
                "Your resume appears to be very short. Make sure you've included all relevant experience, education, and skills.".to_string(),
                Severity::Low,
            ),
            Finding::Keywords { tier: KeywordTier::Low, percentage } => (
                "Low Keyword Match",
                format!("Only {percentage:.1}% of important keywords from the job description were found in your resume. Add more relevant keywords to improve your ATS ranking."),
                Severity::High,
            ),
            Finding::Keywords { tier: KeywordTier::Moderate, percentage } => (
                "Moderate Keyword Match",
                format!("Your resume matches {percentage:.1}% of job description keywords. Consider adding more relevant terms to improve your ranking."),
                Severity::Medium,
            ),
            Finding::Keywords { tier: KeywordTier::Good, percentage } => (
                "Good Keyword Match",
                format!("Your resume matches {percentage:.1}% of keywords. You can improve further by adding more specific terms from the job description."),
                Severity::Low,
            ),
            Finding::Repetition(RepetitionTier::High) => (
                "Excessive Word Repetition",
                "You're repeating words frequently throughout your resume. Using synonyms and varied language increases impact.".to_string(),
                Severity::Medium,
            ),
            Finding::Repetition(RepetitionTier::Moderate) => (
                "Word Repetition Detected",
                "Some words are repeated multiple times. Consider using synonyms for better variety.".to_string(),
                Severity::Low,
            ),
            Finding::MostlyUnquantified { percentage } => (
                "Most Bullet Points Lack Quantification",
                format!("{}% of your bullet points don't include numbers or metrics. Quantify your achievements to show impact.", percentage.round()),
                Severity::High,
            ),
            Finding::PartlyUnquantified { percentage } => (
                "Some Bullet Points Need Quantification",
                format!("{}% of your bullet points could be improved with numbers or metrics.", percentage.round()),
                Severity::Medium,
            ),
            Finding::WeakVerbs { count } => (
                "Weak Action Verbs Detected",
                format!("{count} bullet points use weak verbs like \"created\", \"responsible for\", or \"worked on\". Replace with stronger action verbs for more impact."),
                Severity::Medium,
            ),
            Finding::VaguePhrases { count } => (
                "Vague Phrases Need Specificity",
                format!("{count} bullet points contain vague phrases. Replace with specific numbers, metrics, or concrete examples."),
                Severity::Medium,
            ),
            Finding::PoorBullets => (
                "Bullet Points Need Improvement",
                "Your bullet points could be more impactful. Focus on quantification, strong action verbs, and specific achievements.".to_string(),
                Severity::High,
            ),
            Finding::MediocreBullets => return None,
            Finding::WeakVerbAdvice { phrase } => (
                "Replace Weak Verbs with Stronger Alternatives",
                format!("Consider replacing weak verbs like \"{phrase}\" with more impactful alternatives. See detailed suggestions in the report."),
                Severity::Low,
            ),
        };

        Some(DetectedIssue {
            title: title.to_string(),
            description,
            severity,
        })
    }
}

/// Extra deduction for a score that is still at or above 95 after all findings,
/// unless bullets are ≥80% quantified, no weak phrase was found, and keywords
/// match at least 70% (or there were none to match).
pub fn perfect_score_adjustment(score: i32, features: &ScoreFeatures) -> i32 {
    if score < PERFECT_SCORE_FLOOR {
        return 0;
    }

    let report = features.bullets;
    let well_quantified = !report.bullets.is_empty()
        && report.quantified_count as f64 / report.bullets.len() as f64 >= 0.8;
    let no_weak_phrases = features.weak_phrases.is_empty();
    let strong_keywords = features.keyword_percentage() >= 70.0 || features.total_keywords() == 0;

    if well_quantified && no_weak_phrases && strong_keywords {
        0
    } else {
        PERFECT_SCORE_DEDUCTION
    }
}

/// Baseline minus every penalty and the perfect-score adjustment, clamped to 0–100.
pub fn compute_score(findings: &[Finding], features: &ScoreFeatures) -> i32 {
    let score = BASELINE_SCORE - findings.iter().map(Finding::penalty).sum::<i32>();
    let score = score - perfect_score_adjustment(score, features);
    score.clamp(0, 100)
}

/// User-facing issues, high severity first; discovery order within a severity.
pub fn ranked_issues(findings: &[Finding]) -> Vec<DetectedIssue> {
    let mut issues: Vec<DetectedIssue> = findings.iter().filter_map(Finding::issue).collect();
    issues.sort_by(|a, b| b.severity.rank().cmp(&a.severity.rank()));
    issues
}

/// How much of the resume an ATS could extract: 0 for image-only resumes,
/// otherwise 100 less layout and missing-section deductions, floored at 0.
pub fn ats_parse_rate(resume: &ParsedResume, sections: &SectionPresence) -> i32 {
    if resume.is_image_only {
        return 0;
    }
    let deductions = [
        (resume.has_tables, 20),
        (resume.has_columns, 15),
        (!sections.has_contact_info, 10),
        (!sections.has_experience, 15),
        (!sections.has_education, 10),
        (!sections.has_skills, 15),
    ];
    let rate = 100 - deductions
        .iter()
        .filter(|(applies, _)| *applies)
        .map(|(_, points)| points)
        .sum::<i32>();
    rate.max(0)
}
