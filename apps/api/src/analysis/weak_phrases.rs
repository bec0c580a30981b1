//! Weak-Phrase Scanner: sentence-level sweep for weak verbs, vague phrases and
//! clichés, independent of bullet detection.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::rules::{first_match, PhraseRule, CLICHES, VAGUE_PHRASES, WEAK_VERBS};
use crate::models::analysis::{WeakPhrase, WeakPhraseKind};

pub const MAX_WEAK_PHRASES: usize = 10;

static SENTENCE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]\s+").expect("sentence break pattern"));

/// Each sentence contributes at most one finding per category. Metric verbs
/// are reported even beside a number. Results keep sentence order and are capped at [`MAX_WEAK_PHRASES`].
pub fn find_weak_phrases(text: &str) -> Vec<WeakPhrase> {
    let mut found = Vec::new();

    for sentence in SENTENCE_BREAK.split(text) {
        let example = sentence.trim();
        let lower = example.to_lowercase();

        for rules in [&*WEAK_VERBS, &*VAGUE_PHRASES, &*CLICHES] {
            if let Some(rule) = first_match(rules, &lower, false) {
                found.push(WeakPhrase {
                    phrase: rule.phrase.to_string(),
                    kind: rule.kind,
                    suggestion: suggestion_for(rule),
                    example: example.to_string(),
                });
            }
        }
    }

    found.truncate(MAX_WEAK_PHRASES);
    found
}

fn suggestion_for(rule: &PhraseRule) -> String {
    match rule.kind {
        WeakPhraseKind::WeakVerb => format!("Use stronger verbs like: {}", rule.top_alternatives()),
        WeakPhraseKind::VaguePhrase => format!("Replace with {}", rule.advice),
        WeakPhraseKind::Cliche | WeakPhraseKind::PassiveVoice => rule.advice.to_string(),
    }
}
