//! Phrase rule tables: weak verbs, vague phrases, clichés and the verb lists used
//! by bullet detection. Rules are evaluated in table order, first match wins.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::analysis::WeakPhraseKind;

/// Alternation of month names, for date-ish line detection.
pub const MONTHS: &str =
    "january|february|march|april|may|june|july|august|september|october|november|december";

enum Matcher {
    /// Whole-word, case-insensitive; inner whitespace matches any run of whitespace.
    Word(Regex),
    /// Plain substring of the lower-cased text.
    Substring,
}

pub struct PhraseRule {
    pub phrase: &'static str,
    pub kind: WeakPhraseKind,
    /// Stronger replacements, most relevant first.
    pub alternatives: &'static [&'static str],
    /// What to replace the phrase with.
    pub advice: &'static str,
    /// Metric verbs ("increased", …) are only vague when no metric accompanies them.
    pub needs_metric: bool,
    matcher: Matcher,
}

impl PhraseRule {
    fn word(
        phrase: &'static str,
        kind: WeakPhraseKind,
        alternatives: &'static [&'static str],
        advice: &'static str,
        needs_metric: bool,
    ) -> Self {
        let body = phrase
            .split_whitespace()
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(r"\s+");
        let pattern = Regex::new(&format!(r"(?i)\b{body}\b")).expect("phrase rule pattern");
        Self {
            phrase,
            kind,
            alternatives,
            advice,
            needs_metric,
            matcher: Matcher::Word(pattern),
        }
    }

    fn substring(phrase: &'static str) -> Self {
        Self {
            phrase,
            kind: WeakPhraseKind::Cliche,
            alternatives: &[],
            advice: "Use specific examples and achievements instead",
            needs_metric: false,
            matcher: Matcher::Substring,
        }
    }

    /// `lower` must already be lower-cased.
    pub fn is_match(&self, lower: &str) -> bool {
        match &self.matcher {
            Matcher::Word(re) => re.is_match(lower),
            Matcher::Substring => lower.contains(self.phrase),
        }
    }

    /// Up to three alternatives, comma separated.
    pub fn top_alternatives(&self) -> String {
        self.alternatives
            .iter()
            .take(3)
            .copied()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// First rule in `rules` that matches `lower`. Rules flagged `needs_metric` are
/// skipped when the text is already quantified.
pub fn first_match<'a>(
    rules: &'a [PhraseRule],
    lower: &str,
    is_quantified: bool,
) -> Option<&'a PhraseRule> {
    rules
        .iter()
        .filter(|r| !(r.needs_metric && is_quantified))
        .find(|r| r.is_match(lower))
}

pub static WEAK_VERBS: Lazy<Vec<PhraseRule>> = Lazy::new(|| {
    use WeakPhraseKind::WeakVerb;
    vec![
        PhraseRule::word("created", WeakVerb, &["developed", "built", "established", "founded", "designed", "launched"], "", false),
        PhraseRule::word("responsible", WeakVerb, &["managed", "led", "oversaw", "directed", "coordinated"], "", false),
        PhraseRule::word("worked", WeakVerb, &["collaborated", "partnered", "contributed", "delivered", "executed"], "", false),
        PhraseRule::word("helped", WeakVerb, &["supported", "enabled", "facilitated", "drove", "achieved"], "", false),
        PhraseRule::word("did", WeakVerb, &["executed", "performed", "delivered", "accomplished", "completed"], "", false),
        PhraseRule::word("made", WeakVerb, &["produced", "generated", "created", "delivered", "achieved"], "", false),
        PhraseRule::word("got", WeakVerb, &["earned", "achieved", "secured", "obtained", "attained"], "", false),
        PhraseRule::word("used", WeakVerb, &["leveraged", "utilized", "implemented", "applied", "employed"], "", false),
        PhraseRule::word("tried", WeakVerb, &["attempted", "pursued", "sought", "aimed"], "", false),
        PhraseRule::word("wanted", WeakVerb, &["targeted", "aimed", "sought", "pursued"], "", false),
    ]
});

pub static VAGUE_PHRASES: Lazy<Vec<PhraseRule>> = Lazy::new(|| {
    use WeakPhraseKind::VaguePhrase;
    let rule = |phrase, advice, needs_metric| {
        PhraseRule::word(phrase, VaguePhrase, &[], advice, needs_metric)
    };
    vec![
        rule("a lot", "specific number or percentage", false),
        rule("many", "specific number", false),
        rule("several", "specific number", false),
        rule("various", "specific examples", false),
        rule("some", "specific number", false),
        rule("few", "specific number", false),
        rule("significant", "specific metric or percentage", false),
        rule("substantial", "specific metric or percentage", false),
        rule("large", "specific number or size", false),
        rule("small", "specific number or size", false),
        rule("improved", "improved by X% or to X", true),
        rule("increased", "increased by X% or to X", true),
        rule("decreased", "decreased by X% or to X", true),
        rule("reduced", "reduced by X% or to X", true),
        rule("responsible for", "specific action verb + metric", false),
        rule("worked on", "specific action verb + outcome", false),
        rule("helped with", "specific action verb + impact", false),
        rule("involved in", "specific action verb + result", false),
        rule("participated in", "specific action verb + achievement", false),
    ]
});

pub static CLICHES: Lazy<Vec<PhraseRule>> = Lazy::new(|| {
    [
        "think outside the box",
        "team player",
        "hard worker",
        "detail-oriented",
        "self-motivated",
        "results-driven",
        "proven track record",
        "go-getter",
        "people person",
        "fast learner",
    ]
    .into_iter()
    .map(PhraseRule::substring)
    .collect()
});

const STRONG_VERBS: &[&str] = &[
    "achieved", "delivered", "executed", "implemented", "launched", "optimized",
    "transformed", "drove", "generated", "increased", "improved", "reduced",
    "streamlined", "enhanced", "established", "built", "developed", "managed",
    "led", "directed", "oversaw", "coordinated", "facilitated", "enabled",
];

/// Any strong action verb as a whole word.
pub static STRONG_VERB: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b({})\b", STRONG_VERBS.join("|"))).expect("strong verb pattern")
});

const ACTION_VERBS: &[&str] = &[
    "created", "developed", "managed", "led", "improved", "increased", "achieved", "delivered",
    "executed", "implemented", "launched", "responsible", "worked", "helped", "involved",
    "participated", "designed", "built", "established", "coordinated", "facilitated", "enabled",
    "supported", "contributed", "performed", "completed", "accomplished", "generated",
    "produced", "optimized", "streamlined", "enhanced", "transformed", "drove", "saved",
    "reduced", "decreased", "grew", "secured", "obtained", "attained", "earned", "leveraged",
    "utilized", "applied", "employed", "attempted", "pursued", "sought", "aimed", "targeted",
    "maintained", "supervised", "organized", "planned", "initiated", "collaborated",
    "researched", "analyzed", "evaluated", "monitored", "trained", "mentored", "coached",
    "guided", "assisted", "prepared", "presented", "communicated", "negotiated", "resolved",
    "solved", "automated", "integrated", "configured", "deployed", "tested", "debugged",
    "documented", "wrote", "authored", "edited", "reviewed", "updated", "operated",
    "administered",
];

/// A line opening with a known action verb (prefix match, weak or strong).
pub static ACTION_VERB_OPENING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)^({})", ACTION_VERBS.join("|"))).expect("action verb pattern")
});

/// Synonyms offered for words the repetition detector flags.
pub const SYNONYMS: &[(&str, &[&str])] = &[
    ("developed", &["enhanced", "expanded", "improved", "created", "built"]),
    ("awarded", &["granted", "recognized", "bestowed", "honored", "presented"]),
    ("led", &["managed", "directed", "headed", "oversaw", "guided"]),
    ("created", &["developed", "built", "established", "founded", "designed"]),
    ("managed", &["led", "directed", "oversaw", "coordinated", "supervised"]),
    ("improved", &["enhanced", "optimized", "refined", "upgraded", "strengthened"]),
    ("implemented", &["executed", "deployed", "established", "introduced", "launched"]),
    ("responsible", &["accountable", "tasked", "charged", "entrusted"]),
];

pub fn synonyms_for(word: &str) -> Vec<String> {
    SYNONYMS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, syn)| syn.iter().map(|s| s.to_string()).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weak_verb_requires_whole_word() {
        assert!(first_match(&WEAK_VERBS, "i used python", false).is_some());
        assert!(first_match(&WEAK_VERBS, "i am using python", false).is_none());
        assert!(first_match(&WEAK_VERBS, "recreated the pipeline", false).is_none());
    }

    #[test]
    fn test_first_match_follows_table_order() {
        let rule = first_match(&WEAK_VERBS, "used tools and created reports", false).unwrap();
        assert_eq!(rule.phrase, "created");
    }

    #[test]
    fn test_multi_word_phrase_tolerates_whitespace_runs() {
        let rule = first_match(&VAGUE_PHRASES, "worked   on the api", false).unwrap();
        assert_eq!(rule.phrase, "worked on");
    }

    #[test]
    fn test_metric_verb_not_vague_when_quantified() {
        assert_eq!(
            first_match(&VAGUE_PHRASES, "increased signups", false).map(|r| r.phrase),
            Some("increased")
        );
        assert!(first_match(&VAGUE_PHRASES, "increased signups by 35%", true).is_none());
    }

    #[test]
    fn test_plain_vague_word_still_matches_when_quantified() {
        let rule = first_match(&VAGUE_PHRASES, "shipped many features to 40 users", true);
        assert_eq!(rule.map(|r| r.phrase), Some("many"));
    }

    #[test]
    fn test_cliche_is_substring_match() {
        let rule = first_match(&CLICHES, "a detail-oriented team player", false).unwrap();
        assert_eq!(rule.phrase, "team player");
        assert_eq!(rule.kind, WeakPhraseKind::Cliche);
    }

    #[test]
    fn test_top_alternatives_caps_at_three() {
        assert_eq!(WEAK_VERBS[0].top_alternatives(), "developed, built, established");
    }

    #[test]
    fn test_action_verb_opening_is_prefix_match() {
        assert!(ACTION_VERB_OPENING.is_match("Deployed services to prod"));
        assert!(!ACTION_VERB_OPENING.is_match("The team deployed services"));
    }

    #[test]
    fn test_synonyms_for_unknown_word_is_empty() {
        assert_eq!(synonyms_for("managed").len(), 5);
        assert!(synonyms_for("python").is_empty());
    }
}
