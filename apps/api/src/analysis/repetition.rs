//! Repetition Detector: flags long words the resume leans on too often.

use std::collections::HashMap;

use crate::analysis::normalize::{char_len, strip_punctuation};
use crate::analysis::rules::synonyms_for;
use crate::models::analysis::WordRepetition;

const MIN_WORD_LEN: usize = 5;
const MIN_REPEATS: usize = 3;
const TOP_N: usize = 5;

/// Words longer than four characters seen three or more times, most repeated
/// first (first appearance breaks ties), top five only.
pub fn find_repetitions(text: &str) -> Vec<WordRepetition> {
    let lower = strip_punctuation(&text.to_lowercase());

    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for word in lower.split_whitespace().filter(|w| char_len(w) >= MIN_WORD_LEN) {
        match index.get(word) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(word, counts.len());
                counts.push((word, 1));
            }
        }
    }

    let mut repeated: Vec<WordRepetition> = counts
        .into_iter()
        .filter(|(_, count)| *count >= MIN_REPEATS)
        .map(|(word, count)| WordRepetition {
            word: word.to_string(),
            count,
            suggestions: synonyms_for(word),
        })
        .collect();
    repeated.sort_by(|a, b| b.count.cmp(&a.count));
    repeated.truncate(TOP_N);
    repeated
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepetitionTier {
    High,
    Moderate,
}

/// Tier from the summed counts of the reported repetitions: 15+ high, 10+ moderate.
pub fn repetition_tier(repetitions: &[WordRepetition]) -> Option<RepetitionTier> {
    let total: usize = repetitions.iter().map(|r| r.count).sum();
    if total >= 15 {
        Some(RepetitionTier::High)
    } else if total >= 10 {
        Some(RepetitionTier::Moderate)
    } else {
        None
    }
}
