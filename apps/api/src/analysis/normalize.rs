//! Text normalization shared by every analysis pass.

/// Lower-cased, trimmed copy of the resume text used for pattern matching.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Replaces everything except ASCII word characters and whitespace with a space.
pub fn strip_punctuation(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect()
}

/// Punctuation-free tokens in their original case, in text order.
pub fn tokens(text: &str) -> Vec<String> {
    strip_punctuation(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Length in characters, which is what every length threshold is measured in.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Trimmed, non-empty lines.
pub fn non_empty_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(str::trim).filter(|l| !l.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases_and_trims() {
        assert_eq!(normalize("  Senior ENGINEER \n"), "senior engineer");
    }

    #[test]
    fn test_strip_punctuation_keeps_word_chars() {
        assert_eq!(strip_punctuation("ci/cd, node.js_v2!"), "ci cd  node js_v2 ");
    }

    #[test]
    fn test_tokens_split_on_punctuation() {
        assert_eq!(tokens("Led (5) teams; shipped!"), ["Led", "5", "teams", "shipped"]);
    }

    #[test]
    fn test_char_len_counts_glyphs_not_bytes() {
        assert_eq!(char_len("•abc"), 4);
    }

    #[test]
    fn test_non_empty_lines_skips_blank() {
        let lines: Vec<&str> = non_empty_lines("a\n\n   \n b \n").collect();
        assert_eq!(lines, ["a", "b"]);
    }
}
