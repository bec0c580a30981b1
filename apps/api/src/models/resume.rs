use serde::{Deserialize, Serialize};

/// Plain-text view of an uploaded resume plus the layout flags the parser could infer.
///
/// Produced once per request by `parsing`, consumed read-only by the analysis engine,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedResume {
    pub text: String,
    /// True when the extracted text is shorter than 100 characters.
    pub is_image_only: bool,
    pub has_tables: bool,
    pub has_columns: bool,
    /// From document metadata when available, otherwise words / 250.
    pub page_count: f64,
}

impl ParsedResume {
    /// Builds a resume from already-extracted text, deriving the image-only flag
    /// and a word-count page estimate. Layout flags default to false.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into().trim().to_string();
        Self {
            is_image_only: text.chars().count() < 100,
            has_tables: false,
            has_columns: false,
            page_count: estimate_page_count(&text),
            text,
        }
    }
}

/// ~250 words per page, never less than one page.
pub fn estimate_page_count(text: &str) -> f64 {
    let words = text.split_whitespace().count() as f64;
    (words / 250.0).round().max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_image_only() {
        let resume = ParsedResume::from_text("  John Doe  ");
        assert!(resume.is_image_only);
        assert_eq!(resume.text, "John Doe");
        assert_eq!(resume.page_count, 1.0);
    }

    #[test]
    fn test_page_estimate_rounds_word_count() {
        let text = "word ".repeat(640);
        assert_eq!(estimate_page_count(&text), 3.0);
        assert_eq!(estimate_page_count(""), 1.0);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(ParsedResume::from_text("x")).unwrap();
        assert!(json.get("isImageOnly").is_some());
        assert!(json.get("pageCount").is_some());
    }
}
