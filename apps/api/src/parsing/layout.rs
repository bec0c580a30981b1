//! Layout heuristics over extracted text. Extraction flattens the visual layout,
//! so tables and columns are inferred from what survives: box-drawing glyphs,
//! pipe runs and wide gaps between short cells.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::normalize::char_len;

const BOX_GLYPHS: &[char] = &['┌', '┐', '└', '┘', '├', '┤', '┬', '┴', '│', '─'];

static PIPE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\|\s*\|\s*\|").expect("pipe run pattern"));
static WIDE_GAP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{3,}").expect("wide gap pattern"));
static COLUMN_GAP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").expect("column gap pattern"));

/// Three or more pipes separated only by whitespace.
pub fn has_pipe_run(text: &str) -> bool {
    PIPE_RUN.is_match(text)
}

/// PDF text: box glyphs, a pipe run, or a line that splits into more than three
/// cells on 3+ spaces.
pub fn pdf_has_tables(text: &str) -> bool {
    text.contains(BOX_GLYPHS)
        || has_pipe_run(text)
        || text.split('\n').any(|line| WIDE_GAP.split(line).count() > 3)
}

/// A line splitting on 2+ whitespace into at least three cells, every cell
/// non-empty and shorter than 30 characters.
pub fn has_columns(text: &str) -> bool {
    text.split('\n').any(|line| {
        let cells: Vec<&str> = COLUMN_GAP.split(line).collect();
        cells.len() >= 3 && cells.iter().all(|c| !c.is_empty() && char_len(c) < 30)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_glyph_is_table() {
        assert!(pdf_has_tables("Skills\n│ Rust │ Go │"));
    }

    #[test]
    fn test_pipe_run_is_table() {
        assert!(pdf_has_tables("Skills | | | Rust"));
        assert!(!pdf_has_tables("| a | b |"));
        assert!(has_pipe_run("||  |"));
        assert!(!has_pipe_run("a | b"));
    }

    #[test]
    fn test_wide_gaps_need_four_cells() {
        assert!(pdf_has_tables("Name   Role   Team   Years"));
        assert!(!pdf_has_tables("Name   Role   Team"));
    }

    #[test]
    fn test_columns_detected_from_short_cells() {
        assert!(has_columns("Rust  Go  Python"));
        assert!(has_columns("intro line\nJan 2020  Acme  Engineer"));
    }

    #[test]
    fn test_columns_rejected_for_long_or_indented_cells() {
        assert!(!has_columns("Rust  Go"));
        assert!(!has_columns("  Rust  Go  Python"));
        assert!(!has_columns(
            "Rust  Go  a very long description that keeps going past thirty"
        ));
        assert!(!has_columns("Built the billing service in Rust."));
    }
}
