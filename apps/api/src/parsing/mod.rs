//! Document parsing: turns an uploaded PDF or DOCX into a [`ParsedResume`].
//!
//! Both parsers are synchronous and CPU-bound; callers on the async runtime run
//! them on the blocking pool.

pub mod layout;

use std::io::{Cursor, Read};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use thiserror::Error;
use tracing::debug;

use crate::models::resume::ParsedResume;
use crate::parsing::layout::{has_columns, has_pipe_run, pdf_has_tables};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const DOCX_BODY: &str = "word/document.xml";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("DOCX read error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Maps a declared media type (parameters ignored) to a supported kind.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            PDF_CONTENT_TYPE => Some(Self::Pdf),
            DOCX_CONTENT_TYPE => Some(Self::Docx),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }
}

pub fn parse_document(kind: DocumentKind, bytes: &[u8]) -> Result<ParsedResume, ParseError> {
    match kind {
        DocumentKind::Pdf => parse_pdf(bytes),
        DocumentKind::Docx => parse_docx(bytes),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// PDF
// ────────────────────────────────────────────────────────────────────────────

/// Extracts PDF text. The page count comes from the page tree when it can be
/// read, otherwise it is estimated from the word count.
pub fn parse_pdf(bytes: &[u8]) -> Result<ParsedResume, ParseError> {
    // pdf-extract panics on some malformed inputs
    let (text, pages) = std::panic::catch_unwind(|| {
        let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| ParseError::Pdf(e.to_string()))?;
        let pages = pdf_extract::Document::load_mem(bytes)
            .map(|doc| doc.get_pages().len())
            .unwrap_or(0);
        Ok::<_, ParseError>((text, pages))
    })
    .map_err(|_| ParseError::Pdf("extractor panicked".to_string()))??;

    let mut resume = ParsedResume::from_text(text);
    resume.has_tables = pdf_has_tables(&resume.text);
    resume.has_columns = has_columns(&resume.text);
    if pages > 0 {
        resume.page_count = pages as f64;
    }

    debug!(chars = resume.text.len(), pages = resume.page_count, "pdf parsed");
    Ok(resume)
}

// ────────────────────────────────────────────────────────────────────────────
// DOCX
// ────────────────────────────────────────────────────────────────────────────

static TAB_STOPS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<w:tabs>.*?</w:tabs>").expect("tab stops pattern"));
static PARAGRAPH_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"</w:p>").expect("paragraph pattern"));
static LINE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<w:(?:br|cr)\b[^>]*/>").expect("line break pattern"));
static TAB: Lazy<Regex> = Lazy::new(|| Regex::new(r"<w:tab\b[^>]*/>").expect("tab pattern"));
static TABLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<w:tbl[\s>]").expect("table pattern"));
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag pattern"));
static NUMERIC_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&#(x[0-9a-fA-F]+|\d+);").expect("numeric entity pattern"));

/// Reads `word/document.xml` from the OOXML archive and flattens it to text:
/// paragraphs and breaks become newlines, tabs stay tabs.
pub fn parse_docx(bytes: &[u8]) -> Result<ParsedResume, ParseError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive.by_name(DOCX_BODY)?.read_to_string(&mut xml)?;

    let text = docx_xml_to_text(&xml);
    let mut resume = ParsedResume::from_text(text);
    resume.has_tables = TABLE.is_match(&xml) || has_pipe_run(&resume.text);
    resume.has_columns = has_columns(&resume.text);

    debug!(chars = resume.text.len(), pages = resume.page_count, "docx parsed");
    Ok(resume)
}

fn docx_xml_to_text(xml: &str) -> String {
    let xml = TAB_STOPS.replace_all(xml, "");
    let xml = PARAGRAPH_END.replace_all(&xml, "\n");
    let xml = LINE_BREAK.replace_all(&xml, "\n");
    let xml = TAB.replace_all(&xml, "\t");
    let text = TAG.replace_all(&xml, "");
    decode_entities(&text)
}

fn decode_entities(text: &str) -> String {
    let text = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'");
    let text = NUMERIC_ENTITY.replace_all(&text, |caps: &Captures| {
        let code = &caps[1];
        let value = match code.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse::<u32>().ok(),
        };
        value
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });
    text.replace("&amp;", "&")
}

/// Minimal DOCX archive around a `<w:body>` fragment.
#[cfg(test)]
pub(crate) fn docx_with(body: &str) -> Vec<u8> {
    use std::io::Write;

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        zip::write::SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    writer.start_file(DOCX_BODY, options).unwrap();
    writer
        .write_all(
            format!(
                r#"<?xml version="1.0"?><w:document xmlns:w="urn:w"><w:body>{body}</w:body></w:document>"#
            )
            .as_bytes(),
        )
        .unwrap();
    writer.finish().unwrap().into_inner()
}
