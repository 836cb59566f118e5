//! PDF text input module.

mod extractor;

pub use extractor::{PdfContent, PdfExtractor, PdfPage};

use crate::error::PdfError;

/// Type of PDF content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfType {
    /// Contains extractable text.
    Text,
    /// Only images (scanned document), nothing to parse.
    Image,
    /// Empty or unreadable.
    Empty,
}

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// PDF signature every document starts with.
pub const PDF_SIGNATURE: &[u8] = b"%PDF-";

/// True if `data` starts with the PDF signature (leading whitespace allowed).
pub fn is_pdf(data: &[u8]) -> bool {
    let start = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(data.len());
    data[start..].starts_with(PDF_SIGNATURE)
}

/// Source of raw page text for order extraction.
pub trait PdfTextSource {
    /// Load a PDF from bytes. Non-PDF input is rejected before parsing.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Text of all pages joined by newlines.
    fn extract_text(&self) -> Result<String>;

    /// Text of a single page (1-indexed).
    fn extract_page_text(&self, page: u32) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pdf() {
        assert!(is_pdf(b"%PDF-1.7\n..."));
        assert!(is_pdf(b"\r\n%PDF-1.4"));
        assert!(!is_pdf(b"PK\x03\x04"));
        assert!(!is_pdf(b""));
    }
}
