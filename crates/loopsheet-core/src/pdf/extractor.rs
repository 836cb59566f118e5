//! PDF text extraction using lopdf and pdf-extract.

use lopdf::{Document, Object};
use tracing::{debug, trace, warn};

use super::{is_pdf, PdfTextSource, PdfType, Result};
use crate::error::PdfError;

/// PDF text extractor using lopdf, with pdf-extract as a whole-document
/// fallback.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
    max_pages: usize,
}

/// Extracted content from a PDF.
#[derive(Debug, Clone)]
pub struct PdfContent {
    /// Type of PDF content.
    pub pdf_type: PdfType,
    /// All page text joined by newlines.
    pub text: String,
    /// Pages with their content.
    pub pages: Vec<PdfPage>,
}

/// Content from a single PDF page.
#[derive(Debug, Clone)]
pub struct PdfPage {
    /// Page number (1-indexed).
    pub number: u32,
    /// Extracted text from this page.
    pub text: String,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
            max_pages: 0,
        }
    }

    /// Limit how many pages are read (0 = unlimited).
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or(PdfError::Parse("No document loaded".to_string()))
    }

    fn pages_to_read(&self) -> u32 {
        let count = self.page_count();
        if self.max_pages == 0 {
            count
        } else {
            count.min(self.max_pages as u32)
        }
    }

    /// Extract text per page.
    pub fn extract_all(&self) -> Result<PdfContent> {
        let page_count = self.pages_to_read();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        let mut pages = Vec::with_capacity(page_count as usize);
        for number in 1..=page_count {
            let text = match self.extract_page_text(number) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Failed to extract text from page {}: {}", number, e);
                    String::new()
                }
            };
            pages.push(PdfPage { number, text });
        }

        let mut text = join_pages(&pages);
        if text.trim().is_empty() {
            debug!("lopdf found no text, retrying with pdf-extract");
            let fallback = pdf_extract::extract_text_from_mem_by_pages(&self.raw_data)
                .map_err(|e| PdfError::TextExtraction(e.to_string()))?;
            text = join_first(&fallback, page_count as usize);
        }

        let pdf_type = if !text.trim().is_empty() {
            PdfType::Text
        } else if self.has_images() {
            PdfType::Image
        } else {
            PdfType::Empty
        };

        debug!(
            "PDF analysis: {} pages, {} chars text -> {:?}",
            page_count,
            text.len(),
            pdf_type
        );

        Ok(PdfContent {
            pdf_type,
            text,
            pages,
        })
    }

    /// True if any object in the document is an image XObject.
    fn has_images(&self) -> bool {
        let Some(doc) = self.document.as_ref() else {
            return false;
        };

        doc.objects.values().any(|object| match object {
            Object::Stream(stream) => stream
                .dict
                .get(b"Subtype")
                .and_then(|o| o.as_name())
                .map(|name| name == b"Image")
                .unwrap_or(false),
            _ => false,
        })
    }
}

/// Each page's text followed by a newline.
fn join_pages(pages: &[PdfPage]) -> String {
    let mut text = String::new();
    for page in pages {
        text.push_str(&page.text);
        text.push('\n');
    }
    text
}

/// The first `limit` page texts, each followed by a newline.
fn join_first(pages: &[String], limit: usize) -> String {
    let mut text = String::new();
    for page in pages.iter().take(limit) {
        text.push_str(page);
        text.push('\n');
    }
    text
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfTextSource for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        if !is_pdf(data) {
            return Err(PdfError::NotPdf);
        }

        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // Save decrypted document to raw_data for pdf_extract
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_text(&self) -> Result<String> {
        self.extract_all().map(|content| content.text)
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        let doc = self.document()?;
        if page == 0 || page > self.page_count() {
            return Err(PdfError::InvalidPage(page));
        }

        let text = doc
            .extract_text(&[page])
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;
        trace!("Page {} yielded {} chars", page, text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DocumentRenderer, PdfRenderer, TextStyle};

    #[test]
    fn test_pdf_extractor_new() {
        let extractor = PdfExtractor::new();
        assert!(extractor.document.is_none());
        assert_eq!(extractor.page_count(), 0);
    }

    #[test]
    fn test_rejects_non_pdf() {
        let mut extractor = PdfExtractor::new();
        let err = extractor.load(b"Qty SKU Item\n2 619938 Air of the Wolf").unwrap_err();
        assert!(matches!(err, PdfError::NotPdf));
    }

    #[test]
    fn test_invalid_page() {
        let mut renderer = PdfRenderer::new();
        renderer.new_page();
        renderer.text(72.0, 72.0, "Pack 361", &TextStyle::body());
        let bytes = renderer.finish().unwrap();

        let mut extractor = PdfExtractor::new();
        extractor.load(&bytes).unwrap();
        assert!(matches!(extractor.extract_page_text(0), Err(PdfError::InvalidPage(0))));
        assert!(matches!(extractor.extract_page_text(2), Err(PdfError::InvalidPage(2))));
    }

    #[test]
    fn test_fallback_text_respects_page_limit() {
        let pages = vec![
            "Pack 361".to_string(),
            "2 619938 Air of the Wolf".to_string(),
            "1 660252 Bobcat".to_string(),
        ];
        assert_eq!(join_first(&pages, 1), "Pack 361\n");
        assert_eq!(join_first(&pages, 2), "Pack 361\n2 619938 Air of the Wolf\n");
        assert_eq!(join_first(&pages, 10).lines().count(), 3);
    }

    #[test]
    fn test_extracts_text_from_every_page() {
        let mut renderer = PdfRenderer::new();
        renderer.new_page();
        renderer.text(72.0, 72.0, "Cub Scout Pack 361", &TextStyle::body());
        renderer.new_page();
        renderer.text(72.0, 72.0, "2 619938 Air of the Wolf", &TextStyle::body());
        let bytes = renderer.finish().unwrap();

        let mut extractor = PdfExtractor::new();
        extractor.load(&bytes).unwrap();
        assert_eq!(extractor.page_count(), 2);

        let content = extractor.extract_all().unwrap();
        assert_eq!(content.pdf_type, PdfType::Text);
        assert_eq!(content.pages.len(), 2);
        assert!(content.text.contains("361"));
        assert!(content.text.contains("619938"));

        let mut limited = PdfExtractor::new().with_max_pages(1);
        limited.load(&bytes).unwrap();
        assert!(!limited.extract_text().unwrap().contains("619938"));
    }
}
