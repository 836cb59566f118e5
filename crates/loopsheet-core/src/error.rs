//! Error types for the loopsheet-core library.
//!
//! Order extraction itself has no error type: it degrades to an empty
//! order. Only collaborator I/O (PDF loading, images, rendering) fails.

use thiserror::Error;

/// Main error type for the loopsheet library.
#[derive(Error, Debug)]
pub enum LoopsheetError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Document rendering error.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (config or manifest) error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to reading purchase-order PDFs.
#[derive(Error, Debug)]
pub enum PdfError {
    /// The input does not carry a PDF signature.
    #[error("input is not a PDF document")]
    NotPdf,

    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors related to laying out and writing output documents.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Label stock code not in the template table.
    #[error("unknown label template: {0}")]
    UnknownTemplate(String),

    /// An image could not be embedded.
    #[error("failed to embed image for SKU {sku}: {reason}")]
    Image { sku: String, reason: String },

    /// The PDF writer failed.
    #[error("failed to write PDF: {0}")]
    Pdf(String),
}

/// Result type for the loopsheet library.
pub type Result<T> = std::result::Result<T, LoopsheetError>;
