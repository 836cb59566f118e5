//! Core library for turning Cub Scout adventure-loop purchase orders into
//! shopping guides and label sheets.
//!
//! This crate provides:
//! - PDF text input (lopdf with a pdf-extract fallback)
//! - Line-item extraction from order text with a primary and a fallback strategy
//! - Aggregation into per-scout and per-SKU views, plus den classification
//! - Loop image lookup by SKU
//! - Shopping guide and label sheet layouts rendered to PDF

pub mod error;
pub mod images;
pub mod models;
pub mod order;
pub mod pdf;
pub mod render;

pub use error::{LoopsheetError, PdfError, RenderError, Result};
pub use images::{ImageStore, LoopImage};
pub use models::config::LoopsheetConfig;
pub use models::order::{AdventureRef, LineItem, Order, Scout, SummaryEntry, UNIT_PRICE};
pub use order::{
    classify, Den, ExtractionResult, NameNormalization, OrderExtractor, PurchaseOrderParser,
    StrategyKind,
};
pub use pdf::{PdfContent, PdfExtractor, PdfTextSource, PdfType};
pub use render::{
    DocumentRenderer, GuideLayout, LabelMode, LabelSheet, LabelTemplate, PdfRenderer,
    ShoppingGuide,
};
