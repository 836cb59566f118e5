//! Rule-based extractors for adventure-loop purchase orders.

pub mod den;
pub mod inline;
pub mod line;
pub mod pack;
pub mod patterns;

pub use den::{classify, Den};
pub use inline::InlineStrategy;
pub use line::LineByLineStrategy;
pub use pack::{extract_pack_number, PackNumberExtractor};
pub use patterns::*;

use serde::{Deserialize, Serialize};

use crate::models::order::LineItem;

/// Trait for single-field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// Which line-item strategy produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Global scan for qty, SKU, name and scouts in one pattern.
    Inline,
    /// Per-line scan with scouts taken from the following line.
    LineByLine,
}

/// A way of finding line items in order text.
pub trait LineItemStrategy {
    fn kind(&self) -> StrategyKind;

    /// All line items in document order. Never fails; no match is empty.
    fn extract_all(&self, text: &str) -> Vec<ExtractionMatch<LineItem>>;
}

/// Extraction context with confidence scores.
#[derive(Debug, Clone)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Byte range in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// Clean an item name: drop everything from `$` onward, strip a trailing
/// "Adventure", trim.
pub fn clean_item_name(raw: &str) -> String {
    let name = match raw.find('$') {
        Some(idx) => &raw[..idx],
        None => raw,
    };
    ADVENTURE_SUFFIX.replace(name.trim(), "").trim().to_string()
}

/// Parse a quantity, rejecting zero and overflow.
pub(crate) fn parse_quantity(raw: &str) -> Option<u32> {
    raw.parse::<u32>().ok().filter(|&q| q > 0)
}

/// Split a comma-separated scout list, trimming and dropping empties.
pub fn split_scout_list(line: &str) -> Vec<String> {
    line.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_item_name() {
        assert_eq!(clean_item_name("Air of the Wolf Adventure"), "Air of the Wolf");
        assert_eq!(clean_item_name("Air of the Wolf Adventure $3.98"), "Air of the Wolf");
        assert_eq!(clean_item_name("  Bear Strong  "), "Bear Strong");
        assert_eq!(clean_item_name("Adventures in Coins"), "Adventures in Coins");
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("3"), Some(3));
        assert_eq!(parse_quantity("0"), None);
        assert_eq!(parse_quantity("99999999999"), None);
    }

    #[test]
    fn test_split_scout_list() {
        assert_eq!(
            split_scout_list(" Blaine R, Charlie R ,, "),
            vec!["Blaine R".to_string(), "Charlie R".to_string()]
        );
    }
}
