//! Pack number detection.

use super::patterns::PACK_NUMBER;
use super::{ExtractionMatch, FieldExtractor};

/// Finds "Pack <digits>" tokens.
pub struct PackNumberExtractor;

impl PackNumberExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PackNumberExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PackNumberExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        PACK_NUMBER
            .captures_iter(text)
            .filter_map(|caps| {
                let full = caps.get(0)?;
                Some(
                    ExtractionMatch::new(caps[1].to_string(), 0.9, full.as_str())
                        .with_position(full.start(), full.end()),
                )
            })
            .collect()
    }
}

/// First pack number in the text, if any.
pub fn extract_pack_number(text: &str) -> Option<String> {
    PackNumberExtractor::new().extract(text).map(|m| m.value)
}
