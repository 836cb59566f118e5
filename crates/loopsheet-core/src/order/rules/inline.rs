//! Primary strategy: one global scan for complete line items.
//!
//! Matches `<qty> <sku> <item name> [Adventure] <Scout A>, <Scout B> ...`
//! anywhere in the text, so it still works when the PDF text layer lost its
//! line breaks.

use tracing::trace;

use super::patterns::{INLINE_ITEM, SCOUT_NAME};
use super::{clean_item_name, parse_quantity, ExtractionMatch, LineItemStrategy, StrategyKind};
use crate::models::order::LineItem;

/// Global regex scan over the whole document.
pub struct InlineStrategy;

impl InlineStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for InlineStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl LineItemStrategy for InlineStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Inline
    }

    fn extract_all(&self, text: &str) -> Vec<ExtractionMatch<LineItem>> {
        let mut results = Vec::new();

        for caps in INLINE_ITEM.captures_iter(text) {
            let Some(full_match) = caps.get(0) else {
                continue;
            };
            let Some(quantity) = parse_quantity(&caps[1]) else {
                trace!("Skipping inline match with quantity {:?}", &caps[1]);
                continue;
            };

            let scout_names: Vec<String> = SCOUT_NAME
                .find_iter(&caps[4])
                .map(|m| m.as_str().trim().to_string())
                .collect();

            let item = LineItem::new(quantity, &caps[2], clean_item_name(&caps[3]), scout_names);
            results.push(
                ExtractionMatch::new(item, 0.9, full_match.as_str())
                    .with_position(full_match.start(), full_match.end()),
            );
        }

        results
    }
}
