//! Purchase-order parser chaining the inline and line-by-line strategies.

use std::collections::HashSet;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::models::order::{LineItem, Order};

use super::aggregator::{NameNormalization, OrderAggregator};
use super::rules::{
    extract_pack_number, ExtractionMatch, InlineStrategy, LineByLineStrategy, LineItemStrategy,
    StrategyKind,
};
use super::OrderExtractor;

/// Result of order extraction.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Aggregated order.
    pub order: Order,
    /// Line items in the order they were found.
    pub line_items: Vec<LineItem>,
    /// Strategy that produced the line items, if any did.
    pub strategy: Option<StrategyKind>,
    /// Mean match confidence (0.0 when nothing matched).
    pub confidence: f32,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionResult {
    /// True if neither strategy found anything.
    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }
}

/// Parser for adventure-loop purchase orders.
///
/// Tries the inline strategy first and falls back to the line-by-line
/// strategy only when the first finds no line items.
pub struct PurchaseOrderParser {
    primary: InlineStrategy,
    fallback: LineByLineStrategy,
    aggregator: OrderAggregator,
}

impl PurchaseOrderParser {
    /// Create a parser with exact scout-name matching.
    pub fn new() -> Self {
        Self {
            primary: InlineStrategy::new(),
            fallback: LineByLineStrategy::new(),
            aggregator: OrderAggregator::new(),
        }
    }

    /// Set how scout names are matched when building the order.
    pub fn with_name_normalization(mut self, normalization: NameNormalization) -> Self {
        self.aggregator = self.aggregator.with_normalization(normalization);
        self
    }

    fn extract_line_items(&self, text: &str) -> (Option<StrategyKind>, Vec<ExtractionMatch<LineItem>>) {
        let strategies: [&dyn LineItemStrategy; 2] = [&self.primary, &self.fallback];

        for strategy in strategies {
            let matches = strategy.extract_all(text);
            debug!("{:?} strategy found {} line items", strategy.kind(), matches.len());
            if !matches.is_empty() {
                return (Some(strategy.kind()), matches);
            }
        }

        (None, Vec::new())
    }

    /// Parse order text into an order plus diagnostics. Never fails.
    pub fn parse(&self, text: &str, fallback_pack_number: &str) -> ExtractionResult {
        let start = Instant::now();
        let mut warnings = Vec::new();

        info!("Parsing purchase order from {} characters of text", text.len());

        let pack_number = match extract_pack_number(text) {
            Some(pack) => pack,
            None => {
                warnings.push(format!(
                    "No pack number found, using default {}",
                    fallback_pack_number
                ));
                fallback_pack_number.to_string()
            }
        };

        let (strategy, matches) = self.extract_line_items(text);

        match strategy {
            None => warnings.push("No line items found".to_string()),
            Some(StrategyKind::LineByLine) => {
                warnings.push("Inline pattern found nothing, used line-by-line fallback".to_string())
            }
            Some(StrategyKind::Inline) => {}
        }

        let confidence = if matches.is_empty() {
            0.0
        } else {
            matches.iter().map(|m| m.confidence).sum::<f32>() / matches.len() as f32
        };

        let line_items: Vec<LineItem> = matches.into_iter().map(|m| m.value).collect();

        let mut seen = HashSet::new();
        for item in &line_items {
            if item.scout_names.is_empty() {
                warnings.push(format!("No scout names for SKU {} ({})", item.sku, item.item_name));
            }
            if !seen.insert(item.sku.as_str()) {
                warnings.push(format!(
                    "SKU {} appears more than once; summary keeps the last occurrence",
                    item.sku
                ));
            }
        }

        let order = self.aggregator.aggregate(pack_number, &line_items);

        debug!(
            "Extracted {} line items, {} scouts for pack {} with confidence {:.2}",
            line_items.len(),
            order.scouts.len(),
            order.pack_number,
            confidence
        );

        ExtractionResult {
            order,
            line_items,
            strategy,
            confidence,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

impl Default for PurchaseOrderParser {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderExtractor for PurchaseOrderParser {
    fn extract(&self, text: &str, fallback_pack_number: &str) -> Order {
        self.parse(text, fallback_pack_number).order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::order::{AdventureRef, UNIT_PRICE};
    use pretty_assertions::assert_eq;

    const REFERENCE: &str = "2 619938 Air of the Wolf Adventure Blaine R, Charlie R $3.98";

    #[test]
    fn test_reference_order() {
        let result = PurchaseOrderParser::new().parse(REFERENCE, "361");

        assert_eq!(result.strategy, Some(StrategyKind::Inline));
        assert_eq!(
            result.line_items,
            vec![LineItem::new(
                2,
                "619938",
                "Air of the Wolf",
                vec!["Blaine R".to_string(), "Charlie R".to_string()],
            )]
        );

        let entry = &result.order.summary["619938"];
        assert_eq!(entry.name, "Air of the Wolf");
        assert_eq!(entry.qty, 2);
        assert_eq!(entry.scout_names, vec!["Blaine R".to_string(), "Charlie R".to_string()]);
        assert_eq!(entry.unit_price, UNIT_PRICE);

        for name in ["Blaine R", "Charlie R"] {
            let scout = result.order.scout(name).unwrap();
            assert_eq!(
                scout.adventures,
                vec![AdventureRef {
                    sku: "619938".to_string(),
                    name: "Air of the Wolf".to_string(),
                    qty: 1,
                }]
            );
        }
    }

    #[test]
    fn test_pack_number_detected_or_defaulted() {
        let parser = PurchaseOrderParser::new();

        let found = parser.parse(&format!("Cub Scout Pack 42 order\n{}", REFERENCE), "361");
        assert_eq!(found.order.pack_number, "42");

        let defaulted = parser.parse(REFERENCE, "361");
        assert_eq!(defaulted.order.pack_number, "361");
        assert!(defaulted.warnings.iter().any(|w| w.contains("default 361")));
    }

    #[test]
    fn test_fallback_strategy() {
        // A full last name breaks the inline scout grammar.
        let text = "Pack 361\n2 619938 Air of the Wolf Adventure $3.98\nBlaine Roberts, Charlie R\n";
        let result = PurchaseOrderParser::new().parse(text, "1");

        assert_eq!(result.strategy, Some(StrategyKind::LineByLine));
        assert_eq!(result.order.pack_number, "361");
        let names: Vec<&str> = result.order.scouts.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Blaine Roberts", "Charlie R"]);
        assert_eq!(result.order.summary["619938"].qty, 2);
    }

    #[test]
    fn test_fallback_not_used_when_inline_matches() {
        // The second item would only be found line by line.
        let text = "1 619938 Air of the Wolf Blaine R $1.99\n1 619939 Code of the Wolf $1.99\n";
        let result = PurchaseOrderParser::new().parse(text, "361");

        assert_eq!(result.strategy, Some(StrategyKind::Inline));
        assert_eq!(result.line_items.len(), 1);
    }

    #[test]
    fn test_nothing_found_is_not_an_error() {
        let result = PurchaseOrderParser::new().parse("Thank you for shopping", "361");

        assert!(result.is_empty());
        assert_eq!(result.strategy, None);
        assert_eq!(result.confidence, 0.0);
        assert!(result.order.scouts.is_empty());
        assert!(result.order.summary.is_empty());
        assert_eq!(result.order.pack_number, "361");
        assert!(result.warnings.iter().any(|w| w == "No line items found"));
    }

    #[test]
    fn test_extract_is_idempotent() {
        let text = format!("Pack 361 {} 1 660252 Bobcat (Bear) Ethan Y $1.99", REFERENCE);
        let parser = PurchaseOrderParser::new();
        assert_eq!(parser.extract(&text, "1"), parser.extract(&text, "1"));
    }

    #[test]
    fn test_duplicate_sku_is_flagged() {
        let text = "1 619938 Air of the Wolf Blaine R $1.99 2 619938 Air of the Wolf Charlie R $3.98";
        let result = PurchaseOrderParser::new().parse(text, "361");

        assert_eq!(result.line_items.len(), 2);
        assert_eq!(result.order.summary["619938"].qty, 2);
        assert!(result.warnings.iter().any(|w| w.contains("more than once")));
    }

    #[test]
    fn test_inline_items_are_well_formed() {
        let text = "Pack 361 2 619938 Air of the Wolf Adventure Blaine R, Charlie R $3.98 \
                    1 619914 Team Tiger Adventure Aarohi D $1.99 \
                    4 660252 Bobcat (Bear) Ethan Y, AJ R $7.96";
        let result = PurchaseOrderParser::new().parse(text, "1");

        assert_eq!(result.line_items.len(), 3);
        for item in &result.line_items {
            assert!(item.has_valid_sku());
            assert!(item.quantity > 0);
            assert!(!item.scout_names.is_empty());
        }
    }
}
