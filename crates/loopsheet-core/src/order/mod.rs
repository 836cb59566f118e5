//! Purchase-order extraction module.

mod aggregator;
mod parser;
pub mod rules;

pub use aggregator::{NameNormalization, OrderAggregator};
pub use parser::{ExtractionResult, PurchaseOrderParser};
pub use rules::{classify, Den, StrategyKind};

use crate::models::order::Order;

/// Trait for purchase-order extractors.
pub trait OrderExtractor {
    /// Extract an order from raw document text, using `fallback_pack_number`
    /// when the text names no pack. Best-effort: never fails.
    fn extract(&self, text: &str, fallback_pack_number: &str) -> Order;
}
