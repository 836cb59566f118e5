//! Builds the per-scout and per-SKU views of an order from line items.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::models::order::{AdventureRef, LineItem, Order, Scout, SummaryEntry, UNIT_PRICE};

/// How scout names are compared when deciding whether two mentions are the
/// same scout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameNormalization {
    /// Exact string match, case-sensitive.
    #[default]
    Exact,
    /// Runs of whitespace are treated as one space.
    CollapseWhitespace,
    /// Whitespace collapsed and ASCII case ignored.
    CaseInsensitive,
}

impl NameNormalization {
    /// Comparison key for a name.
    pub fn key(&self, name: &str) -> String {
        match self {
            NameNormalization::Exact => name.to_string(),
            NameNormalization::CollapseWhitespace => collapse_whitespace(name),
            NameNormalization::CaseInsensitive => collapse_whitespace(name).to_ascii_lowercase(),
        }
    }
}

fn collapse_whitespace(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Folds line items into an [`Order`].
#[derive(Debug, Clone, Default)]
pub struct OrderAggregator {
    normalization: NameNormalization,
}

impl OrderAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how scout names are matched.
    pub fn with_normalization(mut self, normalization: NameNormalization) -> Self {
        self.normalization = normalization;
        self
    }

    /// Build an order. Summary entries are last-write-wins per SKU; each scout
    /// mention adds one adventure credit regardless of quantity.
    pub fn aggregate(&self, pack_number: impl Into<String>, items: &[LineItem]) -> Order {
        let mut order = Order::new(pack_number);
        // Parallel to order.scouts
        let mut keys: Vec<String> = Vec::new();

        for item in items {
            order.summary.insert(
                item.sku.clone(),
                SummaryEntry {
                    name: item.item_name.clone(),
                    qty: item.quantity,
                    scout_names: item.scout_names.clone(),
                    unit_price: UNIT_PRICE,
                },
            );

            for name in &item.scout_names {
                let key = self.normalization.key(name);
                let idx = match keys.iter().position(|k| *k == key) {
                    Some(idx) => idx,
                    None => {
                        trace!("New scout {:?}", name);
                        keys.push(key);
                        order.scouts.push(Scout::new(name.clone()));
                        order.scouts.len() - 1
                    }
                };

                order.scouts[idx].adventures.push(AdventureRef {
                    sku: item.sku.clone(),
                    name: item.item_name.clone(),
                    qty: 1,
                });
            }
        }

        order
    }
}
