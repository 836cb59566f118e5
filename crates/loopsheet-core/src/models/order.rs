//! Purchase-order data models.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Price of a single adventure loop in USD.
pub const UNIT_PRICE: Decimal = Decimal::from_parts(199, 0, 0, false, 2);

/// One quantity + SKU + item name + scout names unit from order text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Number of loops purchased.
    pub quantity: u32,

    /// Six-digit retailer SKU, always starting with `6`.
    pub sku: String,

    /// Item name with the trailing "Adventure" suffix removed.
    pub item_name: String,

    /// Scouts this item was bought for. Empty means low-confidence extraction.
    #[serde(default)]
    pub scout_names: Vec<String>,
}

impl LineItem {
    pub fn new(
        quantity: u32,
        sku: impl Into<String>,
        item_name: impl Into<String>,
        scout_names: Vec<String>,
    ) -> Self {
        Self {
            quantity,
            sku: sku.into(),
            item_name: item_name.into(),
            scout_names,
        }
    }

    /// True if the SKU has the `6\d{5}` shape.
    pub fn has_valid_sku(&self) -> bool {
        self.sku.len() == 6
            && self.sku.starts_with('6')
            && self.sku.chars().all(|c| c.is_ascii_digit())
    }
}

/// A fully aggregated order for one pack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Pack number from the document, or the configured default.
    pub pack_number: String,

    /// Scouts in first-seen order, unique by name.
    pub scouts: Vec<Scout>,

    /// Per-SKU summary, ordered by SKU.
    pub summary: BTreeMap<String, SummaryEntry>,
}

impl Order {
    /// Create an empty order for a pack.
    pub fn new(pack_number: impl Into<String>) -> Self {
        Self {
            pack_number: pack_number.into(),
            scouts: Vec::new(),
            summary: BTreeMap::new(),
        }
    }

    /// True if nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.scouts.is_empty() && self.summary.is_empty()
    }

    /// Look up a scout by exact name.
    pub fn scout(&self, name: &str) -> Option<&Scout> {
        self.scouts.iter().find(|s| s.name == name)
    }

    /// Total number of loops requested across all SKUs.
    pub fn total_loops(&self) -> u32 {
        self.summary.values().map(|e| e.qty).sum()
    }

    /// Total cost of all loops at the fixed unit price.
    pub fn total_cost(&self) -> Decimal {
        self.summary.values().map(SummaryEntry::total).sum()
    }

    /// Number of scout-adventure pairings.
    pub fn adventure_count(&self) -> usize {
        self.scouts.iter().map(|s| s.adventures.len()).sum()
    }
}

/// A scout and the adventures they were credited with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scout {
    pub name: String,
    pub adventures: Vec<AdventureRef>,
}

impl Scout {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            adventures: Vec::new(),
        }
    }
}

/// Reference from a scout to a purchased adventure loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdventureRef {
    pub sku: String,
    pub name: String,
    /// Always 1 per mention, independent of the purchase quantity.
    pub qty: u32,
}

/// Summary row for one SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub name: String,
    pub qty: u32,
    pub scout_names: Vec<String>,
    pub unit_price: Decimal,
}

impl SummaryEntry {
    /// Line total: unit price times quantity.
    pub fn total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.qty)
    }
}
