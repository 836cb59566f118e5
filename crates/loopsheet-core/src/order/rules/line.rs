//! Fallback strategy: walk lines, take scouts from the line after an item.

use super::patterns::{LINE_ITEM, SCOUT_NAME};
use super::{
    clean_item_name, parse_quantity, split_scout_list, ExtractionMatch, LineItemStrategy,
    StrategyKind,
};
use crate::models::order::LineItem;

/// Line-by-line scan used when the inline pattern finds nothing.
pub struct LineByLineStrategy;

impl LineByLineStrategy {
    pub fn new() -> Self {
        Self
    }

    /// Scout names from the line following an item, if it looks like a list.
    fn scouts_from(next: Option<&str>) -> Vec<String> {
        let Some(line) = next.map(str::trim) else {
            return Vec::new();
        };

        let looks_like_scouts = !line.is_empty()
            && !line.starts_with(|c: char| c.is_ascii_digit() || c == '$')
            && !line.contains("Adventure")
            && SCOUT_NAME.is_match(line);

        if looks_like_scouts {
            split_scout_list(line)
        } else {
            Vec::new()
        }
    }
}

impl Default for LineByLineStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl LineItemStrategy for LineByLineStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::LineByLine
    }

    fn extract_all(&self, text: &str) -> Vec<ExtractionMatch<LineItem>> {
        let lines: Vec<&str> = text.lines().collect();
        let mut results = Vec::new();

        for (i, line) in lines.iter().enumerate() {
            let Some(caps) = LINE_ITEM.captures(line) else {
                continue;
            };
            let Some(quantity) = parse_quantity(&caps[1]) else {
                continue;
            };

            let scout_names = Self::scouts_from(lines.get(i + 1).copied());
            let confidence = if scout_names.is_empty() { 0.4 } else { 0.7 };
            let item = LineItem::new(quantity, &caps[2], clean_item_name(&caps[3]), scout_names);

            results.push(ExtractionMatch::new(item, confidence, line.trim()));
        }

        results
    }
}
