//! Common regex patterns for purchase-order extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // "Pack 361", any case. The digits must sit on the same line.
    pub static ref PACK_NUMBER: Regex = Regex::new(
        r"(?i)\bPack[ \t]+(\d+)"
    ).unwrap();

    // One scout name: a capitalized word, a space, then a last initial.
    // The trailing \b keeps "Wolf Adventure" from reading as "Wolf A".
    pub static ref SCOUT_NAME: Regex = Regex::new(
        r"[A-Z][A-Za-z'\-]*\s[A-Z]\b"
    ).unwrap();

    // Whole line item on one stretch of text:
    // qty, SKU, item name (lazy), then a run of scout names.
    pub static ref INLINE_ITEM: Regex = Regex::new(
        r"\b(\d+)\s+(6\d{5})\b\s+(.+?)\s+((?:[A-Z][A-Za-z'\-]*\s[A-Z]\b,?\s*)+)"
    ).unwrap();

    // qty, SKU and the rest of the line as the item name.
    pub static ref LINE_ITEM: Regex = Regex::new(
        r"\b(\d+)\s+(6\d{5})\b\s+(.+)"
    ).unwrap();

    // Trailing "Adventure" word on an item name.
    pub static ref ADVENTURE_SUFFIX: Regex = Regex::new(
        r"\s*\bAdventure\s*$"
    ).unwrap();
}
