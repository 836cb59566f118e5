//! Configuration structures for the loopsheet pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::order::NameNormalization;
use crate::render::{GuideLayout, LabelMode};

/// Main configuration for the loopsheet pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopsheetConfig {
    /// Pack settings.
    pub pack: PackConfig,

    /// PDF input configuration.
    pub pdf: PdfConfig,

    /// Order extraction configuration.
    pub extraction: ExtractionConfig,

    /// Loop image lookup.
    pub images: ImageConfig,

    /// Label sheet output.
    pub labels: LabelConfig,

    /// Shopping guide output.
    pub guide: GuideConfig,
}

/// Pack settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackConfig {
    /// Pack number used when the document does not name one.
    pub default_number: String,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            default_number: "361".to_string(),
        }
    }
}

/// PDF input configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to read (0 = unlimited).
    pub max_pages: usize,

    /// Minimum text length before a PDF is treated as having no text layer.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 0,
            min_text_length: 10,
        }
    }
}

/// Order extraction configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// How scout names are compared when merging line items.
    pub scout_names: NameNormalization,
}

/// Loop image lookup configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Directory holding loop images.
    pub dir: PathBuf,

    /// Manifest file name inside `dir`.
    pub manifest: String,

    /// Extensions tried for `{sku}.{ext}` lookups, in order.
    pub extensions: Vec<String>,

    /// Longest side of embedded thumbnails, in pixels.
    pub thumbnail_size: u32,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("images/belt-loops"),
            manifest: "image-manifest.json".to_string(),
            extensions: ["png", "jpg", "jpeg", "gif", "webp"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            thumbnail_size: 160,
        }
    }
}

/// Label sheet configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Label stock code (e.g. "5160").
    pub template: String,

    /// One label per scout-adventure pairing or one per scout.
    pub mode: LabelMode,

    /// Draw the loop image on each label when available.
    pub include_images: bool,

    /// Draw a light border around each label.
    pub draw_borders: bool,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            template: "5160".to_string(),
            mode: LabelMode::PerAdventure,
            include_images: true,
            draw_borders: true,
        }
    }
}

/// Shopping guide configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideConfig {
    /// Group rows by den or print one flat table.
    pub layout: GuideLayout,

    /// Show unit and line prices.
    pub show_prices: bool,

    /// Draw loop thumbnails next to each row.
    pub include_images: bool,
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            layout: GuideLayout::ByDen,
            show_prices: true,
            include_images: true,
        }
    }
}

impl LoopsheetConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
