//! In-memory image store loaded from a manifest or `{sku}.{ext}` files.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use image::ImageFormat;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{LoopsheetError, Result};
use crate::models::config::ImageConfig;

/// Manifest entry key that only documents the format.
const EXAMPLE_KEY: &str = "example";

/// Image bytes for one loop.
#[derive(Debug, Clone)]
pub struct LoopImage {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
}

/// `image-manifest.json` layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageManifest {
    #[serde(default)]
    pub images: BTreeMap<String, ManifestEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub sku: String,
    pub filename: String,
}

/// SKU to image map. Missing images are simply absent.
#[derive(Debug, Clone, Default)]
pub struct ImageStore {
    images: HashMap<String, LoopImage>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an image. Bytes must be in a format the `image` crate
    /// recognizes.
    pub fn insert(&mut self, sku: impl Into<String>, bytes: Vec<u8>) -> Result<()> {
        let format = image::guess_format(&bytes)?;
        self.images.insert(sku.into(), LoopImage { bytes, format });
        Ok(())
    }

    pub fn get(&self, sku: &str) -> Option<&LoopImage> {
        self.images.get(sku)
    }

    pub fn contains(&self, sku: &str) -> bool {
        self.images.contains_key(sku)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Load images for `skus` from `config.dir`.
    ///
    /// The manifest is read first when present; SKUs it does not cover are
    /// looked up as `{sku}.{ext}` over `config.extensions`. Files that
    /// cannot be read or decoded are logged and skipped.
    pub fn load_dir<'a>(skus: impl IntoIterator<Item = &'a str>, config: &ImageConfig) -> Self {
        let mut store = Self::new();
        let dir = config.dir.as_path();

        if !dir.is_dir() {
            debug!("Image directory {} not found, continuing without images", dir.display());
            return store;
        }

        let manifest_path = dir.join(&config.manifest);
        if manifest_path.is_file() {
            match store.load_manifest(dir, &manifest_path) {
                Ok(count) => info!("Loaded {} images from {}", count, manifest_path.display()),
                Err(e) => warn!("Failed to read image manifest {}: {}", manifest_path.display(), e),
            }
        }

        for sku in skus {
            if !store.contains(sku) {
                store.load_by_convention(dir, sku, &config.extensions);
            }
        }

        debug!("Image store holds {} images", store.len());
        store
    }

    fn load_manifest(&mut self, dir: &Path, manifest_path: &Path) -> Result<usize> {
        let manifest: ImageManifest = serde_json::from_slice(&fs::read(manifest_path)?)?;
        let mut loaded = 0;

        for (key, entry) in &manifest.images {
            if key == EXAMPLE_KEY {
                continue;
            }

            let path = dir.join(&entry.filename);
            match fs::read(&path).map_err(LoopsheetError::from).and_then(|bytes| self.insert(&entry.sku, bytes)) {
                Ok(()) => loaded += 1,
                Err(e) => warn!("Failed to load image for SKU {}: {}", entry.sku, e),
            }
        }

        Ok(loaded)
    }

    fn load_by_convention(&mut self, dir: &Path, sku: &str, extensions: &[String]) -> bool {
        for ext in extensions {
            let path = dir.join(format!("{}.{}", sku, ext));
            if !path.is_file() {
                continue;
            }

            match fs::read(&path).map_err(LoopsheetError::from).and_then(|bytes| self.insert(sku, bytes)) {
                Ok(()) => {
                    debug!("Loaded image {}", path.display());
                    return true;
                }
                Err(e) => warn!("Failed to load image {}: {}", path.display(), e),
            }
        }

        false
    }
}
