//! Loop images keyed by SKU.

mod store;

pub use store::{ImageManifest, ImageStore, LoopImage, ManifestEntry};
