//! Deterministic synthetic item generator.
//!
//! Produces fixed-size batches from a small catalog of base image sizes. Each
//! item's height is nudged by a bounded offset derived from `(page, index)` so
//! consecutive pages pack differently without any randomness.

use super::{Batch, BatchSource};
use crate::model::{FetchError, GalleryItem};

/// Base image shape used to derive generated items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels, before jitter.
    pub height: u32,
}

/// Default catalog: 500px wide images with varying heights.
pub const DEFAULT_CATALOG: [CatalogEntry; 6] = [
    CatalogEntry { width: 500, height: 350 },
    CatalogEntry { width: 500, height: 420 },
    CatalogEntry { width: 500, height: 300 },
    CatalogEntry { width: 500, height: 480 },
    CatalogEntry { width: 500, height: 260 },
    CatalogEntry { width: 500, height: 360 },
];

/// Seed offset for picsum URLs.
const SEED_BASE: u64 = 1000;

/// Height offset applied to item `item_index` of page `page_index`.
///
/// Cycles through `-8, 4, 16`; always within `[-8, 16]`.
pub fn height_jitter(page_index: u32, item_index: usize) -> i32 {
    let phase = (page_index as u64 + item_index as u64) % 3;
    phase as i32 * 12 - 8
}

/// Pure, deterministic batch generator.
#[derive(Debug, Clone)]
pub struct BatchGenerator {
    page_size: usize,
    catalog: Vec<CatalogEntry>,
}

impl BatchGenerator {
    /// Generator over the default catalog.
    pub fn new(page_size: usize) -> Self {
        Self::with_catalog(page_size, DEFAULT_CATALOG.to_vec())
    }

    /// Generator over a custom catalog. An empty catalog falls back to the default.
    pub fn with_catalog(page_size: usize, catalog: Vec<CatalogEntry>) -> Self {
        let catalog = if catalog.is_empty() {
            DEFAULT_CATALOG.to_vec()
        } else {
            catalog
        };
        Self { page_size, catalog }
    }

    /// Items per generated batch.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Build the batch for `page_index`. Same input, same output.
    pub fn generate(&self, page_index: u32) -> Batch {
        let first_id = page_index as u64 * self.page_size as u64;
        let items = (0..self.page_size)
            .map(|item_index| {
                let base = self.catalog[item_index % self.catalog.len()];
                let height = (base.height as i64 + height_jitter(page_index, item_index) as i64)
                    .max(1) as u32;
                let id = first_id + item_index as u64;
                GalleryItem::new(
                    id,
                    format!(
                        "https://picsum.photos/seed/{}/{}/{}",
                        SEED_BASE + id,
                        base.width,
                        height
                    ),
                    format!("Item {}", id + 1),
                )
                .with_dimensions(base.width, height)
            })
            .collect();
        Batch::new(page_index, items)
    }
}

impl BatchSource for BatchGenerator {
    fn fetch(&self, page_index: u32) -> Result<Batch, FetchError> {
        Ok(self.generate(page_index))
    }
}
