//! Batch sources for the gallery feed.
//!
//! This module provides page-indexed item sources:
//! - `BatchGenerator` for deterministic synthetic items
//! - `BatchSource` trait as the seam for fallible sources

use crate::model::{FetchError, GalleryItem};

pub mod generator;

pub use generator::{height_jitter, BatchGenerator, CatalogEntry, DEFAULT_CATALOG};

/// One page worth of items, appended atomically to a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    page_index: u32,
    items: Vec<GalleryItem>,
}

impl Batch {
    /// Batch for `page_index`.
    pub fn new(page_index: u32, items: Vec<GalleryItem>) -> Self {
        Self { page_index, items }
    }

    /// Page this batch was generated for.
    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    /// Items in feed order.
    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the batch holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consume the batch, yielding its items.
    pub fn into_items(self) -> Vec<GalleryItem> {
        self.items
    }
}

/// A source of page-indexed batches.
///
/// # Errors
///
/// Implementations return `FetchError::SourceUnavailable` when a page cannot be
/// produced right now. Callers treat that as retryable.
pub trait BatchSource {
    /// Produce the batch for `page_index`.
    fn fetch(&self, page_index: u32) -> Result<Batch, FetchError>;
}
