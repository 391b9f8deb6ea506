//! Gallery item: one image card in the masonry feed.

use serde::Serialize;

/// Width:height ratio assumed for items whose dimensions are unknown (3:4 portrait).
const FALLBACK_ASPECT_RATIO: f64 = 3.0 / 4.0;

/// A single gallery entry.
///
/// Immutable once created: fields are private and only exposed through accessors.
/// `with_dimensions` is a construction-time builder that consumes the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    id: u64,
    source_url: String,
    title: String,
    width: Option<u32>,
    height: Option<u32>,
}

impl GalleryItem {
    /// Item without known dimensions.
    pub fn new(id: u64, source_url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            source_url: source_url.into(),
            title: title.into(),
            width: None,
            height: None,
        }
    }

    /// Attach intrinsic pixel dimensions. Zero sizes are treated as unknown.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        if width > 0 && height > 0 {
            self.width = Some(width);
            self.height = Some(height);
        }
        self
    }

    /// Position in the feed, starting at 0.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Image URL.
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// Display title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Intrinsic width in pixels, if known.
    pub fn width(&self) -> Option<u32> {
        self.width
    }

    /// Intrinsic height in pixels, if known.
    pub fn height(&self) -> Option<u32> {
        self.height
    }

    /// Width divided by height, when both are known.
    pub fn aspect_ratio(&self) -> Option<f64> {
        match (self.width, self.height) {
            (Some(w), Some(h)) => Some(w as f64 / h as f64),
            _ => None,
        }
    }

    /// Height this item occupies when scaled to `column_width`.
    ///
    /// Unknown dimensions fall back to a 3:4 portrait placeholder.
    pub fn display_height(&self, column_width: u32) -> u32 {
        let ratio = self.aspect_ratio().unwrap_or(FALLBACK_ASPECT_RATIO);
        (column_width as f64 / ratio).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_item_has_no_dimensions() {
        let item = GalleryItem::new(3, "https://example.test/a.jpg", "Item 4");
        assert_eq!(item.id(), 3);
        assert_eq!(item.title(), "Item 4");
        assert_eq!(item.width(), None);
        assert_eq!(item.height(), None);
        assert_eq!(item.aspect_ratio(), None);
    }

    #[test]
    fn display_height_scales_known_dimensions() {
        let item = GalleryItem::new(0, "u", "t").with_dimensions(500, 350);
        assert_eq!(item.display_height(250), 175);
    }

    #[test]
    fn display_height_falls_back_to_portrait_ratio() {
        let item = GalleryItem::new(0, "u", "t");
        assert_eq!(item.display_height(300), 400);
    }

    #[test]
    fn zero_dimensions_are_ignored() {
        let item = GalleryItem::new(0, "u", "t").with_dimensions(0, 200);
        assert_eq!(item.width(), None);
        assert_eq!(item.height(), None);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let item = GalleryItem::new(7, "https://example.test/7", "Item 8").with_dimensions(500, 300);
        let json = serde_json::to_value(&item).expect("serializable");
        assert_eq!(json["sourceUrl"], "https://example.test/7");
        assert_eq!(json["height"], 300);
    }
}
