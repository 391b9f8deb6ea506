//! Layout adapter trait and reflow request.

use crate::model::LayoutError;

/// What the layout engine measures column width from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizingBasis {
    /// A fixed column count resolved from the viewport width.
    Columns(u16),
    /// A sizer element selector (e.g. `.grid-sizer`) measured by the engine.
    Selector(String),
}

/// Everything a layout engine needs to reflow one container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflowRequest {
    /// Container identifier, e.g. `grid-discover`.
    pub container: String,
    /// Selector matching the items to pack.
    pub item_selector: String,
    /// How column width is measured.
    pub sizing_basis: SizingBasis,
    /// Gap between columns, in pixels.
    pub gutter: u16,
    /// Number of items the container holds when the reflow runs.
    pub item_count: usize,
}

/// A column-packing layout engine.
///
/// Implementations must tolerate repeated `reflow` calls for the same request.
pub trait LayoutAdapter {
    /// Reflow the container.
    ///
    /// # Errors
    ///
    /// `LayoutError::Unavailable` when the engine is not ready; the caller drops the
    /// request and retries on the next item-count change.
    fn reflow(&mut self, request: &ReflowRequest) -> Result<(), LayoutError>;

    /// Tear down engine resources. Called once when the owning handle is released.
    fn release(&mut self) {}
}
