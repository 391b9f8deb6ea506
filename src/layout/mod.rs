//! Layout collaborator seam.
//!
//! The feed core never packs items itself. It tells a [`LayoutAdapter`] when the item
//! list changed and the adapter reflows its columns. [`LayoutHandle`] owns one adapter
//! per session, holds reflow requests until rendered content catches up, and releases
//! the adapter exactly once.

pub mod adapter;
pub mod columns;
pub mod handle;

pub use adapter::{LayoutAdapter, ReflowRequest, SizingBasis};
pub use columns::{Breakpoint, ColumnBreakpoints};
pub use handle::{LayoutHandle, LayoutSettings, ReflowStatus};
