//! Layout dimension constants for TUI rendering.
//!
//! The feed core works in pixels. The terminal maps one cell to
//! `PX_PER_CELL` pixels horizontally and one row to `PX_PER_ROW` pixels.

/// Height of the tab bar in lines (border + content).
pub const TAB_BAR_HEIGHT: u16 = 3;

/// Height of the status bar in lines.
pub const STATUS_BAR_HEIGHT: u16 = 1;

/// Horizontal pixels per terminal cell.
pub const PX_PER_CELL: u32 = 10;

/// Vertical pixels per terminal row.
pub const PX_PER_ROW: u32 = 20;

/// Pixels moved by a single-line scroll.
pub const LINE_SCROLL_PX: f64 = PX_PER_ROW as f64 * 2.0;
