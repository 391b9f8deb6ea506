//! Terminal masonry grid.
//!
//! Packing happens in pixel space so the grid matches what a browser layout engine
//! would produce; the renderer converts pixels to cells. [`TerminalMasonry`] is the
//! [`LayoutAdapter`] for the terminal: a reflow records a [`ColumnPlan`] for its
//! container, and only items covered by the latest plan are revealed.

use super::constants::{PX_PER_CELL, PX_PER_ROW};
use crate::layout::{LayoutAdapter, ReflowRequest, SizingBasis};
use crate::model::{GalleryItem, LayoutError};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use unicode_width::UnicodeWidthChar;

/// Result of the last reflow of one container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnPlan {
    /// Column count.
    pub columns: u16,
    /// Gap in pixels.
    pub gutter: u16,
    /// Items the plan covers; later items stay hidden until the next reflow.
    pub item_count: usize,
}

/// Plans of every live container, shared between adapters and the renderer.
#[derive(Debug, Clone, Default)]
pub struct LayoutPlans {
    plans: Rc<RefCell<HashMap<String, ColumnPlan>>>,
}

impl LayoutPlans {
    /// Empty plan set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan for `container`.
    pub fn get(&self, container: &str) -> Option<ColumnPlan> {
        self.plans.borrow().get(container).copied()
    }

    /// Number of containers with a plan.
    pub fn len(&self) -> usize {
        self.plans.borrow().len()
    }

    /// Whether no container has a plan.
    pub fn is_empty(&self) -> bool {
        self.plans.borrow().is_empty()
    }

    /// A new adapter writing into this registry.
    pub fn adapter(&self) -> TerminalMasonry {
        TerminalMasonry {
            plans: self.clone(),
            container: None,
        }
    }
}

/// Column-packing adapter for one terminal container.
#[derive(Debug)]
pub struct TerminalMasonry {
    plans: LayoutPlans,
    container: Option<String>,
}

impl LayoutAdapter for TerminalMasonry {
    fn reflow(&mut self, request: &ReflowRequest) -> Result<(), LayoutError> {
        // Cells cannot be measured, so only a fixed column count works here.
        let SizingBasis::Columns(columns) = request.sizing_basis else {
            return Err(LayoutError::Unavailable {
                container: request.container.clone(),
            });
        };
        let plan = ColumnPlan {
            columns: columns.max(1),
            gutter: request.gutter,
            item_count: request.item_count,
        };
        self.plans
            .plans
            .borrow_mut()
            .insert(request.container.clone(), plan);
        self.container = Some(request.container.clone());
        Ok(())
    }

    fn release(&mut self) {
        if let Some(container) = self.container.take() {
            self.plans.plans.borrow_mut().remove(&container);
        }
    }
}

/// Position of one packed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Column index, from the left.
    pub column: u16,
    /// Offset from the top of the grid.
    pub top: u32,
    /// Item height.
    pub height: u32,
}

/// Output of [`pack`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packing {
    /// One placement per input height, in order.
    pub placements: Vec<Placement>,
    /// Height of each column, including gutters.
    pub column_heights: Vec<u32>,
}

impl Packing {
    /// Height of the tallest column.
    pub fn content_height(&self) -> u32 {
        self.column_heights.iter().copied().max().unwrap_or(0)
    }
}

/// Place each item in the currently shortest column, leftmost on ties.
///
/// `gutter` separates vertically adjacent items in the same column.
pub fn pack(heights: &[u32], columns: u16, gutter: u16) -> Packing {
    let columns = usize::from(columns.max(1));
    let gutter = u32::from(gutter);
    let mut column_heights = vec![0u32; columns];
    let mut occupied = vec![false; columns];
    let mut placements = Vec::with_capacity(heights.len());

    for &height in heights {
        let (column, bottom) = column_heights
            .iter()
            .copied()
            .enumerate()
            .min_by_key(|&(index, h)| (h, index))
            .unwrap_or((0, 0));
        let top = if occupied[column] { bottom + gutter } else { 0 };
        occupied[column] = true;
        column_heights[column] = top + height;
        placements.push(Placement {
            column: column as u16,
            top,
            height,
        });
    }

    Packing {
        placements,
        column_heights,
    }
}

/// Width of one column, in pixels.
pub fn column_width(viewport_width: u32, columns: u16, gutter: u16) -> u32 {
    let columns = u32::from(columns.max(1));
    let gutters = u32::from(gutter) * (columns - 1);
    (viewport_width.saturating_sub(gutters) / columns).max(1)
}

/// A revealed item with its pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    /// Item index in the feed.
    pub index: usize,
    /// Left edge, in pixels.
    pub left: u32,
    /// Top edge, in pixels.
    pub top: u32,
    /// Width, in pixels.
    pub width: u32,
    /// Height, in pixels.
    pub height: u32,
}

/// The revealed part of a container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridLayout {
    /// Revealed cards, in feed order.
    pub cards: Vec<Card>,
    /// Height of the tallest column.
    pub content_height: u32,
}

impl GridLayout {
    /// Lay out the items `plan` covers in a viewport `viewport_width` pixels wide.
    pub fn compute(items: &[GalleryItem], plan: Option<ColumnPlan>, viewport_width: u32) -> Self {
        let Some(plan) = plan else {
            return Self::default();
        };
        let revealed = &items[..plan.item_count.min(items.len())];
        let width = column_width(viewport_width, plan.columns, plan.gutter);
        let heights: Vec<u32> = revealed
            .iter()
            .map(|item| item.display_height(width))
            .collect();
        let packing = pack(&heights, plan.columns, plan.gutter);

        let stride = width + u32::from(plan.gutter);
        let cards = packing
            .placements
            .iter()
            .enumerate()
            .map(|(index, placement)| Card {
                index,
                left: u32::from(placement.column) * stride,
                top: placement.top,
                width,
                height: placement.height,
            })
            .collect();

        Self {
            cards,
            content_height: packing.content_height(),
        }
    }
}

/// Truncate `text` to at most `max_width` display columns.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max_width {
            break;
        }
        used += w;
        out.push(ch);
    }
    out
}

/// Cell rectangle of a card when the top of `area` shows grid pixel `scroll_px`.
fn card_cells(card: &Card, scroll_px: i64, area: Rect) -> Option<Rect> {
    let top_px = i64::from(card.top) - scroll_px;
    let bottom_px = top_px + i64::from(card.height);
    let row_px = i64::from(PX_PER_ROW);
    let top_row = top_px.div_euclid(row_px);
    let bottom_row = bottom_px.div_euclid(row_px);

    let left_col = card.left / PX_PER_CELL;
    let right_col = (card.left + card.width) / PX_PER_CELL;

    let visible_top = top_row.max(0);
    let visible_bottom = bottom_row.min(i64::from(area.height));
    if visible_bottom <= visible_top || right_col <= left_col {
        return None;
    }

    let rect = Rect::new(
        area.x.saturating_add(u16::try_from(left_col).ok()?),
        area.y.saturating_add(u16::try_from(visible_top).ok()?),
        u16::try_from(right_col - left_col).ok()?,
        u16::try_from(visible_bottom - visible_top).ok()?,
    );
    Some(rect.intersection(area)).filter(|r| r.width > 0 && r.height > 0)
}

/// Render the revealed cards of a grid, scrolled by `scroll_px`.
///
/// A negative `scroll_px` pushes the grid down, leaving room above it.
pub fn render_masonry(
    frame: &mut Frame,
    area: Rect,
    items: &[GalleryItem],
    grid: &GridLayout,
    scroll_px: i64,
) {
    for card in &grid.cards {
        let Some(item) = items.get(card.index) else {
            continue;
        };
        let Some(rect) = card_cells(card, scroll_px, area) else {
            continue;
        };

        let inner_width = usize::from(rect.width.saturating_sub(2));
        let title = truncate_to_width(item.title(), inner_width);
        let dimensions = match (item.width(), item.height()) {
            (Some(w), Some(h)) => format!("{w}×{h}"),
            _ => "unknown size".to_string(),
        };
        let lines = vec![
            Line::from(truncate_to_width(&dimensions, inner_width)),
            Line::styled(
                truncate_to_width(item.source_url(), inner_width),
                Style::default().fg(Color::DarkGray),
            ),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(title);
        frame.render_widget(Paragraph::new(lines).block(block), rect);
    }
}

#[cfg(test)]
#[path = "masonry_tests.rs"]
mod tests;
