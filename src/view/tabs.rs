//! Feed tab bar widget.
//!
//! Displays one tab per feed using ratatui's Tabs widget, numbered so the digit
//! keys that select them are visible.

use crate::model::TabId;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Tabs},
    Frame,
};

/// Render the feed tab bar.
///
/// - Labels are `N name`, `N` being the 1-based selection key
/// - Highlights the selected tab if `Some(index)` and index is in bounds
/// - Out-of-bounds indices are treated as `None`
pub fn render_tab_bar(frame: &mut Frame, area: Rect, tabs: &[TabId], selected_tab: Option<usize>) {
    let titles: Vec<Line> = tabs
        .iter()
        .enumerate()
        .map(|(index, id)| Line::from(format!("{} {}", index + 1, id)))
        .collect();

    let validated_selection = selected_tab.filter(|&idx| idx < tabs.len());

    let mut widget = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title("Feeds"))
        .style(Style::default().fg(Color::White));

    // Tabs always highlights something once selected, so skip select() for None
    if let Some(idx) = validated_selection {
        widget = widget
            .highlight_style(Style::default().fg(Color::Yellow))
            .select(idx);
    }

    frame.render_widget(widget, area);
}
