//! Status bar: fetch phase, item counts and key hints.

use crate::state::FetchPhase;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Everything the status bar shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedStatus {
    /// Fetch phase of the active tab.
    pub phase: FetchPhase,
    /// Items placed in the grid.
    pub rendered: usize,
    /// Items held by the session.
    pub loaded: usize,
    /// Item ceiling.
    pub max_items: usize,
    /// Current column count.
    pub columns: u16,
}

impl FeedStatus {
    fn phase_span(&self) -> Span<'static> {
        match self.phase {
            FetchPhase::Loading => Span::styled(
                "Loading more items…",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            FetchPhase::Exhausted => {
                Span::styled("End of feed", Style::default().fg(Color::Green))
            }
            FetchPhase::Idle => Span::raw(""),
        }
    }
}

/// Render the one-line status bar.
pub fn render_status_bar(frame: &mut Frame, area: Rect, status: &FeedStatus) {
    let counts = format!(
        " {} shown · {}/{} loaded · {} cols ",
        status.rendered, status.loaded, status.max_items, status.columns
    );
    let line = Line::from(vec![
        Span::styled(counts, Style::default().fg(Color::Cyan)),
        status.phase_span(),
        Span::styled(
            "  q quit · Tab next · 1-9 select · j/k scroll · m more",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
