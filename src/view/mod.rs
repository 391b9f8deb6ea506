//! TUI rendering and terminal management (impure shell)

pub mod constants;
pub mod masonry;
pub mod status;
pub mod tabs;

pub use masonry::{
    column_width, pack, render_masonry, truncate_to_width, Card, ColumnPlan, GridLayout,
    LayoutPlans, Packing, Placement, TerminalMasonry,
};
pub use status::{render_status_bar, FeedStatus};
pub use tabs::render_tab_bar;

use crate::config::{ConfigError, KeyBindings, ResolvedConfig};
use crate::integration::FeedRuntime;
use crate::layout::{LayoutAdapter, ReflowStatus};
use crate::model::{KeyAction, TabId};
use crate::source::BatchGenerator;
use crate::state::{AdapterFactory, FetchPhase, ScrollMetrics, TabSessionStore};
use constants::{LINE_SCROLL_PX, PX_PER_CELL, PX_PER_ROW, STATUS_BAR_HEIGHT, TAB_BAR_HEIGHT};
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration rejected while building the feed
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Build the feed runtime used by both the TUI and the headless report.
///
/// Every session gets a [`TerminalMasonry`] adapter writing into `plans`.
pub fn feed_runtime(
    config: &ResolvedConfig,
    plans: &LayoutPlans,
    viewport_width: u32,
) -> FeedRuntime<BatchGenerator> {
    let factory_plans = plans.clone();
    let factory: AdapterFactory =
        Box::new(move |_: &TabId| Box::new(factory_plans.adapter()) as Box<dyn LayoutAdapter>);
    let store = TabSessionStore::new(config.session_settings(viewport_width), factory);
    FeedRuntime::new(
        store,
        BatchGenerator::new(config.page_size),
        config.fetch_latency,
    )
}

/// Pixel height of the hero header above the grid. The tab bar sticks once it
/// scrolls away.
pub fn header_height(config: &ResolvedConfig) -> u32 {
    config
        .sticky_offset
        .map(|offset| offset.round().max(0.0) as u32)
        .unwrap_or(0)
}

/// Pixel size of the grid viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    fn of(area: Rect) -> Self {
        Self {
            width: u32::from(area.width) * PX_PER_CELL,
            height: u32::from(area.height) * PX_PER_ROW,
        }
    }
}

struct FeedAreas {
    tabs: Rect,
    grid: Rect,
    status: Rect,
}

fn split_areas(area: Rect) -> FeedAreas {
    let [tabs, grid, status] = Layout::vertical([
        Constraint::Length(TAB_BAR_HEIGHT),
        Constraint::Min(1),
        Constraint::Length(STATUS_BAR_HEIGHT),
    ])
    .areas(area);
    FeedAreas { tabs, grid, status }
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: Backend,
{
    terminal: Terminal<B>,
    runtime: FeedRuntime<BatchGenerator>,
    plans: LayoutPlans,
    tabs: Vec<TabId>,
    selected: usize,
    key_bindings: KeyBindings,
    /// Host scroll offset of the active tab, in pixels.
    scroll_offset: f64,
    viewport: Viewport,
    header_height: u32,
    /// Header plus revealed grid, in pixels, as of the last draw.
    content_height: u32,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Create and initialize a new TUI application
    ///
    /// Sets up terminal in raw mode with alternate screen
    pub fn new(config: &ResolvedConfig) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Self::with_terminal(terminal, config)
    }

    /// Run the main event loop
    ///
    /// Returns when user quits (q or Ctrl+C). Sleeps until the next input event or
    /// the next fetch deadline, whichever comes first.
    pub fn run(&mut self) -> Result<(), TuiError> {
        // Level-triggered scroll checks need a periodic look even without input
        const IDLE_TICK: Duration = Duration::from_millis(250);

        self.refresh(Instant::now())?;

        loop {
            let timeout = self
                .runtime
                .next_deadline()
                .map(|due| due.saturating_duration_since(Instant::now()).min(IDLE_TICK))
                .unwrap_or(IDLE_TICK);

            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key, Instant::now()) {
                            return Ok(());
                        }
                        self.refresh(Instant::now())?;
                    }
                    Event::Resize(..) => self.refresh(Instant::now())?,
                    _ => {}
                }
            }

            let now = Instant::now();
            let resolved = self.runtime.poll(now);
            if !resolved.is_empty() || self.settle(now) {
                self.refresh(now)?;
            }
        }
    }
}

impl<B> TuiApp<B>
where
    B: Backend,
{
    /// Build the app on an existing terminal and activate the first tab.
    pub fn with_terminal(terminal: Terminal<B>, config: &ResolvedConfig) -> Result<Self, TuiError> {
        let tabs = config.tab_ids()?;
        let size = terminal.size()?;
        let area = Rect::new(0, 0, size.width.max(1), size.height);
        let viewport = Viewport::of(split_areas(area).grid);
        let plans = LayoutPlans::new();
        let runtime = feed_runtime(config, &plans, viewport.width);

        let mut app = Self {
            terminal,
            runtime,
            plans,
            tabs,
            selected: 0,
            key_bindings: KeyBindings::default(),
            scroll_offset: 0.0,
            viewport,
            header_height: header_height(config),
            content_height: 0,
        };
        if let Some(first) = app.tabs.first().cloned() {
            let activation = app.runtime.activate(&first, 0.0, Instant::now());
            app.scroll_offset = activation.restored_offset;
        }
        Ok(app)
    }

    /// Feed runtime.
    pub fn runtime(&self) -> &FeedRuntime<BatchGenerator> {
        &self.runtime
    }

    /// Underlying terminal.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Index of the selected tab.
    pub fn selected_tab(&self) -> usize {
        self.selected
    }

    /// Scroll offset of the active tab, in pixels.
    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// Header plus revealed grid, in pixels, as of the last draw.
    pub fn content_height(&self) -> u32 {
        self.content_height
    }

    /// Grid viewport in pixels.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Resolve due fetches. Returns how many completed.
    pub fn poll(&mut self, now: Instant) -> usize {
        self.runtime.poll(now).len()
    }

    /// Handle a single keyboard event
    ///
    /// Returns true if app should quit
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        match self.key_bindings.get(key) {
            Some(action) => self.handle_action(action, now),
            None => false,
        }
    }

    /// Apply a domain action. Returns true if app should quit.
    pub fn handle_action(&mut self, action: KeyAction, now: Instant) -> bool {
        let page = f64::from(self.viewport.height);
        match action {
            KeyAction::Quit => return true,
            KeyAction::ScrollDown => self.scroll_to(self.scroll_offset + LINE_SCROLL_PX, now),
            KeyAction::ScrollUp => self.scroll_to(self.scroll_offset - LINE_SCROLL_PX, now),
            KeyAction::PageDown => self.scroll_to(self.scroll_offset + page, now),
            KeyAction::PageUp => self.scroll_to(self.scroll_offset - page, now),
            KeyAction::ScrollToTop => self.scroll_to(0.0, now),
            KeyAction::ScrollToBottom => self.scroll_to(f64::MAX, now),
            KeyAction::NextTab => {
                if let Some(next) = (self.selected + 1).checked_rem(self.tabs.len()) {
                    self.select_tab(next, now);
                }
            }
            KeyAction::PrevTab => {
                let len = self.tabs.len();
                if let Some(prev) = (self.selected + len.saturating_sub(1)).checked_rem(len) {
                    self.select_tab(prev, now);
                }
            }
            KeyAction::SelectTab(index) => self.select_tab(index, now),
            KeyAction::LoadMore => {
                self.runtime.load_more(now);
            }
        }
        false
    }

    /// Draw, let the layout catch up with what was drawn, then re-check the trigger.
    pub fn refresh(&mut self, now: Instant) -> Result<(), TuiError> {
        self.sync_viewport()?;
        self.draw()?;

        // Terminal cells need no measurement: loaded items are representable as soon
        // as they are in state
        if let Some(tab) = self.tabs.get(self.selected).cloned() {
            let loaded = self
                .runtime
                .store()
                .session(&tab)
                .map(|session| session.state().items().len())
                .unwrap_or(0);
            if self.runtime.content_ready(&tab, loaded) == Some(ReflowStatus::Reflowed) {
                self.draw()?;
            }
        }

        if self.settle(now) {
            self.draw()?;
        }
        Ok(())
    }

    /// Cancel outstanding fetches and release every layout handle.
    pub fn shutdown(&mut self) {
        let cancelled = self.runtime.shutdown();
        info!(cancelled = cancelled.len(), plans = self.plans.len(), "feed shut down");
    }

    fn settle(&mut self, now: Instant) -> bool {
        self.runtime.settle(
            f64::from(self.viewport.height),
            f64::from(self.content_height),
            now,
        )
    }

    fn scroll_to(&mut self, target: f64, now: Instant) {
        let max_offset =
            (f64::from(self.content_height) - f64::from(self.viewport.height)).max(0.0);
        self.scroll_offset = target.clamp(0.0, max_offset);
        let metrics = ScrollMetrics::new(
            self.scroll_offset,
            f64::from(self.viewport.height),
            f64::from(self.content_height),
        );
        self.runtime.on_scroll(&metrics, now);
    }

    fn select_tab(&mut self, index: usize, now: Instant) {
        if index == self.selected {
            return;
        }
        let Some(tab) = self.tabs.get(index).cloned() else {
            return;
        };
        let activation = self.runtime.activate(&tab, self.scroll_offset, now);
        self.scroll_offset = activation.restored_offset;
        self.selected = index;
        // Stale until the next draw measures the new tab
        self.content_height = 0;
    }

    fn sync_viewport(&mut self) -> Result<(), TuiError> {
        let size = self.terminal.size()?;
        let area = Rect::new(0, 0, size.width.max(1), size.height);
        let viewport = Viewport::of(split_areas(area).grid);
        if viewport.width != self.viewport.width {
            let columns = self.runtime.set_viewport_width(viewport.width);
            debug!(width = viewport.width, columns, "viewport resized");
        }
        self.viewport = viewport;
        Ok(())
    }

    /// Render the current frame
    fn draw(&mut self) -> Result<(), TuiError> {
        let store = self.runtime.store();
        let session = store.active_session();
        let items = session.map(|s| s.state().items()).unwrap_or(&[]);
        let plan = session.and_then(|s| self.plans.get(s.layout().container()));
        let grid = GridLayout::compute(items, plan, self.viewport.width);
        self.content_height = self.header_height.saturating_add(grid.content_height);

        let status = FeedStatus {
            phase: session.map(|s| s.phase()).unwrap_or(FetchPhase::Idle),
            rendered: grid.cards.len(),
            loaded: items.len(),
            max_items: store.settings().max_items,
            columns: store.columns(),
        };
        let scroll_px = self.scroll_offset.round() as i64;
        let header_height = i64::from(self.header_height);
        let tabs = &self.tabs;
        let selected = self.selected;

        self.terminal.draw(|frame| {
            let areas = split_areas(frame.area());
            render_tab_bar(frame, areas.tabs, tabs, Some(selected));
            render_header(frame, areas.grid, header_height - scroll_px);
            render_masonry(frame, areas.grid, items, &grid, scroll_px - header_height);
            render_status_bar(frame, areas.status, &status);
        })?;

        Ok(())
    }
}

/// Hero banner occupying the first `visible_px` pixels of the grid area.
fn render_header(frame: &mut Frame, area: Rect, visible_px: i64) {
    let rows = visible_px.max(0) / i64::from(PX_PER_ROW);
    let rows = u16::try_from(rows).unwrap_or(u16::MAX).min(area.height);
    if rows == 0 {
        return;
    }
    let lines = vec![
        Line::styled(
            "Masonry Feed",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from("Scroll to load more. Each tab keeps its own place."),
    ];
    let banner = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(banner, Rect { height: rows, ..area });
}

/// Initialize and run the TUI application with a resolved configuration
///
/// Handles terminal setup, runs the event loop, and restores the terminal on exit.
/// Logging must be initialized by the caller.
pub fn run_with_config(config: &ResolvedConfig) -> Result<(), TuiError> {
    let mut app = match TuiApp::new(config) {
        Ok(app) => app,
        Err(err) => {
            restore_terminal()?;
            return Err(err);
        }
    };

    // Run the app and ensure cleanup happens even on error
    let result = app.run();
    app.shutdown();

    // Always restore terminal state
    restore_terminal()?;

    result
}

/// Restore terminal to normal state
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
