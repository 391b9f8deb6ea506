//! Tests for the TUI application shell.

use super::*;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::backend::TestBackend;

const SECOND: Duration = Duration::from_secs(1);

fn test_config() -> ResolvedConfig {
    ResolvedConfig {
        sticky_offset: None,
        ..ResolvedConfig::default()
    }
}

fn create_test_app() -> TuiApp<TestBackend> {
    let terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    TuiApp::with_terminal(terminal, &test_config()).unwrap()
}

/// App with the first batch of the first tab resolved and drawn.
fn loaded_app() -> (TuiApp<TestBackend>, Instant) {
    let mut app = create_test_app();
    let now = Instant::now() + SECOND;
    assert_eq!(app.poll(now), 1);
    app.refresh(now).unwrap();
    (app, now)
}

fn buffer_text(app: &TuiApp<TestBackend>) -> String {
    app.terminal()
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect()
}

fn press(app: &mut TuiApp<TestBackend>, code: KeyCode, now: Instant) -> bool {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE), now)
}

#[test]
fn tui_error_from_io_error() {
    let tui_err: TuiError = io::Error::other("test error").into();
    assert!(matches!(tui_err, TuiError::Io(_)));
}

#[test]
fn with_terminal_rejects_invalid_tab_names() {
    let terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    let config = ResolvedConfig {
        tabs: vec!["   ".to_string()],
        ..test_config()
    };
    assert!(matches!(
        TuiApp::with_terminal(terminal, &config),
        Err(TuiError::Config(_))
    ));
}

#[test]
fn new_app_schedules_initial_fetch_for_first_tab() {
    let app = create_test_app();
    assert_eq!(app.selected_tab(), 0);
    assert_eq!(app.runtime().pending_count(), 1);
    assert_eq!(
        app.runtime().store().active_tab().map(TabId::as_str),
        Some("discover")
    );
}

#[test]
fn viewport_is_grid_area_in_pixels() {
    let app = create_test_app();
    // 24 rows minus tab bar (3) and status bar (1)
    assert_eq!(
        app.viewport(),
        Viewport {
            width: 800,
            height: 400
        }
    );
    assert_eq!(app.runtime().store().columns(), 3);
}

#[test]
fn resolved_batch_is_revealed_after_refresh() {
    let (app, _) = loaded_app();
    let text = buffer_text(&app);
    assert!(text.contains("Item 1"), "first card should be drawn");
    assert!(text.contains("6 shown"), "status should count revealed cards");
    assert!(text.contains("1 discover"), "tab bar should be drawn");
}

#[test]
fn short_content_keeps_loading_after_refresh() {
    let (app, _) = loaded_app();
    // One batch in three columns barely overflows the viewport
    assert!(app.content_height() > 0);
    assert_eq!(app.runtime().pending_count(), 1);
    assert!(buffer_text(&app).contains("Loading"));
}

#[test]
fn q_quits_and_unbound_key_does_not() {
    let mut app = create_test_app();
    let now = Instant::now();
    assert!(!press(&mut app, KeyCode::Char('z'), now));
    assert!(press(&mut app, KeyCode::Char('q'), now));
}

#[test]
fn digit_selects_tab_and_cancels_previous_fetch() {
    let mut app = create_test_app();
    let now = Instant::now();

    press(&mut app, KeyCode::Char('2'), now);

    assert_eq!(app.selected_tab(), 1);
    assert_eq!(app.runtime().store().len(), 2);
    // discover's in-flight fetch was dropped, shorts' initial fetch queued
    assert_eq!(app.runtime().pending_count(), 1);
}

#[test]
fn next_tab_wraps_around() {
    let mut app = create_test_app();
    let now = Instant::now();
    for _ in 0..3 {
        press(&mut app, KeyCode::Tab, now);
    }
    assert_eq!(app.selected_tab(), 0);
}

#[test]
fn prev_tab_wraps_to_last() {
    let mut app = create_test_app();
    press(&mut app, KeyCode::Char('['), Instant::now());
    assert_eq!(app.selected_tab(), 2);
}

#[test]
fn out_of_range_selection_is_ignored() {
    let mut app = create_test_app();
    app.handle_action(KeyAction::SelectTab(7), Instant::now());
    assert_eq!(app.selected_tab(), 0);
    assert_eq!(app.runtime().store().len(), 1);
}

#[test]
fn scroll_to_bottom_clamps_to_content() {
    let (mut app, now) = loaded_app();

    app.handle_action(KeyAction::ScrollToBottom, now);

    let expected =
        (f64::from(app.content_height()) - f64::from(app.viewport().height)).max(0.0);
    assert_eq!(app.scroll_offset(), expected);

    app.handle_action(KeyAction::ScrollToTop, now);
    assert_eq!(app.scroll_offset(), 0.0);
}

#[test]
fn returning_to_tab_restores_its_offset() {
    let (mut app, now) = loaded_app();
    app.handle_action(KeyAction::ScrollToBottom, now);
    let discover_offset = app.scroll_offset();

    press(&mut app, KeyCode::Char('2'), now);
    assert_eq!(app.scroll_offset(), 0.0, "first visit without sticky bar");

    press(&mut app, KeyCode::Char('1'), now);
    assert_eq!(app.scroll_offset(), discover_offset);
}

#[test]
fn load_more_key_is_single_flight() {
    let mut app = create_test_app();
    let before = app.runtime().pending_count();
    press(&mut app, KeyCode::Char('m'), Instant::now());
    assert_eq!(app.runtime().pending_count(), before, "initial fetch in flight");
}

#[test]
fn shutdown_tears_down_sessions() {
    let (mut app, _) = loaded_app();
    app.shutdown();
    assert!(app.runtime().store().is_empty());
    assert_eq!(app.runtime().pending_count(), 0);
}

#[test]
fn header_height_follows_sticky_offset() {
    assert_eq!(header_height(&ResolvedConfig::default()), 350);
    assert_eq!(header_height(&test_config()), 0);
}

#[test]
fn header_is_drawn_above_grid() {
    let terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    let mut app = TuiApp::with_terminal(terminal, &ResolvedConfig::default()).unwrap();
    app.refresh(Instant::now()).unwrap();
    assert!(buffer_text(&app).contains("Masonry Feed"));
}
