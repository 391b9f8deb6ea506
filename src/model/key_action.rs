//! Domain-level keyboard actions independent of key bindings.

/// Actions that can be mapped to key bindings.
///
/// These represent user intent, not specific keys. The mapping from
/// `crossterm::event::KeyEvent` to `KeyAction` is handled by `KeyBindings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Scrolling
    /// Scroll the feed up by one row. Default: k/↑
    ScrollUp,
    /// Scroll the feed down by one row. Default: j/↓
    ScrollDown,
    /// Scroll up by one viewport height. Default: Ctrl+u/Page Up
    PageUp,
    /// Scroll down by one viewport height. Default: Ctrl+d/Page Down/Space
    PageDown,
    /// Jump to the top of the feed. Default: g/Home
    ScrollToTop,
    /// Jump to the bottom of the loaded content. Default: G/End
    ScrollToBottom,

    // Tabs
    /// Activate the next tab, wrapping. Default: Tab/]
    NextTab,
    /// Activate the previous tab, wrapping. Default: Shift+Tab/[
    PrevTab,
    /// Activate a tab by zero-based index. Default: 1-9
    SelectTab(usize),

    // Feed
    /// Request the next batch now, ignoring the scroll trigger. Default: m
    LoadMore,

    // Application
    /// Exit the application. Default: q/Ctrl+c
    Quit,
}
