//! Error types for masonry-feed.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error returned to `main`
//!   - [`ConfigError`](crate::config::ConfigError) - config file read/parse/validation
//!   - [`LoggingError`](crate::logging::LoggingError) - tracing initialization
//!   - `std::io::Error` - terminal failures
//!   - [`TuiError`](crate::view::TuiError) - event loop failures
//! - [`FetchError`] - a batch source could not produce a page
//! - [`LayoutError`] - the layout collaborator could not reflow
//!
//! # Recovery Strategy
//!
//! Fetch and layout errors are **non-fatal**. A failed fetch clears the loading flag
//! and leaves the accumulated items untouched so the next scroll trigger retries.
//! A failed reflow is dropped and retried on the next item-count change. Nothing in
//! the feed core ever surfaces an error to the user as fatal; the worst visible effect
//! is a stalled loading indicator.

use thiserror::Error;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Tracing subscriber could not be installed.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// Terminal setup or teardown error.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// The TUI event loop failed.
    #[error("TUI error: {0}")]
    Tui(#[from] crate::view::TuiError),

    /// Headless report could not be serialized.
    #[error("Report error: {0}")]
    Report(#[from] serde_json::Error),
}

/// A batch source failed to produce the requested page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The source is temporarily unable to serve the page. Retry is allowed.
    #[error("batch source unavailable for page {page_index}: {reason}")]
    SourceUnavailable {
        /// Page that was requested.
        page_index: u32,
        /// Human-readable cause.
        reason: String,
    },
}

/// The layout collaborator rejected a reflow request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The layout engine is not ready (container not mounted, handle released).
    #[error("layout adapter unavailable for container {container}")]
    Unavailable {
        /// Container the reflow targeted.
        container: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_message_names_page() {
        let err = FetchError::SourceUnavailable {
            page_index: 4,
            reason: "offline".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("page 4"));
        assert!(msg.contains("offline"));
    }

    #[test]
    fn layout_error_message_names_container() {
        let err = LayoutError::Unavailable {
            container: "grid-discover".to_string(),
        };
        assert!(err.to_string().contains("grid-discover"));
    }

    #[test]
    fn io_error_converts_to_app_error() {
        let io_err = std::io::Error::other("broken pipe");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Terminal(_)));
    }
}
