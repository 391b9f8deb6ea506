//! Configuration file loading with precedence handling.

use crate::layout::{Breakpoint, ColumnBreakpoints, LayoutSettings};
use crate::model::TabId;
use crate::state::{ScrollThreshold, SessionSettings, TriggerKind, TriggerSettings};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "MASONRY_FEED_CONFIG";
/// Environment override for `page_size`.
pub const PAGE_SIZE_ENV: &str = "MASONRY_FEED_PAGE_SIZE";
/// Environment override for `max_items`.
pub const MAX_ITEMS_ENV: &str = "MASONRY_FEED_MAX_ITEMS";
/// Largest accepted `sticky_offset`, in pixels.
pub const MAX_STICKY_OFFSET: f64 = 100_000.0;

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permission issues, not a file).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A resolved value is out of range.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Offending setting.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/masonry-feed/config.toml`.
///
/// ```toml
/// page_size = 6
/// max_items = 60
/// scroll_threshold = { pixels = 300.0 }
/// trigger = "sentinel"
/// tabs = ["discover", "shorts", "activity"]
///
/// [[columns]]
/// min_width = 1200
/// columns = 4
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Items per batch.
    #[serde(default)]
    pub page_size: Option<usize>,

    /// Item ceiling per tab.
    #[serde(default)]
    pub max_items: Option<usize>,

    /// Distance-to-bottom threshold.
    #[serde(default)]
    pub scroll_threshold: Option<ScrollThreshold>,

    /// Near-bottom detection strategy.
    #[serde(default)]
    pub trigger: Option<TriggerKind>,

    /// Minimum interval between triggers, in milliseconds.
    #[serde(default)]
    pub debounce_ms: Option<u64>,

    /// Simulated fetch latency, in milliseconds.
    #[serde(default)]
    pub fetch_latency_ms: Option<u64>,

    /// Sentinel root margin, in pixels.
    #[serde(default)]
    pub sentinel_margin: Option<f64>,

    /// Sticky tab bar offset, in pixels. Negative disables it.
    #[serde(default)]
    pub sticky_offset: Option<f64>,

    /// Gap between columns, in pixels.
    #[serde(default)]
    pub gutter: Option<u16>,

    /// Tab names, in display order.
    #[serde(default)]
    pub tabs: Option<Vec<String>>,

    /// Responsive column breakpoints.
    #[serde(default)]
    pub columns: Option<Vec<Breakpoint>>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Items per batch.
    pub page_size: usize,
    /// Item ceiling per tab.
    pub max_items: usize,
    /// Distance from the bottom that starts a fetch.
    pub scroll_threshold: ScrollThreshold,
    /// Near-bottom detection strategy.
    pub trigger: TriggerKind,
    /// Minimum interval between triggered fetches.
    pub debounce: Duration,
    /// Simulated fetch latency.
    pub fetch_latency: Duration,
    /// Sentinel visibility margin, in pixels.
    pub sentinel_margin: f64,
    /// `None` when there is no sticky tab bar.
    pub sticky_offset: Option<f64>,
    /// Gap between columns and stacked items, in pixels.
    pub gutter: u16,
    /// Tab names, in display order.
    pub tabs: Vec<String>,
    /// Responsive column table.
    pub columns: ColumnBreakpoints,
    /// Log file destination.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            page_size: 6,
            max_items: 60,
            scroll_threshold: ScrollThreshold::Pixels(300.0),
            trigger: TriggerKind::Threshold,
            debounce: Duration::from_millis(1000),
            fetch_latency: Duration::from_millis(600),
            sentinel_margin: 200.0,
            sticky_offset: Some(350.0),
            gutter: 16,
            tabs: vec![
                "discover".to_string(),
                "shorts".to_string(),
                "activity".to_string(),
            ],
            columns: ColumnBreakpoints::default(),
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// Tab ids in display order. Call after [`validate`] to rely on success.
    pub fn tab_ids(&self) -> Result<Vec<TabId>, ConfigError> {
        self.tabs
            .iter()
            .map(|name| {
                TabId::new(name.as_str()).map_err(|e| ConfigError::InvalidValue {
                    field: "tabs",
                    reason: e.to_string(),
                })
            })
            .collect()
    }

    /// Trigger settings for every session.
    pub fn trigger_settings(&self) -> TriggerSettings {
        TriggerSettings {
            kind: self.trigger,
            threshold: self.scroll_threshold,
            sentinel_margin: self.sentinel_margin,
            min_interval: self.debounce,
        }
    }

    /// Session options for a viewport `viewport_width` pixels wide.
    pub fn session_settings(&self, viewport_width: u32) -> SessionSettings {
        SessionSettings {
            max_items: self.max_items,
            sticky_offset: self.sticky_offset,
            trigger: self.trigger_settings(),
            layout: LayoutSettings {
                gutter: self.gutter,
                ..LayoutSettings::default()
            },
            columns: self.columns.clone(),
            viewport_width,
        }
    }
}

/// Resolve default log file path.
///
/// Returns `<state_dir>/masonry-feed/masonry-feed.log` on Unix-like systems.
/// If the state directory cannot be determined, falls back to the current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("masonry-feed").join("masonry-feed.log")
    } else {
        PathBuf::from("masonry-feed.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/masonry-feed/config.toml` on Unix.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("masonry-feed").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `MASONRY_FEED_CONFIG` environment variable
/// 3. Default path `~/.config/masonry-feed/config.toml`
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    let sticky_offset = match config.sticky_offset {
        Some(offset) if offset < 0.0 => None,
        Some(offset) => Some(offset),
        None => defaults.sticky_offset,
    };

    ResolvedConfig {
        page_size: config.page_size.unwrap_or(defaults.page_size),
        max_items: config.max_items.unwrap_or(defaults.max_items),
        scroll_threshold: config.scroll_threshold.unwrap_or(defaults.scroll_threshold),
        trigger: config.trigger.unwrap_or(defaults.trigger),
        debounce: config
            .debounce_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.debounce),
        fetch_latency: config
            .fetch_latency_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.fetch_latency),
        sentinel_margin: config.sentinel_margin.unwrap_or(defaults.sentinel_margin),
        sticky_offset,
        gutter: config.gutter.unwrap_or(defaults.gutter),
        tabs: config.tabs.unwrap_or(defaults.tabs),
        columns: config
            .columns
            .map(|table| ColumnBreakpoints::new(table, 1))
            .unwrap_or(defaults.columns),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `MASONRY_FEED_PAGE_SIZE`: Override page size
/// - `MASONRY_FEED_MAX_ITEMS`: Override item ceiling
///
/// Unparseable values are ignored with a warning.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Some(page_size) = env_usize(PAGE_SIZE_ENV) {
        config.page_size = page_size;
    }
    if let Some(max_items) = env_usize(MAX_ITEMS_ENV) {
        config.max_items = max_items;
    }
    config
}

fn env_usize(name: &str) -> Option<usize> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(variable = name, value = %raw, "ignoring unparseable environment override");
            None
        }
    }
}

/// CLI argument overrides. `None` leaves the lower-precedence value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    /// `--page-size`
    pub page_size: Option<usize>,
    /// `--max-items`
    pub max_items: Option<usize>,
    /// `--trigger`
    pub trigger: Option<TriggerKind>,
    /// `--tab`, repeated. An empty list is ignored.
    pub tabs: Option<Vec<String>>,
}

/// Apply CLI argument overrides to resolved config.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, cli: CliOverrides) -> ResolvedConfig {
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }
    if let Some(max_items) = cli.max_items {
        config.max_items = max_items;
    }
    if let Some(trigger) = cli.trigger {
        config.trigger = trigger;
    }
    if let Some(tabs) = cli.tabs.filter(|tabs| !tabs.is_empty()) {
        config.tabs = tabs;
    }
    config
}

/// Reject configurations the feed cannot run with.
///
/// # Errors
///
/// `ConfigError::InvalidValue` naming the first offending field.
pub fn validate(config: &ResolvedConfig) -> Result<(), ConfigError> {
    if config.page_size == 0 {
        return Err(ConfigError::InvalidValue {
            field: "page_size",
            reason: "must be at least 1".to_string(),
        });
    }
    if config.debounce.is_zero() {
        return Err(ConfigError::InvalidValue {
            field: "debounce_ms",
            reason: "must be positive".to_string(),
        });
    }
    let threshold_ok = match config.scroll_threshold {
        ScrollThreshold::Pixels(px) => px.is_finite() && px > 0.0,
        ScrollThreshold::ViewportFraction(f) => f.is_finite() && f > 0.0,
    };
    if !threshold_ok {
        return Err(ConfigError::InvalidValue {
            field: "scroll_threshold",
            reason: "must be a positive finite number".to_string(),
        });
    }
    if !(config.sentinel_margin.is_finite() && config.sentinel_margin >= 0.0) {
        return Err(ConfigError::InvalidValue {
            field: "sentinel_margin",
            reason: "must be a non-negative finite number".to_string(),
        });
    }
    if let Some(sticky) = config.sticky_offset {
        if !(sticky.is_finite() && (0.0..=MAX_STICKY_OFFSET).contains(&sticky)) {
            return Err(ConfigError::InvalidValue {
                field: "sticky_offset",
                reason: format!("must be between 0 and {MAX_STICKY_OFFSET}"),
            });
        }
    }
    if config.tabs.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "tabs",
            reason: "at least one tab is required".to_string(),
        });
    }
    let ids = config.tab_ids()?;
    let mut seen = std::collections::HashSet::new();
    if let Some(duplicate) = ids.iter().find(|id| !seen.insert(*id)) {
        return Err(ConfigError::InvalidValue {
            field: "tabs",
            reason: format!("duplicate tab {duplicate}"),
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
