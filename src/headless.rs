//! Headless feed run.
//!
//! Scrolls every tab to the bottom repeatedly on a virtual clock until its feed is
//! exhausted, then reports what each tab ended up holding. Uses the same runtime and
//! terminal layout adapter as the TUI, with a pixel viewport instead of a terminal.

use crate::config::{ConfigError, ResolvedConfig};
use crate::model::GalleryItem;
use crate::state::{FetchPhase, ScrollMetrics};
use crate::view::{feed_runtime, header_height, GridLayout, LayoutPlans};
use serde::Serialize;
use std::time::Instant;
use tracing::{info, warn};

/// Viewport and iteration limit for a headless run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadlessOptions {
    /// Viewport width in pixels.
    pub viewport_width: u32,
    /// Viewport height in pixels.
    pub viewport_height: u32,
    /// Scroll steps per tab before giving up.
    pub max_steps: usize,
}

impl Default for HeadlessOptions {
    fn default() -> Self {
        Self {
            viewport_width: 1280,
            viewport_height: 800,
            max_steps: 500,
        }
    }
}

/// Final state of one tab after a headless run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabReport {
    /// Tab name.
    pub tab: String,
    /// Items loaded.
    pub items: usize,
    /// Batches appended.
    pub pages_loaded: u32,
    /// Whether the feed reached its ceiling.
    pub exhausted: bool,
    /// Offset recorded when the run left the tab.
    pub scroll_offset: f64,
    /// Header plus packed grid, in pixels.
    pub content_height: u32,
    /// Last loaded item, if any.
    pub last_item: Option<GalleryItem>,
}

/// JSON report printed by `--headless`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlessReport {
    /// Viewport width in pixels.
    pub viewport_width: u32,
    /// Viewport height in pixels.
    pub viewport_height: u32,
    /// Column count for the viewport width.
    pub columns: u16,
    /// One entry per configured tab, in order.
    pub tabs: Vec<TabReport>,
}

/// Run the scripted scroll-to-bottom simulation over every configured tab.
///
/// # Errors
///
/// `ConfigError` if a tab name is invalid.
pub fn simulate(
    config: &ResolvedConfig,
    options: &HeadlessOptions,
) -> Result<HeadlessReport, ConfigError> {
    let tabs = config.tab_ids()?;
    let plans = LayoutPlans::new();
    let mut runtime = feed_runtime(config, &plans, options.viewport_width);
    let header = header_height(config);
    let viewport_height = f64::from(options.viewport_height);
    // Each step waits out both the fetch latency and the debounce window
    let step = config.fetch_latency.max(config.debounce);

    let mut now = Instant::now();
    let mut offset = 0.0;
    let mut reports = Vec::with_capacity(tabs.len());

    for tab in &tabs {
        let activation = runtime.activate(tab, offset, now);
        offset = activation.restored_offset;
        let mut content_height = header;
        let mut settled = false;

        for _ in 0..options.max_steps {
            now += step;
            runtime.poll(now);

            let (loaded, container, phase) = match runtime.store().session(tab) {
                Some(s) => (
                    s.state().items().len(),
                    s.layout().container().to_string(),
                    s.phase(),
                ),
                None => break,
            };
            runtime.content_ready(tab, loaded);

            let Some(session) = runtime.store().session(tab) else {
                break;
            };
            let grid = GridLayout::compute(
                session.state().items(),
                plans.get(&container),
                options.viewport_width,
            );
            content_height = header.saturating_add(grid.content_height);

            if phase == FetchPhase::Exhausted && runtime.pending_count() == 0 {
                settled = true;
                break;
            }

            offset = (f64::from(content_height) - viewport_height).max(0.0);
            let metrics = ScrollMetrics::new(offset, viewport_height, f64::from(content_height));
            runtime.on_scroll(&metrics, now);
        }

        if !settled {
            warn!(tab = %tab, steps = options.max_steps, "headless run stopped before exhaustion");
        }

        let Some(session) = runtime.store().session(tab) else {
            continue;
        };
        let items = session.state().items();
        reports.push(TabReport {
            tab: tab.to_string(),
            items: items.len(),
            pages_loaded: session.state().next_page_index(),
            exhausted: session.phase() == FetchPhase::Exhausted,
            scroll_offset: offset,
            content_height,
            last_item: items.last().cloned(),
        });
    }

    let columns = runtime.store().columns();
    runtime.shutdown();
    info!(tabs = reports.len(), columns, "headless run complete");

    Ok(HeadlessReport {
        viewport_width: options.viewport_width,
        viewport_height: options.viewport_height,
        columns,
        tabs: reports,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn every_tab_reaches_the_ceiling() {
        let report = simulate(&ResolvedConfig::default(), &HeadlessOptions::default()).unwrap();

        assert_eq!(report.tabs.len(), 3);
        for tab in &report.tabs {
            assert_eq!(tab.items, 60, "tab {} should hold max_items", tab.tab);
            assert_eq!(tab.pages_loaded, 10);
            assert!(tab.exhausted);
            assert_eq!(tab.last_item.as_ref().map(GalleryItem::id), Some(59));
        }
    }

    #[test]
    fn columns_follow_viewport_width() {
        let report = simulate(&ResolvedConfig::default(), &HeadlessOptions::default()).unwrap();
        assert_eq!(report.columns, 4);
    }

    #[test]
    fn ceiling_overshoot_keeps_whole_batches() {
        let config = ResolvedConfig {
            page_size: 4,
            max_items: 10,
            tabs: vec!["only".to_string()],
            fetch_latency: Duration::ZERO,
            ..ResolvedConfig::default()
        };
        let report = simulate(&config, &HeadlessOptions::default()).unwrap();
        assert_eq!(report.tabs[0].items, 12);
    }

    #[test]
    fn zero_ceiling_loads_nothing() {
        let config = ResolvedConfig {
            max_items: 0,
            ..ResolvedConfig::default()
        };
        let report = simulate(&config, &HeadlessOptions::default()).unwrap();
        assert!(report.tabs.iter().all(|t| t.items == 0 && t.exhausted));
    }

    #[test]
    fn oversized_header_does_not_overflow_content_height() {
        let config = ResolvedConfig {
            sticky_offset: Some(5e9),
            max_items: 6,
            ..ResolvedConfig::default()
        };
        let report = simulate(&config, &HeadlessOptions::default()).unwrap();
        assert!(report.tabs.iter().all(|t| t.content_height == u32::MAX));
    }

    #[test]
    fn report_serializes_camel_case() {
        let report = simulate(&ResolvedConfig::default(), &HeadlessOptions::default()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["viewportWidth"], 1280);
        assert_eq!(json["tabs"][0]["tab"], "discover");
        assert_eq!(json["tabs"][0]["pagesLoaded"], 10);
    }
}
