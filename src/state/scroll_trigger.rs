//! Near-bottom detection for infinite scroll.
//!
//! Two strategies share one contract: fire at most once per rate-limit window, never
//! while a fetch is loading, and only when the end of content is close to the viewport.
//!
//! - [`ThresholdTrigger`] compares the distance to the bottom against a threshold.
//! - [`VisibilityTrigger`] watches a sentinel placed after the last item.
//!
//! Both are level-triggered: as long as the condition holds, every rate-limit window
//! may produce one trigger. Short content therefore keeps loading until it fills the
//! viewport or the feed is exhausted.

use super::rate_limiter::RateLimiter;
use serde::Deserialize;
use std::time::{Duration, Instant};

/// Scroll geometry snapshot, all values in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    /// Distance scrolled from the top, in pixels.
    pub scroll_offset: f64,
    /// Visible height, in pixels.
    pub viewport_height: f64,
    /// Total scrollable height, in pixels.
    pub content_height: f64,
}

impl ScrollMetrics {
    /// Metrics from raw host values.
    pub fn new(scroll_offset: f64, viewport_height: f64, content_height: f64) -> Self {
        Self {
            scroll_offset,
            viewport_height,
            content_height,
        }
    }

    /// `content_height - (scroll_offset + viewport_height)`; negative when overscrolled.
    pub fn distance_to_bottom(&self) -> f64 {
        self.content_height - (self.scroll_offset + self.viewport_height)
    }

    /// Bottom edge of the viewport in content coordinates.
    pub fn viewport_bottom(&self) -> f64 {
        self.scroll_offset + self.viewport_height
    }
}

/// How close to the bottom counts as "near".
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollThreshold {
    /// Absolute distance in pixels.
    Pixels(f64),
    /// Fraction of the viewport height.
    ViewportFraction(f64),
}

impl ScrollThreshold {
    /// Threshold in pixels for a viewport of `viewport_height`.
    pub fn resolve(&self, viewport_height: f64) -> f64 {
        match *self {
            Self::Pixels(px) => px,
            Self::ViewportFraction(fraction) => fraction * viewport_height,
        }
    }
}

impl Default for ScrollThreshold {
    fn default() -> Self {
        Self::Pixels(300.0)
    }
}

/// Fires when `distance_to_bottom < threshold`.
#[derive(Debug, Clone)]
pub struct ThresholdTrigger {
    threshold: ScrollThreshold,
    limiter: RateLimiter,
}

impl ThresholdTrigger {
    /// Trigger firing below `threshold`, at most once per `min_interval`.
    pub fn new(threshold: ScrollThreshold, min_interval: Duration) -> Self {
        Self {
            threshold,
            limiter: RateLimiter::new(min_interval),
        }
    }

    /// Configured threshold.
    pub fn threshold(&self) -> ScrollThreshold {
        self.threshold
    }

    /// Returns `true` when the caller should invoke `fetch_more`.
    pub fn on_scroll(&mut self, metrics: &ScrollMetrics, is_loading: bool, now: Instant) -> bool {
        if is_loading {
            return false;
        }
        let threshold = self.threshold.resolve(metrics.viewport_height);
        if metrics.distance_to_bottom() >= threshold {
            return false;
        }
        self.limiter.try_acquire(now)
    }
}

/// Fires when a sentinel at the end of content is visible within `root_margin`.
#[derive(Debug, Clone)]
pub struct VisibilityTrigger {
    root_margin: f64,
    limiter: RateLimiter,
}

impl VisibilityTrigger {
    /// Trigger firing when the sentinel is within `root_margin`.
    pub fn new(root_margin: f64, min_interval: Duration) -> Self {
        Self {
            root_margin,
            limiter: RateLimiter::new(min_interval),
        }
    }

    /// Visibility margin, in pixels.
    pub fn root_margin(&self) -> f64 {
        self.root_margin
    }

    /// Whether a sentinel at `sentinel_top` intersects the viewport grown by the margin.
    pub fn is_visible(&self, sentinel_top: f64, metrics: &ScrollMetrics) -> bool {
        let top = metrics.scroll_offset - self.root_margin;
        let bottom = metrics.viewport_bottom() + self.root_margin;
        sentinel_top >= top && sentinel_top <= bottom
    }

    /// Evaluate a sentinel placed at `sentinel_top`.
    pub fn observe(
        &mut self,
        sentinel_top: f64,
        metrics: &ScrollMetrics,
        is_loading: bool,
        now: Instant,
    ) -> bool {
        let visible = self.is_visible(sentinel_top, metrics);
        self.on_visibility(visible, is_loading, now)
    }

    /// Host-reported intersection notification.
    pub fn on_visibility(&mut self, is_intersecting: bool, is_loading: bool, now: Instant) -> bool {
        if is_loading || !is_intersecting {
            return false;
        }
        self.limiter.try_acquire(now)
    }
}

/// Strategy selector used in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    /// Distance-to-bottom threshold.
    #[default]
    Threshold,
    /// Sentinel visibility.
    Sentinel,
}

/// Parameters needed to build a [`ScrollTrigger`] for a new session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerSettings {
    /// Which trigger to build.
    pub kind: TriggerKind,
    /// Threshold for the threshold trigger.
    pub threshold: ScrollThreshold,
    /// Margin for the sentinel trigger.
    pub sentinel_margin: f64,
    /// Debounce interval.
    pub min_interval: Duration,
}

impl Default for TriggerSettings {
    fn default() -> Self {
        Self {
            kind: TriggerKind::Threshold,
            threshold: ScrollThreshold::default(),
            sentinel_margin: 200.0,
            min_interval: Duration::from_millis(1000),
        }
    }
}

/// Either strategy behind one interface.
#[derive(Debug, Clone)]
pub enum ScrollTrigger {
    /// Distance-to-bottom threshold.
    Threshold(ThresholdTrigger),
    /// Sentinel visibility.
    Visibility(VisibilityTrigger),
}

impl ScrollTrigger {
    /// Build the configured trigger.
    pub fn from_settings(settings: &TriggerSettings) -> Self {
        match settings.kind {
            TriggerKind::Threshold => Self::Threshold(ThresholdTrigger::new(
                settings.threshold,
                settings.min_interval,
            )),
            TriggerKind::Sentinel => Self::Visibility(VisibilityTrigger::new(
                settings.sentinel_margin,
                settings.min_interval,
            )),
        }
    }

    /// Evaluate the current geometry. The sentinel sits at the end of content.
    pub fn evaluate(&mut self, metrics: &ScrollMetrics, is_loading: bool, now: Instant) -> bool {
        match self {
            Self::Threshold(trigger) => trigger.on_scroll(metrics, is_loading, now),
            Self::Visibility(trigger) => {
                trigger.observe(metrics.content_height, metrics, is_loading, now)
            }
        }
    }
}

#[cfg(test)]
#[path = "scroll_trigger_tests.rs"]
mod tests;
