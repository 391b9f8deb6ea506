//! Scoped layout handle with a readiness barrier.
//!
//! A reflow requested for `n` items waits until the host reports that at least `n`
//! items are rendered and measurable. Requests that would repeat the last successful
//! reflow are skipped. Adapter failures drop the request; the next item-count change
//! asks again.

use super::adapter::{LayoutAdapter, ReflowRequest, SizingBasis};
use std::fmt;
use tracing::{debug, warn};

/// Container-independent layout options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutSettings {
    /// Selector matching the items to pack.
    pub item_selector: String,
    /// Gap between columns, in pixels.
    pub gutter: u16,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            item_selector: ".grid-item".to_string(),
            gutter: 16,
        }
    }
}

/// What a call on the handle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflowStatus {
    /// The adapter reflowed.
    Reflowed,
    /// A request is pending until more content is rendered.
    Waiting,
    /// The request matched the last reflow and was skipped.
    UpToDate,
    /// The adapter failed or was released; the request was discarded.
    Dropped,
    /// Nothing to do.
    Idle,
}

/// Scoped layout resource for one container.
pub struct LayoutHandle {
    adapter: Option<Box<dyn LayoutAdapter>>,
    container: String,
    settings: LayoutSettings,
    columns: u16,
    item_count: usize,
    rendered: usize,
    pending: Option<usize>,
    last_reflow: Option<(usize, u16)>,
}

impl LayoutHandle {
    /// Take ownership of `adapter` for `container`.
    pub fn acquire(
        adapter: Box<dyn LayoutAdapter>,
        container: impl Into<String>,
        settings: LayoutSettings,
        columns: u16,
    ) -> Self {
        let container = container.into();
        debug!(container = %container, columns, "layout handle acquired");
        Self {
            adapter: Some(adapter),
            container,
            settings,
            columns: columns.max(1),
            item_count: 0,
            rendered: 0,
            pending: None,
            last_reflow: None,
        }
    }

    /// Container this handle reflows.
    pub fn container(&self) -> &str {
        &self.container
    }

    /// Column count used for the next reflow.
    pub fn columns(&self) -> u16 {
        self.columns
    }

    /// Whether the adapter has been released.
    pub fn is_released(&self) -> bool {
        self.adapter.is_none()
    }

    /// Whether a reflow is waiting for content.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Item count of the last successful reflow.
    pub fn last_reflowed_count(&self) -> Option<usize> {
        self.last_reflow.map(|(count, _)| count)
    }

    /// The item list changed to `item_count` items.
    pub fn request_reflow(&mut self, item_count: usize) -> ReflowStatus {
        self.item_count = item_count;
        self.pending = Some(item_count);
        self.flush()
    }

    /// The host rendered `rendered` items; releases any request they satisfy.
    pub fn content_ready(&mut self, rendered: usize) -> ReflowStatus {
        self.rendered = rendered;
        self.flush()
    }

    /// Column count changed (viewport resize).
    pub fn set_columns(&mut self, columns: u16) -> ReflowStatus {
        let columns = columns.max(1);
        if columns == self.columns {
            return ReflowStatus::Idle;
        }
        self.columns = columns;
        self.pending = Some(self.item_count);
        self.flush()
    }

    /// Release the adapter. Later calls are no-ops.
    pub fn release(&mut self) {
        if let Some(mut adapter) = self.adapter.take() {
            adapter.release();
            self.pending = None;
            debug!(container = %self.container, "layout handle released");
        }
    }

    fn request_for(&self, item_count: usize) -> ReflowRequest {
        ReflowRequest {
            container: self.container.clone(),
            item_selector: self.settings.item_selector.clone(),
            sizing_basis: SizingBasis::Columns(self.columns),
            gutter: self.settings.gutter,
            item_count,
        }
    }

    fn flush(&mut self) -> ReflowStatus {
        let Some(target) = self.pending else {
            return ReflowStatus::Idle;
        };
        if self.rendered < target {
            return ReflowStatus::Waiting;
        }
        self.pending = None;

        if self.last_reflow == Some((target, self.columns)) {
            return ReflowStatus::UpToDate;
        }

        let request = self.request_for(target);
        let Some(adapter) = self.adapter.as_mut() else {
            return ReflowStatus::Dropped;
        };
        match adapter.reflow(&request) {
            Ok(()) => {
                self.last_reflow = Some((target, self.columns));
                debug!(container = %self.container, items = target, columns = self.columns, "reflowed");
                ReflowStatus::Reflowed
            }
            Err(err) => {
                warn!(container = %self.container, error = %err, "reflow dropped");
                ReflowStatus::Dropped
            }
        }
    }
}

impl Drop for LayoutHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for LayoutHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutHandle")
            .field("container", &self.container)
            .field("columns", &self.columns)
            .field("item_count", &self.item_count)
            .field("rendered", &self.rendered)
            .field("pending", &self.pending)
            .field("released", &self.adapter.is_none())
            .finish()
    }
}
