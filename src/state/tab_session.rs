//! Per-tab session registry.
//!
//! Implements "preserve on return" semantics for a multi-tab feed:
//! - Sessions are created lazily on first activation and live until teardown.
//! - Leaving a tab records its scroll offset and cancels its in-flight fetch.
//! - Returning to a tab restores its offset; items and page counter are untouched.
//!
//! The store is the only owner of sessions. Fetches started through it are identified
//! by a [`SessionTicket`] so completions are routed back to the right tab, and a
//! completion for a cancelled fetch is ignored.

use super::pagination::{
    Completion, FetchOutcome, FetchPhase, FetchTicket, PaginationController, PaginationState,
};
use super::scroll_trigger::{ScrollMetrics, ScrollTrigger, TriggerSettings};
use crate::layout::{
    ColumnBreakpoints, LayoutAdapter, LayoutHandle, LayoutSettings, ReflowStatus,
};
use crate::model::{FetchError, TabId};
use crate::source::Batch;
use std::collections::HashMap;
use std::fmt;
use std::time::Instant;
use tracing::{debug, info};

/// Builds the layout adapter for a newly created session.
pub type AdapterFactory = Box<dyn FnMut(&TabId) -> Box<dyn LayoutAdapter>>;

/// Options shared by every session in a store.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    /// Item ceiling per tab.
    pub max_items: usize,
    /// Distance from page top at which the tab bar sticks, if any.
    pub sticky_offset: Option<f64>,
    /// Scroll trigger for each session.
    pub trigger: TriggerSettings,
    /// Layout handle options.
    pub layout: LayoutSettings,
    /// Responsive column table.
    pub columns: ColumnBreakpoints,
    /// Initial viewport width in pixels, for the column count.
    pub viewport_width: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_items: 60,
            sticky_offset: Some(350.0),
            trigger: TriggerSettings::default(),
            layout: LayoutSettings::default(),
            columns: ColumnBreakpoints::default(),
            viewport_width: 1024,
        }
    }
}

/// A fetch started on behalf of a specific tab.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionTicket {
    /// Tab the fetch belongs to.
    pub tab_id: TabId,
    /// Controller ticket.
    pub ticket: FetchTicket,
}

/// What `activate` did.
#[derive(Debug, Clone, PartialEq)]
pub struct Activation {
    /// Tab now active.
    pub tab_id: TabId,
    /// Scroll offset the host should apply.
    pub restored_offset: f64,
    /// Whether the session was created by this activation.
    pub first_visit: bool,
    /// Initial fetch started because the tab had no items.
    pub initial_fetch: Option<SessionTicket>,
    /// In-flight fetch of the tab being left, now cancelled.
    pub cancelled: Option<SessionTicket>,
}

/// State of one tab.
pub struct TabSession {
    tab_id: TabId,
    controller: PaginationController,
    scroll_offset: f64,
    trigger: ScrollTrigger,
    layout: LayoutHandle,
}

impl TabSession {
    /// Tab this session belongs to.
    pub fn tab_id(&self) -> &TabId {
        &self.tab_id
    }

    /// Pagination controller.
    pub fn controller(&self) -> &PaginationController {
        &self.controller
    }

    /// Pagination state.
    pub fn state(&self) -> &PaginationState {
        self.controller.state()
    }

    /// Fetch phase.
    pub fn phase(&self) -> FetchPhase {
        self.controller.phase()
    }

    /// Last recorded scroll offset, in pixels.
    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// Layout handle for this tab's grid.
    pub fn layout(&self) -> &LayoutHandle {
        &self.layout
    }
}

impl fmt::Debug for TabSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabSession")
            .field("tab_id", &self.tab_id)
            .field("controller", &self.controller)
            .field("scroll_offset", &self.scroll_offset)
            .field("layout", &self.layout)
            .finish()
    }
}

/// Registry of tab sessions with one active tab.
pub struct TabSessionStore {
    sessions: HashMap<TabId, TabSession>,
    order: Vec<TabId>,
    active: Option<TabId>,
    settings: SessionSettings,
    viewport_width: u32,
    adapter_factory: AdapterFactory,
}

impl TabSessionStore {
    /// Empty store. Sessions are created on first activation.
    pub fn new(settings: SessionSettings, adapter_factory: AdapterFactory) -> Self {
        let viewport_width = settings.viewport_width;
        Self {
            sessions: HashMap::new(),
            order: Vec::new(),
            active: None,
            settings,
            viewport_width,
            adapter_factory,
        }
    }

    /// Settings shared by every session.
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Currently active tab.
    pub fn active_tab(&self) -> Option<&TabId> {
        self.active.as_ref()
    }

    /// Session of the active tab.
    pub fn active_session(&self) -> Option<&TabSession> {
        self.active.as_ref().and_then(|id| self.sessions.get(id))
    }

    /// Session for `tab_id`, if it was ever activated.
    pub fn session(&self, tab_id: &TabId) -> Option<&TabSession> {
        self.sessions.get(tab_id)
    }

    /// Tabs in the order their sessions were created.
    pub fn tab_ids(&self) -> &[TabId] {
        &self.order
    }

    /// Number of sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no tab was activated yet.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Current column count for the viewport width.
    pub fn columns(&self) -> u16 {
        self.settings.columns.columns_for(self.viewport_width)
    }

    /// Switch to `tab_id`. `current_offset` is the host's scroll offset right now.
    pub fn activate(&mut self, tab_id: &TabId, current_offset: f64) -> Activation {
        let current_offset = sanitize_offset(current_offset);
        let staying = self.active.as_ref() == Some(tab_id);

        let mut cancelled = None;
        if let Some(leaving) = self.active.clone() {
            if let Some(session) = self.sessions.get_mut(&leaving) {
                session.scroll_offset = current_offset;
                if !staying {
                    cancelled = session.controller.cancel().map(|ticket| SessionTicket {
                        tab_id: leaving.clone(),
                        ticket,
                    });
                }
            }
        }

        let first_visit = !self.sessions.contains_key(tab_id);
        let sticky = self.settings.sticky_offset;
        let columns = self.columns();
        let settings = &self.settings;
        let factory = &mut self.adapter_factory;
        let order = &mut self.order;
        let session = self.sessions.entry(tab_id.clone()).or_insert_with(|| {
            order.push(tab_id.clone());
            new_session(tab_id, settings, factory, columns)
        });

        let restored_offset = if staying {
            current_offset
        } else if first_visit {
            sticky
                .map(|sticky| current_offset.min(sticky))
                .unwrap_or(0.0)
        } else {
            session.scroll_offset
        };
        session.scroll_offset = restored_offset;

        let initial_fetch = if session.controller.items().is_empty()
            && session.controller.phase() == FetchPhase::Idle
        {
            session
                .controller
                .fetch_more()
                .ticket()
                .map(|ticket| SessionTicket {
                    tab_id: tab_id.clone(),
                    ticket,
                })
        } else {
            None
        };

        self.active = Some(tab_id.clone());
        info!(
            tab = %tab_id,
            first_visit,
            restored_offset,
            initial_fetch = initial_fetch.is_some(),
            cancelled = cancelled.is_some(),
            "tab activated"
        );

        Activation {
            tab_id: tab_id.clone(),
            restored_offset,
            first_visit,
            initial_fetch,
            cancelled,
        }
    }

    /// Record the active tab's scroll offset without evaluating the trigger.
    pub fn record_scroll(&mut self, offset: f64) {
        if let Some(session) = self.active_session_mut() {
            session.scroll_offset = sanitize_offset(offset);
        }
    }

    /// Scroll event for the active tab. Returns the fetch it started, if any.
    pub fn on_scroll(&mut self, metrics: &ScrollMetrics, now: Instant) -> Option<SessionTicket> {
        let session = self.active_session_mut()?;
        session.scroll_offset = sanitize_offset(metrics.scroll_offset);
        let is_loading = session.controller.state().is_loading();
        if !session.trigger.evaluate(metrics, is_loading, now) {
            return None;
        }
        let ticket = session.controller.fetch_more().ticket()?;
        debug!(tab = %session.tab_id, page = ticket.page_index(), "scroll trigger fired");
        Some(SessionTicket {
            tab_id: session.tab_id.clone(),
            ticket,
        })
    }

    /// Explicit "load more" for the active tab, bypassing the scroll trigger.
    pub fn fetch_more_active(&mut self) -> Option<SessionTicket> {
        let session = self.active_session_mut()?;
        let ticket = session.controller.fetch_more().ticket()?;
        Some(SessionTicket {
            tab_id: session.tab_id.clone(),
            ticket,
        })
    }

    /// `fetch_more` on any tab. `None` when the tab has no session.
    pub fn fetch_more(&mut self, tab_id: &TabId) -> Option<FetchOutcome> {
        self.sessions
            .get_mut(tab_id)
            .map(|session| session.controller.fetch_more())
    }

    /// Deliver a completion. Unknown tabs and cancelled tickets are stale.
    pub fn complete(
        &mut self,
        ticket: &SessionTicket,
        result: Result<Batch, FetchError>,
    ) -> Completion {
        let Some(session) = self.sessions.get_mut(&ticket.tab_id) else {
            return Completion::Stale;
        };
        let completion = session.controller.complete(ticket.ticket, result);
        if let Completion::Appended { total, .. } = completion {
            session.layout.request_reflow(total);
        }
        completion
    }

    /// The host rendered `rendered` items of `tab_id`.
    pub fn content_ready(&mut self, tab_id: &TabId, rendered: usize) -> Option<ReflowStatus> {
        self.sessions
            .get_mut(tab_id)
            .map(|session| session.layout.content_ready(rendered))
    }

    /// Viewport resized. Returns the new column count.
    pub fn set_viewport_width(&mut self, width: u32) -> u16 {
        self.viewport_width = width;
        let columns = self.columns();
        for session in self.sessions.values_mut() {
            session.layout.set_columns(columns);
        }
        columns
    }

    /// Cancel every fetch and release every layout handle. The store is empty afterwards.
    pub fn teardown(&mut self) -> Vec<SessionTicket> {
        let mut cancelled = Vec::new();
        for tab_id in self.order.drain(..) {
            if let Some(mut session) = self.sessions.remove(&tab_id) {
                if let Some(ticket) = session.controller.cancel() {
                    cancelled.push(SessionTicket {
                        tab_id: tab_id.clone(),
                        ticket,
                    });
                }
                session.layout.release();
            }
        }
        self.active = None;
        info!(cancelled = cancelled.len(), "session store torn down");
        cancelled
    }

    fn active_session_mut(&mut self) -> Option<&mut TabSession> {
        let id = self.active.as_ref()?;
        self.sessions.get_mut(id)
    }
}

impl fmt::Debug for TabSessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabSessionStore")
            .field("order", &self.order)
            .field("active", &self.active)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

fn new_session(
    tab_id: &TabId,
    settings: &SessionSettings,
    factory: &mut AdapterFactory,
    columns: u16,
) -> TabSession {
    let layout = LayoutHandle::acquire(
        (*factory)(tab_id),
        format!("grid-{tab_id}"),
        settings.layout.clone(),
        columns,
    );
    debug!(tab = %tab_id, columns, "session created");
    TabSession {
        tab_id: tab_id.clone(),
        controller: PaginationController::new(settings.max_items),
        scroll_offset: 0.0,
        trigger: ScrollTrigger::from_settings(&settings.trigger),
        layout,
    }
}

/// Offsets are finite and non-negative.
fn sanitize_offset(offset: f64) -> f64 {
    if offset.is_finite() && offset > 0.0 {
        offset
    } else {
        0.0
    }
}

#[cfg(test)]
#[path = "tab_session_tests.rs"]
mod tests;
