//! Feed runtime: pure core integration for the event loop.
//!
//! Couples a [`TabSessionStore`] to a [`BatchSource`] with a simulated fetch latency.
//! Started fetches wait in a queue until their due instant; [`FeedRuntime::poll`]
//! resolves them in start order. Everything is driven by explicit `now` values, so
//! the runtime is testable without sleeping.

use crate::layout::ReflowStatus;
use crate::model::TabId;
use crate::source::BatchSource;
use crate::state::{Activation, Completion, ScrollMetrics, SessionTicket, TabSessionStore};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::debug;

/// Latency used by the demo feed.
pub const DEFAULT_FETCH_LATENCY: Duration = Duration::from_millis(600);

#[derive(Debug, Clone)]
struct PendingFetch {
    ticket: SessionTicket,
    due: Instant,
}

/// A resolved fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// Tab and fetch the completion belongs to.
    pub ticket: SessionTicket,
    /// What the store did with the result.
    pub completion: Completion,
}

/// Tab session store driven against a batch source with simulated latency.
#[derive(Debug)]
pub struct FeedRuntime<S> {
    store: TabSessionStore,
    source: S,
    latency: Duration,
    pending: VecDeque<PendingFetch>,
}

impl<S: BatchSource> FeedRuntime<S> {
    /// Runtime with an empty fetch queue.
    pub fn new(store: TabSessionStore, source: S, latency: Duration) -> Self {
        Self {
            store,
            source,
            latency,
            pending: VecDeque::new(),
        }
    }

    /// Read-only view of the session store.
    pub fn store(&self) -> &TabSessionStore {
        &self.store
    }

    /// The batch source fetches are resolved from.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetches waiting for their due instant.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Earliest instant at which `poll` has work.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|p| p.due).min()
    }

    /// Switch tabs, dropping the cancelled fetch and scheduling any initial fetch.
    pub fn activate(&mut self, tab_id: &TabId, current_offset: f64, now: Instant) -> Activation {
        let activation = self.store.activate(tab_id, current_offset);
        if let Some(cancelled) = &activation.cancelled {
            self.pending.retain(|p| &p.ticket != cancelled);
        }
        if let Some(ticket) = &activation.initial_fetch {
            self.schedule(ticket.clone(), now);
        }
        activation
    }

    /// Scroll event for the active tab. Returns whether a fetch started.
    pub fn on_scroll(&mut self, metrics: &ScrollMetrics, now: Instant) -> bool {
        match self.store.on_scroll(metrics, now) {
            Some(ticket) => {
                self.schedule(ticket, now);
                true
            }
            None => false,
        }
    }

    /// Re-evaluate the trigger at the active tab's recorded offset after content changed.
    pub fn settle(&mut self, viewport_height: f64, content_height: f64, now: Instant) -> bool {
        let Some(offset) = self.store.active_session().map(|s| s.scroll_offset()) else {
            return false;
        };
        let metrics = ScrollMetrics::new(offset, viewport_height, content_height);
        self.on_scroll(&metrics, now)
    }

    /// Explicit "load more" for the active tab.
    pub fn load_more(&mut self, now: Instant) -> bool {
        match self.store.fetch_more_active() {
            Some(ticket) => {
                self.schedule(ticket, now);
                true
            }
            None => false,
        }
    }

    /// Resolve every fetch due at or before `now`, in start order.
    pub fn poll(&mut self, now: Instant) -> Vec<Resolved> {
        let (due, waiting): (VecDeque<_>, VecDeque<_>) =
            self.pending.drain(..).partition(|p| p.due <= now);
        self.pending = waiting;

        due.into_iter()
            .map(|pending| {
                let result = self.source.fetch(pending.ticket.ticket.page_index());
                let completion = self.store.complete(&pending.ticket, result);
                debug!(
                    tab = %pending.ticket.tab_id,
                    page = pending.ticket.ticket.page_index(),
                    ?completion,
                    "fetch resolved"
                );
                Resolved {
                    ticket: pending.ticket,
                    completion,
                }
            })
            .collect()
    }

    /// The host rendered `rendered` items of `tab_id`.
    pub fn content_ready(&mut self, tab_id: &TabId, rendered: usize) -> Option<ReflowStatus> {
        self.store.content_ready(tab_id, rendered)
    }

    /// Viewport width changed; returns the new column count.
    pub fn set_viewport_width(&mut self, width: u32) -> u16 {
        self.store.set_viewport_width(width)
    }

    /// Cancel everything and release layout handles.
    pub fn shutdown(&mut self) -> Vec<SessionTicket> {
        self.pending.clear();
        self.store.teardown()
    }

    fn schedule(&mut self, ticket: SessionTicket, now: Instant) {
        debug!(tab = %ticket.tab_id, page = ticket.ticket.page_index(), "fetch scheduled");
        self.pending.push_back(PendingFetch {
            ticket,
            due: now + self.latency,
        });
    }
}
