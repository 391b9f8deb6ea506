//! Infinite-scroll pagination state machine.
//!
//! ```text
//! Idle --fetch_more--> Loading --complete(Ok)--> Idle | Exhausted
//!                      Loading --complete(Err)-> Idle
//!                      Loading --cancel------->  Idle
//! ```
//!
//! At most one fetch is in flight per controller. Every started fetch is identified by a
//! [`FetchTicket`]; the controller only accepts a completion for the ticket it issued
//! last, so a callback that outlives a cancel (tab switch, teardown) cannot mutate state.

use crate::model::{FetchError, GalleryItem};
use crate::source::Batch;
use tracing::{debug, info, warn};

/// Observable pagination state for one feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    items: Vec<GalleryItem>,
    next_page_index: u32,
    is_loading: bool,
    has_more: bool,
}

impl PaginationState {
    fn new(has_more: bool) -> Self {
        Self {
            items: Vec::new(),
            next_page_index: 0,
            is_loading: false,
            has_more,
        }
    }

    /// Accumulated items, append-only.
    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    /// Page the next fetch will request.
    pub fn next_page_index(&self) -> u32 {
        self.next_page_index
    }

    /// Whether a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Whether the ceiling is still ahead.
    pub fn has_more(&self) -> bool {
        self.has_more
    }
}

/// Coarse lifecycle phase derived from [`PaginationState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    /// No fetch in flight and more items available.
    Idle,
    /// A fetch is in flight.
    Loading,
    /// Terminal. No transitions out.
    Exhausted,
}

/// Identifies one started fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    page_index: u32,
    generation: u64,
}

impl FetchTicket {
    /// Page this fetch requests.
    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    /// Generation stamp; older generations are stale.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Why `fetch_more` did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A fetch is already in flight; the request is dropped, not queued.
    InFlight,
    /// The item ceiling was reached.
    Exhausted,
}

/// Result of `fetch_more`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A fetch started; complete it with this ticket.
    Started(FetchTicket),
    /// Nothing started.
    Skipped(SkipReason),
}

impl FetchOutcome {
    /// The started ticket, if any.
    pub fn ticket(&self) -> Option<FetchTicket> {
        match self {
            Self::Started(ticket) => Some(*ticket),
            Self::Skipped(_) => None,
        }
    }
}

/// Result of delivering a fetch completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The batch was appended.
    Appended {
        /// Items in this batch.
        added: usize,
        /// Items loaded after appending.
        total: usize,
        /// Whether this batch reached the ceiling.
        exhausted: bool,
    },
    /// The source failed; loading cleared, state otherwise unchanged.
    Failed(FetchError),
    /// The ticket was cancelled or superseded; nothing changed.
    Stale,
}

/// Owns one feed's pagination state and enforces the single-flight rule.
#[derive(Debug, Clone)]
pub struct PaginationController {
    state: PaginationState,
    max_items: usize,
    generation: u64,
    in_flight: Option<FetchTicket>,
}

impl PaginationController {
    /// Controller that stops fetching once `max_items` items have accumulated.
    pub fn new(max_items: usize) -> Self {
        Self {
            state: PaginationState::new(max_items > 0),
            max_items,
            generation: 0,
            in_flight: None,
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    /// Items loaded so far.
    pub fn items(&self) -> &[GalleryItem] {
        self.state.items()
    }

    /// Item ceiling.
    pub fn max_items(&self) -> usize {
        self.max_items
    }

    /// Ticket of the fetch in flight.
    pub fn in_flight(&self) -> Option<FetchTicket> {
        self.in_flight
    }

    /// Current phase.
    pub fn phase(&self) -> FetchPhase {
        if self.state.is_loading {
            FetchPhase::Loading
        } else if !self.state.has_more {
            FetchPhase::Exhausted
        } else {
            FetchPhase::Idle
        }
    }

    /// Start fetching the next page, unless one is in flight or the feed is exhausted.
    pub fn fetch_more(&mut self) -> FetchOutcome {
        if self.state.is_loading {
            debug!(page = self.state.next_page_index, "fetch_more dropped: in flight");
            return FetchOutcome::Skipped(SkipReason::InFlight);
        }
        if !self.state.has_more {
            debug!(items = self.state.items.len(), "fetch_more dropped: exhausted");
            return FetchOutcome::Skipped(SkipReason::Exhausted);
        }

        self.generation += 1;
        let ticket = FetchTicket {
            page_index: self.state.next_page_index,
            generation: self.generation,
        };
        self.state.is_loading = true;
        self.in_flight = Some(ticket);
        debug!(page = ticket.page_index, generation = ticket.generation, "fetch started");
        FetchOutcome::Started(ticket)
    }

    /// Deliver the result of the fetch identified by `ticket`.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<Batch, FetchError>,
    ) -> Completion {
        if self.in_flight != Some(ticket) {
            debug!(
                page = ticket.page_index,
                generation = ticket.generation,
                "stale fetch completion ignored"
            );
            return Completion::Stale;
        }
        self.in_flight = None;
        self.state.is_loading = false;

        match result {
            Ok(batch) => {
                let added = batch.len();
                self.state.items.extend(batch.into_items());
                self.state.next_page_index += 1;
                let total = self.state.items.len();
                if total >= self.max_items {
                    self.state.has_more = false;
                    info!(total, max_items = self.max_items, "feed exhausted");
                }
                debug!(page = ticket.page_index, added, total, "batch appended");
                Completion::Appended {
                    added,
                    total,
                    exhausted: !self.state.has_more,
                }
            }
            Err(err) => {
                warn!(page = ticket.page_index, error = %err, "fetch failed, will retry on next trigger");
                Completion::Failed(err)
            }
        }
    }

    /// Abandon the in-flight fetch, if any. Its completion will be reported as stale.
    pub fn cancel(&mut self) -> Option<FetchTicket> {
        let cancelled = self.in_flight.take()?;
        self.generation += 1;
        self.state.is_loading = false;
        debug!(page = cancelled.page_index, "in-flight fetch cancelled");
        Some(cancelled)
    }
}

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod tests;
