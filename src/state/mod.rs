//! Feed state machines (pure).
//!
//! All state transitions are plain methods taking the current time as an argument,
//! testable without a terminal or a real clock.

pub mod pagination;
pub mod rate_limiter;
pub mod scroll_trigger;
pub mod tab_session;

// Re-export for convenience
pub use pagination::{
    Completion, FetchOutcome, FetchPhase, FetchTicket, PaginationController, PaginationState,
    SkipReason,
};
pub use rate_limiter::RateLimiter;
pub use scroll_trigger::{
    ScrollMetrics, ScrollThreshold, ScrollTrigger, ThresholdTrigger, TriggerKind,
    TriggerSettings, VisibilityTrigger,
};
pub use tab_session::{
    Activation, AdapterFactory, SessionSettings, SessionTicket, TabSession, TabSessionStore,
};
