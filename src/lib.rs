//! Masonry Feed
//!
//! Infinite-scroll masonry gallery with per-tab pagination sessions, shown in the
//! terminal.
//!
//! Follows a Pure Core / Impure Shell split: `model`, `source`, `state`, `layout` and
//! `integration` are deterministic and take the current time as an argument; `view`
//! owns the terminal.

pub mod config;
pub mod headless;
pub mod layout;
pub mod logging;
pub mod model;
pub mod source;
pub mod state;
pub mod view;

// Re-export main loop integration
pub mod integration;
