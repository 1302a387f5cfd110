//! Incremental, filter-aware pagination.
//!
//! - [`controller`] -- the synchronous state machine that accumulates pages.
//! - [`browser`] -- an async driver that runs the controller's fetches on
//!   tokio and publishes snapshots.

pub mod browser;
pub mod controller;

pub use browser::Browser;
pub use controller::{
    PageRequest, PaginationController, PaginationSnapshot, Phase, Resolution,
};
