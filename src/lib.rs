//! Cinescope - Movie discovery over the TMDB API
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod fetcher;
pub mod filter;
pub mod images;
pub mod pagination;
pub mod server;
pub mod tmdb;
