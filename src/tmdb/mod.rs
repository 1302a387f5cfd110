//! Gateway to the remote movie metadata API.
//!
//! This module defines the [`MovieGateway`] trait, one async operation per
//! upstream listing endpoint, together with the raw wire types those
//! endpoints return.
//!
//! # Module layout
//!
//! - [`client`] -- [`TmdbGateway`], the reqwest-backed TMDB v3 implementation.

pub mod client;

use async_trait::async_trait;
use cinescope_common::{MovieSummary, Result};
use serde::Deserialize;

pub use client::TmdbGateway;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// One page exactly as the upstream returned it.
///
/// Missing fields default to empty/zero so a sparse response still decodes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPage {
    #[serde(default)]
    pub results: Vec<RawMovie>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
}

/// A movie record from a search, discover or popular listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMovie {
    pub id: u64,
    pub title: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
    pub genre_ids: Option<Vec<u32>>,
}

impl RawMovie {
    /// Normalize into a [`MovieSummary`].
    ///
    /// Empty strings for optional fields become `None` and the rating is
    /// clamped into `0.0..=10.0`.
    pub fn into_summary(self) -> MovieSummary {
        let non_empty = |s: Option<String>| s.filter(|v| !v.is_empty());
        let rating = self.vote_average.unwrap_or(0.0);

        MovieSummary {
            id: self.id,
            title: self.title.unwrap_or_default(),
            overview: self.overview.unwrap_or_default(),
            poster_path: non_empty(self.poster_path),
            release_date: non_empty(self.release_date),
            vote_average: if rating.is_nan() {
                0.0
            } else {
                rating.clamp(0.0, 10.0)
            },
            genre_ids: self.genre_ids.unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Gateway trait
// ---------------------------------------------------------------------------

/// Async trait over the three upstream listing endpoints.
///
/// Each call performs exactly one outbound request. Failures are reported as
/// [`Error::RemoteApi`](cinescope_common::Error::RemoteApi) and never retried
/// here.
#[async_trait]
pub trait MovieGateway: Send + Sync {
    /// Free-text title search, optionally narrowed to a primary release
    /// year. The upstream treats the year as a hint, not a guarantee.
    async fn fetch_by_keyword(
        &self,
        keyword: &str,
        year: Option<i32>,
        page: u32,
    ) -> Result<RawPage>;

    /// Filtered listing sorted by descending popularity, optionally limited
    /// to a primary release year.
    async fn fetch_by_filter(&self, year: Option<i32>, page: u32) -> Result<RawPage>;

    /// Unfiltered popular movies.
    async fn fetch_popular(&self, page: u32) -> Result<RawPage>;
}
