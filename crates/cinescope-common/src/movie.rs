//! Movie summaries and result pages.
//!
//! These are the normalized shapes handed from the fetcher to the pagination
//! controller and out over HTTP. The serialized field names follow the
//! upstream API (`results`, `page`, `total_pages`, `total_results`) so the
//! front end can consume either source without distinction.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::types::Genre;

/// One movie as shown in a result list. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    /// Upstream-assigned identifier.
    pub id: u64,
    pub title: String,
    pub overview: String,
    /// Relative poster path (e.g. `/abc.jpg`), if the movie has one.
    pub poster_path: Option<String>,
    /// Release date as an ISO-8601 string (YYYY-MM-DD).
    pub release_date: Option<String>,
    /// Audience rating, always within `0.0..=10.0`.
    pub vote_average: f64,
    pub genre_ids: Vec<u32>,
}

impl MovieSummary {
    /// Year the movie was released, if the date is known.
    pub fn release_year(&self) -> Option<i32> {
        let date = self.release_date.as_deref()?;
        match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            Ok(parsed) => Some(parsed.year()),
            Err(_) => date.get(..4).and_then(|y| y.parse().ok()),
        }
    }

    /// Whether the release date string begins with `year`.
    ///
    /// Movies without a release date never match.
    pub fn is_released_in(&self, year: i32) -> bool {
        self.release_date
            .as_deref()
            .is_some_and(|date| date.starts_with(&year.to_string()))
    }

    /// Known genres of this movie, in upstream order. Unlabelled ids are skipped.
    pub fn genres(&self) -> impl Iterator<Item = Genre> + '_ {
        self.genre_ids.iter().filter_map(|id| Genre::from_id(*id))
    }
}

/// A single page of results plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPage {
    #[serde(rename = "results")]
    pub items: Vec<MovieSummary>,
    #[serde(rename = "page")]
    pub page_number: u32,
    pub total_pages: u32,
    pub total_results: u64,
}
