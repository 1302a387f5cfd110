//! Normalized movie queries.

use serde::{Deserialize, Serialize};

/// First page index used by the upstream API.
pub const START_PAGE: u32 = 1;

/// A normalized request for one page of movies.
///
/// A blank keyword is stored as `None`, so "no keyword" has exactly one
/// representation. `page` is never below [`START_PAGE`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Query {
    pub keyword: Option<String>,
    pub release_year: Option<i32>,
    pub page: u32,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            keyword: None,
            release_year: None,
            page: START_PAGE,
        }
    }
}

impl Query {
    /// Build a first-page query from raw filter values.
    pub fn new(keyword: Option<String>, release_year: Option<i32>) -> Self {
        Self {
            keyword: normalize_keyword(keyword),
            release_year,
            page: START_PAGE,
        }
    }

    /// Same filters, different page. Pages below 1 are clamped.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(START_PAGE);
        self
    }

    /// Keyword to search for, if any.
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    /// Whether both keyword and year are unset.
    pub fn is_default(&self) -> bool {
        self.keyword.is_none() && self.release_year.is_none()
    }

    /// Whether `other` selects the same result set, ignoring the page.
    pub fn same_filters(&self, other: &Query) -> bool {
        self.keyword == other.keyword && self.release_year == other.release_year
    }
}

/// Treat empty and whitespace-only keywords as absent.
pub fn normalize_keyword(keyword: Option<String>) -> Option<String> {
    keyword.filter(|k| !k.trim().is_empty())
}
