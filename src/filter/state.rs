use std::sync::Arc;

use cinescope_common::query::normalize_keyword;
use cinescope_common::Query;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Current keyword and release-year filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    pub keyword: Option<String>,
    pub release_year: Option<i32>,
}

impl Filters {
    /// First-page query for these filters.
    pub fn to_query(&self) -> Query {
        Query::new(self.keyword.clone(), self.release_year)
    }
}

/// Observable holder for [`Filters`].
///
/// Clones share the same underlying state. Subscribers are notified only
/// when a value actually changes.
#[derive(Debug, Clone)]
pub struct FilterState {
    tx: Arc<watch::Sender<Filters>>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(Filters::default())
    }
}

impl FilterState {
    pub fn new(initial: Filters) -> Self {
        let initial = Filters {
            keyword: normalize_keyword(initial.keyword),
            release_year: initial.release_year,
        };
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    pub fn get(&self) -> Filters {
        self.tx.borrow().clone()
    }

    /// Set the keyword; blank values clear it. Returns whether it changed.
    pub fn set_keyword(&self, keyword: Option<String>) -> bool {
        let keyword = normalize_keyword(keyword);
        self.tx.send_if_modified(|f| {
            if f.keyword == keyword {
                return false;
            }
            f.keyword = keyword;
            true
        })
    }

    /// Set or clear the release year. Returns whether it changed.
    pub fn set_release_year(&self, release_year: Option<i32>) -> bool {
        self.tx.send_if_modified(|f| {
            if f.release_year == release_year {
                return false;
            }
            f.release_year = release_year;
            true
        })
    }

    /// Replace both filters at once, notifying at most once.
    pub fn set(&self, filters: Filters) -> bool {
        let filters = Filters {
            keyword: normalize_keyword(filters.keyword),
            release_year: filters.release_year,
        };
        self.tx.send_if_modified(|f| {
            if *f == filters {
                return false;
            }
            *f = filters;
            true
        })
    }

    pub fn clear(&self) -> bool {
        self.set(Filters::default())
    }

    pub fn subscribe(&self) -> watch::Receiver<Filters> {
        self.tx.subscribe()
    }
}
