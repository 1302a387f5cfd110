//! Page accumulation state machine.
//!
//! [`PaginationController`] owns the pages fetched for the current filters.
//! It never performs I/O itself: operations that need a fetch hand back a
//! [`PageRequest`] ticket, and the caller reports the outcome through
//! [`PaginationController::resolve`]. A ticket is honoured only if it is the
//! request currently outstanding; anything else is a stale response and is
//! dropped.

use std::collections::HashSet;

use cinescope_common::{Error, MovieSummary, Query, ResultPage, START_PAGE};
use serde::Serialize;
use tracing::{debug, warn};

/// Observable lifecycle phase of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No query has been established yet.
    Idle,
    /// Fetching the first page.
    Loading,
    /// At least one page loaded, nothing in flight.
    Ready,
    /// Fetching a further page while earlier pages stay visible.
    LoadingMore,
    /// The last fetch failed; earlier pages, if any, are retained.
    Error,
}

/// A fetch the caller must perform and then resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    generation: u64,
    query: Query,
}

impl PageRequest {
    /// Query (including page number) to fetch.
    pub fn query(&self) -> &Query {
        &self.query
    }
}

/// Outcome of resolving a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The result was applied to state.
    Applied,
    /// The request had been superseded; its result was dropped.
    StaleResponseDiscarded,
}

/// Accumulated pages for the current query.
#[derive(Debug, Clone, Default)]
struct PaginationState {
    /// Pages 1..=N in fetch order.
    pages: Vec<ResultPage>,
    current_query: Option<Query>,
    is_fetching: bool,
    last_error: Option<Error>,
}

/// Point-in-time view of the controller for presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationSnapshot {
    pub phase: Phase,
    pub query: Option<Query>,
    pub movies: Vec<MovieSummary>,
    pub pages_loaded: usize,
    pub total_pages: u32,
    pub total_results: u64,
    pub has_more_pages: bool,
    pub error: Option<Error>,
}

impl Default for PaginationSnapshot {
    fn default() -> Self {
        PaginationController::new().snapshot()
    }
}

/// Merges paged results into one growing, de-duplicated movie list.
#[derive(Debug, Default)]
pub struct PaginationController {
    state: PaginationState,
    initial_page: Option<ResultPage>,
    generation: u64,
    in_flight: Option<PageRequest>,
}

impl PaginationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Controller that may adopt `page` as page 1 instead of fetching it.
    ///
    /// The page is only trusted if the first query established has neither
    /// keyword nor year; otherwise it is discarded.
    pub fn with_initial_page(page: ResultPage) -> Self {
        Self {
            initial_page: Some(page),
            ..Self::default()
        }
    }

    /// Establish the filters to browse.
    ///
    /// Changing keyword or year discards every accumulated page and requests
    /// page 1. Re-applying the current filters is a no-op, except after a
    /// failure, where it retries the failed page.
    pub fn set_query(
        &mut self,
        keyword: Option<String>,
        release_year: Option<i32>,
    ) -> Option<PageRequest> {
        let query = Query::new(keyword, release_year);

        if let Some(current) = &self.state.current_query {
            if current.same_filters(&query) {
                if self.state.last_error.is_some() && !self.state.is_fetching {
                    return Some(self.issue_next());
                }
                debug!(keyword = ?query.keyword, year = ?query.release_year, "Filters unchanged");
                return None;
            }
        }

        let first_query = self.state.current_query.is_none();
        let initial_page = self.initial_page.take();

        self.generation += 1;
        self.in_flight = None;
        self.state = PaginationState {
            current_query: Some(query.clone()),
            ..PaginationState::default()
        };

        if first_query && query.is_default() {
            if let Some(mut page) = initial_page {
                debug!(items = page.items.len(), "Adopting prefetched first page");
                page.page_number = START_PAGE;
                self.state.pages.push(page);
                return None;
            }
        }

        debug!(
            keyword = ?query.keyword,
            year = ?query.release_year,
            generation = self.generation,
            "Filters changed, reloading from first page"
        );
        Some(self.issue(query))
    }

    /// Request the page after the last one loaded.
    ///
    /// Returns `None` (and does nothing) when no query is established, a
    /// fetch is already outstanding, or there are no further pages. After a
    /// failure it retries the page that failed.
    pub fn load_next_page(&mut self) -> Option<PageRequest> {
        self.state.current_query.as_ref()?;

        if self.state.is_fetching {
            debug!("Fetch already in flight, ignoring load_next_page");
            return None;
        }

        let retrying = self.state.last_error.is_some();
        if !retrying && !self.has_more_pages() {
            debug!(pages = self.state.pages.len(), "No more pages to load");
            return None;
        }

        Some(self.issue_next())
    }

    /// Apply the outcome of `request`.
    ///
    /// A successful page is appended; a failure is recorded in `last_error`
    /// and leaves loaded pages untouched.
    pub fn resolve(
        &mut self,
        request: PageRequest,
        result: cinescope_common::Result<ResultPage>,
    ) -> Resolution {
        if self.in_flight.as_ref() != Some(&request) {
            debug!(
                generation = request.generation,
                page = request.query.page,
                current_generation = self.generation,
                "Discarding stale page response"
            );
            return Resolution::StaleResponseDiscarded;
        }

        self.in_flight = None;
        self.state.is_fetching = false;

        match result {
            Ok(page) => {
                debug!(
                    page = request.query.page,
                    items = page.items.len(),
                    total_pages = page.total_pages,
                    "Page loaded"
                );
                self.state.pages.push(page);
                self.state.last_error = None;
            }
            Err(e) => {
                warn!(page = request.query.page, error = %e, "Page fetch failed");
                self.state.last_error = Some(e);
            }
        }

        Resolution::Applied
    }

    fn issue_next(&mut self) -> PageRequest {
        let next = self.state.pages.len() as u32 + 1;
        let query = self
            .state
            .current_query
            .clone()
            .unwrap_or_default()
            .with_page(next);
        self.issue(query)
    }

    fn issue(&mut self, query: Query) -> PageRequest {
        let request = PageRequest {
            generation: self.generation,
            query,
        };
        self.state.last_error = None;
        self.state.is_fetching = true;
        self.in_flight = Some(request.clone());
        request
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn phase(&self) -> Phase {
        let s = &self.state;
        if s.current_query.is_none() {
            Phase::Idle
        } else if s.is_fetching && s.pages.is_empty() {
            Phase::Loading
        } else if s.is_fetching {
            Phase::LoadingMore
        } else if s.last_error.is_some() {
            Phase::Error
        } else {
            Phase::Ready
        }
    }

    /// All loaded movies in page order, first occurrence of each id only.
    pub fn movies(&self) -> Vec<MovieSummary> {
        let mut seen = HashSet::new();
        self.state
            .pages
            .iter()
            .flat_map(|page| page.items.iter())
            .filter(|movie| seen.insert(movie.id))
            .cloned()
            .collect()
    }

    pub fn has_more_pages(&self) -> bool {
        (self.state.pages.len() as u64) < u64::from(self.total_pages())
    }

    /// Result total reported by the most recently fetched page.
    pub fn total_results(&self) -> u64 {
        self.state.pages.last().map_or(0, |p| p.total_results)
    }

    /// Page count reported by the most recently fetched page.
    pub fn total_pages(&self) -> u32 {
        self.state.pages.last().map_or(0, |p| p.total_pages)
    }

    pub fn pages_loaded(&self) -> usize {
        self.state.pages.len()
    }

    pub fn is_loading_initial(&self) -> bool {
        self.state.is_fetching && self.state.pages.is_empty()
    }

    pub fn is_loading_more(&self) -> bool {
        self.state.is_fetching && !self.state.pages.is_empty()
    }

    pub fn current_error(&self) -> Option<&Error> {
        self.state.last_error.as_ref()
    }

    pub fn current_query(&self) -> Option<&Query> {
        self.state.current_query.as_ref()
    }

    pub fn snapshot(&self) -> PaginationSnapshot {
        PaginationSnapshot {
            phase: self.phase(),
            query: self.state.current_query.clone(),
            movies: self.movies(),
            pages_loaded: self.pages_loaded(),
            total_pages: self.total_pages(),
            total_results: self.total_results(),
            has_more_pages: self.has_more_pages(),
            error: self.state.last_error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn movie(id: u64) -> MovieSummary {
        MovieSummary {
            id,
            title: format!("Movie {id}"),
            overview: String::new(),
            poster_path: None,
            release_date: Some("2020-01-01".into()),
            vote_average: 7.0,
            genre_ids: vec![],
        }
    }

    fn page(number: u32, ids: &[u64], total_pages: u32) -> ResultPage {
        ResultPage {
            items: ids.iter().copied().map(movie).collect(),
            page_number: number,
            total_pages,
            total_results: u64::from(total_pages) * 20,
        }
    }

    fn ids(controller: &PaginationController) -> Vec<u64> {
        controller.movies().iter().map(|m| m.id).collect()
    }

    /// Controller with `loaded` pages of a `total`-page query for `keyword`.
    fn ready_with(keyword: &str, loaded: u32, total: u32) -> PaginationController {
        let mut c = PaginationController::new();
        let mut next = c.set_query(Some(keyword.into()), None);
        for n in 1..=loaded {
            let req = next.take().expect("page request issued");
            let first = u64::from(n) * 100;
            assert_eq!(c.resolve(req, Ok(page(n, &[first, first + 1], total))), Resolution::Applied);
            if n < loaded {
                next = c.load_next_page();
            }
        }
        c
    }

    #[test]
    fn starts_idle() {
        let mut c = PaginationController::new();
        assert_eq!(c.phase(), Phase::Idle);
        assert!(c.load_next_page().is_none());
        assert!(c.movies().is_empty());
        assert!(!c.has_more_pages());
    }

    #[test]
    fn set_query_requests_first_page() {
        let mut c = PaginationController::new();
        let req = c.set_query(Some("alien".into()), Some(1979)).unwrap();
        assert_eq!(req.query().page, 1);
        assert_eq!(req.query().keyword(), Some("alien"));
        assert_eq!(c.phase(), Phase::Loading);
        assert!(c.is_loading_initial());
        assert!(!c.is_loading_more());

        c.resolve(req, Ok(page(1, &[1, 2], 3)));
        assert_eq!(c.phase(), Phase::Ready);
        assert_eq!(ids(&c), vec![1, 2]);
        assert_eq!(c.total_results(), 60);
    }

    #[test]
    fn load_next_page_appends_in_order() {
        let mut c = ready_with("a", 1, 3);
        let req = c.load_next_page().unwrap();
        assert_eq!(req.query().page, 2);
        assert_eq!(c.phase(), Phase::LoadingMore);
        assert!(c.is_loading_more());

        c.resolve(req, Ok(page(2, &[7, 8], 3)));
        assert_eq!(ids(&c), vec![100, 101, 7, 8]);
        assert_eq!(c.pages_loaded(), 2);
    }

    #[test]
    fn duplicate_ids_across_pages_keep_first_occurrence() {
        let mut c = PaginationController::new();
        let req = c.set_query(None, None).unwrap();
        c.resolve(req, Ok(page(1, &[1, 2, 3], 2)));
        let req = c.load_next_page().unwrap();
        c.resolve(req, Ok(page(2, &[3, 4, 1], 2)));

        assert_eq!(ids(&c), vec![1, 2, 3, 4]);
    }

    #[test]
    fn filter_change_clears_pages() {
        let mut c = ready_with("a", 3, 5);
        assert_eq!(c.pages_loaded(), 3);

        let req = c.set_query(Some("b".into()), None).unwrap();
        assert_eq!(c.pages_loaded(), 0);
        assert!(c.movies().is_empty());
        assert_eq!(req.query().page, 1);
        assert_eq!(c.phase(), Phase::Loading);
    }

    #[test]
    fn same_filters_are_a_noop() {
        let mut c = ready_with("a", 2, 5);
        assert!(c.set_query(Some("a".into()), None).is_none());
        assert_eq!(c.pages_loaded(), 2);
    }

    #[test]
    fn repeated_load_next_issues_one_fetch() {
        let mut c = ready_with("a", 1, 4);
        let first = c.load_next_page();
        let second = c.load_next_page();
        assert!(first.is_some());
        assert!(second.is_none());
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut c = PaginationController::new();
        let q1 = c.set_query(Some("old".into()), None).unwrap();
        let q2 = c.set_query(Some("new".into()), None).unwrap();

        assert_eq!(
            c.resolve(q1, Ok(page(1, &[1, 2], 1))),
            Resolution::StaleResponseDiscarded
        );
        assert!(c.movies().is_empty());
        assert_eq!(c.phase(), Phase::Loading);

        assert_eq!(c.resolve(q2, Ok(page(1, &[9], 1))), Resolution::Applied);
        assert_eq!(ids(&c), vec![9]);
    }

    #[test]
    fn stale_guard_survives_returning_to_earlier_filters() {
        let mut c = PaginationController::new();
        let a1 = c.set_query(Some("a".into()), None).unwrap();
        let _b = c.set_query(Some("b".into()), None).unwrap();
        let a2 = c.set_query(Some("a".into()), None).unwrap();

        assert_ne!(a1, a2);
        assert_eq!(c.resolve(a1, Ok(page(1, &[1], 1))), Resolution::StaleResponseDiscarded);
        assert_eq!(c.resolve(a2, Ok(page(1, &[2], 1))), Resolution::Applied);
        assert_eq!(ids(&c), vec![2]);
    }

    #[test]
    fn has_more_pages_boundary() {
        let c = ready_with("a", 3, 3);
        assert!(!c.has_more_pages());

        let c = ready_with("a", 2, 3);
        assert!(c.has_more_pages());
    }

    #[test]
    fn load_next_page_is_noop_at_end() {
        let mut c = ready_with("a", 2, 2);
        assert!(c.load_next_page().is_none());
        assert_eq!(c.phase(), Phase::Ready);
    }

    #[test]
    fn totals_follow_latest_page() {
        let mut c = PaginationController::new();
        let req = c.set_query(Some("x".into()), Some(2023)).unwrap();
        c.resolve(
            req,
            Ok(ResultPage {
                items: vec![movie(1)],
                page_number: 1,
                total_pages: 4,
                total_results: 150,
            }),
        );
        let req = c.load_next_page().unwrap();
        c.resolve(
            req,
            Ok(ResultPage {
                items: vec![movie(2)],
                page_number: 2,
                total_pages: 4,
                total_results: 120,
            }),
        );
        assert_eq!(c.total_results(), 120);
    }

    #[test]
    fn failure_while_loading_more_keeps_pages() {
        let mut c = ready_with("a", 2, 5);
        let req = c.load_next_page().unwrap();
        c.resolve(req, Err(Error::remote(500, "Internal error")));

        assert_eq!(c.phase(), Phase::Error);
        assert_eq!(c.pages_loaded(), 2);
        assert_eq!(ids(&c), vec![100, 101, 200, 201]);
        assert_matches!(c.current_error(), Some(Error::RemoteApi { status_code: Some(500), .. }));
    }

    #[test]
    fn load_next_page_retries_after_failure() {
        let mut c = ready_with("a", 1, 5);
        let req = c.load_next_page().unwrap();
        c.resolve(req, Err(Error::transport("connection reset")));

        let retry = c.load_next_page().unwrap();
        assert_eq!(retry.query().page, 2);
        assert!(c.current_error().is_none());
        assert_eq!(c.phase(), Phase::LoadingMore);
    }

    #[test]
    fn initial_failure_can_be_retried() {
        let mut c = PaginationController::new();
        let req = c.set_query(None, Some(2022)).unwrap();
        c.resolve(req, Err(Error::remote(503, "Service unavailable")));
        assert_eq!(c.phase(), Phase::Error);
        assert!(!c.has_more_pages());

        let retry = c.set_query(None, Some(2022)).unwrap();
        assert_eq!(retry.query().page, 1);
        assert_eq!(c.phase(), Phase::Loading);

        c.resolve(retry, Err(Error::remote(503, "Service unavailable")));
        let retry = c.load_next_page().unwrap();
        assert_eq!(retry.query().page, 1);
    }

    #[test]
    fn initial_page_is_trusted_for_default_query() {
        let mut c = PaginationController::with_initial_page(page(1, &[1, 2], 10));
        assert!(c.set_query(None, None).is_none());
        assert_eq!(c.phase(), Phase::Ready);
        assert_eq!(ids(&c), vec![1, 2]);

        let req = c.load_next_page().unwrap();
        assert_eq!(req.query().page, 2);
    }

    #[test]
    fn initial_page_is_ignored_for_filtered_query() {
        let mut c = PaginationController::with_initial_page(page(1, &[1, 2], 10));
        let req = c.set_query(Some("batman".into()), None);
        assert!(req.is_some());
        assert!(c.movies().is_empty());

        // Not reused once filters return to the default either.
        let req = c.set_query(None, None);
        assert!(req.is_some());
        assert!(c.movies().is_empty());
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut c = ready_with("a", 1, 2);
        c.load_next_page();
        let snap = c.snapshot();
        assert_eq!(snap.phase, Phase::LoadingMore);
        assert_eq!(snap.pages_loaded, 1);
        assert_eq!(snap.total_pages, 2);
        assert!(snap.has_more_pages);
        assert_eq!(snap.movies.len(), 2);
        assert_eq!(snap.query.unwrap().keyword(), Some("a"));
    }
}
