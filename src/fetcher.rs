//! Result page fetching.
//!
//! [`ResultPageFetcher`] turns a [`Query`] into exactly one gateway call and
//! normalizes the response into a [`ResultPage`], whichever endpoint served
//! it.
//!
//! The upstream keyword search is passed the year but does not reliably
//! honour it, so when both a keyword and a year are set the fetcher keeps only items whose
//! release date starts with that year and scales `total_results` by the share
//! of the page that survived. `total_pages` is passed through unchanged, so a
//! later page of a combined query may come back short or empty.

use std::sync::Arc;

use async_trait::async_trait;
use cinescope_common::{MovieSummary, Query, Result, ResultPage};
use tracing::debug;

use crate::config::UnfilteredListing;
use crate::tmdb::{MovieGateway, RawPage};

/// Anything that can produce one page of results for a query.
///
/// The pagination browser is generic over this so it can be driven by the
/// real fetcher or by a scripted source in tests.
#[async_trait]
pub trait PageSource: Send + Sync + 'static {
    async fn fetch_page(&self, query: &Query) -> Result<ResultPage>;
}

/// Fetches and normalizes single result pages through a [`MovieGateway`].
#[derive(Clone)]
pub struct ResultPageFetcher {
    gateway: Arc<dyn MovieGateway>,
    unfiltered: UnfilteredListing,
}

impl ResultPageFetcher {
    pub fn new(gateway: Arc<dyn MovieGateway>) -> Self {
        Self {
            gateway,
            unfiltered: UnfilteredListing::default(),
        }
    }

    /// Choose which endpoint serves queries with neither keyword nor year.
    pub fn with_unfiltered_listing(mut self, listing: UnfilteredListing) -> Self {
        self.unfiltered = listing;
        self
    }

    /// Fetch one page for `query`.
    ///
    /// Gateway failures are returned unchanged.
    pub async fn fetch_page(&self, query: &Query) -> Result<ResultPage> {
        let raw = match (query.keyword(), query.release_year) {
            (Some(keyword), year) => {
                self.gateway
                    .fetch_by_keyword(keyword, year, query.page)
                    .await?
            }
            (None, None) if self.unfiltered == UnfilteredListing::Popular => {
                self.gateway.fetch_popular(query.page).await?
            }
            (None, year) => self.gateway.fetch_by_filter(year, query.page).await?,
        };

        let page = match (query.keyword(), query.release_year) {
            (Some(_), Some(year)) => filter_by_release_year(raw, year, query.page),
            _ => normalize(raw, query.page),
        };

        debug!(
            keyword = ?query.keyword,
            year = ?query.release_year,
            page = page.page_number,
            items = page.items.len(),
            total_pages = page.total_pages,
            total_results = page.total_results,
            "Fetched result page"
        );

        Ok(page)
    }
}

#[async_trait]
impl PageSource for ResultPageFetcher {
    async fn fetch_page(&self, query: &Query) -> Result<ResultPage> {
        ResultPageFetcher::fetch_page(self, query).await
    }
}

fn normalize(raw: RawPage, page_number: u32) -> ResultPage {
    ResultPage {
        items: raw.results.into_iter().map(|m| m.into_summary()).collect(),
        page_number,
        total_pages: raw.total_pages,
        total_results: raw.total_results,
    }
}

/// Keep only movies released in `year` and re-estimate the result total.
fn filter_by_release_year(raw: RawPage, year: i32, page_number: u32) -> ResultPage {
    let original_count = raw.results.len();
    let items: Vec<MovieSummary> = raw
        .results
        .into_iter()
        .map(|m| m.into_summary())
        .filter(|m| m.is_released_in(year))
        .collect();

    ResultPage {
        total_results: estimate_total(raw.total_results, items.len(), original_count),
        items,
        page_number,
        total_pages: raw.total_pages,
    }
}

/// Scale `total` by `kept / seen`; an empty page counts as ratio 1.
fn estimate_total(total: u64, kept: usize, seen: usize) -> u64 {
    if seen == 0 {
        return total;
    }
    let ratio = kept as f64 / seen as f64;
    (total as f64 * ratio).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tmdb::RawMovie;
    use cinescope_common::Error;
    use parking_lot::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Keyword(String, Option<i32>, u32),
        Filter(Option<i32>, u32),
        Popular(u32),
    }

    struct RecordingGateway {
        calls: Mutex<Vec<Call>>,
        page: RawPage,
        fail: bool,
    }

    impl RecordingGateway {
        fn returning(page: RawPage) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                page,
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                page: RawPage::default(),
                fail: true,
            })
        }

        fn respond(&self, call: Call) -> Result<RawPage> {
            self.calls.lock().push(call);
            if self.fail {
                Err(Error::remote(401, "Invalid API key"))
            } else {
                Ok(self.page.clone())
            }
        }
    }

    #[async_trait]
    impl MovieGateway for RecordingGateway {
        async fn fetch_by_keyword(
            &self,
            keyword: &str,
            year: Option<i32>,
            page: u32,
        ) -> Result<RawPage> {
            self.respond(Call::Keyword(keyword.to_string(), year, page))
        }

        async fn fetch_by_filter(&self, year: Option<i32>, page: u32) -> Result<RawPage> {
            self.respond(Call::Filter(year, page))
        }

        async fn fetch_popular(&self, page: u32) -> Result<RawPage> {
            self.respond(Call::Popular(page))
        }
    }

    fn raw_movie(id: u64, release_date: Option<&str>) -> RawMovie {
        RawMovie {
            id,
            title: Some(format!("Movie {id}")),
            release_date: release_date.map(String::from),
            vote_average: Some(6.5),
            ..Default::default()
        }
    }

    fn raw_page(results: Vec<RawMovie>, total_pages: u32, total_results: u64) -> RawPage {
        RawPage {
            results,
            page: 1,
            total_pages,
            total_results,
        }
    }

    #[tokio::test]
    async fn keyword_query_uses_search() {
        let gateway = RecordingGateway::returning(raw_page(vec![raw_movie(1, None)], 4, 70));
        let fetcher = ResultPageFetcher::new(gateway.clone());

        let page = fetcher
            .fetch_page(&Query::new(Some("bat".into()), None).with_page(2))
            .await
            .unwrap();

        assert_eq!(*gateway.calls.lock(), vec![Call::Keyword("bat".into(), None, 2)]);
        assert_eq!(page.page_number, 2);
        assert_eq!(page.total_pages, 4);
        assert_eq!(page.total_results, 70);
        assert_eq!(page.items.len(), 1);
    }

    #[tokio::test]
    async fn no_keyword_uses_discover_with_year() {
        let gateway = RecordingGateway::returning(raw_page(vec![], 1, 0));
        let fetcher = ResultPageFetcher::new(gateway.clone());

        fetcher
            .fetch_page(&Query::new(None, Some(2024)))
            .await
            .unwrap();
        fetcher.fetch_page(&Query::default()).await.unwrap();

        assert_eq!(
            *gateway.calls.lock(),
            vec![Call::Filter(Some(2024), 1), Call::Filter(None, 1)]
        );
    }

    #[tokio::test]
    async fn popular_listing_serves_default_query_only() {
        let gateway = RecordingGateway::returning(raw_page(vec![], 1, 0));
        let fetcher = ResultPageFetcher::new(gateway.clone())
            .with_unfiltered_listing(UnfilteredListing::Popular);

        fetcher.fetch_page(&Query::default().with_page(3)).await.unwrap();
        fetcher
            .fetch_page(&Query::new(None, Some(2021)))
            .await
            .unwrap();

        assert_eq!(
            *gateway.calls.lock(),
            vec![Call::Popular(3), Call::Filter(Some(2021), 1)]
        );
    }

    #[tokio::test]
    async fn keyword_and_year_are_post_filtered() {
        let mut results: Vec<RawMovie> = (0..15)
            .map(|id| raw_movie(id, Some("2023-06-01")))
            .collect();
        results.extend((15..19).map(|id| raw_movie(id, Some("2019-02-02"))));
        results.push(raw_movie(19, None));
        let gateway = RecordingGateway::returning(raw_page(results, 10, 200));
        let fetcher = ResultPageFetcher::new(gateway.clone());

        let page = fetcher
            .fetch_page(&Query::new(Some("love".into()), Some(2023)))
            .await
            .unwrap();

        assert_eq!(
            *gateway.calls.lock(),
            vec![Call::Keyword("love".into(), Some(2023), 1)]
        );
        assert_eq!(page.items.len(), 15);
        assert_eq!(page.total_results, 150);
        assert_eq!(page.total_pages, 10);
        assert!(page.items.iter().all(|m| m.is_released_in(2023)));
    }

    #[tokio::test]
    async fn year_without_keyword_is_not_post_filtered() {
        let results = vec![raw_movie(1, Some("2023-01-01")), raw_movie(2, None)];
        let gateway = RecordingGateway::returning(raw_page(results, 1, 2));
        let fetcher = ResultPageFetcher::new(gateway);

        let page = fetcher
            .fetch_page(&Query::new(None, Some(2023)))
            .await
            .unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_results, 2);
    }

    #[tokio::test]
    async fn gateway_errors_propagate() {
        let fetcher = ResultPageFetcher::new(RecordingGateway::failing());
        let err = fetcher.fetch_page(&Query::default()).await.unwrap_err();
        assert_eq!(err.status_code(), Some(401));
    }

    #[test]
    fn estimate_total_rounds() {
        assert_eq!(estimate_total(200, 15, 20), 150);
        assert_eq!(estimate_total(10, 1, 3), 3);
        assert_eq!(estimate_total(5, 1, 2), 3);
        assert_eq!(estimate_total(0, 0, 20), 0);
    }

    #[test]
    fn estimate_total_empty_page_keeps_total() {
        assert_eq!(estimate_total(42, 0, 0), 42);
    }
}
