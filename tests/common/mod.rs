//! Shared helpers for integration tests.
//!
//! Provides [`StubPages`], a scripted [`PageSource`] that records every query
//! it is asked for, and [`TestHarness`] which wires it into a full
//! [`AppContext`].

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use cinescope::config::Config;
use cinescope::fetcher::PageSource;
use cinescope::server::{create_router, AppContext};
use cinescope_common::{Error, MovieSummary, Query, Result, ResultPage};

/// Page source that answers every query with the same scripted result.
pub struct StubPages {
    pub queries: Mutex<Vec<Query>>,
    response: Result<ResultPage>,
}

impl StubPages {
    pub fn returning(page: ResultPage) -> Arc<Self> {
        Arc::new(Self {
            queries: Mutex::new(Vec::new()),
            response: Ok(page),
        })
    }

    pub fn failing(error: Error) -> Arc<Self> {
        Arc::new(Self {
            queries: Mutex::new(Vec::new()),
            response: Err(error),
        })
    }

    pub fn last_query(&self) -> Option<Query> {
        self.queries.lock().last().cloned()
    }
}

#[async_trait]
impl PageSource for StubPages {
    async fn fetch_page(&self, query: &Query) -> Result<ResultPage> {
        self.queries.lock().push(query.clone());
        self.response.clone().map(|mut page| {
            page.page_number = query.page;
            page
        })
    }
}

/// Router plus the stub behind it.
pub struct TestHarness {
    pub pages: Arc<StubPages>,
    pub router: axum::Router,
}

impl TestHarness {
    pub fn new(pages: Arc<StubPages>) -> Self {
        Self::with_config(Config::default(), pages)
    }

    pub fn with_config(config: Config, pages: Arc<StubPages>) -> Self {
        let ctx = AppContext::new(&config, pages.clone());
        Self {
            pages,
            router: create_router(ctx, None),
        }
    }
}

pub fn movie(id: u64, title: &str, poster_path: Option<&str>) -> MovieSummary {
    MovieSummary {
        id,
        title: title.to_string(),
        overview: format!("Overview of {title}"),
        poster_path: poster_path.map(String::from),
        release_date: Some("2023-07-21".to_string()),
        vote_average: 7.4,
        genre_ids: vec![18, 36],
    }
}

pub fn page(items: Vec<MovieSummary>, total_pages: u32, total_results: u64) -> ResultPage {
    ResultPage {
        items,
        page_number: 1,
        total_pages,
        total_results,
    }
}
