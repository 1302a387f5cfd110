//! TMDB (The Movie Database) gateway.
//!
//! Implements [`MovieGateway`] against the TMDB v3 REST API.
//!
//! Features:
//! - Bearer-token authentication with a v4 read access token.
//! - Token-bucket rate limiting via [`governor`].
//! - Configurable request timeout.
//! - Upstream `status_message` surfaced in errors.
//!
//! Every call is exactly one request; there is no retry loop.

use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use cinescope_common::{Error, Result};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{MovieGateway, RawPage};
use crate::config::TmdbConfig;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const SEARCH_PATH: &str = "/search/movie";
const DISCOVER_PATH: &str = "/discover/movie";
const POPULAR_PATH: &str = "/movie/popular";
const DISCOVER_SORT: &str = "popularity.desc";

/// Error body TMDB sends with non-success responses.
#[derive(Debug, Deserialize)]
struct TmdbErrorBody {
    status_message: Option<String>,
}

// ---------------------------------------------------------------------------
// Gateway implementation
// ---------------------------------------------------------------------------

/// TMDB movie gateway.
///
/// Constructed explicitly from [`TmdbConfig`] and passed to whoever needs it;
/// configuration problems surface from [`TmdbGateway::new`] rather than on
/// the first request.
///
/// # Examples
///
/// ```no_run
/// use cinescope::config::TmdbConfig;
/// use cinescope::tmdb::TmdbGateway;
///
/// let config = TmdbConfig {
///     access_token: "your-read-access-token".into(),
///     ..TmdbConfig::default()
/// };
/// let gateway = TmdbGateway::new(&config).expect("valid TMDB config");
/// ```
pub struct TmdbGateway {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
    language: String,
    rate_limiter: DefaultDirectRateLimiter,
}

impl TmdbGateway {
    /// Create a gateway, validating the endpoint configuration.
    ///
    /// Fails with [`Error::Configuration`] when the base URL or access token
    /// is missing, the base URL does not parse, or the rate limit is zero.
    pub fn new(config: &TmdbConfig) -> Result<Self> {
        let base_url = config.base_url.trim();
        if base_url.is_empty() {
            return Err(Error::configuration("TMDB base URL is not set"));
        }
        Url::parse(base_url)
            .map_err(|e| Error::configuration(format!("invalid TMDB base URL {base_url:?}: {e}")))?;

        let access_token = config.access_token.trim();
        if access_token.is_empty() {
            return Err(Error::configuration("TMDB access token is not set"));
        }

        let per_second = NonZeroU32::new(config.requests_per_second).ok_or_else(|| {
            Error::configuration("TMDB requests_per_second must be at least 1")
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
            language: config.language.clone(),
            rate_limiter: RateLimiter::direct(Quota::per_second(per_second)),
        })
    }

    /// Issue one GET against `path` and decode a listing page.
    async fn get_page(&self, path: &str, params: &[(&str, String)]) -> Result<RawPage> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, params = ?params, "TMDB request");

        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[("language", self.language.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "TMDB request failed");
                Error::transport(format!("TMDB request failed: {e}"))
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<TmdbErrorBody>(&body)
                .ok()
                .and_then(|b| b.status_message)
                .or_else(|| status.canonical_reason().map(String::from))
                .unwrap_or_else(|| "unknown error".to_string());
            warn!(url = %url, status = status.as_u16(), message = %message, "TMDB returned error");
            return Err(Error::remote(status.as_u16(), message));
        }

        resp.json::<RawPage>()
            .await
            .map_err(|e| Error::transport(format!("failed to parse TMDB response: {e}")))
    }
}

#[async_trait]
impl MovieGateway for TmdbGateway {
    async fn fetch_by_keyword(
        &self,
        keyword: &str,
        year: Option<i32>,
        page: u32,
    ) -> Result<RawPage> {
        let mut params = vec![("query", keyword.to_string()), ("page", page.to_string())];
        if let Some(year) = year {
            params.push(("primary_release_year", year.to_string()));
        }
        self.get_page(SEARCH_PATH, &params).await
    }

    async fn fetch_by_filter(&self, year: Option<i32>, page: u32) -> Result<RawPage> {
        let mut params = vec![
            ("page", page.to_string()),
            ("sort_by", DISCOVER_SORT.to_string()),
        ];
        if let Some(year) = year {
            params.push(("primary_release_year", year.to_string()));
        }
        self.get_page(DISCOVER_PATH, &params).await
    }

    async fn fetch_popular(&self, page: u32) -> Result<RawPage> {
        self.get_page(POPULAR_PATH, &[("page", page.to_string())])
            .await
    }
}
