use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub tmdb: TmdbConfig,

    #[serde(default)]
    pub images: ImagesConfig,

    #[serde(default)]
    pub browse: BrowseConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the built front end, served with SPA fallback
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    /// Base URL of the v3 API (overridden by `TMDB_API_BASE_URL`)
    #[serde(default = "default_tmdb_base_url")]
    pub base_url: String,

    /// v4 read access token sent as a bearer token (overridden by `TMDB_API_ACCESS_TOKEN`)
    #[serde(default)]
    pub access_token: String,

    /// Response language tag, e.g. "en-US"
    #[serde(default = "default_language")]
    pub language: String,

    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Client-side request budget (default: 40 per second)
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
}

fn default_tmdb_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_requests_per_second() -> u32 {
    40
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: default_tmdb_base_url(),
            access_token: String::new(),
            language: default_language(),
            timeout_secs: default_timeout_secs(),
            requests_per_second: default_requests_per_second(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImagesConfig {
    /// Image host base (overridden by `TMDB_IMAGE_BASE_URL`)
    #[serde(default = "default_image_base_url")]
    pub base_url: String,

    /// Local path returned for movies without artwork
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_placeholder() -> String {
    "/placeholder-movie.png".to_string()
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            base_url: default_image_base_url(),
            placeholder: default_placeholder(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BrowseConfig {
    /// Keyword input inactivity window before a search is issued (default: 500)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Listing used when neither keyword nor year is set
    #[serde(default)]
    pub unfiltered_listing: UnfilteredListing,

    /// Release years accepted from shared URLs (empty = any year)
    #[serde(default)]
    pub available_years: Vec<i32>,
}

fn default_debounce_ms() -> u64 {
    500
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            unfiltered_listing: UnfilteredListing::default(),
            available_years: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UnfilteredListing {
    /// `discover/movie` sorted by popularity
    #[default]
    Discover,
    /// `movie/popular`
    Popular,
}
