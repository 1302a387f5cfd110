//! Query-string representation of filter state.
//!
//! Keys are `search`, `releaseYear` and `page`. Keywords are percent-encoded
//! with `encodeURIComponent` semantics, so `decode(encode(p)) == p` for any
//! keyword text. On decode a literal `+` is read as a space, which lets the
//! codec also accept form-encoded URLs without breaking the round trip.
//! Release years outside the configured list are neither written nor read.

use cinescope_common::{Query, START_PAGE};

use super::{FilterState, Filters};

/// Filters plus page number, as carried in a shareable URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterParams {
    pub search: Option<String>,
    pub release_year: Option<i32>,
    pub page: u32,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            search: None,
            release_year: None,
            page: START_PAGE,
        }
    }
}

impl FilterParams {
    pub fn from_filters(filters: &Filters, page: u32) -> Self {
        Self {
            search: filters.keyword.clone(),
            release_year: filters.release_year,
            page: page.max(START_PAGE),
        }
    }

    pub fn filters(&self) -> Filters {
        Filters {
            keyword: self.search.clone(),
            release_year: self.release_year,
        }
    }

    /// The query these parameters select, at their page.
    pub fn to_query(&self) -> Query {
        Query::new(self.search.clone(), self.release_year).with_page(self.page)
    }
}

/// Serialize/deserialize pair binding filters to a shareable representation.
pub trait FilterCodec {
    fn serialize(&self, params: &FilterParams) -> String;
    fn deserialize(&self, encoded: &str) -> FilterParams;
}

/// [`FilterCodec`] over URL query strings.
#[derive(Debug, Clone, Default)]
pub struct UrlFilterCodec {
    available_years: Vec<i32>,
}

impl UrlFilterCodec {
    /// Codec accepting only `available_years` (any year if empty).
    pub fn new(available_years: Vec<i32>) -> Self {
        Self { available_years }
    }

    /// Whether `year` is one the codec will carry.
    pub fn accepts_year(&self, year: i32) -> bool {
        self.available_years.is_empty() || self.available_years.contains(&year)
    }

    /// Load a shared query string into `state`. Returns the page it names.
    pub fn restore(&self, state: &FilterState, encoded: &str) -> u32 {
        let params = self.deserialize(encoded);
        state.set(params.filters());
        params.page
    }

    /// Shareable query string for the filters in `state` at `page`.
    pub fn share(&self, state: &FilterState, page: u32) -> String {
        self.serialize(&FilterParams::from_filters(&state.get(), page))
    }
}

impl FilterCodec for UrlFilterCodec {
    fn serialize(&self, params: &FilterParams) -> String {
        let mut pairs = Vec::with_capacity(3);
        if let Some(search) = params.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(format!("search={}", urlencoding::encode(search)));
        }
        if let Some(year) = params.release_year.filter(|y| self.accepts_year(*y)) {
            pairs.push(format!("releaseYear={year}"));
        }
        if params.page > START_PAGE {
            pairs.push(format!("page={}", params.page));
        }
        pairs.join("&")
    }

    fn deserialize(&self, encoded: &str) -> FilterParams {
        let mut params = FilterParams::default();
        let encoded = encoded.strip_prefix('?').unwrap_or(encoded);

        for pair in encoded.split('&').filter(|p| !p.is_empty()) {
            let (key, raw) = pair.split_once('=').unwrap_or((pair, ""));
            let value = decode_component(raw);

            match key {
                "search" => params.search = Some(value).filter(|v| !v.is_empty()),
                "releaseYear" => {
                    params.release_year = value.parse().ok().filter(|y| self.accepts_year(*y));
                }
                "page" => {
                    params.page = value
                        .parse::<u32>()
                        .ok()
                        .filter(|p| *p >= START_PAGE)
                        .unwrap_or(START_PAGE);
                }
                _ => {}
            }
        }

        params
    }
}

/// Percent-decode one component; malformed input is returned as-is.
fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}
