//! Image URL construction for movie artwork.
//!
//! Pure and stateless: turns a relative artwork path from the upstream API
//! plus a size token into an absolute URL on the configured image host.

use cinescope_common::ImageSize;

use crate::config::ImagesConfig;

/// Builds absolute artwork URLs.
#[derive(Debug, Clone)]
pub struct ImageUrlBuilder {
    base_url: String,
    placeholder: String,
}

impl ImageUrlBuilder {
    pub fn new(config: &ImagesConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            placeholder: config.placeholder.clone(),
        }
    }

    /// URL for `path` at `size`, or the placeholder when there is no path.
    pub fn url(&self, path: Option<&str>, size: ImageSize) -> String {
        match path.map(str::trim).filter(|p| !p.is_empty()) {
            None => self.placeholder.clone(),
            Some(p) if p.starts_with('/') => format!("{}/{}{}", self.base_url, size.token(), p),
            Some(p) => format!("{}/{}/{}", self.base_url, size.token(), p),
        }
    }

    /// Local path used for movies without artwork.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }
}

impl Default for ImageUrlBuilder {
    fn default() -> Self {
        Self::new(&ImagesConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_sized_url() {
        let images = ImageUrlBuilder::default();
        assert_eq!(
            images.url(Some("/9gk7adHYeDvHkCSEqAvQNLV5Uge.jpg"), ImageSize::W500),
            "https://image.tmdb.org/t/p/w500/9gk7adHYeDvHkCSEqAvQNLV5Uge.jpg"
        );
        assert_eq!(
            images.url(Some("/a.jpg"), ImageSize::Original),
            "https://image.tmdb.org/t/p/original/a.jpg"
        );
    }

    #[test]
    fn missing_path_uses_placeholder() {
        let images = ImageUrlBuilder::default();
        assert_eq!(images.url(None, ImageSize::W200), "/placeholder-movie.png");
        assert_eq!(images.url(Some(""), ImageSize::W200), "/placeholder-movie.png");
    }

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        let images = ImageUrlBuilder::new(&ImagesConfig {
            base_url: "http://img.local/t/p/".into(),
            placeholder: "/none.png".into(),
        });
        assert_eq!(images.url(Some("x.jpg"), ImageSize::W200), "http://img.local/t/p/w200/x.jpg");
        assert_eq!(images.placeholder(), "/none.png");
    }
}
