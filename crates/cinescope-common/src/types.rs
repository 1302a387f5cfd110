//! Core type definitions for genres and image sizes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Movie genres the application knows how to label.
///
/// Discriminants are the upstream genre ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Genre {
    Action = 28,
    Adventure = 12,
    Animation = 16,
    Comedy = 35,
    Crime = 80,
    Documentary = 99,
    Drama = 18,
    Horror = 27,
    Mystery = 9648,
    Thriller = 53,
}

impl Genre {
    /// Every labelled genre, in display order.
    pub const ALL: [Genre; 10] = [
        Genre::Action,
        Genre::Adventure,
        Genre::Animation,
        Genre::Comedy,
        Genre::Crime,
        Genre::Documentary,
        Genre::Drama,
        Genre::Horror,
        Genre::Mystery,
        Genre::Thriller,
    ];

    /// Look up a genre by its upstream id.
    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.id() == id)
    }

    /// Upstream genre id.
    pub fn id(self) -> u32 {
        self as u32
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Action => "Action",
            Self::Adventure => "Adventure",
            Self::Animation => "Animation",
            Self::Comedy => "Comedy",
            Self::Crime => "Crime",
            Self::Documentary => "Documentary",
            Self::Drama => "Drama",
            Self::Horror => "Horror",
            Self::Mystery => "Mystery",
            Self::Thriller => "Thriller",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Size token for image URLs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    W200,
    #[default]
    W500,
    Original,
}

impl ImageSize {
    /// Path segment used by the image host.
    pub fn token(self) -> &'static str {
        match self {
            Self::W200 => "w200",
            Self::W500 => "w500",
            Self::Original => "original",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for ImageSize {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "w200" => Ok(Self::W200),
            "w500" => Ok(Self::W500),
            "original" => Ok(Self::Original),
            other => Err(crate::Error::invalid_input(format!(
                "unknown image size: {other}"
            ))),
        }
    }
}
