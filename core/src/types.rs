//! Film DTOs and the static card catalogue.
//!
//! # Design
//! `FilmRecord` mirrors the upstream JSON (snake_case) and is defined
//! independently from the mock-server's copy; integration tests catch drift.
//! `Film` is the shape handed to callers and serializes with camelCase names.

use serde::{Deserialize, Serialize};

/// A film as returned by the upstream catalogue.
///
/// Fields the catalogue sends that are not listed here (`people`, `species`,
/// `url`, ...) are ignored on decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilmRecord {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title_romanised: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie_banner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub running_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rt_score: Option<String>,
}

/// A film in the internal naming convention.
///
/// Optional fields are either a non-empty string or `None`, never `""`.
/// Build one from a `FilmRecord` with [`crate::normalize::normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Film {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub original_title_romanised: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub movie_banner: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub producer: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub running_time: Option<String>,
    #[serde(default)]
    pub rt_score: Option<String>,
}

/// Static configuration for one card: which film it loads and how its
/// front face looks before anything is fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilmConfig {
    pub id: String,
    pub title: String,
    pub color: String,
}

impl FilmConfig {
    pub fn new(id: &str, title: &str, color: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            color: color.to_string(),
        }
    }
}

const CATALOGUE: [(&str, &str, &str); 4] = [
    ("58611129-2dbc-4a81-a72f-77ddfc1b1b49", "My Neighbor Totoro", "#d79a68"),
    ("dc2e6bd1-8156-4886-adff-b39e6043af0c", "Spirited Away", "#c75b5b"),
    ("0440483e-ca0e-4120-8c50-4c8cd9b965d6", "Princess Mononoke", "#5b9e9e"),
    ("cd3d059c-09f4-4ff3-8d63-bc765a5184fa", "Howl's Moving Castle", "#4a7fb5"),
];

/// The films shown on the home page, in display order.
pub fn catalogue() -> Vec<FilmConfig> {
    CATALOGUE
        .iter()
        .map(|(id, title, color)| FilmConfig::new(id, title, color))
        .collect()
}
