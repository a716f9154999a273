//! Movie catalog records.
//!
//! Records are passed through from TMDB. Only the fields the application
//! reads are typed; everything else survives in `extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Base URL for TMDB images: `{base}/{size}/{path}`.
pub const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Movie {
    /// Poster URL for a size such as `w342`.
    pub fn poster_url(&self, size: &str) -> Option<String> {
        image_url(self.poster_path.as_deref()?, size)
    }

    /// Backdrop URL for a size such as `w1280`.
    pub fn backdrop_url(&self, size: &str) -> Option<String> {
        image_url(self.backdrop_path.as_deref()?, size)
    }

    /// Release year, from a `YYYY-MM-DD` date.
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|d| d.split('-').next())
            .filter(|y| !y.is_empty())
    }
}

fn image_url(path: &str, size: &str) -> Option<String> {
    if path.is_empty() {
        return None;
    }
    Some(format!("{}/{}{}", TMDB_IMAGE_BASE, size, path))
}

/// One page of a paginated movie listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoviePage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<Movie>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub total_results: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub site: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub official: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Video {
    fn is_youtube(&self) -> bool {
        self.site.as_deref() == Some("YouTube")
    }

    fn is_kind(&self, kind: &str) -> bool {
        self.kind.as_deref() == Some(kind)
    }
}

/// Videos attached to a movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoList {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub results: Vec<Video>,
}

/// Pick the video to embed as the hero trailer.
///
/// Only YouTube videos qualify. Preference: official trailer, any trailer,
/// any teaser, then whatever comes first.
pub fn select_trailer(videos: &[Video]) -> Option<&Video> {
    let youtube: Vec<&Video> = videos
        .iter()
        .filter(|v| v.is_youtube() && v.key.is_some())
        .collect();

    youtube
        .iter()
        .find(|v| v.is_kind("Trailer") && v.official)
        .or_else(|| youtube.iter().find(|v| v.is_kind("Trailer")))
        .or_else(|| youtube.iter().find(|v| v.is_kind("Teaser")))
        .or_else(|| youtube.first())
        .copied()
}
