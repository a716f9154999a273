//! Typed TMDB endpoints over the request wrapper.
//!
//! API reference: https://developer.themoviedb.org/reference

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use cineflix_core::CatalogError;
use cineflix_core::domain::{Movie, MoviePage, VideoList};
use cineflix_core::ports::MovieCatalog;

use crate::http::{HttpClient, RequestConfig, RequestError};

#[derive(Clone)]
pub struct TmdbConfig {
    pub base_url: String,
    /// API read access token, sent as a bearer token.
    pub token: String,
}

impl std::fmt::Debug for TmdbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

pub fn now_playing_url(base: &str, page: u32) -> String {
    format!(
        "{}/movie/now_playing?language=en-US&page={}",
        base.trim_end_matches('/'),
        page.max(1)
    )
}

pub fn popular_url(base: &str, page: u32) -> String {
    format!(
        "{}/movie/popular?language=en-US&page={}",
        base.trim_end_matches('/'),
        page.max(1)
    )
}

pub fn movie_details_url(base: &str, movie_id: u64) -> String {
    format!("{}/movie/{}?language=en-US", base.trim_end_matches('/'), movie_id)
}

pub fn movie_videos_url(base: &str, movie_id: u64) -> String {
    format!(
        "{}/movie/{}/videos?language=en-US",
        base.trim_end_matches('/'),
        movie_id
    )
}

/// TMDB-backed [`MovieCatalog`]. No retries and no caching here.
pub struct TmdbCatalog {
    http: HttpClient,
    config: TmdbConfig,
}

impl TmdbCatalog {
    pub fn new(http: HttpClient, config: TmdbConfig) -> Self {
        Self { http, config }
    }

    async fn fetch<T: DeserializeOwned>(&self, url: String) -> Result<T, CatalogError> {
        let request = RequestConfig::get(url).with_token(self.config.token.as_str());

        let body = self
            .http
            .make_request(&request)
            .await?
            .ok_or(CatalogError::EmptyResponse)?;

        serde_json::from_value(body).map_err(|e| {
            tracing::warn!(url = %request.url(), error = %e, "Unexpected TMDB payload");
            CatalogError::Decode(e.to_string())
        })
    }
}

impl From<RequestError> for CatalogError {
    fn from(err: RequestError) -> Self {
        CatalogError::Request {
            status: err.status(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl MovieCatalog for TmdbCatalog {
    async fn now_playing(&self, page: u32) -> Result<MoviePage, CatalogError> {
        self.fetch(now_playing_url(&self.config.base_url, page)).await
    }

    async fn popular(&self, page: u32) -> Result<MoviePage, CatalogError> {
        self.fetch(popular_url(&self.config.base_url, page)).await
    }

    async fn movie_details(&self, movie_id: u64) -> Result<Movie, CatalogError> {
        self.fetch(movie_details_url(&self.config.base_url, movie_id))
            .await
    }

    async fn movie_videos(&self, movie_id: u64) -> Result<VideoList, CatalogError> {
        self.fetch(movie_videos_url(&self.config.base_url, movie_id))
            .await
    }
}
