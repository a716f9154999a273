use async_trait::async_trait;

use crate::domain::{Movie, MoviePage, VideoList};
use crate::error::CatalogError;

/// Read-only movie catalog. Every call is one idempotent network request.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    async fn now_playing(&self, page: u32) -> Result<MoviePage, CatalogError>;

    async fn popular(&self, page: u32) -> Result<MoviePage, CatalogError>;

    async fn movie_details(&self, movie_id: u64) -> Result<Movie, CatalogError>;

    async fn movie_videos(&self, movie_id: u64) -> Result<VideoList, CatalogError>;
}
