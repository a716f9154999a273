//! TMDB movie catalog client.

mod catalog;

pub use catalog::{
    TmdbCatalog, TmdbConfig, movie_details_url, movie_videos_url, now_playing_url, popular_url,
};
