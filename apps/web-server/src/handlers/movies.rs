//! Movie catalog endpoints, served through the shared query cache.

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use cineflix_core::CatalogError;
use cineflix_core::domain::{Movie, MoviePage, VideoList};

use crate::middleware::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

impl PageQuery {
    fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }
}

pub(crate) async fn cached_now_playing(state: &AppState, page: u32) -> Result<MoviePage, CatalogError> {
    let catalog = state.catalog.clone();
    state
        .queries
        .fetch_query(&format!("nowPlayingMovies:{}", page), || {
            let catalog = catalog.clone();
            async move { catalog.now_playing(page).await }
        })
        .await
}

pub(crate) async fn cached_popular(state: &AppState, page: u32) -> Result<MoviePage, CatalogError> {
    let catalog = state.catalog.clone();
    state
        .queries
        .fetch_query(&format!("popularMovies:{}", page), || {
            let catalog = catalog.clone();
            async move { catalog.popular(page).await }
        })
        .await
}

pub(crate) async fn cached_details(state: &AppState, movie_id: u64) -> Result<Movie, CatalogError> {
    let catalog = state.catalog.clone();
    state
        .queries
        .fetch_query(&format!("movieDetails:{}", movie_id), || {
            let catalog = catalog.clone();
            async move { catalog.movie_details(movie_id).await }
        })
        .await
}

pub(crate) async fn cached_videos(state: &AppState, movie_id: u64) -> Result<VideoList, CatalogError> {
    let catalog = state.catalog.clone();
    state
        .queries
        .fetch_query(&format!("movieVideos:{}", movie_id), || {
            let catalog = catalog.clone();
            async move { catalog.movie_videos(movie_id).await }
        })
        .await
}

/// GET /api/movies/now-playing?page=N
pub async fn now_playing(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = cached_now_playing(&state, query.page()).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/movies/popular?page=N
pub async fn popular(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = cached_popular(&state, query.page()).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/movies/{id}
pub async fn details(state: web::Data<AppState>, path: web::Path<u64>) -> AppResult<HttpResponse> {
    let movie = cached_details(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(movie))
}

/// GET /api/movies/{id}/videos
pub async fn videos(state: web::Data<AppState>, path: web::Path<u64>) -> AppResult<HttpResponse> {
    let videos = cached_videos(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(videos))
}

#[cfg(test)]
mod tests {
    use actix_web::{
        http::StatusCode,
        test::{self, TestRequest},
    };
    use serde_json::Value;

    use crate::test_support::{FakeCatalog, signed_in_cookie, test_app, test_state};

    #[actix_web::test]
    async fn test_now_playing_requests_page() {
        let catalog = FakeCatalog::default();
        let state = test_state(catalog.clone());
        let cookie = signed_in_cookie(&state);
        let app = test_app!(state);

        let req = TestRequest::get()
            .uri("/api/movies/now-playing?page=2")
            .cookie(cookie)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["page"], 2);
        assert_eq!(catalog.requested_pages(), vec![2]);
    }

    #[actix_web::test]
    async fn test_repeat_requests_served_from_cache() {
        let catalog = FakeCatalog::default();
        let state = test_state(catalog.clone());
        let cookie = signed_in_cookie(&state);
        let app = test_app!(state);

        for _ in 0..3 {
            let req = TestRequest::get()
                .uri("/api/movies/popular")
                .cookie(cookie.clone())
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }

        assert_eq!(catalog.calls(), 1);
    }

    #[actix_web::test]
    async fn test_movie_videos() {
        let state = test_state(FakeCatalog::default());
        let cookie = signed_in_cookie(&state);
        let app = test_app!(state);

        let req = TestRequest::get()
            .uri("/api/movies/550/videos")
            .cookie(cookie)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["id"], 550);
        assert_eq!(body["results"][0]["site"], "YouTube");
    }

    #[actix_web::test]
    async fn test_catalog_failure_is_bad_gateway() {
        let state = test_state(FakeCatalog::failing(500, "Internal error"));
        let cookie = signed_in_cookie(&state);
        let app = test_app!(state);

        let req = TestRequest::get()
            .uri("/api/movies/550")
            .cookie(cookie)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "Internal error");
    }

    #[actix_web::test]
    async fn test_catalog_not_found() {
        let state = test_state(FakeCatalog::failing(404, "The resource you requested could not be found."));
        let cookie = signed_in_cookie(&state);
        let app = test_app!(state);

        let req = TestRequest::get()
            .uri("/api/movies/999999")
            .cookie(cookie)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_movies_require_session() {
        let app = test_app!(test_state(FakeCatalog::default()));

        let req = TestRequest::get().uri("/api/movies/popular").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    }
}
