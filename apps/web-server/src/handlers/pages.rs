//! Page view models for the login screen and the home screen.

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};

use cineflix_core::auth::SignInErrorCode;
use cineflix_core::domain::{Movie, select_trailer};
use cineflix_shared::dto::ProviderInfo;
use cineflix_shared::forms::{self, FieldDescriptor, FormMode};

use crate::handlers::auth::providers;
use crate::handlers::movies::{cached_now_playing, cached_videos};
use crate::middleware::session::AuthContext;
use crate::state::AppState;

const POSTER_SIZE: &str = "w500";
const BACKDROP_SIZE: &str = "w1280";

/// Muted, looping, chrome-less YouTube embed for the hero trailer.
pub fn trailer_embed_url(key: &str) -> String {
    format!(
        "https://www.youtube.com/embed/{key}?autoplay=1&mute=1&loop=1&playlist={key}\
         &controls=0&showinfo=0&rel=0&modestbranding=1&iv_load_policy=3&disablekb=1"
    )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginQuery {
    #[serde(default)]
    pub mode: FormMode,
    pub error: Option<String>,
    pub callback_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginView {
    pub title: &'static str,
    pub mode: FormMode,
    pub fields: Vec<&'static FieldDescriptor>,
    pub providers: Vec<ProviderInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

/// Signed-in user as shown on the page. The access token stays server side.
#[derive(Debug, Serialize)]
pub struct Viewer {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MovieCard {
    pub id: u64,
    pub title: Option<String>,
    pub poster_url: Option<String>,
    pub release_year: Option<String>,
    pub vote_average: Option<f64>,
}

impl From<&Movie> for MovieCard {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            poster_url: movie.poster_url(POSTER_SIZE),
            release_year: movie.release_year().map(str::to_string),
            vote_average: movie.vote_average,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FeaturedMovie {
    pub id: u64,
    pub title: Option<String>,
    pub overview: Option<String>,
    pub vote_average: Option<f64>,
    pub release_date: Option<String>,
    pub backdrop_url: Option<String>,
    pub trailer_key: Option<String>,
    pub trailer_embed_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HomeView {
    pub user: Option<Viewer>,
    pub featured: Option<FeaturedMovie>,
    pub movies: Vec<MovieCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /login
pub async fn login(state: web::Data<AppState>, query: web::Query<LoginQuery>) -> HttpResponse {
    let query = query.into_inner();

    let view = LoginView {
        title: query.mode.title(),
        mode: query.mode,
        fields: forms::fields_for(query.mode),
        providers: providers(&state),
        error: query
            .error
            .as_deref()
            .map(|code| SignInErrorCode::parse(code).message().to_string()),
        callback_url: query.callback_url,
    };

    HttpResponse::Ok().json(view)
}

async fn featured_movie(state: &AppState, movie: &Movie) -> FeaturedMovie {
    let trailer_key = match cached_videos(state, movie.id).await {
        Ok(videos) => select_trailer(&videos.results).and_then(|v| v.key.clone()),
        Err(e) => {
            tracing::debug!(movie_id = movie.id, error = %e, "No trailer for featured movie");
            None
        }
    };

    FeaturedMovie {
        id: movie.id,
        title: movie.title.clone(),
        overview: movie.overview.clone(),
        vote_average: movie.vote_average,
        release_date: movie.release_date.clone(),
        backdrop_url: movie.backdrop_url(BACKDROP_SIZE),
        trailer_embed_url: trailer_key.as_deref().map(trailer_embed_url),
        trailer_key,
    }
}

/// GET /
pub async fn home(state: web::Data<AppState>, auth: AuthContext) -> HttpResponse {
    let user = auth.user.map(|user| Viewer {
        display_name: user.display_name().map(str::to_string),
        id: user.id,
        name: user.name,
        email: user.email,
    });

    let view = match cached_now_playing(&state, 1).await {
        Ok(page) => {
            let featured = match page.results.iter().find(|m| m.backdrop_path.is_some()) {
                Some(movie) => Some(featured_movie(&state, movie).await),
                None => None,
            };

            HomeView {
                user,
                featured,
                movies: page.results.iter().map(MovieCard::from).collect(),
                error: None,
            }
        }
        Err(e) => HomeView {
            user,
            featured: None,
            movies: Vec::new(),
            error: Some(e.to_string()),
        },
    };

    HttpResponse::Ok().json(view)
}

/// POST /signout
pub async fn sign_out(state: web::Data<AppState>, auth: AuthContext) -> HttpResponse {
    auth.sign_out(&state.settings)
}
