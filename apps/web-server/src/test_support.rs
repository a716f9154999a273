//! Fakes and helpers shared by the handler and middleware tests.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use actix_web::cookie::Cookie;
use cineflix_core::CatalogError;
use cineflix_core::auth::{CredentialsProvider, jwt_callback};
use cineflix_core::domain::{
    AuthorizationRequest, Identity, Movie, MoviePage, OAuthAccount, OAuthSignIn, SessionToken, VideoList,
};
use cineflix_core::ports::{AuthError, MovieCatalog, OAuthProvider};
use cineflix_infra::{
    Argon2PasswordService, InMemoryIdentityBackend, JwtConfig, JwtSessionCodec, QueryClient,
    QueryConfig,
};

use crate::config::AuthSettings;
use crate::middleware::cookies;
use crate::state::AppState;

/// In-process catalog returning canned TMDB-shaped data.
#[derive(Clone, Default)]
pub struct FakeCatalog {
    failure: Option<(u16, String)>,
    calls: Arc<AtomicUsize>,
    pages: Arc<Mutex<Vec<u32>>>,
}

impl FakeCatalog {
    pub fn failing(status: u16, message: &str) -> Self {
        Self {
            failure: Some((status, message.to_string())),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested_pages(&self) -> Vec<u32> {
        self.pages.lock().unwrap().clone()
    }

    fn record(&self, page: Option<u32>) -> Result<(), CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(page) = page {
            self.pages.lock().unwrap().push(page);
        }
        match &self.failure {
            Some((status, message)) => Err(CatalogError::Request {
                status: Some(*status),
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn movie_page(page: u32) -> MoviePage {
        serde_json::from_value(json!({
            "page": page,
            "results": [
                { "id": 679, "title": "No Backdrop", "poster_path": "/p679.jpg" },
                {
                    "id": 680,
                    "title": "Pulp Fiction",
                    "overview": "Intertwining tales.",
                    "poster_path": "/p680.jpg",
                    "backdrop_path": "/b680.jpg",
                    "release_date": "1994-09-10",
                    "vote_average": 8.5
                }
            ],
            "total_pages": 3,
            "total_results": 60
        }))
        .unwrap()
    }
}

#[async_trait]
impl MovieCatalog for FakeCatalog {
    async fn now_playing(&self, page: u32) -> Result<MoviePage, CatalogError> {
        self.record(Some(page))?;
        Ok(Self::movie_page(page))
    }

    async fn popular(&self, page: u32) -> Result<MoviePage, CatalogError> {
        self.record(Some(page))?;
        Ok(Self::movie_page(page))
    }

    async fn movie_details(&self, movie_id: u64) -> Result<Movie, CatalogError> {
        self.record(None)?;
        Ok(serde_json::from_value(json!({ "id": movie_id, "title": "Fight Club" })).unwrap())
    }

    async fn movie_videos(&self, movie_id: u64) -> Result<VideoList, CatalogError> {
        self.record(None)?;
        Ok(serde_json::from_value(json!({
            "id": movie_id,
            "results": [
                { "key": "teaser", "site": "YouTube", "type": "Teaser", "official": true },
                { "key": "official-trailer", "site": "YouTube", "type": "Trailer", "official": true }
            ]
        }))
        .unwrap())
    }
}

pub const FAKE_STATE: &str = "fake-state";
pub const FAKE_VERIFIER: &str = "fake-verifier";

/// OAuth provider with fixed round-trip values. Accepts the code `good-code`
/// proven with [`FAKE_VERIFIER`] and nothing else.
pub struct FakeOAuthProvider;

#[async_trait]
impl OAuthProvider for FakeOAuthProvider {
    fn id(&self) -> &str {
        "google"
    }

    fn name(&self) -> &str {
        "Google"
    }

    fn authorization_request(&self) -> AuthorizationRequest {
        AuthorizationRequest {
            url: format!(
                "https://accounts.example/o/oauth2/auth?client_id=test&state={}&code_challenge=c",
                FAKE_STATE
            ),
            state: FAKE_STATE.to_string(),
            code_verifier: FAKE_VERIFIER.to_string(),
        }
    }

    async fn exchange_code(&self, code: &str, code_verifier: &str) -> Result<OAuthSignIn, AuthError> {
        if code != "good-code" || code_verifier != FAKE_VERIFIER {
            return Err(AuthError::OAuth("invalid_grant".to_string()));
        }

        Ok(OAuthSignIn {
            identity: Identity::new("google-42")
                .with_name("Google User")
                .with_email("google@cineflix.com"),
            account: OAuthAccount {
                provider: "google".to_string(),
                provider_account_id: "42".to_string(),
                access_token: Some("ya29.token".to_string()),
                id_token: Some("abc".to_string()),
                expires_at: None,
            },
        })
    }
}

/// State over the fakes, the real JWT codec and the demo identity store.
pub fn test_state(catalog: FakeCatalog) -> AppState {
    let settings = AuthSettings::new("test-secret-that-is-at-least-32-bytes", "http://localhost:8080");
    let jwt = JwtConfig::new(settings.secret.clone());

    let identities = InMemoryIdentityBackend::new(Arc::new(Argon2PasswordService::new()))
        .and_then(|backend| backend.with_demo_account())
        .unwrap();

    AppState {
        settings: Arc::new(settings),
        sessions: Arc::new(JwtSessionCodec::new(jwt)),
        credentials: CredentialsProvider::new(Arc::new(identities)),
        oauth: Arc::new(FakeOAuthProvider),
        catalog: Arc::new(catalog),
        queries: Arc::new(QueryClient::new(QueryConfig::default())),
    }
}

/// Session cookie for an already-built token.
pub fn cookie_for_token(state: &AppState, token: &SessionToken) -> Cookie<'static> {
    let raw = state.sessions.encode(token).unwrap();
    cookies::session_cookie(&state.settings, raw)
}

/// Session cookie for the demo user, minted now.
pub fn signed_in_cookie(state: &AppState) -> Cookie<'static> {
    let identity = Identity::new("1")
        .with_name("Cineflix User")
        .with_email("user@cineflix.com");
    let issued = SessionToken::issued_at(Utc::now().timestamp(), state.sessions.max_age_secs());

    cookie_for_token(state, &jwt_callback(issued, Some(&identity), None))
}

/// Initialize the full app, gate included, over `state`.
macro_rules! test_app {
    ($state:expr) => {{
        let state: $crate::state::AppState = $state;
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap($crate::middleware::route_gate::RouteGate::from_state(&state))
                .app_data(actix_web::web::Data::new(state))
                .configure($crate::handlers::configure_routes),
        )
        .await
    }};
}

pub(crate) use test_app;
