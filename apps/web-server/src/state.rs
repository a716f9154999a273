//! Application state - shared across all handlers.
//!
//! Built once in `main` and injected into the app; tests build their own
//! with fakes behind the same ports.

use std::sync::Arc;

use cineflix_core::auth::CredentialsProvider;
use cineflix_core::ports::{AuthError, MovieCatalog, OAuthProvider, SessionCodec};
use cineflix_infra::{
    Argon2PasswordService, GoogleOAuthProvider, HttpClient, InMemoryIdentityBackend, JwtConfig,
    JwtSessionCodec, QueryClient, TmdbCatalog,
};

use crate::config::{AppConfig, AuthSettings};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<AuthSettings>,
    pub sessions: Arc<dyn SessionCodec>,
    pub credentials: CredentialsProvider,
    pub oauth: Arc<dyn OAuthProvider>,
    pub catalog: Arc<dyn MovieCatalog>,
    pub queries: Arc<QueryClient>,
}

impl AppState {
    /// Build the production state from configuration.
    pub fn new(config: &AppConfig) -> Result<Self, AuthError> {
        let mut jwt = JwtConfig::new(config.auth.secret.clone());
        jwt.max_age_secs = config.auth.session_max_age_secs;

        let identities = InMemoryIdentityBackend::new(Arc::new(Argon2PasswordService::new()))?
            .with_demo_account()?;
        tracing::info!(accounts = identities.len(), "Identity backend ready");

        let catalog = TmdbCatalog::new(HttpClient::new(), config.tmdb.clone());

        tracing::info!(tmdb = %config.tmdb.base_url, "Application state initialized");

        Ok(Self {
            settings: Arc::new(config.auth.clone()),
            sessions: Arc::new(JwtSessionCodec::new(jwt)),
            credentials: CredentialsProvider::new(Arc::new(identities)),
            oauth: Arc::new(GoogleOAuthProvider::new(config.google.clone())),
            catalog: Arc::new(catalog),
            queries: Arc::new(QueryClient::new(config.query.clone())),
        })
    }
}
