//! Application configuration loaded from environment variables.
//!
//! Required values are checked once at startup; a missing one stops the
//! process before it binds.

use std::env;
use std::time::Duration;

use cineflix_infra::{GoogleOAuthConfig, QueryConfig, TmdbConfig};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Session and redirect settings shared by the gate and the auth handlers.
#[derive(Clone)]
pub struct AuthSettings {
    pub secret: String,
    /// Public origin, e.g. `https://cineflix.example`.
    pub public_url: String,
    pub cookie_name: String,
    pub session_max_age_secs: i64,
    /// A token older than this is re-signed on the next gated request.
    pub session_update_age_secs: i64,
    pub secure_cookies: bool,
    pub login_path: String,
    pub home_path: String,
}

impl AuthSettings {
    pub const MIN_SECRET_LEN: usize = 32;

    pub fn new(secret: impl Into<String>, public_url: impl Into<String>) -> Self {
        let public_url = public_url.into().trim_end_matches('/').to_string();
        let secure_cookies = public_url.starts_with("https://");

        Self {
            secret: secret.into(),
            cookie_name: if secure_cookies {
                "__Secure-cineflix.session-token".to_string()
            } else {
                "cineflix.session-token".to_string()
            },
            public_url,
            session_max_age_secs: 30 * 24 * 60 * 60,
            session_update_age_secs: 24 * 60 * 60,
            secure_cookies,
            login_path: "/login".to_string(),
            home_path: "/".to_string(),
        }
    }

    /// Where an OAuth provider sends the browser back to.
    pub fn oauth_callback_url(&self, provider: &str) -> String {
        format!("{}/api/auth/callback/{}", self.public_url, provider)
    }
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("secret", &"<redacted>")
            .field("public_url", &self.public_url)
            .field("cookie_name", &self.cookie_name)
            .field("session_max_age_secs", &self.session_max_age_secs)
            .field("session_update_age_secs", &self.session_update_age_secs)
            .field("secure_cookies", &self.secure_cookies)
            .finish_non_exhaustive()
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub auth: AuthSettings,
    pub tmdb: TmdbConfig,
    pub google: GoogleOAuthConfig,
    pub query: QueryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, treating blank values as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let secret = require("AUTH_SECRET")?;
        if secret.len() < AuthSettings::MIN_SECRET_LEN {
            return Err(ConfigError::Invalid {
                key: "AUTH_SECRET",
                reason: format!("must be at least {} characters", AuthSettings::MIN_SECRET_LEN),
            });
        }

        let host = get("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse_or("PORT", get("PORT"), 8080u16)?;
        let public_url =
            get("AUTH_URL").unwrap_or_else(|| format!("http://localhost:{}", port));

        let mut auth = AuthSettings::new(secret, public_url);
        auth.session_max_age_secs =
            parse_or("SESSION_MAX_AGE_SECS", get("SESSION_MAX_AGE_SECS"), auth.session_max_age_secs)?;
        auth.session_update_age_secs = parse_or(
            "SESSION_UPDATE_AGE_SECS",
            get("SESSION_UPDATE_AGE_SECS"),
            auth.session_update_age_secs,
        )?;

        let tmdb = TmdbConfig {
            base_url: require("TMDB_BASE_URL")?,
            token: require("TMDB_TOKEN")?,
        };

        let google = GoogleOAuthConfig::new(
            require("GOOGLE_CLIENT_ID")?,
            require("GOOGLE_CLIENT_SECRET")?,
            &auth.oauth_callback_url("google"),
        )
        .map_err(|e| ConfigError::Invalid {
            key: "AUTH_URL",
            reason: e.to_string(),
        })?;

        let defaults = QueryConfig::default();
        let query = QueryConfig {
            stale_time: Duration::from_secs(parse_or(
                "QUERY_STALE_SECS",
                get("QUERY_STALE_SECS"),
                defaults.stale_time.as_secs(),
            )?),
            retry: parse_or("QUERY_RETRY", get("QUERY_RETRY"), defaults.retry)?,
            max_entries: parse_or(
                "QUERY_MAX_ENTRIES",
                get("QUERY_MAX_ENTRIES"),
                defaults.max_entries,
            )?,
        };

        Ok(Self {
            host,
            port,
            auth,
            tmdb,
            google,
            query,
        })
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
