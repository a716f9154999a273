//! Authentication ports.

use async_trait::async_trait;

use crate::domain::{AuthorizationRequest, Identity, OAuthSignIn, SessionToken};

/// Credential store that can verify an email/password pair.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityBackend: Send + Sync {
    /// `Ok(None)` when the pair does not match an account.
    async fn verify_password(&self, email: &str, password: &str)
    -> Result<Option<Identity>, AuthError>;
}

/// External OAuth provider (authorization code flow).
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// Provider id used in routes, e.g. `google`.
    fn id(&self) -> &str;

    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Start a round trip: fresh `state` and PKCE verifier, and the URL
    /// carrying `state` and the verifier's challenge.
    fn authorization_request(&self) -> AuthorizationRequest;

    /// Exchange the callback code, proven with the matching verifier, for
    /// the account payload and profile.
    async fn exchange_code(&self, code: &str, code_verifier: &str)
    -> Result<OAuthSignIn, AuthError>;
}

/// Signs and verifies session tokens carried in the session cookie.
pub trait SessionCodec: Send + Sync {
    fn encode(&self, token: &SessionToken) -> Result<String, AuthError>;

    fn decode(&self, raw: &str) -> Result<SessionToken, AuthError>;

    /// Session lifetime in seconds.
    fn max_age_secs(&self) -> i64;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing or blank credential field: {0}")]
    BadInput(&'static str),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("OAuth error: {0}")]
    OAuth(String),

    #[error("Identity backend error: {0}")]
    Backend(String),

    #[error("Hashing error: {0}")]
    HashingError(String),
}
