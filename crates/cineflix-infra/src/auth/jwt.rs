//! JWT session codec: the signed session cookie.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use cineflix_core::domain::SessionToken;
use cineflix_core::ports::{AuthError, SessionCodec};

/// Session token signing configuration.
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub max_age_secs: i64,
    pub issuer: String,
}

impl JwtConfig {
    pub const DEFAULT_MAX_AGE_SECS: i64 = 30 * 24 * 60 * 60;

    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            max_age_secs: Self::DEFAULT_MAX_AGE_SECS,
            issuer: "cineflix".to_string(),
        }
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("max_age_secs", &self.max_age_secs)
            .field("issuer", &self.issuer)
            .finish()
    }
}

/// Wire claims: the session token plus the issuer.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(flatten)]
    token: SessionToken,
    iss: String,
}

/// HS256 JWT-backed session codec.
pub struct JwtSessionCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: JwtConfig,
}

impl JwtSessionCodec {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            encoding_key,
            decoding_key,
            config,
        }
    }
}

impl SessionCodec for JwtSessionCodec {
    fn encode(&self, token: &SessionToken) -> Result<String, AuthError> {
        let claims = Claims {
            token: token.clone(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn decode(&self, raw: &str) -> Result<SessionToken, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);

        let data = decode::<Claims>(raw, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        Ok(data.claims.token)
    }

    fn max_age_secs(&self) -> i64 {
        self.config.max_age_secs
    }
}
