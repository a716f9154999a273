//! Google sign-in via the OAuth 2.0 authorization code flow.

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use cineflix_core::domain::{AuthorizationRequest, Identity, OAuthAccount, OAuthSignIn};
use cineflix_core::ports::{AuthError, OAuthProvider};

use super::pkce;
use crate::http::default_client;

#[derive(Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Our callback, e.g. `http://localhost:8080/api/auth/callback/google`.
    pub redirect_url: Url,
    pub auth_url: Url,
    pub token_url: Url,
    pub userinfo_url: Url,
    pub scopes: Vec<String>,
}

impl GoogleOAuthConfig {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_url: &str,
    ) -> Result<Self, url::ParseError> {
        Ok(Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_url: Url::parse(redirect_url)?,
            auth_url: Url::parse("https://accounts.google.com/o/oauth2/v2/auth")?,
            token_url: Url::parse("https://oauth2.googleapis.com/token")?,
            userinfo_url: Url::parse("https://openidconnect.googleapis.com/v1/userinfo")?,
            scopes: ["openid", "email", "profile"].map(String::from).to_vec(),
        })
    }
}

impl std::fmt::Debug for GoogleOAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleOAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_url", &self.redirect_url.as_str())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    id_token: Option<String>,
    expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    sub: String,
    name: Option<String>,
    email: Option<String>,
}

pub struct GoogleOAuthProvider {
    config: GoogleOAuthConfig,
    client: reqwest::Client,
}

impl GoogleOAuthProvider {
    pub fn new(config: GoogleOAuthConfig) -> Self {
        Self {
            config,
            client: default_client(),
        }
    }

    async fn fetch_tokens(&self, code: &str, code_verifier: &str) -> Result<TokenResponse, AuthError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_url.as_str()),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code_verifier", code_verifier),
        ];

        let response = self
            .client
            .post(self.config.token_url.clone())
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::OAuth(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status, %body, "Google token exchange rejected");
            return Err(AuthError::OAuth(format!("token endpoint returned {}", status)));
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::OAuth(e.to_string()))
    }

    async fn fetch_userinfo(&self, access_token: &str) -> Result<UserInfo, AuthError> {
        let response = self
            .client
            .get(self.config.userinfo_url.clone())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::OAuth(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::OAuth(format!(
                "userinfo endpoint returned {}",
                response.status().as_u16()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::OAuth(e.to_string()))
    }
}

#[async_trait]
impl OAuthProvider for GoogleOAuthProvider {
    fn id(&self) -> &str {
        "google"
    }

    fn name(&self) -> &str {
        "Google"
    }

    fn authorization_request(&self) -> AuthorizationRequest {
        let state = pkce::generate_state();
        let code_verifier = pkce::generate_code_verifier();
        let code_challenge = pkce::generate_code_challenge(&code_verifier);

        let mut url = self.config.auth_url.clone();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", self.config.redirect_url.as_str())
            .append_pair("scope", &self.config.scopes.join(" "))
            .append_pair("state", &state)
            .append_pair("code_challenge", &code_challenge)
            .append_pair("code_challenge_method", "S256");

        AuthorizationRequest {
            url: url.into(),
            state,
            code_verifier,
        }
    }

    async fn exchange_code(&self, code: &str, code_verifier: &str) -> Result<OAuthSignIn, AuthError> {
        let tokens = self.fetch_tokens(code, code_verifier).await?;
        let access_token = tokens
            .access_token
            .clone()
            .ok_or_else(|| AuthError::OAuth("token response without access_token".to_string()))?;

        let profile = self.fetch_userinfo(&access_token).await?;
        if profile.sub.is_empty() {
            return Err(AuthError::OAuth("profile without subject".to_string()));
        }

        let mut identity = Identity::new(profile.sub.clone());
        identity.name = profile.name;
        identity.email = profile.email;

        let account = OAuthAccount {
            provider: self.id().to_string(),
            provider_account_id: profile.sub,
            access_token: tokens.access_token,
            id_token: tokens.id_token,
            expires_at: tokens
                .expires_in
                .map(|secs| chrono::Utc::now().timestamp() + secs),
        };

        tracing::info!(provider = %account.provider, user_id = %identity.id, "OAuth sign-in completed");
        Ok(OAuthSignIn { identity, account })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config() -> GoogleOAuthConfig {
        GoogleOAuthConfig::new(
            "client-1",
            "shh",
            "http://localhost:8080/api/auth/callback/google",
        )
        .unwrap()
    }

    fn provider(server: &MockServer) -> GoogleOAuthProvider {
        let mut config = config();
        config.token_url = format!("{}/token", server.uri()).parse().unwrap();
        config.userinfo_url = format!("{}/userinfo", server.uri()).parse().unwrap();
        GoogleOAuthProvider::new(config)
    }

    fn query_of(url: &str) -> HashMap<String, String> {
        Url::parse(url).unwrap().query_pairs().into_owned().collect()
    }

    #[test]
    fn test_authorization_request_carries_state_and_challenge() {
        let request = GoogleOAuthProvider::new(config()).authorization_request();

        assert!(request.url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        let query = query_of(&request.url);
        assert_eq!(query["response_type"], "code");
        assert_eq!(query["client_id"], "client-1");
        assert_eq!(query["redirect_uri"], "http://localhost:8080/api/auth/callback/google");
        assert_eq!(query["scope"], "openid email profile");
        assert_eq!(query["state"], request.state);
        assert_eq!(
            query["code_challenge"],
            pkce::generate_code_challenge(&request.code_verifier)
        );
        assert_eq!(query["code_challenge_method"], "S256");
        assert!(!request.url.contains(&request.code_verifier));
    }

    #[test]
    fn test_authorization_url_keeps_existing_query() {
        let mut config = config();
        config.auth_url = "https://accounts.example/auth?hd=cineflix.com".parse().unwrap();

        let request = GoogleOAuthProvider::new(config).authorization_request();

        assert_eq!(request.url.matches('?').count(), 1);
        let query = query_of(&request.url);
        assert_eq!(query["hd"], "cineflix.com");
        assert_eq!(query["state"], request.state);
    }

    #[test]
    fn test_each_request_is_fresh() {
        let provider = GoogleOAuthProvider::new(config());
        let first = provider.authorization_request();
        let second = provider.authorization_request();

        assert_ne!(first.state, second.state);
        assert_ne!(first.code_verifier, second.code_verifier);
    }

    #[tokio::test]
    async fn test_exchange_code_returns_account_and_identity() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("code=auth-code"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code_verifier=verifier-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "ya29",
                "id_token": "abc",
                "expires_in": 3599,
                "token_type": "Bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .and(header("authorization", "Bearer ya29"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sub": "10769150350006150715113082367",
                "name": "Jane Doe",
                "email": "jane@example.com"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let sign_in = provider(&server)
            .exchange_code("auth-code", "verifier-123")
            .await
            .unwrap();

        assert_eq!(sign_in.identity.id, "10769150350006150715113082367");
        assert_eq!(sign_in.identity.email.as_deref(), Some("jane@example.com"));
        assert_eq!(sign_in.account.provider, "google");
        assert_eq!(sign_in.account.id_token.as_deref(), Some("abc"));
        assert_eq!(sign_in.account.access_token.as_deref(), Some("ya29"));
    }

    #[tokio::test]
    async fn test_rejected_code_is_oauth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_grant"})))
            .mount(&server)
            .await;

        let result = provider(&server).exchange_code("stale", "verifier").await;
        assert!(matches!(result, Err(AuthError::OAuth(_))));
    }
}
