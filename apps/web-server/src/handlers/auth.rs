//! Authentication handlers: credentials sign-in, OAuth round trip, session
//! lookup and sign-out.

use actix_web::{HttpRequest, HttpResponse, cookie::Cookie, http::header, web};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use cineflix_core::auth::{SignInErrorCode, jwt_callback};
use cineflix_core::domain::{Credentials, Identity, OAuthAccount, SessionToken};
use cineflix_core::ports::OAuthProvider;
use cineflix_shared::dto::{ProviderInfo, SignInRequest, SignInResponse};
use cineflix_shared::forms::{self, FormMode};

use crate::middleware::cookies;
use crate::middleware::error::{AppError, AppResult};
use crate::middleware::session::{lookup_session, sign_out_response};
use crate::state::AppState;

pub const CREDENTIALS_PROVIDER_ID: &str = "credentials";

/// Providers offered on the login page.
pub fn providers(state: &AppState) -> Vec<ProviderInfo> {
    vec![
        ProviderInfo {
            id: CREDENTIALS_PROVIDER_ID.to_string(),
            name: "Email".to_string(),
            signin_url: "/api/auth/callback/credentials".to_string(),
        },
        ProviderInfo {
            id: state.oauth.id().to_string(),
            name: state.oauth.name().to_string(),
            signin_url: format!("/api/auth/signin/{}", state.oauth.id()),
        },
    ]
}

/// Sign and wrap a freshly minted session token.
fn mint_session_cookie(
    state: &AppState,
    identity: &Identity,
    account: Option<&OAuthAccount>,
) -> AppResult<Cookie<'static>> {
    let issued = SessionToken::issued_at(Utc::now().timestamp(), state.sessions.max_age_secs());
    let token = jwt_callback(issued, Some(identity), account);
    let raw = state.sessions.encode(&token)?;

    Ok(cookies::session_cookie(&state.settings, raw))
}

/// Same-origin relative path, or home.
fn safe_callback_url(requested: Option<&str>, home: &str) -> String {
    match requested {
        Some(url) if url.starts_with('/') && !url.starts_with("//") => url.to_string(),
        _ => home.to_string(),
    }
}

fn oauth_provider<'a>(state: &'a AppState, id: &str) -> AppResult<&'a Arc<dyn OAuthProvider>> {
    if state.oauth.id() == id {
        Ok(&state.oauth)
    } else {
        Err(AppError::NotFound(format!("Unknown provider '{}'", id)))
    }
}

/// Send the browser back to the login page with an error code.
fn sign_in_error(state: &AppState, code: SignInErrorCode) -> HttpResponse {
    let mut response = HttpResponse::Found();
    for cookie in cookies::clear_oauth_flow_cookies(&state.settings) {
        response.cookie(cookie);
    }
    response
        .insert_header((
            header::LOCATION,
            format!("{}?error={}", state.settings.login_path, code.as_str()),
        ))
        .finish()
}

/// GET /api/auth/providers
pub async fn list_providers(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(providers(&state))
}

/// POST /api/auth/callback/credentials
pub async fn credentials_sign_in(
    state: web::Data<AppState>,
    body: web::Json<SignInRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let errors = forms::validate(FormMode::SignIn, |field| match field {
        "email" => req.email.as_deref(),
        "password" => req.password.as_deref(),
        _ => None,
    });
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let credentials = Credentials {
        email: req.email.clone(),
        password: req.password.clone(),
    };

    let Some(identity) = state.credentials.authorize(&credentials).await? else {
        let code = SignInErrorCode::CredentialsSignin;
        return Ok(HttpResponse::Unauthorized()
            .json(SignInResponse::failure(code.as_str(), code.message())));
    };

    let cookie = mint_session_cookie(&state, &identity, None)?;
    let url = safe_callback_url(req.callback_url.as_deref(), &state.settings.home_path);

    tracing::info!(user_id = %identity.id, "Signed in with credentials");

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(SignInResponse::success(url)))
}

/// GET /api/auth/signin/{provider}
pub async fn oauth_sign_in(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let provider = oauth_provider(&state, &path)?;
    let request = provider.authorization_request();

    Ok(HttpResponse::TemporaryRedirect()
        .cookie(cookies::oauth_state_cookie(&state.settings, &request.state))
        .cookie(cookies::pkce_verifier_cookie(&state.settings, &request.code_verifier))
        .insert_header((header::LOCATION, request.url))
        .finish())
}

#[derive(Debug, Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// GET /api/auth/callback/{provider}
pub async fn oauth_callback(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<OAuthCallbackQuery>,
) -> AppResult<HttpResponse> {
    let provider = oauth_provider(&state, &path)?;
    let query = query.into_inner();

    if let Some(error) = query.error.as_deref() {
        tracing::info!(provider = provider.id(), error, "Provider returned an error");
        let code = if error == "access_denied" {
            SignInErrorCode::AccessDenied
        } else {
            SignInErrorCode::OAuthCallback
        };
        return Ok(sign_in_error(&state, code));
    }

    let expected = req.cookie(cookies::OAUTH_STATE_COOKIE);
    let state_matches = match (expected.as_ref(), query.state.as_deref()) {
        (Some(cookie), Some(returned)) => !returned.is_empty() && cookie.value() == returned,
        _ => false,
    };
    if !state_matches {
        tracing::warn!(provider = provider.id(), "OAuth state mismatch");
        return Ok(sign_in_error(&state, SignInErrorCode::OAuthCallback));
    }

    let Some(code) = query.code.as_deref().filter(|c| !c.is_empty()) else {
        return Ok(sign_in_error(&state, SignInErrorCode::OAuthCallback));
    };

    let Some(verifier) = req
        .cookie(cookies::PKCE_VERIFIER_COOKIE)
        .filter(|c| !c.value().is_empty())
    else {
        tracing::warn!(provider = provider.id(), "OAuth callback without PKCE verifier");
        return Ok(sign_in_error(&state, SignInErrorCode::OAuthCallback));
    };

    let sign_in = match provider.exchange_code(code, verifier.value()).await {
        Ok(sign_in) => sign_in,
        Err(e) => {
            tracing::warn!(provider = provider.id(), error = %e, "OAuth code exchange failed");
            return Ok(sign_in_error(&state, SignInErrorCode::OAuthCallback));
        }
    };

    let cookie = match mint_session_cookie(&state, &sign_in.identity, Some(&sign_in.account)) {
        Ok(cookie) => cookie,
        Err(e) => {
            tracing::error!(error = %e, "Could not mint session after OAuth sign-in");
            return Ok(sign_in_error(&state, SignInErrorCode::Configuration));
        }
    };

    tracing::info!(
        provider = provider.id(),
        user_id = %sign_in.identity.id,
        "Signed in with OAuth"
    );

    let mut response = HttpResponse::Found();
    response.cookie(cookie);
    for cleared in cookies::clear_oauth_flow_cookies(&state.settings) {
        response.cookie(cleared);
    }
    Ok(response
        .insert_header((header::LOCATION, state.settings.home_path.clone()))
        .finish())
}

/// GET /api/auth/session
pub async fn session(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let session = lookup_session(&req, &state.settings, state.sessions.as_ref());
    HttpResponse::Ok().json(session)
}

/// POST /api/auth/signout
pub async fn sign_out(state: web::Data<AppState>) -> HttpResponse {
    sign_out_response(&state.settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{
        http::StatusCode,
        test::{self, TestRequest},
    };
    use serde_json::{Value, json};

    use crate::test_support::{
        FAKE_STATE, FAKE_VERIFIER, FakeCatalog, signed_in_cookie, test_app, test_state,
    };

    #[test]
    fn test_safe_callback_url() {
        assert_eq!(safe_callback_url(Some("/movies?page=2"), "/"), "/movies?page=2");
        assert_eq!(safe_callback_url(Some("//evil.example"), "/"), "/");
        assert_eq!(safe_callback_url(Some("https://evil.example"), "/"), "/");
        assert_eq!(safe_callback_url(None, "/"), "/");
    }

    #[actix_web::test]
    async fn test_credentials_sign_in_success_sets_cookie() {
        let state = test_state(FakeCatalog::default());
        let cookie_name = state.settings.cookie_name.clone();
        let app = test_app!(state);

        let req = TestRequest::post()
            .uri("/api/auth/callback/credentials")
            .set_json(json!({
                "email": "user@cineflix.com",
                "password": "password",
                "callbackUrl": "/"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.response().cookies().any(|c| c.name() == cookie_name));

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["ok"], true);
        assert_eq!(body["url"], "/");
    }

    #[actix_web::test]
    async fn test_credentials_sign_in_wrong_password() {
        let app = test_app!(test_state(FakeCatalog::default()));

        let req = TestRequest::post()
            .uri("/api/auth/callback/credentials")
            .set_json(json!({ "email": "user@cineflix.com", "password": "wrong-password" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"], "CredentialsSignin");
    }

    #[actix_web::test]
    async fn test_credentials_sign_in_validates_form() {
        let app = test_app!(test_state(FakeCatalog::default()));

        let req = TestRequest::post()
            .uri("/api/auth/callback/credentials")
            .set_json(json!({ "email": "not-an-email" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        let fields: Vec<&str> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["email", "password"]);
    }

    #[actix_web::test]
    async fn test_oauth_sign_in_sets_state_and_verifier() {
        let app = test_app!(test_state(FakeCatalog::default()));

        let req = TestRequest::get().uri("/api/auth/signin/google").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
        let cookie_value = |name: &str| {
            resp.response()
                .cookies()
                .find(|c| c.name() == name)
                .map(|c| c.value().to_string())
                .unwrap()
        };
        assert_eq!(cookie_value(cookies::OAUTH_STATE_COOKIE), FAKE_STATE);
        assert_eq!(cookie_value(cookies::PKCE_VERIFIER_COOKIE), FAKE_VERIFIER);

        let location = resp.headers().get(header::LOCATION).unwrap().to_str().unwrap();
        assert!(location.contains(&format!("state={}", FAKE_STATE)));
        assert!(!location.contains(FAKE_VERIFIER));
    }

    #[actix_web::test]
    async fn test_unknown_provider_is_not_found() {
        let app = test_app!(test_state(FakeCatalog::default()));

        let req = TestRequest::get().uri("/api/auth/signin/github").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_oauth_callback_mints_session_with_id_token() {
        let state = test_state(FakeCatalog::default());
        let cookie_name = state.settings.cookie_name.clone();
        let codec = state.sessions.clone();
        let app = test_app!(state);

        let req = TestRequest::get()
            .uri(&format!("/api/auth/callback/google?code=good-code&state={}", FAKE_STATE))
            .cookie(Cookie::new(cookies::OAUTH_STATE_COOKIE, FAKE_STATE))
            .cookie(Cookie::new(cookies::PKCE_VERIFIER_COOKIE, FAKE_VERIFIER))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");

        let session = resp
            .response()
            .cookies()
            .find(|c| c.name() == cookie_name)
            .unwrap();
        let token = codec.decode(session.value()).unwrap();
        assert_eq!(token.sub.as_deref(), Some("google-42"));
        assert_eq!(token.access_token.as_deref(), Some("abc"));

        let verifier = resp
            .response()
            .cookies()
            .find(|c| c.name() == cookies::PKCE_VERIFIER_COOKIE)
            .unwrap();
        assert_eq!(verifier.value(), "");
    }

    #[actix_web::test]
    async fn test_oauth_callback_rejects_state_mismatch() {
        let app = test_app!(test_state(FakeCatalog::default()));

        let req = TestRequest::get()
            .uri("/api/auth/callback/google?code=good-code&state=forged")
            .cookie(Cookie::new(cookies::OAUTH_STATE_COOKIE, FAKE_STATE))
            .cookie(Cookie::new(cookies::PKCE_VERIFIER_COOKIE, FAKE_VERIFIER))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "/login?error=OAuthCallback"
        );
    }

    #[actix_web::test]
    async fn test_oauth_callback_requires_verifier() {
        let app = test_app!(test_state(FakeCatalog::default()));

        let missing = TestRequest::get()
            .uri(&format!("/api/auth/callback/google?code=good-code&state={}", FAKE_STATE))
            .cookie(Cookie::new(cookies::OAUTH_STATE_COOKIE, FAKE_STATE))
            .to_request();
        let resp = test::call_service(&app, missing).await;
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "/login?error=OAuthCallback"
        );

        let wrong = TestRequest::get()
            .uri(&format!("/api/auth/callback/google?code=good-code&state={}", FAKE_STATE))
            .cookie(Cookie::new(cookies::OAUTH_STATE_COOKIE, FAKE_STATE))
            .cookie(Cookie::new(cookies::PKCE_VERIFIER_COOKIE, "someone-elses-verifier"))
            .to_request();
        let resp = test::call_service(&app, wrong).await;
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "/login?error=OAuthCallback"
        );
    }

    #[actix_web::test]
    async fn test_oauth_callback_exchange_failure() {
        let app = test_app!(test_state(FakeCatalog::default()));

        let req = TestRequest::get()
            .uri(&format!("/api/auth/callback/google?code=bad-code&state={}", FAKE_STATE))
            .cookie(Cookie::new(cookies::OAUTH_STATE_COOKIE, FAKE_STATE))
            .cookie(Cookie::new(cookies::PKCE_VERIFIER_COOKIE, FAKE_VERIFIER))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "/login?error=OAuthCallback"
        );
    }

    #[actix_web::test]
    async fn test_oauth_callback_access_denied() {
        let app = test_app!(test_state(FakeCatalog::default()));

        let req = TestRequest::get()
            .uri("/api/auth/callback/google?error=access_denied")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "/login?error=AccessDenied"
        );
    }

    #[actix_web::test]
    async fn test_session_endpoint() {
        let state = test_state(FakeCatalog::default());
        let cookie = signed_in_cookie(&state);
        let app = test_app!(state);

        let anonymous = TestRequest::get().uri("/api/auth/session").to_request();
        let body: Value = test::call_and_read_body_json(&app, anonymous).await;
        assert!(body.is_null());

        let signed_in = TestRequest::get()
            .uri("/api/auth/session")
            .cookie(cookie)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, signed_in).await;
        assert_eq!(body["user"]["id"], "1");
        assert_eq!(body["user"]["email"], "user@cineflix.com");
    }

    #[actix_web::test]
    async fn test_sign_out_clears_cookie() {
        let state = test_state(FakeCatalog::default());
        let cookie_name = state.settings.cookie_name.clone();
        let app = test_app!(state);

        let req = TestRequest::post().uri("/api/auth/signout").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let cleared = resp
            .response()
            .cookies()
            .find(|c| c.name() == cookie_name)
            .unwrap();
        assert_eq!(cleared.value(), "");
    }
}
