//! Cookies set by the auth flows.

use actix_web::cookie::{Cookie, SameSite, time::Duration};

use crate::config::AuthSettings;

pub const OAUTH_STATE_COOKIE: &str = "cineflix.oauth-state";
pub const PKCE_VERIFIER_COOKIE: &str = "cineflix.pkce-verifier";

const OAUTH_FLOW_TTL_MINUTES: i64 = 10;

/// Session cookie holding the signed token.
pub fn session_cookie(settings: &AuthSettings, token: String) -> Cookie<'static> {
    Cookie::build(settings.cookie_name.clone(), token)
        .http_only(true)
        .secure(settings.secure_cookies)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::seconds(settings.session_max_age_secs))
        .finish()
}

/// Removal cookie for the session.
pub fn clear_session_cookie(settings: &AuthSettings) -> Cookie<'static> {
    Cookie::build(settings.cookie_name.clone(), "")
        .http_only(true)
        .secure(settings.secure_cookies)
        .path("/")
        .max_age(Duration::ZERO)
        .finish()
}

/// Short-lived cookie scoped to the auth endpoints, for one OAuth round trip.
fn oauth_flow_cookie(settings: &AuthSettings, name: &'static str, value: &str) -> Cookie<'static> {
    Cookie::build(name, value.to_string())
        .http_only(true)
        .secure(settings.secure_cookies)
        .same_site(SameSite::Lax)
        .path("/api/auth")
        .max_age(Duration::minutes(OAUTH_FLOW_TTL_MINUTES))
        .finish()
}

fn clear_oauth_flow_cookie(settings: &AuthSettings, name: &'static str) -> Cookie<'static> {
    Cookie::build(name, "")
        .http_only(true)
        .secure(settings.secure_cookies)
        .path("/api/auth")
        .max_age(Duration::ZERO)
        .finish()
}

/// Anti-forgery state the callback must echo.
pub fn oauth_state_cookie(settings: &AuthSettings, state: &str) -> Cookie<'static> {
    oauth_flow_cookie(settings, OAUTH_STATE_COOKIE, state)
}

/// PKCE verifier the callback proves the code with.
pub fn pkce_verifier_cookie(settings: &AuthSettings, verifier: &str) -> Cookie<'static> {
    oauth_flow_cookie(settings, PKCE_VERIFIER_COOKIE, verifier)
}

/// Removal cookies for both round-trip values.
pub fn clear_oauth_flow_cookies(settings: &AuthSettings) -> [Cookie<'static>; 2] {
    [
        clear_oauth_flow_cookie(settings, OAUTH_STATE_COOKIE),
        clear_oauth_flow_cookie(settings, PKCE_VERIFIER_COOKIE),
    ]
}
