//! Session lookup and the auth context handlers read it through.

use actix_web::{FromRequest, HttpMessage, HttpRequest, HttpResponse, dev::Payload, http::header};
use std::future::{Ready, ready};

use cineflix_core::auth::materialize_session;
use cineflix_core::domain::{Session, SessionStatus, SessionToken, SessionUser};
use cineflix_core::ports::SessionCodec;

use crate::config::AuthSettings;
use crate::middleware::cookies;
use crate::middleware::error::AppError;

/// Decode a raw session cookie. Any failure means "no session".
pub fn resolve_session(raw: &str, codec: &dyn SessionCodec) -> Option<(SessionToken, Session)> {
    let token = match codec.decode(raw) {
        Ok(token) => token,
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring unusable session cookie");
            return None;
        }
    };

    let session = materialize_session(&token)?;
    Some((token, session))
}

/// Session for a request that did not pass through the route gate.
pub fn lookup_session(req: &HttpRequest, settings: &AuthSettings, codec: &dyn SessionCodec) -> Option<Session> {
    let cookie = req.cookie(&settings.cookie_name)?;
    resolve_session(cookie.value(), codec).map(|(_, session)| session)
}

/// Clear the session cookie and send the browser to the login page.
pub fn sign_out_response(settings: &AuthSettings) -> HttpResponse {
    HttpResponse::SeeOther()
        .cookie(cookies::clear_session_cookie(settings))
        .insert_header((header::LOCATION, settings.login_path.clone()))
        .finish()
}

/// Auth state as handlers see it: `{ user, loading }` plus sign-out.
///
/// Only available behind the route gate, which resolves the session once per
/// request. Extracting it anywhere else is a programming error.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: Option<SessionUser>,
    pub loading: bool,
}

impl AuthContext {
    pub fn from_status(status: &SessionStatus) -> Self {
        Self {
            user: status.session().map(|s| s.user.clone()),
            loading: matches!(status, SessionStatus::Loading),
        }
    }

    pub fn sign_out(&self, settings: &AuthSettings) -> HttpResponse {
        if let Some(user) = &self.user {
            tracing::info!(user_id = %user.id, "Signing out");
        }
        sign_out_response(settings)
    }
}

impl FromRequest for AuthContext {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let context = req
            .extensions()
            .get::<SessionStatus>()
            .map(AuthContext::from_status)
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "AuthContext used on {} outside the route gate",
                    req.path()
                ))
            });

        ready(context)
    }
}
