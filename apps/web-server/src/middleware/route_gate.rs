//! Route gate - runs before every handler and decides allow/redirect.

use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    cookie::Cookie,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header,
};
use chrono::Utc;
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::sync::Arc;

use cineflix_core::auth::{
    AuthorizationDecision, RouteMatcher, authorize_request, is_login_path, jwt_callback,
};
use cineflix_core::domain::{SessionStatus, SessionToken};
use cineflix_core::ports::SessionCodec;

use crate::config::AuthSettings;
use crate::middleware::cookies;
use crate::middleware::session::resolve_session;
use crate::state::AppState;

/// Route gate middleware factory.
pub struct RouteGate {
    sessions: Arc<dyn SessionCodec>,
    settings: Arc<AuthSettings>,
    matcher: Arc<RouteMatcher>,
}

impl RouteGate {
    pub fn new(
        sessions: Arc<dyn SessionCodec>,
        settings: Arc<AuthSettings>,
        matcher: RouteMatcher,
    ) -> Self {
        Self {
            sessions,
            settings,
            matcher: Arc::new(matcher),
        }
    }

    /// Gate for the application's state; the health check stays public.
    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.sessions.clone(),
            state.settings.clone(),
            RouteMatcher::new().exclude_prefix("api/health"),
        )
    }
}

impl<S, B> Transform<S, ServiceRequest> for RouteGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RouteGateService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RouteGateService {
            service,
            sessions: self.sessions.clone(),
            settings: self.settings.clone(),
            matcher: self.matcher.clone(),
        }))
    }
}

pub struct RouteGateService<S> {
    service: S,
    sessions: Arc<dyn SessionCodec>,
    settings: Arc<AuthSettings>,
    matcher: Arc<RouteMatcher>,
}

impl<S> RouteGateService<S> {
    /// A re-signed cookie when the token is older than the update age.
    fn refreshed_cookie(&self, token: &SessionToken, now: i64) -> Option<Cookie<'static>> {
        if now - token.iat < self.settings.session_update_age_secs {
            return None;
        }

        let renewed = jwt_callback(token.renewed(now, self.sessions.max_age_secs()), None, None);
        match self.sessions.encode(&renewed) {
            Ok(raw) => Some(cookies::session_cookie(&self.settings, raw)),
            Err(e) => {
                tracing::warn!(error = %e, "Could not refresh session token");
                None
            }
        }
    }

    fn redirect_target(&self, req: &ServiceRequest, decision: AuthorizationDecision) -> String {
        match decision {
            AuthorizationDecision::RedirectToHome => self.settings.home_path.clone(),
            _ => {
                let requested = req
                    .uri()
                    .path_and_query()
                    .map(|pq| pq.as_str())
                    .unwrap_or("/");
                format!(
                    "{}?callbackUrl={}",
                    self.settings.login_path,
                    urlencoding::encode(requested)
                )
            }
        }
    }
}

impl<S, B> Service<ServiceRequest> for RouteGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if !self.matcher.matches(req.path()) {
            let fut = self.service.call(req);
            return Box::pin(async move { Ok(fut.await?.map_into_left_body()) });
        }

        let resolved = req
            .cookie(&self.settings.cookie_name)
            .and_then(|cookie| resolve_session(cookie.value(), self.sessions.as_ref()));

        let refreshed = resolved
            .as_ref()
            .and_then(|(token, _)| self.refreshed_cookie(token, Utc::now().timestamp()));

        let status = SessionStatus::from(resolved.map(|(_, session)| session));
        let decision = authorize_request(
            status.is_logged_in(),
            is_login_path(req.path(), &self.settings.login_path),
        );

        tracing::debug!(path = %req.path(), logged_in = status.is_logged_in(), ?decision, "Route gate");

        if decision != AuthorizationDecision::Allow {
            let location = self.redirect_target(&req, decision);
            let response = HttpResponse::TemporaryRedirect()
                .insert_header((header::LOCATION, location))
                .finish();

            let (http_req, _payload) = req.into_parts();
            let srv_response = ServiceResponse::new(http_req, response);

            return Box::pin(async move { Ok(srv_response.map_into_right_body()) });
        }

        req.extensions_mut().insert(status);

        let fut = self.service.call(req);
        Box::pin(async move {
            let mut res = fut.await?;

            if let Some(cookie) = refreshed {
                if let Err(e) = res.response_mut().add_cookie(&cookie) {
                    tracing::warn!(error = %e, "Could not attach refreshed session cookie");
                }
            }

            Ok(res.map_into_left_body())
        })
    }
}
