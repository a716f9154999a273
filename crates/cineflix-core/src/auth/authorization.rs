use serde::Serialize;

/// Per-request access decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthorizationDecision {
    Allow,
    DenyRedirectToLogin,
    RedirectToHome,
}

/// Decide access from session presence and whether the request targets the
/// login page. Holds no state; evaluate it on every request.
pub fn authorize_request(is_logged_in: bool, is_on_login_path: bool) -> AuthorizationDecision {
    match (is_logged_in, is_on_login_path) {
        (true, true) => AuthorizationDecision::RedirectToHome,
        (false, false) => AuthorizationDecision::DenyRedirectToLogin,
        (true, false) | (false, true) => AuthorizationDecision::Allow,
    }
}

/// `path` is the login page or one of its sub-paths.
pub fn is_login_path(path: &str, login_path: &str) -> bool {
    match path.strip_prefix(login_path) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
