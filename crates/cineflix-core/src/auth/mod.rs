//! Authentication orchestration: who is signed in and where they may go.

mod authorization;
mod callbacks;
mod credentials;
mod error_code;
mod routes;

pub use authorization::{AuthorizationDecision, authorize_request, is_login_path};
pub use callbacks::{jwt_callback, materialize_session, session_callback};
pub use credentials::CredentialsProvider;
pub use error_code::SignInErrorCode;
pub use routes::RouteMatcher;
