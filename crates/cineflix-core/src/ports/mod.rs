//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod catalog;

pub use auth::{AuthError, IdentityBackend, OAuthProvider, PasswordService, SessionCodec};
pub use catalog::MovieCatalog;

#[cfg(test)]
pub use auth::MockIdentityBackend;
