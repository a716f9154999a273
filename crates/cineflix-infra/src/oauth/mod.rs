//! OAuth providers.

mod google;
pub mod pkce;

pub use google::{GoogleOAuthConfig, GoogleOAuthProvider};
