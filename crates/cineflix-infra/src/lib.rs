//! # Cineflix Infrastructure
//!
//! Concrete implementations of the ports defined in `cineflix-core`:
//! the outbound request wrapper, the TMDB catalog, the query cache,
//! session tokens, password hashing and the identity providers.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No JWT/Argon2 adapters
//! - `auth` - JWT session codec + Argon2 password hashing

pub mod cache;
pub mod http;
pub mod identity;
pub mod oauth;
pub mod tmdb;

#[cfg(feature = "auth")]
pub mod auth;

pub use cache::{QueryClient, QueryConfig};
pub use http::{HttpClient, RequestConfig, RequestError};
pub use identity::InMemoryIdentityBackend;
pub use oauth::{GoogleOAuthConfig, GoogleOAuthProvider};
pub use tmdb::{TmdbCatalog, TmdbConfig};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtSessionCodec};
