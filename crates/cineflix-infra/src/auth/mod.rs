//! Authentication implementations.

mod jwt;
mod password;

pub use jwt::{JwtConfig, JwtSessionCodec};
pub use password::Argon2PasswordService;
