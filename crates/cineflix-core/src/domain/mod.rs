//! Domain entities - the core business objects.

mod identity;
mod movie;
mod session;
mod token;

pub use identity::{AuthorizationRequest, Credentials, Identity, OAuthAccount, OAuthSignIn};
pub use movie::{Movie, MoviePage, TMDB_IMAGE_BASE, Video, VideoList, select_trailer};
pub use session::{Session, SessionStatus, SessionUser};
pub use token::SessionToken;
