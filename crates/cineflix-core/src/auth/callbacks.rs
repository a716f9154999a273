//! Two-stage projection: identity -> token, token -> session.
//!
//! Both stages are plain functions so they can be tested without a running
//! sign-in flow.

use chrono::{DateTime, Utc};

use crate::domain::{Identity, OAuthAccount, Session, SessionToken, SessionUser};

/// Token stage. Runs when a token is minted (with `user`, and `account` for
/// OAuth) and on later refreshes (with neither).
///
/// The access token comes from the OAuth account (`id_token` before
/// `access_token`), otherwise from the verified identity.
pub fn jwt_callback(
    mut token: SessionToken,
    user: Option<&Identity>,
    account: Option<&OAuthAccount>,
) -> SessionToken {
    if let Some(user) = user {
        token.sub = Some(user.id.clone());
        token.name = user.name.clone().or(token.name);
        token.email = user.email.clone().or(token.email);
    }

    let from_account = account.and_then(|a| a.id_token.clone().or_else(|| a.access_token.clone()));
    let from_user = user.and_then(|u| u.access_token.clone());

    if let Some(access_token) = from_account.or(from_user) {
        token.access_token = Some(access_token);
    }

    token
}

/// Session stage. Copies `id` and `accessToken` from the token onto the user;
/// nothing else is added.
pub fn session_callback(mut session: Session, token: &SessionToken) -> Session {
    if let Some(sub) = &token.sub {
        session.user.id = sub.clone();
    }
    session.user.access_token = token.access_token.clone();
    session
}

/// Build the session for a decoded token. `None` when the token carries no
/// subject, so a materialized session always has a non-empty id.
pub fn materialize_session(token: &SessionToken) -> Option<Session> {
    token.sub.as_deref().filter(|sub| !sub.is_empty())?;

    let expires = DateTime::<Utc>::from_timestamp(token.exp, 0)?;
    let base = Session {
        user: SessionUser {
            id: String::new(),
            name: token.name.clone(),
            email: token.email.clone(),
            access_token: None,
        },
        expires,
    };

    Some(session_callback(base, token))
}
