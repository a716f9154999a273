use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User object exposed on a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl SessionUser {
    /// Name if known, otherwise email.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.email.as_deref())
    }
}

/// An authenticated session, derived from the session token on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: SessionUser,
    pub expires: DateTime<Utc>,
}

/// Outcome of a session lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Loading,
    Authenticated(Session),
    Unauthenticated,
}

impl SessionStatus {
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionStatus::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self, SessionStatus::Authenticated(_))
    }
}

impl From<Option<Session>> for SessionStatus {
    fn from(session: Option<Session>) -> Self {
        match session {
            Some(session) => SessionStatus::Authenticated(session),
            None => SessionStatus::Unauthenticated,
        }
    }
}
