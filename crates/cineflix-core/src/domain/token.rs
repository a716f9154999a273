use serde::{Deserialize, Serialize};

/// Claims carried by the session cookie.
///
/// `sub` is the identity id. `access_token` is the downstream credential
/// copied in at mint time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionToken {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

impl SessionToken {
    /// Empty token valid from `now` for `max_age_secs`.
    pub fn issued_at(now: i64, max_age_secs: i64) -> Self {
        Self {
            iat: now,
            exp: now + max_age_secs,
            ..Self::default()
        }
    }

    /// Same claims with a fresh validity window.
    pub fn renewed(&self, now: i64, max_age_secs: i64) -> Self {
        Self {
            iat: now,
            exp: now + max_age_secs,
            ..self.clone()
        }
    }
}
