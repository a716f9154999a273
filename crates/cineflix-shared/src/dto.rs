//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Credentials sign-in request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Where to land after a successful sign-in. Only same-origin paths are honored.
    #[serde(default)]
    pub callback_url: Option<String>,
}

/// Outcome of a sign-in attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SignInResponse {
    pub fn success(url: impl Into<String>) -> Self {
        Self {
            ok: true,
            url: Some(url.into()),
            error: None,
            message: None,
        }
    }

    pub fn failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            url: None,
            error: Some(code.into()),
            message: Some(message.into()),
        }
    }
}

/// A sign-in provider offered on the login page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub id: String,
    pub name: String,
    pub signin_url: String,
}
