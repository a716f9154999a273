use serde::{Deserialize, Serialize};

/// Error codes a sign-in attempt can end with, each mapped to one fixed
/// user-facing message. Unknown account and wrong password both surface as
/// `CredentialsSignin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignInErrorCode {
    CredentialsSignin,
    OAuthSignin,
    OAuthCallback,
    AccessDenied,
    Configuration,
    Default,
}

impl SignInErrorCode {
    /// Parse a code from a query string; unknown values become `Default`.
    pub fn parse(code: &str) -> Self {
        match code {
            "CredentialsSignin" => Self::CredentialsSignin,
            "OAuthSignin" => Self::OAuthSignin,
            "OAuthCallback" => Self::OAuthCallback,
            "AccessDenied" => Self::AccessDenied,
            "Configuration" => Self::Configuration,
            _ => Self::Default,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CredentialsSignin => "CredentialsSignin",
            Self::OAuthSignin => "OAuthSignin",
            Self::OAuthCallback => "OAuthCallback",
            Self::AccessDenied => "AccessDenied",
            Self::Configuration => "Configuration",
            Self::Default => "Default",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::CredentialsSignin => "Invalid email or password. Please try again.",
            Self::OAuthSignin | Self::OAuthCallback => {
                "Could not sign in with that provider. Please try again."
            }
            Self::AccessDenied => "Access was denied.",
            Self::Configuration => "Sign-in is temporarily unavailable.",
            Self::Default => "Something went wrong. Please try again.",
        }
    }
}
