use std::sync::Arc;

use crate::domain::{Credentials, Identity};
use crate::ports::{AuthError, IdentityBackend};

/// Credentials sign-in: checks the presented pair against an identity backend.
///
/// The caller only ever learns "identity" or "no identity". Why a pair was
/// rejected stays in the logs.
#[derive(Clone)]
pub struct CredentialsProvider {
    backend: Arc<dyn IdentityBackend>,
}

impl CredentialsProvider {
    pub fn new(backend: Arc<dyn IdentityBackend>) -> Self {
        Self { backend }
    }

    /// `Err(AuthError::BadInput)` when a field is missing, without calling the
    /// backend. Every other failure is `Ok(None)`.
    pub async fn authorize(&self, credentials: &Credentials) -> Result<Option<Identity>, AuthError> {
        let (email, password) = match credentials.present() {
            Some(pair) => pair,
            None if credentials
                .email
                .as_deref()
                .is_none_or(|e| e.trim().is_empty()) =>
            {
                return Err(AuthError::BadInput("email"));
            }
            None => return Err(AuthError::BadInput("password")),
        };

        match self.backend.verify_password(email, password).await {
            Ok(Some(identity)) if !identity.id.is_empty() => {
                tracing::info!(user_id = %identity.id, "Credentials verified");
                Ok(Some(identity))
            }
            Ok(Some(_)) => {
                tracing::warn!("Identity backend returned an identity without id");
                Ok(None)
            }
            Ok(None) => {
                tracing::debug!("Credentials rejected");
                Ok(None)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Identity backend failed during sign-in");
                Ok(None)
            }
        }
    }
}
