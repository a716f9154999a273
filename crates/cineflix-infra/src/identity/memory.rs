//! In-memory credential store.
//!
//! Accounts live only for the process lifetime. Used for the demo account and
//! for tests; a hosted identity service would implement the same port.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use cineflix_core::domain::Identity;
use cineflix_core::ports::{AuthError, IdentityBackend, PasswordService};

pub const DEMO_EMAIL: &str = "user@cineflix.com";
pub const DEMO_PASSWORD: &str = "password";

struct StoredAccount {
    identity: Identity,
    password_hash: String,
}

pub struct InMemoryIdentityBackend {
    passwords: Arc<dyn PasswordService>,
    accounts: HashMap<String, StoredAccount>,
    // Verified against for unknown emails so both paths cost one hash.
    dummy_hash: String,
}

impl InMemoryIdentityBackend {
    pub fn new(passwords: Arc<dyn PasswordService>) -> Result<Self, AuthError> {
        let dummy_hash = passwords.hash("cineflix-dummy-password")?;

        Ok(Self {
            passwords,
            accounts: HashMap::new(),
            dummy_hash,
        })
    }

    /// Register an account. The identity's email is the login key.
    pub fn with_account(mut self, identity: Identity, password: &str) -> Result<Self, AuthError> {
        let email = identity
            .email
            .as_deref()
            .map(normalize_email)
            .ok_or(AuthError::BadInput("email"))?;
        let password_hash = self.passwords.hash(password)?;

        self.accounts.insert(
            email,
            StoredAccount {
                identity,
                password_hash,
            },
        );
        Ok(self)
    }

    /// Seed the demo account (`user@cineflix.com` / `password`).
    pub fn with_demo_account(self) -> Result<Self, AuthError> {
        self.with_account(
            Identity::new("1")
                .with_name("Cineflix User")
                .with_email(DEMO_EMAIL),
            DEMO_PASSWORD,
        )
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl IdentityBackend for InMemoryIdentityBackend {
    async fn verify_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Identity>, AuthError> {
        let account = self.accounts.get(&normalize_email(email));
        let hash = account
            .map(|a| a.password_hash.clone())
            .unwrap_or_else(|| self.dummy_hash.clone());

        // Argon2 is CPU-bound; keep it off the async workers.
        let passwords = self.passwords.clone();
        let password = password.to_string();
        let matches = tokio::task::spawn_blocking(move || passwords.verify(&password, &hash))
            .await
            .map_err(|e| AuthError::Backend(e.to_string()))??;

        Ok(match (account, matches) {
            (Some(account), true) => Some(account.identity.clone()),
            _ => None,
        })
    }
}
