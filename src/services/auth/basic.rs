use std::sync::Arc;

use async_trait::async_trait;
use tracing::error;

use crate::repos::user_repo::UserStore;
use crate::services::auth::{
    credential::RawCredential,
    error::AuthError,
    password::{PasswordError, PasswordHasher},
    principal::{Principal, Scheme},
    verifier::Verifier,
};

/// Username/password check against the shared credential source.
///
/// Also the trust root for bearer-token login (`TokenIssuer::issue_bearer_token`).
pub struct BasicVerifier {
    users: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
    // Compared against when the user does not exist, so both failure paths hash once.
    decoy_hash: String,
}

impl std::fmt::Debug for BasicVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicVerifier").finish_non_exhaustive()
    }
}

impl BasicVerifier {
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Result<Self, PasswordError> {
        let decoy_hash = hasher.hash("decoy-password")?;
        Ok(Self {
            users,
            hasher,
            decoy_hash,
        })
    }

    pub async fn check(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let row = self.users.find_by_username(username).await.map_err(|e| {
            error!(error = %e, "credential source lookup failed");
            AuthError::Backend(e.to_string())
        })?;

        match row {
            Some(row) if self.hasher.verify(password, &row.password_hash) => Ok(()),
            Some(_) => Err(AuthError::InvalidCredentials),
            None => {
                let _ = self.hasher.verify(password, &self.decoy_hash);
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}

#[async_trait]
impl Verifier for BasicVerifier {
    fn scheme(&self) -> Scheme {
        Scheme::Basic
    }

    async fn verify(&self, credential: RawCredential) -> Result<Principal, AuthError> {
        let RawCredential::Basic { username, password } = credential else {
            return Err(AuthError::MissingCredentials);
        };

        self.check(&username, &password).await?;
        Ok(Principal::new(Scheme::Basic, username))
    }
}
