use async_trait::async_trait;

use crate::services::auth::{
    credential::RawCredential, error::AuthError, principal::Principal, principal::Scheme,
};

/// Common contract of every strategy verifier: raw credential in, principal or
/// classified error out.
///
/// A verifier handed a credential of another shape answers `MissingCredentials`:
/// there is no cross-scheme fallback.
#[async_trait]
pub trait Verifier: Send + Sync {
    fn scheme(&self) -> Scheme;

    async fn verify(&self, credential: RawCredential) -> Result<Principal, AuthError>;
}
