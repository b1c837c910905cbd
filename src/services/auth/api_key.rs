use std::sync::Arc;

use async_trait::async_trait;
use tracing::error;

use crate::repos::api_key_repo::ApiKeyStore;
use crate::services::auth::{
    credential::RawCredential,
    error::AuthError,
    principal::{Principal, Scheme},
    verifier::Verifier,
};

pub struct ApiKeyVerifier {
    keys: Arc<dyn ApiKeyStore>,
}

impl ApiKeyVerifier {
    pub fn new(keys: Arc<dyn ApiKeyStore>) -> Self {
        Self { keys }
    }
}

#[async_trait]
impl Verifier for ApiKeyVerifier {
    fn scheme(&self) -> Scheme {
        Scheme::ApiKey
    }

    async fn verify(&self, credential: RawCredential) -> Result<Principal, AuthError> {
        let RawCredential::ApiKey(key) = credential else {
            return Err(AuthError::MissingCredentials);
        };

        let record = self.keys.find(&key).await.map_err(|e| {
            error!(error = %e, "api key lookup failed");
            AuthError::Backend(e.to_string())
        })?;

        // Inactive must be indistinguishable from unknown.
        match record {
            Some(record) if record.active => Ok(Principal::new(Scheme::ApiKey, record.owner)),
            _ => Err(AuthError::InvalidCredentials),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::api_key_repo::{ApiKeyRecord, InMemoryApiKeyStore};

    #[tokio::test]
    async fn active_key_authenticates_as_owner() {
        let store = Arc::new(InMemoryApiKeyStore::new());
        store.insert(ApiKeyRecord::active("K1", "alice")).await;
        let verifier = ApiKeyVerifier::new(store);

        let principal = verifier
            .verify(RawCredential::ApiKey("K1".into()))
            .await
            .unwrap();
        assert_eq!(principal.scheme, Scheme::ApiKey);
        assert_eq!(principal.subject, "alice");
    }

    #[tokio::test]
    async fn deactivation_takes_effect_on_the_next_call() {
        let store = Arc::new(InMemoryApiKeyStore::new());
        store.insert(ApiKeyRecord::active("K1", "alice")).await;
        let verifier = ApiKeyVerifier::new(store.clone());

        assert!(verifier.verify(RawCredential::ApiKey("K1".into())).await.is_ok());

        store.set_active("K1", false).await.unwrap();
        let err = verifier
            .verify(RawCredential::ApiKey("K1".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn unknown_key_is_invalid() {
        let verifier = ApiKeyVerifier::new(Arc::new(InMemoryApiKeyStore::new()));
        let err = verifier
            .verify(RawCredential::ApiKey("K404".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }
}
