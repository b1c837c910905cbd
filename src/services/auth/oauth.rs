//! Delegated OAuth verification: the token is only trusted after the external
//! provider confirms it on *this* call. Nothing is cached across requests.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::services::auth::{
    credential::RawCredential,
    error::AuthError,
    principal::{Principal, PrincipalClaims, Scheme},
    verifier::Verifier,
};
use crate::services::identity::{IdentityProvider, ProviderError};

pub struct DelegatedOAuthVerifier {
    provider: Arc<dyn IdentityProvider>,
    timeout: Duration,
}

impl DelegatedOAuthVerifier {
    pub fn new(provider: Arc<dyn IdentityProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }
}

/// Verification-side classification. Fails closed on anything but a 2xx.
pub(crate) fn classify_provider_error(err: ProviderError) -> AuthError {
    match err {
        ProviderError::Rejected { status } => AuthError::ProviderRejected { status },
        ProviderError::Unavailable(reason) => AuthError::ProviderUnavailable(reason),
        ProviderError::Misconfigured(key) => {
            AuthError::ProviderUnavailable(format!("missing {key}"))
        }
    }
}

#[async_trait]
impl Verifier for DelegatedOAuthVerifier {
    fn scheme(&self) -> Scheme {
        Scheme::OAuth
    }

    async fn verify(&self, credential: RawCredential) -> Result<Principal, AuthError> {
        let RawCredential::Bearer(token) = credential else {
            return Err(AuthError::MissingCredentials);
        };

        let profile = tokio::time::timeout(self.timeout, self.provider.user_info(&token))
            .await
            .map_err(|_| {
                AuthError::ProviderUnavailable(format!(
                    "{} userinfo timed out after {:?}",
                    self.provider.name(),
                    self.timeout
                ))
            })?
            .map_err(classify_provider_error)?;

        Ok(
            Principal::new(Scheme::OAuth, profile.subject).with_claims(PrincipalClaims {
                issued_at: None,
                expires_at: None,
                profile: Some(profile.raw),
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::identity::fake::{Behavior, FakeProvider};

    fn verifier(provider: Arc<FakeProvider>) -> DelegatedOAuthVerifier {
        DelegatedOAuthVerifier::new(provider, Duration::from_millis(50))
    }

    #[tokio::test]
    async fn confirmed_token_yields_oauth_principal_with_profile() {
        let provider = Arc::new(FakeProvider::new(Behavior::Accept));
        let principal = verifier(provider.clone())
            .verify(RawCredential::Bearer("ya29".into()))
            .await
            .unwrap();

        assert_eq!(principal.scheme, Scheme::OAuth);
        assert_eq!(principal.subject, "uid-ya29");
        let profile = principal.claims.profile.unwrap();
        assert_eq!(profile["email"], "demo.user@example.com");
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn every_call_goes_to_the_provider() {
        let provider = Arc::new(FakeProvider::new(Behavior::Accept));
        let v = verifier(provider.clone());
        for _ in 0..3 {
            v.verify(RawCredential::Bearer("ya29".into())).await.unwrap();
        }
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn provider_client_error_is_rejected() {
        let provider = Arc::new(FakeProvider::new(Behavior::Reject(401)));
        let err = verifier(provider)
            .verify(RawCredential::Bearer("revoked".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::ProviderRejected { status: 401 }));
    }

    #[tokio::test]
    async fn outage_fails_closed_as_unavailable() {
        let provider = Arc::new(FakeProvider::new(Behavior::Unavailable));
        let err = verifier(provider)
            .verify(RawCredential::Bearer("ya29".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::ProviderUnavailable(_)));
    }

    #[tokio::test]
    async fn hung_provider_times_out_as_unavailable() {
        let provider = Arc::new(FakeProvider::new(Behavior::Hang(Duration::from_secs(10))));
        let started = std::time::Instant::now();
        let err = verifier(provider)
            .verify(RawCredential::Bearer("ya29".into()))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::ProviderUnavailable(_)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
