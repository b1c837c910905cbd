/*
 * Responsibility
 * - Unauthenticated entry points that hand out credentials
 *   - bearer path: username/password -> self-signed token
 *   - OAuth path: authorization code -> provider access token
 * - Login shares its credential check with BasicVerifier (same trust root)
 */
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};

use crate::services::auth::{basic::BasicVerifier, bearer::BearerTokens, error::AuthError};
use crate::services::identity::IdentityProvider;

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: u64,
}

#[derive(Debug, Clone)]
pub struct ExchangedToken {
    pub access_token: String,
    pub expires_in: u64,
}

pub struct TokenIssuer {
    credentials: Arc<BasicVerifier>,
    tokens: Arc<BearerTokens>,
    provider: Arc<dyn IdentityProvider>,
    provider_timeout: Duration,
}

impl TokenIssuer {
    pub fn new(
        credentials: Arc<BasicVerifier>,
        tokens: Arc<BearerTokens>,
        provider: Arc<dyn IdentityProvider>,
        provider_timeout: Duration,
    ) -> Self {
        Self {
            credentials,
            tokens,
            provider,
            provider_timeout,
        }
    }

    pub async fn issue_bearer_token(
        &self,
        username: &str,
        password: &str,
    ) -> Result<IssuedToken, AuthError> {
        self.credentials.check(username, password).await?;

        let token = self.tokens.mint(username, Utc::now())?;
        debug!(subject = %username, ttl = self.tokens.ttl_seconds(), "bearer token issued");

        Ok(IssuedToken {
            token,
            expires_in: self.tokens.ttl_seconds(),
        })
    }

    /// An absent or blank code is a client error and never reaches the provider.
    pub async fn exchange_oauth_code(
        &self,
        code: Option<&str>,
    ) -> Result<ExchangedToken, AuthError> {
        let code = code
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or(AuthError::MissingCode)?;

        let tokens = tokio::time::timeout(self.provider_timeout, self.provider.exchange_code(code))
            .await
            .map_err(|_| AuthError::ExchangeFailed("token endpoint timed out".to_string()))?
            .map_err(|e| {
                warn!(provider = self.provider.name(), error = %e, "code exchange failed");
                AuthError::ExchangeFailed(e.to_string())
            })?;

        Ok(ExchangedToken {
            access_token: tokens.access_token,
            expires_in: tokens.expires_in,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::user_repo::InMemoryUserStore;
    use crate::services::auth::password::{PasswordHasher, SaltedSha256};
    use crate::services::identity::fake::{Behavior, FakeProvider};

    async fn issuer(provider: Arc<FakeProvider>) -> TokenIssuer {
        let hasher = Arc::new(SaltedSha256);
        let users = InMemoryUserStore::new();
        users
            .insert("admin", hasher.hash("password123").unwrap())
            .await;
        let credentials = Arc::new(BasicVerifier::new(Arc::new(users), hasher).unwrap());
        let tokens = Arc::new(BearerTokens::new(b"test-secret", 3600));
        TokenIssuer::new(credentials, tokens, provider, Duration::from_millis(50))
    }

    #[tokio::test]
    async fn login_mints_a_token_the_bearer_side_accepts() {
        let issuer = issuer(Arc::new(FakeProvider::new(Behavior::Accept))).await;
        let issued = issuer
            .issue_bearer_token("admin", "password123")
            .await
            .unwrap();

        assert_eq!(issued.expires_in, 3600);
        let claims = issuer.tokens.verify(&issued.token).unwrap();
        assert_eq!(claims.sub, "admin");
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_refused() {
        let issuer = issuer(Arc::new(FakeProvider::new(Behavior::Accept))).await;
        let err = issuer
            .issue_bearer_token("admin", "wrong")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn missing_code_makes_no_outbound_call() {
        let provider = Arc::new(FakeProvider::new(Behavior::Accept));
        let issuer = issuer(provider.clone()).await;

        for code in [None, Some(""), Some("   ")] {
            let err = issuer.exchange_oauth_code(code).await.unwrap_err();
            assert!(matches!(err, AuthError::MissingCode));
        }
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn code_is_exchanged_exactly_once() {
        let provider = Arc::new(FakeProvider::new(Behavior::Accept));
        let issuer = issuer(provider.clone()).await;

        let out = issuer.exchange_oauth_code(Some("4/0Af")).await.unwrap();
        assert_eq!(out.access_token, "access-for-4/0Af");
        assert_eq!(out.expires_in, 3599);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn provider_failures_surface_as_exchange_failed() {
        for behavior in [
            Behavior::Reject(400),
            Behavior::Unavailable,
            Behavior::Hang(Duration::from_secs(10)),
        ] {
            let issuer = issuer(Arc::new(FakeProvider::new(behavior))).await;
            let err = issuer.exchange_oauth_code(Some("code")).await.unwrap_err();
            assert!(matches!(err, AuthError::ExchangeFailed(_)));
        }
    }
}
