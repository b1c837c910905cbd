//! External identity provider interface used by the delegated OAuth verifier
//! and the code-exchange flow.
//!
//! Kept independent from `AppError` / `AuthError` so each caller decides how a
//! provider failure is classified (401 for verification, 500 for exchange).
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider answered and said no (4xx): bad, expired or revoked input.
    #[error("provider rejected request (status {status})")]
    Rejected { status: u16 },

    /// No usable answer: transport failure, timeout, 5xx, undecodable body.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("provider misconfigured: {0}")]
    Misconfigured(&'static str),
}

/// What the provider tells us about the bearer of an access token.
#[derive(Debug, Clone)]
pub struct ProviderProfile {
    /// Provider-unique identifier for the user.
    pub subject: String,
    pub email: Option<String>,
    pub name: Option<String>,
    /// Full payload as returned, passed through as principal claims.
    pub raw: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderTokens {
    pub access_token: String,
    pub expires_in: u64,
}

/// A live, uncached connection to the third-party identity provider.
///
/// Implementations must not retry; the caller bounds every call with a timeout.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    // Provider name (for logging).
    fn name(&self) -> &'static str;

    // Validate an access token by fetching the user profile it grants access to.
    async fn user_info(&self, access_token: &str) -> Result<ProviderProfile, ProviderError>;

    // Exchange a one-time authorization code for an access token.
    async fn exchange_code(&self, code: &str) -> Result<ProviderTokens, ProviderError>;
}
