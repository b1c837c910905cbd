use thiserror::Error;

/// Classified authentication / token-issuance failures.
///
/// The HTTP status for each kind is decided in `crate::error` together with the
/// scheme it happened under; this type only says *what* went wrong.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing credentials")]
    MissingCredentials,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("malformed token")]
    MalformedToken,

    #[error("token expired")]
    TokenExpired,

    #[error("identity provider rejected token (status {status})")]
    ProviderRejected { status: u16 },

    #[error("identity provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("authorization code required")]
    MissingCode,

    #[error("code exchange failed: {0}")]
    ExchangeFailed(String),

    #[error("credential source failure: {0}")]
    Backend(String),
}

impl AuthError {
    /// Stable label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::MissingCredentials => "missing_credentials",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::MalformedToken => "malformed_token",
            AuthError::TokenExpired => "token_expired",
            AuthError::ProviderRejected { .. } => "provider_rejected",
            AuthError::ProviderUnavailable(_) => "provider_unavailable",
            AuthError::MissingCode => "missing_code",
            AuthError::ExchangeFailed(_) => "exchange_failed",
            AuthError::Backend(_) => "backend",
        }
    }
}
