//! Self-issued bearer tokens (HS256 JWT).
//!
//! Stateless: nothing is stored server-side. A token is valid iff the
//! signature matches the server secret and `now < exp`.
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::services::auth::{
    credential::RawCredential,
    error::AuthError,
    principal::{Principal, PrincipalClaims, Scheme},
    verifier::Verifier,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BearerTokenClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies bearer tokens with one server-held secret.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct BearerTokens {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: u64,
}

impl std::fmt::Debug for BearerTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerTokens")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl BearerTokens {
    pub fn new(secret: &[u8], ttl_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is a hard edge: no grace period.
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl_seconds,
        }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    pub fn mint(&self, subject: &str, issued_at: DateTime<Utc>) -> Result<String, AuthError> {
        let iat = issued_at.timestamp();
        let exp = i64::try_from(self.ttl_seconds)
            .ok()
            .and_then(|ttl| iat.checked_add(ttl))
            .ok_or_else(|| {
                error!(ttl = self.ttl_seconds, "bearer token ttl out of range");
                AuthError::Backend("token ttl out of range".to_string())
            })?;
        let claims = BearerTokenClaims {
            sub: subject.to_string(),
            iat,
            exp,
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, &claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign bearer token");
            AuthError::Backend("token signing failed".to_string())
        })
    }

    pub fn verify(&self, token: &str) -> Result<BearerTokenClaims, AuthError> {
        let data =
            jsonwebtoken::decode::<BearerTokenClaims>(token, &self.decoding_key, &self.validation)
                .map_err(|e| match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::MalformedToken,
                })?;

        // Valid only while `now < exp`; the library still accepts `exp == now`.
        if data.claims.exp <= Utc::now().timestamp() {
            return Err(AuthError::TokenExpired);
        }

        if data.claims.sub.trim().is_empty() {
            return Err(AuthError::MalformedToken);
        }

        Ok(data.claims)
    }
}

pub struct BearerTokenVerifier {
    tokens: Arc<BearerTokens>,
}

impl BearerTokenVerifier {
    pub fn new(tokens: Arc<BearerTokens>) -> Self {
        Self { tokens }
    }
}

#[async_trait]
impl Verifier for BearerTokenVerifier {
    fn scheme(&self) -> Scheme {
        Scheme::Bearer
    }

    async fn verify(&self, credential: RawCredential) -> Result<Principal, AuthError> {
        let RawCredential::Bearer(token) = credential else {
            return Err(AuthError::MissingCredentials);
        };

        let claims = self.tokens.verify(&token)?;
        Ok(
            Principal::new(Scheme::Bearer, claims.sub).with_claims(PrincipalClaims {
                issued_at: Some(claims.iat),
                expires_at: Some(claims.exp),
                profile: None,
            }),
        )
    }
}
