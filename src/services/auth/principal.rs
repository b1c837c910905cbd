/*
 * Responsibility
 * - The identity a verified request acts as (Principal)
 * - Always records which scheme authenticated it; downstream code must not
 *   assume a uniform identity shape across schemes
 */
use std::fmt;

/// One of the four credential schemes a route group can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Basic,
    ApiKey,
    Bearer,
    OAuth,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Basic => "basic",
            Scheme::ApiKey => "api_key",
            Scheme::Bearer => "bearer",
            Scheme::OAuth => "oauth",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scheme-specific extras attached to a principal.
///
/// - Bearer tokens carry `issued_at` / `expires_at` (unix seconds)
/// - Delegated OAuth carries the provider-returned profile as-is
#[derive(Debug, Clone, Default)]
pub struct PrincipalClaims {
    pub issued_at: Option<i64>,
    pub expires_at: Option<i64>,
    pub profile: Option<serde_json::Value>,
}

/// Verified identity bound to a request for its lifetime. Never persisted.
#[derive(Debug, Clone)]
pub struct Principal {
    pub scheme: Scheme,
    pub subject: String,
    pub claims: PrincipalClaims,
}

impl Principal {
    pub fn new(scheme: Scheme, subject: impl Into<String>) -> Self {
        Self {
            scheme,
            subject: subject.into(),
            claims: PrincipalClaims::default(),
        }
    }

    pub fn with_claims(mut self, claims: PrincipalClaims) -> Self {
        self.claims = claims;
        self
    }
}
