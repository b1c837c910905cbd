use std::sync::Arc;

use crate::services::auth::{
    api_key::ApiKeyVerifier, basic::BasicVerifier, bearer::BearerTokenVerifier,
    oauth::DelegatedOAuthVerifier, principal::Scheme, token_issuer::TokenIssuer,
    verifier::Verifier,
};

/// One verifier per scheme plus the token issuer, built once at startup.
///
/// Route groups pick their verifier statically through [`AuthGateway::verifier`].
#[derive(Clone)]
pub struct AuthGateway {
    basic: Arc<BasicVerifier>,
    api_key: Arc<ApiKeyVerifier>,
    bearer: Arc<BearerTokenVerifier>,
    oauth: Arc<DelegatedOAuthVerifier>,
    issuer: Arc<TokenIssuer>,
}

impl std::fmt::Debug for AuthGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGateway").finish_non_exhaustive()
    }
}

impl AuthGateway {
    pub fn new(
        basic: Arc<BasicVerifier>,
        api_key: Arc<ApiKeyVerifier>,
        bearer: Arc<BearerTokenVerifier>,
        oauth: Arc<DelegatedOAuthVerifier>,
        issuer: Arc<TokenIssuer>,
    ) -> Self {
        Self {
            basic,
            api_key,
            bearer,
            oauth,
            issuer,
        }
    }

    pub fn verifier(&self, scheme: Scheme) -> Arc<dyn Verifier> {
        match scheme {
            Scheme::Basic => self.basic.clone(),
            Scheme::ApiKey => self.api_key.clone(),
            Scheme::Bearer => self.bearer.clone(),
            Scheme::OAuth => self.oauth.clone(),
        }
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }
}
