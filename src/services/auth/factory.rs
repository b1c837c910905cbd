/// Factory: build `AuthGateway` from application `Config` and its collaborators.
use std::sync::Arc;

use anyhow::Context;

use crate::config::Config;
use crate::repos::{api_key_repo::ApiKeyStore, user_repo::UserStore};
use crate::services::auth::{
    AuthGateway, TokenIssuer,
    api_key::ApiKeyVerifier,
    basic::BasicVerifier,
    bearer::{BearerTokenVerifier, BearerTokens},
    oauth::DelegatedOAuthVerifier,
    password::PasswordHasher,
};
use crate::services::identity::IdentityProvider;

pub fn build_auth_gateway(
    config: &Config,
    users: Arc<dyn UserStore>,
    api_keys: Arc<dyn ApiKeyStore>,
    hasher: Arc<dyn PasswordHasher>,
    provider: Arc<dyn IdentityProvider>,
) -> anyhow::Result<Arc<AuthGateway>> {
    let basic = Arc::new(
        BasicVerifier::new(users, hasher).context("failed to prepare credential verifier")?,
    );
    let tokens = Arc::new(BearerTokens::new(
        config.jwt_secret.as_bytes(),
        config.jwt_ttl_seconds,
    ));

    let issuer = TokenIssuer::new(
        basic.clone(),
        tokens.clone(),
        provider.clone(),
        config.oauth_provider_timeout,
    );

    Ok(Arc::new(AuthGateway::new(
        basic,
        Arc::new(ApiKeyVerifier::new(api_keys)),
        Arc::new(BearerTokenVerifier::new(tokens)),
        Arc::new(DelegatedOAuthVerifier::new(
            provider,
            config.oauth_provider_timeout,
        )),
        Arc::new(issuer),
    )))
}
