/*
 * Responsibility
 * - URL layout
 * - One route group per scheme, each statically bound to one verifier via route_layer
 * - Token issuance routes are merged after the guard so they stay unauthenticated
 */
use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::{
    api::handlers::{
        auth::{google_code_exchange, login},
        health::health,
        products::{add_product, delete_product, list_products, update_product},
    },
    middleware,
    services::auth::Scheme,
    state::AppState,
};

/// Path prefix each scheme's route group is mounted under.
pub fn scheme_prefix(scheme: Scheme) -> &'static str {
    match scheme {
        Scheme::Basic => "/basicAuth",
        Scheme::ApiKey => "/apiKey",
        Scheme::Bearer => "/jwt",
        Scheme::OAuth => "/oAuth",
    }
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(add_product))
        .route("/get", get(list_products))
        .route("/update/{id}", patch(update_product))
        .route("/delete/{id}", delete(delete_product))
}

fn scheme_group(state: &AppState, scheme: Scheme) -> Router<AppState> {
    let group = middleware::auth::require(product_routes(), state, scheme);

    match scheme {
        Scheme::Bearer => group.route("/login", post(login)),
        Scheme::OAuth => group.route("/google", post(google_code_exchange)),
        Scheme::Basic | Scheme::ApiKey => group,
    }
}

pub fn routes(state: &AppState) -> Router<AppState> {
    [Scheme::Basic, Scheme::ApiKey, Scheme::Bearer, Scheme::OAuth]
        .into_iter()
        .fold(Router::new().route("/health", get(health)), |router, scheme| {
            router.nest(scheme_prefix(scheme), scheme_group(state, scheme))
        })
}
