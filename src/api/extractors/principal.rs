use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};

use crate::services::auth::Principal;
use crate::state::AppState;

/// Extractor that hands the verified Principal to a handler.
/// The scheme guard has already inserted it into request extensions; if it is
/// missing the route was mounted without a guard, so answer 401.
pub struct AuthPrincipal(pub Principal);

impl FromRequestParts<AppState> for AuthPrincipal {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(AuthPrincipal)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
