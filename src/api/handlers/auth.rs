/*
 * Responsibility
 * - Unauthenticated token issuance endpoints
 *   - POST /jwt/login     → self-signed bearer token
 *   - POST /oAuth/google  → provider access token from an authorization code
 */
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::warn;

use crate::{
    api::dto::auth::{CodeExchangeRequest, CodeExchangeResponse, LoginRequest, LoginResponse},
    error::AppError,
    services::auth::{AuthError, Scheme},
    state::AppState,
};

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(req) =
        payload.map_err(|rejection| AppError::bad_request("INVALID_BODY", rejection.body_text()))?;

    let issued = state
        .auth
        .issuer()
        .issue_bearer_token(&req.username, &req.password)
        .await
        .map_err(|err| {
            warn!(scheme = %Scheme::Bearer, kind = err.kind(), "login refused");
            AppError::auth(Scheme::Bearer, err)
        })?;

    Ok(Json(LoginResponse {
        token: issued.token,
        expires_in: issued.expires_in,
    }))
}

pub async fn google_code_exchange(
    State(state): State<AppState>,
    payload: Result<Json<CodeExchangeRequest>, JsonRejection>,
) -> Result<Json<CodeExchangeResponse>, AppError> {
    // No usable body is the same as no code.
    let req = payload.map(|Json(v)| v).unwrap_or_default();

    let exchanged = state
        .auth
        .issuer()
        .exchange_oauth_code(req.code.as_deref())
        .await
        .map_err(|err| {
            if let AuthError::ExchangeFailed(reason) = &err {
                warn!(scheme = %Scheme::OAuth, kind = err.kind(), reason = %reason, "code exchange failed");
            }
            AppError::auth(Scheme::OAuth, err)
        })?;

    Ok(Json(CodeExchangeResponse {
        access_token: exchanged.access_token,
        expires_in: exchanged.expires_in,
    }))
}
