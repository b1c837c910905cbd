/*
 * Responsibility
 * - The single HTTP-facing error type (AppError)
 * - IntoResponse: HTTP status + JSON error body + auth challenge header
 * - Converts repo / id codec / auth errors; status of an auth error depends on
 *   the scheme it happened under
 */
use std::sync::Arc;

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::repos::error::RepoError;
use crate::services::auth::{AuthError, Scheme};
use crate::services::id_codec::IdCodecError;

pub const DEFAULT_REALM: &str = "Product API";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error("{scheme} authentication failed: {error}")]
    Auth {
        scheme: Scheme,
        error: AuthError,
        realm: Option<Arc<str>>,
    },
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn auth(scheme: Scheme, error: AuthError) -> Self {
        Self::Auth {
            scheme,
            error,
            realm: None,
        }
    }

    /// Realm used in the Basic challenge; ignored for other schemes.
    pub fn with_realm(self, realm: Arc<str>) -> Self {
        match self {
            Self::Auth { scheme, error, .. } => Self::Auth {
                scheme,
                error,
                realm: Some(realm),
            },
            other => other,
        }
    }
}

/// Per-scheme status. API keys answer 403 for a known-bad credential,
/// Basic and Bearer answer 401.
pub fn auth_status(scheme: Scheme, error: &AuthError) -> StatusCode {
    match error {
        AuthError::InvalidCredentials if scheme == Scheme::ApiKey => StatusCode::FORBIDDEN,
        AuthError::MissingCredentials
        | AuthError::InvalidCredentials
        | AuthError::MalformedToken
        | AuthError::TokenExpired
        | AuthError::ProviderRejected { .. }
        | AuthError::ProviderUnavailable(_) => StatusCode::UNAUTHORIZED,
        AuthError::MissingCode => StatusCode::BAD_REQUEST,
        AuthError::ExchangeFailed(_) | AuthError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn auth_body(error: &AuthError) -> (&'static str, &'static str) {
    // Expired and tampered tokens look the same to the client.
    match error {
        AuthError::MissingCredentials => ("MISSING_CREDENTIALS", "authentication required"),
        AuthError::InvalidCredentials => ("INVALID_CREDENTIALS", "invalid credentials"),
        AuthError::MalformedToken | AuthError::TokenExpired => {
            ("INVALID_TOKEN", "invalid or expired token")
        }
        AuthError::ProviderRejected { .. } => ("INVALID_TOKEN", "token rejected by provider"),
        AuthError::ProviderUnavailable(_) => {
            ("PROVIDER_UNAVAILABLE", "could not verify token with provider")
        }
        AuthError::MissingCode => ("MISSING_CODE", "authorization code is required"),
        AuthError::ExchangeFailed(_) => ("EXCHANGE_FAILED", "token exchange failed"),
        AuthError::Backend(_) => ("INTERNAL_SERVER_ERROR", "internal server error"),
    }
}

fn challenge(scheme: Scheme, realm: Option<&str>) -> Option<HeaderValue> {
    match scheme {
        Scheme::Basic => {
            let realm = realm.unwrap_or(DEFAULT_REALM).replace('"', "");
            HeaderValue::from_str(&format!("Basic realm=\"{realm}\"")).ok()
        }
        Scheme::Bearer | Scheme::OAuth => Some(HeaderValue::from_static("Bearer")),
        Scheme::ApiKey => None,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut www_authenticate = None;

        let (status, code, message) = match self {
            AppError::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            AppError::NotFound { resource } => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{resource} not found"),
            ),
            AppError::Auth {
                scheme,
                error,
                realm,
            } => {
                let status = auth_status(scheme, &error);
                if status == StatusCode::UNAUTHORIZED {
                    www_authenticate = challenge(scheme, realm.as_deref());
                }
                let (code, message) = auth_body(&error);
                (status, code, message.to_string())
            }
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "internal server error".into(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(value) = www_authenticate {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, value);
        }
        response
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Db(err) => {
                error!(error = %err, "database operation failed");
                AppError::Internal
            }
        }
    }
}

impl From<IdCodecError> for AppError {
    fn from(e: IdCodecError) -> Self {
        match e {
            // A public id that does not decode cannot name an existing product.
            IdCodecError::DecodeInvalidFormat | IdCodecError::DecodeOutOfRange => {
                AppError::not_found("product")
            }
            other => {
                error!(error = %other, "id codec failure");
                AppError::Internal
            }
        }
    }
}
