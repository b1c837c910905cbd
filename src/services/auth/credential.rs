/*
 * Responsibility
 * - Pull raw credential material out of request headers for one scheme
 * - Pure string handling: never consults a store, never panics on bad input
 */
use std::fmt;

use axum::http::{HeaderMap, header};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

use crate::services::auth::principal::Scheme;

pub const API_KEY_HEADER: &str = "x-api-key";

const BASIC_PREFIX: &str = "Basic ";
const BEARER_PREFIX: &str = "Bearer ";

/// Unverified credential, tagged by shape.
///
/// Self-issued bearer tokens and delegated OAuth tokens share the `Bearer` shape;
/// which verifier sees it is decided by the route binding, not by the value.
#[derive(Clone, PartialEq, Eq)]
pub enum RawCredential {
    Basic { username: String, password: String },
    ApiKey(String),
    Bearer(String),
}

impl fmt::Debug for RawCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Secrets stay out of logs.
        match self {
            RawCredential::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            RawCredential::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
            RawCredential::Bearer(_) => f.write_str("Bearer(<redacted>)"),
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("credential header missing")]
    Missing,
    #[error("authorization header uses a different scheme")]
    WrongScheme,
    #[error("credential is malformed")]
    Malformed,
}

pub fn extract(headers: &HeaderMap, scheme: Scheme) -> Result<RawCredential, ExtractionError> {
    match scheme {
        Scheme::Basic => extract_basic(headers),
        Scheme::ApiKey => extract_api_key(headers),
        Scheme::Bearer | Scheme::OAuth => extract_bearer(headers),
    }
}

fn authorization(headers: &HeaderMap) -> Result<&str, ExtractionError> {
    headers
        .get(header::AUTHORIZATION)
        .ok_or(ExtractionError::Missing)?
        .to_str()
        .map_err(|_| ExtractionError::Malformed)
}

fn extract_basic(headers: &HeaderMap) -> Result<RawCredential, ExtractionError> {
    let encoded = authorization(headers)?
        .strip_prefix(BASIC_PREFIX)
        .ok_or(ExtractionError::WrongScheme)?;

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| ExtractionError::Malformed)?;
    let decoded = String::from_utf8(decoded).map_err(|_| ExtractionError::Malformed)?;

    // Passwords may contain ':'; only the first one separates.
    let (username, password) = decoded
        .split_once(':')
        .ok_or(ExtractionError::Malformed)?;

    Ok(RawCredential::Basic {
        username: username.to_string(),
        password: password.to_string(),
    })
}

fn extract_api_key(headers: &HeaderMap) -> Result<RawCredential, ExtractionError> {
    let key = headers
        .get(API_KEY_HEADER)
        .ok_or(ExtractionError::Missing)?
        .to_str()
        .map_err(|_| ExtractionError::Malformed)?
        .trim();

    if key.is_empty() {
        return Err(ExtractionError::Missing);
    }

    Ok(RawCredential::ApiKey(key.to_string()))
}

fn extract_bearer(headers: &HeaderMap) -> Result<RawCredential, ExtractionError> {
    let token = authorization(headers)?
        .strip_prefix(BEARER_PREFIX)
        .ok_or(ExtractionError::WrongScheme)?
        .trim();

    if token.is_empty() {
        return Err(ExtractionError::Malformed);
    }

    Ok(RawCredential::Bearer(token.to_string()))
}
