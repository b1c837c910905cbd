/*
 * Responsibility
 * - Token issuance request/response DTO (/jwt/login, /oAuth/google)
 */
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: u64,
}

/// `code` stays optional so a missing field is answered as MissingCode, not a parse error.
#[derive(Debug, Default, Deserialize)]
pub struct CodeExchangeRequest {
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CodeExchangeResponse {
    pub access_token: String,
    pub expires_in: u64,
}
