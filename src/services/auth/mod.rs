/*
 * Responsibility
 * - Pluggable authentication gateway
 *   - credential extraction, one verifier per scheme, token issuance
 * - Re-exports what middleware / handlers / app wiring need
 */
pub mod api_key;
pub mod basic;
pub mod bearer;
pub mod credential;
pub mod error;
pub mod factory;
pub mod gateway;
pub mod oauth;
pub mod password;
pub mod principal;
pub mod token_issuer;
pub mod verifier;

pub use credential::{RawCredential, extract};
pub use error::AuthError;
pub use gateway::AuthGateway;
pub use principal::{Principal, PrincipalClaims, Scheme};
pub use token_issuer::{ExchangedToken, IssuedToken, TokenIssuer};
pub use verifier::Verifier;
