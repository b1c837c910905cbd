//! Pluggable password comparison for the credential source.
//!
//! Stored format: `sha256$<salt-hex>$<digest-hex>` where
//! `digest = SHA-256(salt || password)`. Comparison is constant time.
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;

const SCHEME_TAG: &str = "sha256";
const SALT_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("random source failure")]
    Rng,
}

pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// `false` for mismatches *and* for unparseable stored values.
    fn verify(&self, password: &str, stored: &str) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SaltedSha256;

impl SaltedSha256 {
    fn digest(salt: &[u8], password: &str) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(password.as_bytes());
        hasher.finalize().into()
    }

    fn parse(stored: &str) -> Option<(Vec<u8>, Vec<u8>)> {
        let mut parts = stored.splitn(3, '$');
        if parts.next()? != SCHEME_TAG {
            return None;
        }
        let salt = hex::decode(parts.next()?).ok()?;
        let digest = hex::decode(parts.next()?).ok()?;
        Some((salt, digest))
    }
}

impl PasswordHasher for SaltedSha256 {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let mut salt = [0u8; SALT_LEN];
        getrandom::fill(&mut salt).map_err(|_| PasswordError::Rng)?;

        let digest = Self::digest(&salt, password);
        Ok(format!(
            "{SCHEME_TAG}${}${}",
            hex::encode(salt),
            hex::encode(digest)
        ))
    }

    fn verify(&self, password: &str, stored: &str) -> bool {
        let Some((salt, expected)) = Self::parse(stored) else {
            return false;
        };
        let actual = Self::digest(&salt, password);
        actual.as_slice().ct_eq(expected.as_slice()).into()
    }
}
