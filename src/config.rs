/*
 * Responsibility
 * - Read settings from the environment (PORT, DATABASE_URL, JWT, Google OAuth, ...)
 * - Validate them; a missing or bad value fails startup
 * - No DATABASE_URL means in-memory demo mode
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::services::identity::GoogleConfig;

const DEV_JWT_SECRET: &str = "myjwtsecret";
const DEV_BOOTSTRAP_USERS: &str = "admin:password123";
const DEFAULT_GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const DEFAULT_GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
const MAX_JWT_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;
const DEFAULT_SQIDS_ALPHABET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<&str>) -> Self {
        match value
            .unwrap_or("development")
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    /// `None` → demo mode (in-memory stores).
    pub database_url: Option<String>,

    pub sqids_min_length: usize,
    pub sqids_alphabet: String,

    pub jwt_secret: String,
    pub jwt_ttl_seconds: u64,

    pub bootstrap_users: Vec<(String, String)>,
    pub bootstrap_api_keys: Vec<(String, String)>,

    pub google: GoogleConfig,
    pub oauth_provider_timeout: Duration,

    pub basic_auth_realm: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same rules as [`Config::from_env`], reading values through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let app_env = AppEnv::parse(var("APP_ENV").as_deref());

        let port: u16 = match var("PORT") {
            Some(s) => s.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 8080,
        };
        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let database_url = var("DATABASE_URL");

        let sqids_min_length = match var("SQIDS_MIN_LENGTH") {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::Invalid("SQIDS_MIN_LENGTH"))?,
            None => 10,
        };
        let sqids_alphabet =
            var("SQIDS_ALPHABET").unwrap_or_else(|| DEFAULT_SQIDS_ALPHABET.to_string());

        let jwt_secret = match var("JWT_SECRET") {
            Some(secret) => secret,
            None if app_env.is_production() => return Err(ConfigError::Missing("JWT_SECRET")),
            None => DEV_JWT_SECRET.to_string(),
        };

        let jwt_ttl_seconds = match var("JWT_TTL_SECONDS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|n| (1..=MAX_JWT_TTL_SECONDS).contains(n))
                .ok_or(ConfigError::Invalid("JWT_TTL_SECONDS"))?,
            None => 3600,
        };

        let bootstrap_users = match var("BOOTSTRAP_USERS") {
            Some(v) => parse_pairs(&v).ok_or(ConfigError::Invalid("BOOTSTRAP_USERS"))?,
            None if app_env.is_production() => Vec::new(),
            None => parse_pairs(DEV_BOOTSTRAP_USERS).unwrap_or_default(),
        };

        let bootstrap_api_keys = match var("BOOTSTRAP_API_KEYS") {
            Some(v) => parse_pairs(&v).ok_or(ConfigError::Invalid("BOOTSTRAP_API_KEYS"))?,
            None => Vec::new(),
        };

        let oauth_provider_timeout = match var("OAUTH_PROVIDER_TIMEOUT_MS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|n| *n > 0)
                .map(Duration::from_millis)
                .ok_or(ConfigError::Invalid("OAUTH_PROVIDER_TIMEOUT_MS"))?,
            None => Duration::from_millis(5000),
        };

        let token_url = Url::parse(
            var("GOOGLE_TOKEN_URL")
                .as_deref()
                .unwrap_or(DEFAULT_GOOGLE_TOKEN_URL),
        )
        .map_err(|_| ConfigError::Invalid("GOOGLE_TOKEN_URL"))?;

        let userinfo_url = Url::parse(
            var("GOOGLE_USERINFO_URL")
                .as_deref()
                .unwrap_or(DEFAULT_GOOGLE_USERINFO_URL),
        )
        .map_err(|_| ConfigError::Invalid("GOOGLE_USERINFO_URL"))?;

        let google = GoogleConfig {
            token_url,
            userinfo_url,
            client_id: var("GOOGLE_CLIENT_ID"),
            client_secret: var("GOOGLE_CLIENT_SECRET"),
            timeout: oauth_provider_timeout,
        };

        let basic_auth_realm = var("BASIC_AUTH_REALM").unwrap_or_else(|| "Product API".to_string());

        Ok(Self {
            addr,
            app_env,
            database_url,
            sqids_min_length,
            sqids_alphabet,
            jwt_secret,
            jwt_ttl_seconds,
            bootstrap_users,
            bootstrap_api_keys,
            google,
            oauth_provider_timeout,
            basic_auth_realm,
        })
    }
}

/// `a:b,c:d` → `[(a, b), (c, d)]`. Only the first `:` of each entry separates.
fn parse_pairs(raw: &str) -> Option<Vec<(String, String)>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (left, right) = entry.split_once(':')?;
            let (left, right) = (left.trim(), right.trim());
            if left.is_empty() || right.is_empty() {
                return None;
            }
            Some((left.to_string(), right.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn development_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.app_env, AppEnv::Development);
        assert!(config.database_url.is_none());
        assert_eq!(config.jwt_secret, "myjwtsecret");
        assert_eq!(config.jwt_ttl_seconds, 3600);
        assert_eq!(
            config.bootstrap_users,
            vec![("admin".to_string(), "password123".to_string())]
        );
        assert_eq!(config.oauth_provider_timeout, Duration::from_secs(5));
        assert_eq!(config.basic_auth_realm, "Product API");
        assert!(config.google.client_id.is_none());
    }

    #[test]
    fn production_requires_jwt_secret() {
        let err = load(&[("APP_ENV", "production")]).err().unwrap();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));

        let config = load(&[("APP_ENV", "prod"), ("JWT_SECRET", "s3cret")]).unwrap();
        assert!(config.bootstrap_users.is_empty());
    }

    #[test]
    fn invalid_numbers_fail_startup() {
        assert!(matches!(
            load(&[("PORT", "eighty")]).err().unwrap(),
            ConfigError::Invalid("PORT")
        ));
        assert!(matches!(
            load(&[("OAUTH_PROVIDER_TIMEOUT_MS", "0")]).err().unwrap(),
            ConfigError::Invalid("OAUTH_PROVIDER_TIMEOUT_MS")
        ));
    }

    #[test]
    fn jwt_ttl_must_fit_a_year() {
        assert_eq!(
            load(&[("JWT_TTL_SECONDS", "900")]).unwrap().jwt_ttl_seconds,
            900
        );
        for bad in ["0", "-5", "31536001", "18446744073709551615"] {
            assert!(matches!(
                load(&[("JWT_TTL_SECONDS", bad)]).err().unwrap(),
                ConfigError::Invalid("JWT_TTL_SECONDS")
            ));
        }
    }

    #[test]
    fn pairs_split_on_first_colon() {
        let config = load(&[("BOOTSTRAP_API_KEYS", "K1:alice, K2:bob:ops")]).unwrap();
        assert_eq!(
            config.bootstrap_api_keys,
            vec![
                ("K1".to_string(), "alice".to_string()),
                ("K2".to_string(), "bob:ops".to_string())
            ]
        );

        assert!(matches!(
            load(&[("BOOTSTRAP_USERS", "nocolon")]).err().unwrap(),
            ConfigError::Invalid("BOOTSTRAP_USERS")
        ));
    }
}
