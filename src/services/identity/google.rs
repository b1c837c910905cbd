use std::time::Duration;

use async_trait::async_trait;
use reqwest::Response;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::client::{IdentityProvider, ProviderError, ProviderProfile, ProviderTokens};

/// Non-browser-redirect exchange ("popup" flow): the code was obtained by a
/// JS client and the redirect URI is the literal `postmessage`.
const POPUP_REDIRECT_URI: &str = "postmessage";

/// Holds the client secret, so no `Debug`.
#[derive(Clone)]
pub struct GoogleConfig {
    pub token_url: Url,
    pub userinfo_url: Url,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// Google OAuth2 provider backed by `reqwest`.
///
/// Every request carries the client-level timeout; no retries.
#[derive(Clone)]
pub struct GoogleProvider {
    http: reqwest::Client,
    config: GoogleConfig,
}

impl std::fmt::Debug for GoogleProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print the client secret
        f.debug_struct("GoogleProvider")
            .field("token_url", &self.config.token_url.as_str())
            .field("userinfo_url", &self.config.userinfo_url.as_str())
            .field("timeout", &self.config.timeout)
            .finish()
    }
}

impl GoogleProvider {
    pub fn new(config: GoogleConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::Unavailable(format!("http client init: {e}")))?;

        Ok(Self { http, config })
    }
}

fn transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Unavailable("request timed out".to_string())
    } else {
        ProviderError::Unavailable(e.to_string())
    }
}

/// 4xx means the provider judged the input; anything else non-2xx is an outage.
fn check_status(resp: Response) -> Result<Response, ProviderError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else if status.is_client_error() {
        Err(ProviderError::Rejected {
            status: status.as_u16(),
        })
    } else {
        Err(ProviderError::Unavailable(format!(
            "unexpected status {}",
            status.as_u16()
        )))
    }
}

#[async_trait]
impl IdentityProvider for GoogleProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn user_info(&self, access_token: &str) -> Result<ProviderProfile, ProviderError> {
        let resp = self
            .http
            .get(self.config.userinfo_url.clone())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(transport_error)?;
        let resp = check_status(resp)?;

        let raw: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("undecodable userinfo: {e}")))?;
        let info: GoogleUserInfo = serde_json::from_value(raw.clone())
            .map_err(|e| ProviderError::Unavailable(format!("unexpected userinfo shape: {e}")))?;

        let non_blank = |s: &Option<String>| s.clone().filter(|s| !s.trim().is_empty());
        let subject = non_blank(&info.id)
            .or_else(|| non_blank(&info.email))
            .ok_or_else(|| ProviderError::Unavailable("userinfo without id".to_string()))?;

        debug!(provider = "google", subject = %subject, "userinfo resolved");

        Ok(ProviderProfile {
            subject,
            email: info.email,
            name: info.name,
            raw,
        })
    }

    async fn exchange_code(&self, code: &str) -> Result<ProviderTokens, ProviderError> {
        let client_id = self
            .config
            .client_id
            .as_deref()
            .ok_or(ProviderError::Misconfigured("GOOGLE_CLIENT_ID"))?;
        let client_secret = self
            .config
            .client_secret
            .as_deref()
            .ok_or(ProviderError::Misconfigured("GOOGLE_CLIENT_SECRET"))?;

        let form = [
            ("code", code),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("redirect_uri", POPUP_REDIRECT_URI),
            ("grant_type", "authorization_code"),
        ];

        let resp = self
            .http
            .post(self.config.token_url.clone())
            .form(&form)
            .send()
            .await
            .map_err(transport_error)?;
        let resp = check_status(resp)?;

        resp.json::<ProviderTokens>()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("undecodable token response: {e}")))
    }
}
