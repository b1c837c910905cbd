//! Deterministic provider double for unit tests.
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::client::{IdentityProvider, ProviderError, ProviderProfile, ProviderTokens};

#[derive(Debug, Clone)]
pub enum Behavior {
    Accept,
    Reject(u16),
    Unavailable,
    Hang(Duration),
}

#[derive(Debug)]
pub struct FakeProvider {
    behavior: Behavior,
    calls: AtomicUsize,
}

impl FakeProvider {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn respond<T>(&self, ok: T) -> Result<T, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Accept => Ok(ok),
            Behavior::Reject(status) => Err(ProviderError::Rejected { status: *status }),
            Behavior::Unavailable => Err(ProviderError::Unavailable("connection refused".into())),
            Behavior::Hang(d) => {
                tokio::time::sleep(*d).await;
                Ok(ok)
            }
        }
    }
}

#[async_trait]
impl IdentityProvider for FakeProvider {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn user_info(&self, access_token: &str) -> Result<ProviderProfile, ProviderError> {
        let profile = ProviderProfile {
            subject: format!("uid-{access_token}"),
            email: Some("demo.user@example.com".into()),
            name: Some("Demo User".into()),
            raw: serde_json::json!({
                "id": format!("uid-{access_token}"),
                "email": "demo.user@example.com",
                "name": "Demo User",
            }),
        };
        self.respond(profile).await
    }

    async fn exchange_code(&self, code: &str) -> Result<ProviderTokens, ProviderError> {
        let tokens = ProviderTokens {
            access_token: format!("access-for-{code}"),
            expires_in: 3599,
        };
        self.respond(tokens).await
    }
}
