#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use auth_gateway::app::{Stores, build_app_state, build_router};
use auth_gateway::config::Config;
use auth_gateway::repos::{
    api_key_repo::{ApiKeyRecord, InMemoryApiKeyStore},
    error::RepoResult,
    product_repo::{InMemoryProductStore, NewProduct, ProductPatch, ProductRow, ProductStore},
    user_repo::InMemoryUserStore,
};
use auth_gateway::services::auth::password::{PasswordHasher, SaltedSha256};
use auth_gateway::services::identity::{
    IdentityProvider, ProviderError, ProviderProfile, ProviderTokens,
};

/// Product store that counts every call that reaches it.
#[derive(Default)]
pub struct CountingProductStore {
    inner: InMemoryProductStore,
    calls: AtomicUsize,
}

impl CountingProductStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProductStore for CountingProductStore {
    async fn create(&self, product: NewProduct) -> RepoResult<ProductRow> {
        self.hit();
        self.inner.create(product).await
    }

    async fn list(&self) -> RepoResult<Vec<ProductRow>> {
        self.hit();
        self.inner.list().await
    }

    async fn update(&self, id: i64, patch: ProductPatch) -> RepoResult<Option<ProductRow>> {
        self.hit();
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        self.hit();
        self.inner.delete(id).await
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ProviderMode {
    Accept,
    Reject,
    Down,
    Hang,
}

/// Identity provider double; counts outbound calls.
pub struct ScriptedProvider {
    mode: ProviderMode,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(mode: ProviderMode) -> Self {
        Self {
            mode,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn gate(&self) -> Result<(), ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            ProviderMode::Accept => Ok(()),
            ProviderMode::Reject => Err(ProviderError::Rejected { status: 401 }),
            ProviderMode::Down => Err(ProviderError::Unavailable("503 from provider".into())),
            ProviderMode::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(())
            }
        }
    }
}

#[async_trait]
impl IdentityProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn user_info(&self, access_token: &str) -> Result<ProviderProfile, ProviderError> {
        self.gate().await?;
        Ok(ProviderProfile {
            subject: format!("google-{access_token}"),
            email: Some("alice@example.com".into()),
            name: Some("Alice".into()),
            raw: serde_json::json!({
                "id": format!("google-{access_token}"),
                "email": "alice@example.com",
                "name": "Alice",
            }),
        })
    }

    async fn exchange_code(&self, code: &str) -> Result<ProviderTokens, ProviderError> {
        self.gate().await?;
        Ok(ProviderTokens {
            access_token: format!("ya29.{code}"),
            expires_in: 3599,
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub api_keys: Arc<InMemoryApiKeyStore>,
    pub products: Arc<CountingProductStore>,
    pub provider: Arc<ScriptedProvider>,
}

pub const JWT_SECRET: &str = "myjwtsecret";

pub async fn spawn_app(mode: ProviderMode) -> TestApp {
    let mut config = Config::from_lookup(|_| None).expect("default config");
    config.oauth_provider_timeout = Duration::from_millis(100);

    let hasher = Arc::new(SaltedSha256);
    let users = InMemoryUserStore::new();
    users
        .insert("admin", hasher.hash("password123").unwrap())
        .await;

    let api_keys = Arc::new(InMemoryApiKeyStore::new());
    api_keys.insert(ApiKeyRecord::active("K1", "alice")).await;

    let products = Arc::new(CountingProductStore::default());
    let provider = Arc::new(ScriptedProvider::new(mode));

    let stores = Stores {
        products: products.clone(),
        users: Arc::new(users),
        api_keys: api_keys.clone(),
    };
    let state = build_app_state(&config, stores, hasher, provider.clone()).expect("app state");

    TestApp {
        router: build_router(state),
        api_keys,
        products,
        provider,
    }
}

pub fn basic(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let res = self.router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let headers = res.headers().clone();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }
}

pub fn request(
    method: &str,
    uri: &str,
    auth: Option<(&str, String)>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((name, value)) = auth {
        builder = builder.header(name, value);
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}
