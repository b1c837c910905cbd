/*
 * Responsibility
 * - Load Config, build dependencies (stores / provider / auth gateway), assemble the Router
 * - Postgres when DATABASE_URL is set, otherwise in-memory demo mode with bootstrap seeding
 * - Apply middleware (http / security headers) and serve with axum::serve()
 */
use std::{panic, process, sync::Arc};

use anyhow::Context;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::repos::{
    api_key_repo::{ApiKeyRecord, ApiKeyStore, InMemoryApiKeyStore, PgApiKeyStore},
    product_repo::{InMemoryProductStore, PgProductStore, ProductStore},
    user_repo::{InMemoryUserStore, PgUserStore, UserStore},
};
use crate::services::auth::{
    factory::build_auth_gateway,
    password::{PasswordHasher, SaltedSha256},
};
use crate::services::id_codec::IdCodec;
use crate::services::identity::{GoogleProvider, IdentityProvider};
use crate::services::products::ProductService;
use crate::state::AppState;
use crate::{api, middleware};

/// Storage backings the gateway and product service run on.
pub struct Stores {
    pub products: Arc<dyn ProductStore>,
    pub users: Arc<dyn UserStore>,
    pub api_keys: Arc<dyn ApiKeyStore>,
}

fn init_tracing() {
    // RUST_LOG=info,auth_gateway=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash loudly. Production: default hook, keep serving.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting auth-gateway in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let hasher: Arc<dyn PasswordHasher> = Arc::new(SaltedSha256);

    let stores = match &config.database_url {
        Some(url) => postgres_stores(url).await?,
        None => {
            tracing::warn!("DATABASE_URL not set; running with in-memory demo stores");
            demo_stores(config, hasher.as_ref()).await?
        }
    };

    let provider: Arc<dyn IdentityProvider> = Arc::new(
        GoogleProvider::new(config.google.clone()).context("failed to build google provider")?,
    );

    build_app_state(config, stores, hasher, provider)
}

async fn postgres_stores(url: &str) -> anyhow::Result<Stores> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(url)
        .await
        .context("failed to connect to DATABASE_URL")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run migrations")?;

    Ok(Stores {
        products: Arc::new(PgProductStore::new(pool.clone())),
        users: Arc::new(PgUserStore::new(pool.clone())),
        api_keys: Arc::new(PgApiKeyStore::new(pool)),
    })
}

/// In-memory stores seeded from BOOTSTRAP_USERS / BOOTSTRAP_API_KEYS.
pub async fn demo_stores(config: &Config, hasher: &dyn PasswordHasher) -> anyhow::Result<Stores> {
    let users = InMemoryUserStore::new();
    for (username, password) in &config.bootstrap_users {
        let hash = hasher
            .hash(password)
            .context("failed to hash bootstrap password")?;
        users.insert(username.as_str(), hash).await;
    }

    let api_keys = InMemoryApiKeyStore::new();
    for (key, owner) in &config.bootstrap_api_keys {
        api_keys.insert(ApiKeyRecord::active(key.as_str(), owner.as_str())).await;
    }

    tracing::info!(
        users = config.bootstrap_users.len(),
        api_keys = config.bootstrap_api_keys.len(),
        "seeded demo credential sources"
    );

    Ok(Stores {
        products: Arc::new(InMemoryProductStore::new()),
        users: Arc::new(users),
        api_keys: Arc::new(api_keys),
    })
}

pub fn build_app_state(
    config: &Config,
    stores: Stores,
    hasher: Arc<dyn PasswordHasher>,
    provider: Arc<dyn IdentityProvider>,
) -> anyhow::Result<AppState> {
    let id_codec = IdCodec::new(config.sqids_min_length, &config.sqids_alphabet)
        .context("invalid SQIDS_* configuration")?;

    let auth = build_auth_gateway(config, stores.users, stores.api_keys, hasher, provider)?;

    Ok(AppState::new(
        ProductService::new(stores.products),
        id_codec,
        auth,
        config.basic_auth_realm.as_str(),
    ))
}

pub fn build_router(state: AppState) -> Router {
    let router = api::routes(&state).with_state(state);
    let router = middleware::security_headers::apply(router);
    middleware::http::apply(router)
}
