/*
 * Responsibility
 * - Credential source shared by Basic auth and the bearer-token login
 * - Read-only from the gateway's point of view (provisioning is external)
 * - Only password hashes are stored; comparison lives in services::auth::password
 */
use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tokio::sync::RwLock;

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub username: String,
    pub password_hash: String,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<UserRow>>;
}

#[derive(Clone, Debug)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT username, password_hash
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}

/// Demo-mode credential source, seeded at startup.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, UserRow>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, username: impl Into<String>, password_hash: impl Into<String>) {
        let username = username.into();
        let row = UserRow {
            username: username.clone(),
            password_hash: password_hash.into(),
        };
        self.users.write().await.insert(username, row);
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<UserRow>> {
        Ok(self.users.read().await.get(username).cloned())
    }
}
