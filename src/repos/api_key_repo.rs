/*
 * Responsibility
 * - Provisioned API keys (key, owner, active)
 * - Keys are deactivated by flipping `active`, never deleted here
 * - No caching: every lookup reads the backing store
 */
use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tokio::sync::RwLock;

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ApiKeyRecord {
    pub key: String,
    pub owner: String,
    pub active: bool,
}

impl ApiKeyRecord {
    pub fn active(key: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            owner: owner.into(),
            active: true,
        }
    }
}

#[async_trait]
pub trait ApiKeyStore: Send + Sync {
    /// Exact-match lookup, regardless of `active`.
    async fn find(&self, key: &str) -> RepoResult<Option<ApiKeyRecord>>;

    /// Returns `false` when the key does not exist.
    async fn set_active(&self, key: &str, active: bool) -> RepoResult<bool>;
}

#[derive(Clone, Debug)]
pub struct PgApiKeyStore {
    pool: PgPool,
}

impl PgApiKeyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApiKeyStore for PgApiKeyStore {
    async fn find(&self, key: &str) -> RepoResult<Option<ApiKeyRecord>> {
        let row = sqlx::query_as::<_, ApiKeyRecord>(
            r#"
            SELECT key, owner, active
            FROM api_keys
            WHERE key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn set_active(&self, key: &str, active: bool) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE api_keys
            SET active = $2
            WHERE key = $1
            "#,
        )
        .bind(key)
        .bind(active)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryApiKeyStore {
    keys: RwLock<HashMap<String, ApiKeyRecord>>,
}

impl InMemoryApiKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, record: ApiKeyRecord) {
        self.keys.write().await.insert(record.key.clone(), record);
    }
}

#[async_trait]
impl ApiKeyStore for InMemoryApiKeyStore {
    async fn find(&self, key: &str) -> RepoResult<Option<ApiKeyRecord>> {
        Ok(self.keys.read().await.get(key).cloned())
    }

    async fn set_active(&self, key: &str, active: bool) -> RepoResult<bool> {
        let mut keys = self.keys.write().await;
        match keys.get_mut(key) {
            Some(record) => {
                record.active = active;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_active_flips_flag_in_place() {
        let store = InMemoryApiKeyStore::new();
        store.insert(ApiKeyRecord::active("K1", "alice")).await;

        assert!(store.set_active("K1", false).await.unwrap());
        let record = store.find("K1").await.unwrap().unwrap();
        assert!(!record.active);
        assert_eq!(record.owner, "alice");
    }

    #[tokio::test]
    async fn set_active_on_unknown_key_reports_false() {
        let store = InMemoryApiKeyStore::new();
        assert!(!store.set_active("nope", false).await.unwrap());
    }
}
