/*
 * Responsibility
 * - Product persistence behind a four-operation contract (create/list/update/delete)
 * - Backing is swappable: Postgres via SQLx, or a process-local map for demo mode
 * - Ids are internal i64; public ids are produced by services::id_codec
 */
use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tokio::sync::RwLock;

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub price: f64,
}

/// Partial update: `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn create(&self, product: NewProduct) -> RepoResult<ProductRow>;
    async fn list(&self) -> RepoResult<Vec<ProductRow>>;
    async fn update(&self, id: i64, patch: ProductPatch) -> RepoResult<Option<ProductRow>>;
    async fn delete(&self, id: i64) -> RepoResult<bool>;
}

#[derive(Clone, Debug)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn create(&self, product: NewProduct) -> RepoResult<ProductRow> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (name, category, price)
            VALUES ($1, $2, $3)
            RETURNING id, name, category, price
            "#,
        )
        .bind(product.name)
        .bind(product.category)
        .bind(product.price)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list(&self) -> RepoResult<Vec<ProductRow>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, category, price
            FROM products
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn update(&self, id: i64, patch: ProductPatch) -> RepoResult<Option<ProductRow>> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            UPDATE products
            SET
                name = COALESCE($2, name),
                category = COALESCE($3, category),
                price = COALESCE($4, price)
            WHERE id = $1
            RETURNING id, name, category, price
            "#,
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.category)
        .bind(patch.price)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Default)]
struct Table {
    next_id: i64,
    rows: BTreeMap<i64, ProductRow>,
}

/// Demo-mode store. Lives for the process only.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    table: RwLock<Table>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn create(&self, product: NewProduct) -> RepoResult<ProductRow> {
        let mut table = self.table.write().await;
        table.next_id += 1;
        let row = ProductRow {
            id: table.next_id,
            name: product.name,
            category: product.category,
            price: product.price,
        };
        table.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn list(&self) -> RepoResult<Vec<ProductRow>> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn update(&self, id: i64, patch: ProductPatch) -> RepoResult<Option<ProductRow>> {
        let mut table = self.table.write().await;
        let Some(row) = table.rows.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = patch.name {
            row.name = name;
        }
        if let Some(category) = patch.category {
            row.category = category;
        }
        if let Some(price) = patch.price {
            row.price = price;
        }

        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone() -> NewProduct {
        NewProduct {
            name: "Pixel 9 Pro".into(),
            category: "Mobile".into(),
            price: 99999.0,
        }
    }

    #[tokio::test]
    async fn ids_are_never_reused() {
        let store = InMemoryProductStore::new();
        let first = store.create(phone()).await.unwrap();
        assert!(store.delete(first.id).await.unwrap());

        let second = store.create(phone()).await.unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn update_merges_only_present_fields() {
        let store = InMemoryProductStore::new();
        let row = store.create(phone()).await.unwrap();

        let patch = ProductPatch {
            price: Some(89999.0),
            ..Default::default()
        };
        let updated = store.update(row.id, patch).await.unwrap().unwrap();

        assert_eq!(updated.name, "Pixel 9 Pro");
        assert_eq!(updated.category, "Mobile");
        assert_eq!(updated.price, 89999.0);
    }

    #[tokio::test]
    async fn unknown_id_is_reported_not_errored() {
        let store = InMemoryProductStore::new();
        assert!(store.update(42, ProductPatch::default()).await.unwrap().is_none());
        assert!(!store.delete(42).await.unwrap());
    }
}
