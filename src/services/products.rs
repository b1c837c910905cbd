/*
 * Responsibility
 * - Thin CRUD façade over the product store
 * - Only ever reached after the auth guard attached a Principal
 * - Same behavior whichever scheme authenticated the caller
 */
use std::sync::Arc;

use crate::error::AppError;
use crate::repos::product_repo::{NewProduct, ProductPatch, ProductRow, ProductStore};

#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn ProductStore>,
}

impl std::fmt::Debug for ProductService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductService").finish_non_exhaustive()
    }
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, product: NewProduct) -> Result<ProductRow, AppError> {
        Ok(self.store.create(product).await?)
    }

    pub async fn list_all(&self) -> Result<Vec<ProductRow>, AppError> {
        Ok(self.store.list().await?)
    }

    pub async fn update_by_id(&self, id: i64, patch: ProductPatch) -> Result<ProductRow, AppError> {
        self.store
            .update(id, patch)
            .await?
            .ok_or(AppError::not_found("product"))
    }

    pub async fn delete_by_id(&self, id: i64) -> Result<(), AppError> {
        if self.store.delete(id).await? {
            Ok(())
        } else {
            Err(AppError::not_found("product"))
        }
    }
}
