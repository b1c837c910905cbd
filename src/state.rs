/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 * - Cloned per request; everything inside is Arc or cheap to clone
 */
use std::sync::Arc;

use crate::services::{auth::AuthGateway, id_codec::IdCodec, products::ProductService};

#[derive(Clone, Debug)]
pub struct AppState {
    pub products: ProductService,
    pub id_codec: IdCodec,
    pub auth: Arc<AuthGateway>,
    /// Basic challenge realm.
    pub realm: Arc<str>,
}

impl AppState {
    pub fn new(
        products: ProductService,
        id_codec: IdCodec,
        auth: Arc<AuthGateway>,
        realm: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            products,
            id_codec,
            auth,
            realm: realm.into(),
        }
    }
}
