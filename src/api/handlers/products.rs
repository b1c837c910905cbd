/*
 * Responsibility
 * - /{scheme}/add|get|update|delete handlers, shared by all four route groups
 * - Take Json via the extractor, validate the DTO, call ProductService
 * - Public ids are decoded by PublicProductId before we get here
 */
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::debug;

use crate::{
    api::{
        dto::products::{
            CreateProductRequest, MessageResponse, ProductResponse, UpdateProductRequest,
        },
        extractors::{AuthPrincipal, PublicProductId},
    },
    error::AppError,
    state::AppState,
};

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(v)| v)
        .map_err(|rejection| AppError::bad_request("INVALID_BODY", rejection.body_text()))
}

pub async fn add_product(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<Json<ProductResponse>, AppError> {
    let req = body(payload)?;
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_PRODUCT", msg))?;

    let row = state.products.create(req.into_new_product()).await?;
    debug!(scheme = %principal.scheme, subject = %principal.subject, id = row.id, "product created");

    Ok(Json(ProductResponse::from_row(row, &state.id_codec)?))
}

pub async fn list_products(
    State(state): State<AppState>,
    AuthPrincipal(_principal): AuthPrincipal,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let rows = state.products.list_all().await?;
    let res = rows
        .into_iter()
        .map(|row| ProductResponse::from_row(row, &state.id_codec))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(res))
}

pub async fn update_product(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    product_id: PublicProductId,
    payload: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> Result<Json<ProductResponse>, AppError> {
    let req = body(payload)?;
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_PRODUCT", msg))?;

    let row = state
        .products
        .update_by_id(product_id.id, req.into_patch())
        .await?;
    debug!(scheme = %principal.scheme, subject = %principal.subject, id = row.id, "product updated");

    Ok(Json(ProductResponse::from_row(row, &state.id_codec)?))
}

pub async fn delete_product(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    product_id: PublicProductId,
) -> Result<Json<MessageResponse>, AppError> {
    state.products.delete_by_id(product_id.id).await?;
    debug!(scheme = %principal.scheme, subject = %principal.subject, id = product_id.id, "product deleted");

    Ok(Json(MessageResponse {
        message: "Product deleted",
    }))
}
