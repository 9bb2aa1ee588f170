//! Product route handlers.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::Serialize;

use crate::core::pagination::{PageRequest, Pagination};
use crate::core::product::{self, NewProduct, ProductChanges, ProductWithChildren};
use crate::errors::Error;
use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::http::routes::{ListQuery, OwnerQuery, parse_record_id};
use crate::http::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProductList {
    products: Vec<ProductWithChildren>,
    pagination: Pagination,
}

/// `POST /api/products`
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<ProductWithChildren>>), AppError> {
    let Json(new_product) = payload?;
    let created = product::create_product(state.db(), new_product)
        .await
        .map_err(|e| state.error(e))?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(created).with_message("Product saved")),
    ))
}

/// `GET /api/products?userId&page&limit`
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<ProductList>>, AppError> {
    let Query(query) = query?;
    let user_id = query
        .user_id
        .ok_or_else(|| Error::validation("userId is required"))?;
    let settings = state.settings();
    let page = PageRequest::parse(
        query.page.as_deref(),
        query.limit.as_deref(),
        settings.default_page_size,
        settings.max_page_size,
    )?;

    let page = product::list_products_for_user(state.db(), &user_id, page)
        .await
        .map_err(|e| state.error(e))?;
    Ok(Json(ApiResponse::ok(ProductList {
        products: page.items,
        pagination: page.pagination,
    })))
}

/// `GET /api/products/{id}?userId`
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<OwnerQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<ProductWithChildren>>, AppError> {
    let Query(owner) = query?;
    let id = parse_record_id(&id, "Product")?;
    let found = product::get_product(state.db(), id, owner.user_id.as_deref())
        .await
        .map_err(|e| state.error(e))?;
    Ok(Json(ApiResponse::ok(found)))
}

/// `PUT /api/products/{id}?userId`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<OwnerQuery>, QueryRejection>,
    payload: Result<Json<ProductChanges>, JsonRejection>,
) -> Result<Json<ApiResponse<ProductWithChildren>>, AppError> {
    let Query(owner) = query?;
    let Json(changes) = payload?;
    let id = parse_record_id(&id, "Product")?;
    let updated = product::update_product(state.db(), id, owner.user_id.as_deref(), changes)
        .await
        .map_err(|e| state.error(e))?;
    Ok(Json(ApiResponse::ok(updated).with_message("Product updated")))
}

/// `DELETE /api/products/{id}?userId`
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<OwnerQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let Query(owner) = query?;
    let id = parse_record_id(&id, "Product")?;
    product::delete_product(state.db(), id, owner.user_id.as_deref())
        .await
        .map_err(|e| state.error(e))?;
    Ok(Json(ApiResponse::message("Product deleted")))
}
