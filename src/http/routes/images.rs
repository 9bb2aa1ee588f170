//! Image route handlers.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::Serialize;

use crate::core::image::{self, NewImage};
use crate::core::pagination::{PageRequest, Pagination};
use crate::entities::image::Model as ImageModel;
use crate::errors::Error;
use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::http::routes::{ListQuery, OwnerQuery, parse_record_id};
use crate::http::state::AppState;

#[derive(Debug, Serialize)]
pub struct ImageList {
    images: Vec<ImageModel>,
    pagination: Pagination,
}

/// `POST /api/images`
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewImage>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<ImageModel>>), AppError> {
    let Json(new_image) = payload?;
    let created = image::create_image(state.db(), new_image)
        .await
        .map_err(|e| state.error(e))?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

/// `GET /api/images?userId&page&limit`
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<ImageList>>, AppError> {
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

    let page = image::list_images_for_user(state.db(), &user_id, page)
        .await
        .map_err(|e| state.error(e))?;
    Ok(Json(ApiResponse::ok(ImageList {
        images: page.items,
        pagination: page.pagination,
    })))
}

/// `GET /api/images/{id}?userId`
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<OwnerQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<ImageModel>>, AppError> {
    let Query(owner) = query?;
    let id = parse_record_id(&id, "Image")?;
    let found = image::get_image(state.db(), id, owner.user_id.as_deref())
        .await
        .map_err(|e| state.error(e))?;
    Ok(Json(ApiResponse::ok(found)))
}

/// `DELETE /api/images/{id}?userId`
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<OwnerQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let Query(owner) = query?;
    let id = parse_record_id(&id, "Image")?;
    image::delete_image(state.db(), id, owner.user_id.as_deref())
        .await
        .map_err(|e| state.error(e))?;
    Ok(Json(ApiResponse::message("Image deleted")))
}
