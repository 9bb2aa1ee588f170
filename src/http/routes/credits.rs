//! Credit route handlers.
//!
//! Responses echo the caller's `userId`; balances are stored under the
//! normalized internal id.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};

use crate::core::credits;
use crate::errors::Error;
use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::http::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UseCreditsRequest {
    user_id: Option<String>,
    amount: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCreditsRequest {
    user_id: Option<String>,
    amount: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditBalance {
    user_id: String,
    credits: i64,
    can_generate: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditsUsed {
    user_id: String,
    credits_used: i64,
    remaining_credits: i64,
    can_generate: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditsAdded {
    user_id: String,
    credits_added: i64,
    total_credits: i64,
    can_generate: bool,
}

/// `GET /api/credits/{userId}`
pub async fn show(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<CreditBalance>>, AppError> {
    let balance =
        credits::get_or_create_credits(state.db(), &user_id, state.settings().starting_credits)
            .await
            .map_err(|e| state.error(e))?;
    Ok(Json(ApiResponse::ok(CreditBalance {
        user_id,
        credits: balance.amount,
        can_generate: balance.can_generate(),
    })))
}

/// `POST /api/credits/use` with `{userId, amount = 1}`
pub async fn spend(
    State(state): State<AppState>,
    payload: Result<Json<UseCreditsRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<CreditsUsed>>, AppError> {
    let Json(request) = payload?;
    let user_id = request
        .user_id
        .ok_or_else(|| Error::validation("userId is required"))?;
    let amount = request.amount.unwrap_or(1);

    let balance = credits::use_credits(state.db(), &user_id, amount)
        .await
        .map_err(|e| state.error(e))?;
    Ok(Json(ApiResponse::ok(CreditsUsed {
        user_id,
        credits_used: amount,
        remaining_credits: balance.amount,
        can_generate: balance.can_generate(),
    })))
}

/// `POST /api/credits/add` with `{userId, amount}`
pub async fn add(
    State(state): State<AppState>,
    payload: Result<Json<AddCreditsRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<CreditsAdded>>, AppError> {
    let Json(request) = payload?;
    let (Some(user_id), Some(amount)) = (request.user_id, request.amount) else {
        return Err(Error::validation("userId and amount are required").into());
    };

    let balance = credits::add_credits(state.db(), &user_id, amount)
        .await
        .map_err(|e| state.error(e))?;
    Ok(Json(ApiResponse::ok(CreditsAdded {
        user_id,
        credits_added: amount,
        total_credits: balance.amount,
        can_generate: balance.can_generate(),
    })))
}

/// `POST /api/credits/reset/{userId}`
pub async fn reset(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<CreditBalance>>, AppError> {
    let balance = credits::reset_credits(state.db(), &user_id)
        .await
        .map_err(|e| state.error(e))?;
    Ok(Json(ApiResponse::ok(CreditBalance {
        user_id,
        credits: balance.amount,
        can_generate: balance.can_generate(),
    })))
}
