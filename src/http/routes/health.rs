//! Liveness endpoint.

use axum::Json;
use chrono::Utc;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Health {
    success: bool,
    message: &'static str,
    timestamp: String,
}

/// `GET /api/health`
pub async fn health() -> Json<Health> {
    Json(Health {
        success: true,
        message: "Print shop service operational",
        timestamp: Utc::now().to_rfc3339(),
    })
}
