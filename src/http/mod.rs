//! HTTP facade - translates requests into core calls and wraps results in
//! the JSON envelope.

pub mod error;
pub mod response;
pub mod routes;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use routes::{credits, health, images, products};
pub use state::AppState;

/// Builds the full router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::health))
        .route("/api/health", get(health::health))
        .route("/api/images", post(images::create).get(images::list))
        .route("/api/images/{id}", get(images::show).delete(images::destroy))
        .route("/api/products", post(products::create).get(products::list))
        .route(
            "/api/products/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
        .route("/api/credits/use", post(credits::spend))
        .route("/api/credits/add", post(credits::add))
        .route("/api/credits/reset/{user_id}", post(credits::reset))
        .route("/api/credits/{user_id}", get(credits::show))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
