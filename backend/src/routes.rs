use axum::{
    Json, Router,
    routing::{get, post},
};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use crate::{generate::generate_recipes, state::AppState};

pub const SERVICE_NAME: &str = "recipe-backend";

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/generate-recipes", post(generate_recipes))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
