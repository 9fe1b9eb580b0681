use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use super::account_activations;
use super::health;
use super::microposts;
use super::password_resets;
use super::sessions;
use super::state::AppState;
use super::users;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // The safe-default destination for failed guard checks
        .route("/", get(home))
        .route("/health", get(health::health_check))
        .nest("/users", users::router())
        .nest("/sessions", sessions::router())
        .nest("/account_activations", account_activations::router())
        .nest("/password_resets", password_resets::router())
        .nest("/microposts", microposts::router())
        .route("/feed", get(microposts::feed))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn home() -> Json<Value> {
    Json(json!({ "app": "featherpost" }))
}
