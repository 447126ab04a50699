pub mod accounts;
pub mod rules;
pub mod services;

use axum::Router;

use crate::config::CONFIG;
use crate::state::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", axum::routing::get(health_check))
        .route("/api/system/version", axum::routing::get(get_version))
        .nest("/api/accounts", accounts::accounts_routes(state.clone()))
        .nest("/api/services", services::services_routes(state.clone()))
        .nest("/api/rules", rules::rules_routes(state))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Version info endpoint
async fn get_version() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "version": CONFIG.version,
        "backend": "rust"
    }))
}
