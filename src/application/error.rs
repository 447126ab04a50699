use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Why a transform rule could not be compiled from its linked services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("no hostnames found from linked services")]
    NoHostnames,

    #[error("no credential headers found from linked services")]
    NoCredentials,
}

/// Why a compiled transform rule could not be deployed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeployError {
    #[error("account has no domain to deploy the rule into")]
    NoDomain,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Rule compilation failed: {0}")]
    Compilation(#[from] CompileError),

    #[error("Rule deployment failed: {0}")]
    Deployment(#[from] DeployError),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::Compilation(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            AppError::Deployment(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            AppError::Json(e) => (StatusCode::BAD_REQUEST, format!("JSON error: {}", e)),
            AppError::HttpClient(e) => {
                tracing::error!("HTTP client error: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    format!("Upstream service error: {}", e),
                )
            }
        };

        (status, Json(ErrorResponse { detail: message })).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
