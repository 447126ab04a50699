//! Service registry endpoints
//!
//! Two kinds of services can be linked into transform rules: monitored
//! services protected behind Cloudflare Access, and managed services reached
//! through their own API with a bearer token.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::prelude::*;
use crate::models::{access_credential, managed_service, monitored_service};
use crate::state::AppState;

/// Create the service registry routes
pub fn services_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_services))
        .route("/monitored", post(create_monitored_service))
        .route("/managed", post(create_managed_service))
        .with_state(state)
}

// ============================================================================
// Schemas
// ============================================================================

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct InlineCredential {
    /// Credential name; doubles as the hostname the credential protects
    #[validate(length(min = 1, message = "credential name cannot be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "client id cannot be empty"))]
    pub client_id: String,
    #[validate(length(min = 1, message = "client secret cannot be empty"))]
    pub client_secret: String,
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateMonitoredServiceRequest {
    #[validate(length(min = 1, message = "service name cannot be empty"))]
    pub name: String,
    /// Optional Access service token created together with the service
    #[validate(nested)]
    pub credential: Option<InlineCredential>,
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateManagedServiceRequest {
    #[validate(length(min = 1, message = "service name cannot be empty"))]
    pub name: String,
    #[validate(url(message = "service url must be a valid URL"))]
    pub url: String,
    pub access_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ServiceListResponse {
    pub monitored: Vec<monitored_service::Model>,
    pub managed: Vec<managed_service::Model>,
}

// ============================================================================
// Handlers
// ============================================================================

/// List all registered services of both kinds
#[utoipa::path(
    get,
    path = "/api/services",
    tag = "Services",
    responses(
        (status = 200, body = serde_json::Value)
    )
)]
async fn list_services(State(state): State<AppState>) -> Result<Json<ServiceListResponse>> {
    let monitored = MonitoredService::find()
        .order_by_asc(monitored_service::Column::Id)
        .all(&state.db)
        .await?;
    let managed = ManagedService::find()
        .order_by_asc(managed_service::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(ServiceListResponse { monitored, managed }))
}

/// Register a monitored service, optionally creating its access credential
#[utoipa::path(
    post,
    path = "/api/services/monitored",
    tag = "Services",
    request_body = CreateMonitoredServiceRequest,
    responses(
        (status = 200, body = serde_json::Value)
    )
)]
async fn create_monitored_service(
    State(state): State<AppState>,
    Json(req): Json<CreateMonitoredServiceRequest>,
) -> Result<Json<monitored_service::Model>> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let credential_id = match req.credential {
        Some(cred) => {
            let now = Utc::now();
            let created = access_credential::ActiveModel {
                name: Set(cred.name),
                client_id: Set(cred.client_id),
                client_secret: Set(cred.client_secret),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&state.db)
            .await?;
            Some(created.id)
        }
        None => None,
    };

    let now = Utc::now();
    let created = monitored_service::ActiveModel {
        name: Set(req.name),
        access_credential_id: Set(credential_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok(Json(created))
}

/// Register a managed service
#[utoipa::path(
    post,
    path = "/api/services/managed",
    tag = "Services",
    request_body = CreateManagedServiceRequest,
    responses(
        (status = 200, body = serde_json::Value)
    )
)]
async fn create_managed_service(
    State(state): State<AppState>,
    Json(req): Json<CreateManagedServiceRequest>,
) -> Result<Json<managed_service::Model>> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let now = Utc::now();
    let created = managed_service::ActiveModel {
        name: Set(req.name),
        url: Set(req.url),
        access_token: Set(req.access_token),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok(Json(created))
}
