//! Cloudflare account and domain management endpoints

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::account::AccountStatus;
use crate::models::prelude::*;
use crate::models::{account, domain, tunnel};
use crate::services::tunnel_sync::{self, SyncSummary};
use crate::state::AppState;

/// Create the account routes
pub fn accounts_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_accounts).post(create_account))
        .route("/sync", post(sync_now))
        .route("/{id}/tunnels", get(list_tunnels))
        .route("/{id}/domains", get(list_domains).post(create_domain))
        .with_state(state)
}

// ============================================================================
// Schemas
// ============================================================================

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateAccountRequest {
    #[validate(length(min = 1, message = "account name cannot be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "account tag cannot be empty"))]
    pub account_tag: String,
    pub api_token: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AccountResponse {
    pub id: i64,
    pub name: String,
    pub account_tag: String,
    /// Always masked; reveals only whether a token is stored
    pub api_token: Option<String>,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<account::Model> for AccountResponse {
    fn from(account: account::Model) -> Self {
        Self {
            id: account.id,
            name: account.name,
            account_tag: account.account_tag,
            api_token: account
                .api_token
                .filter(|t| !t.is_empty())
                .map(|_| "****".to_string()),
            status: account.status,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateDomainRequest {
    #[validate(length(min = 1, message = "domain name cannot be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "zone id cannot be empty"))]
    pub zone_id: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// List all accounts, tokens masked
#[utoipa::path(
    get,
    path = "/api/accounts",
    tag = "Accounts",
    responses(
        (status = 200, body = Vec<AccountResponse>)
    )
)]
async fn list_accounts(State(state): State<AppState>) -> Result<Json<Vec<AccountResponse>>> {
    let accounts = Account::find()
        .order_by_asc(account::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}

/// Register a Cloudflare account
#[utoipa::path(
    post,
    path = "/api/accounts",
    tag = "Accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 200, body = AccountResponse),
        (status = 409, description = "Account tag already registered")
    )
)]
async fn create_account(
    State(state): State<AppState>,
    Json(req): Json<CreateAccountRequest>,
) -> Result<Json<AccountResponse>> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let existing = Account::find()
        .filter(account::Column::AccountTag.eq(req.account_tag.clone()))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(format!(
            "Account with tag '{}' already exists",
            req.account_tag
        )));
    }

    // Status stays Inactive until the next sync cycle validates the token
    let now = Utc::now();
    let created = account::ActiveModel {
        name: Set(req.name),
        account_tag: Set(req.account_tag),
        api_token: Set(req.api_token),
        status: Set(AccountStatus::Inactive),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok(Json(created.into()))
}

/// Run a full credential and tunnel sync immediately
#[utoipa::path(
    post,
    path = "/api/accounts/sync",
    tag = "Accounts",
    responses(
        (status = 200, body = SyncSummary)
    )
)]
async fn sync_now(State(state): State<AppState>) -> Result<Json<SyncSummary>> {
    let summary = tunnel_sync::sync_all_accounts(&state.db, state.gateway.as_ref()).await?;
    Ok(Json(summary))
}

/// List an account's tunnels with their last synced state
#[utoipa::path(
    get,
    path = "/api/accounts/{id}/tunnels",
    tag = "Accounts",
    responses(
        (status = 200, body = serde_json::Value),
        (status = 404, description = "Account not found")
    )
)]
async fn list_tunnels(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<tunnel::Model>>> {
    fetch_account(&state, id).await?;

    let tunnels = Tunnel::find()
        .filter(tunnel::Column::AccountId.eq(id))
        .order_by_asc(tunnel::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(tunnels))
}

/// List an account's domains
#[utoipa::path(
    get,
    path = "/api/accounts/{id}/domains",
    tag = "Accounts",
    responses(
        (status = 200, body = serde_json::Value),
        (status = 404, description = "Account not found")
    )
)]
async fn list_domains(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<domain::Model>>> {
    fetch_account(&state, id).await?;

    let domains = Domain::find()
        .filter(domain::Column::AccountId.eq(id))
        .order_by_asc(domain::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(domains))
}

/// Attach a domain (zone) to an account
#[utoipa::path(
    post,
    path = "/api/accounts/{id}/domains",
    tag = "Accounts",
    request_body = CreateDomainRequest,
    responses(
        (status = 200, body = serde_json::Value),
        (status = 404, description = "Account not found")
    )
)]
async fn create_domain(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<CreateDomainRequest>,
) -> Result<Json<domain::Model>> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let account = fetch_account(&state, id).await?;

    let now = Utc::now();
    let created = domain::ActiveModel {
        account_id: Set(account.id),
        name: Set(req.name),
        zone_id: Set(req.zone_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok(Json(created))
}

/// Fetch an account or fail with 404
async fn fetch_account(state: &AppState, id: i64) -> Result<account::Model> {
    Account::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Account {} not found", id)))
}
