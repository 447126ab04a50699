//! Transform rule endpoints
//!
//! Creating or saving a rule compiles and deploys it in the same request, so
//! the caller gets an immediate success or failure signal. Compile failures
//! come back as 422, deploy precondition failures as 400.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::prelude::*;
use crate::models::transform_rule;
use crate::services::gateway::HeaderPair;
use crate::services::rules::{self, ServiceRef};
use crate::state::AppState;

/// Create the transform rule routes
pub fn rules_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_rules).post(create_rule))
        .route("/{id}", get(get_rule).put(update_rule))
        .route("/{id}/deploy", post(deploy_rule))
        .with_state(state)
}

// ============================================================================
// Schemas
// ============================================================================

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateRuleRequest {
    pub account_id: i64,
    #[validate(length(min = 1, message = "rule name cannot be empty"))]
    pub name: String,
    #[serde(default)]
    pub services: Vec<ServiceRef>,
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct UpdateRuleRequest {
    #[validate(length(min = 1, message = "rule name cannot be empty"))]
    pub name: Option<String>,
    pub services: Option<Vec<ServiceRef>>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RuleResponse {
    pub id: i64,
    pub account_id: i64,
    pub name: String,
    /// Compiled host-match expression from the last deploy
    pub pattern: Option<String>,
    pub headers: Vec<HeaderPair>,
    pub rule_ids: Vec<String>,
    pub services: Vec<ServiceRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Expand a rule row into its API shape, links included
async fn rule_response(
    db: &DatabaseConnection,
    rule: transform_rule::Model,
) -> Result<RuleResponse> {
    let services = rules::linked_service_refs(db, rule.id).await?;
    let headers: Vec<HeaderPair> = serde_json::from_str(&rule.headers_json)?;
    let rule_ids: Vec<String> = serde_json::from_str(&rule.rule_ids_json)?;

    Ok(RuleResponse {
        id: rule.id,
        account_id: rule.account_id,
        name: rule.name,
        pattern: rule.pattern,
        headers,
        rule_ids,
        services,
        created_at: rule.created_at,
        updated_at: rule.updated_at,
    })
}

// ============================================================================
// Handlers
// ============================================================================

/// List all transform rules
#[utoipa::path(
    get,
    path = "/api/rules",
    tag = "Rules",
    responses(
        (status = 200, body = Vec<RuleResponse>)
    )
)]
async fn list_rules(State(state): State<AppState>) -> Result<Json<Vec<RuleResponse>>> {
    let rules = TransformRule::find()
        .order_by_asc(transform_rule::Column::Id)
        .all(&state.db)
        .await?;

    let mut responses = Vec::with_capacity(rules.len());
    for rule in rules {
        responses.push(rule_response(&state.db, rule).await?);
    }
    Ok(Json(responses))
}

/// Get a single transform rule
#[utoipa::path(
    get,
    path = "/api/rules/{id}",
    tag = "Rules",
    responses(
        (status = 200, body = RuleResponse),
        (status = 404, description = "Rule not found")
    )
)]
async fn get_rule(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RuleResponse>> {
    let rule = rules::get_rule(&state.db, id).await?;
    Ok(Json(rule_response(&state.db, rule).await?))
}

/// Create a transform rule and deploy it immediately
#[utoipa::path(
    post,
    path = "/api/rules",
    tag = "Rules",
    request_body = CreateRuleRequest,
    responses(
        (status = 200, body = RuleResponse),
        (status = 400, description = "Deployment precondition failed"),
        (status = 422, description = "Rule compilation failed")
    )
)]
async fn create_rule(
    State(state): State<AppState>,
    Json(req): Json<CreateRuleRequest>,
) -> Result<Json<RuleResponse>> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let rule = rules::create_rule(&state.db, req.account_id, &req.name, &req.services).await?;
    let deployed = rules::deploy_rule(&state.db, state.gateway.as_ref(), rule).await?;

    Ok(Json(rule_response(&state.db, deployed).await?))
}

/// Save a rule's name and links, then redeploy it
#[utoipa::path(
    put,
    path = "/api/rules/{id}",
    tag = "Rules",
    request_body = UpdateRuleRequest,
    responses(
        (status = 200, body = RuleResponse),
        (status = 404, description = "Rule not found"),
        (status = 422, description = "Rule compilation failed")
    )
)]
async fn update_rule(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateRuleRequest>,
) -> Result<Json<RuleResponse>> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let rule = rules::update_rule(
        &state.db,
        id,
        req.name.as_deref(),
        req.services.as_deref(),
    )
    .await?;
    let deployed = rules::deploy_rule(&state.db, state.gateway.as_ref(), rule).await?;

    Ok(Json(rule_response(&state.db, deployed).await?))
}

/// Redeploy a rule from its current links
#[utoipa::path(
    post,
    path = "/api/rules/{id}/deploy",
    tag = "Rules",
    responses(
        (status = 200, body = RuleResponse),
        (status = 404, description = "Rule not found"),
        (status = 422, description = "Rule compilation failed")
    )
)]
async fn deploy_rule(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RuleResponse>> {
    let rule = rules::get_rule(&state.db, id).await?;
    let deployed = rules::deploy_rule(&state.db, state.gateway.as_ref(), rule).await?;

    Ok(Json(rule_response(&state.db, deployed).await?))
}
