//! Transform rule compilation and deployment
//!
//! A rule never stores a hand-edited pattern or header set. Both are derived
//! from the rule's linked services immediately before every deploy, so the
//! remote rule always reflects the current links.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, CompileError, DeployError, Result};
use crate::models::prelude::*;
use crate::models::rule_service_link::ServiceKind;
use crate::models::{
    access_credential, domain, managed_service, monitored_service, rule_service_link,
    transform_rule,
};
use crate::services::gateway::{EdgeGateway, HeaderPair};

// ============================================================================
// Compiler
// ============================================================================

/// A linked service with everything the compiler needs already loaded
pub enum LinkedService {
    Monitored {
        service: monitored_service::Model,
        credential: Option<access_credential::Model>,
    },
    Managed(managed_service::Model),
}

impl LinkedService {
    /// Hostname this service contributes to the match pattern, if any.
    /// Monitored services are reached at the hostname their access credential
    /// is named after; managed services at the host component of their URL.
    pub fn hostname(&self) -> Option<String> {
        match self {
            LinkedService::Monitored { credential, .. } => credential
                .as_ref()
                .filter(|cred| !cred.name.is_empty())
                .map(|cred| cred.name.clone()),
            LinkedService::Managed(service) => url::Url::parse(&service.url)
                .ok()
                .and_then(|url| url.host_str().map(String::from)),
        }
    }

    /// Header pairs this service would inject; empty when it carries nothing
    pub fn credential_headers(&self) -> Vec<HeaderPair> {
        match self {
            LinkedService::Monitored {
                credential: Some(cred),
                ..
            } => vec![
                HeaderPair {
                    name: "CF-Access-Client-Id".to_string(),
                    value: cred.client_id.clone(),
                },
                HeaderPair {
                    name: "CF-Access-Client-Secret".to_string(),
                    value: cred.client_secret.clone(),
                },
            ],
            LinkedService::Monitored {
                credential: None, ..
            } => Vec::new(),
            LinkedService::Managed(service) => match service.access_token.as_deref() {
                Some(token) if !token.is_empty() => vec![HeaderPair {
                    name: "Authorization".to_string(),
                    value: format!("Bearer {}", token),
                }],
                _ => Vec::new(),
            },
        }
    }
}

/// Output of compiling a rule's linked services
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledRule {
    /// Host-match predicate, e.g. `http.host matches "^(app\.example\.com)$"`
    pub pattern: String,
    pub headers: Vec<HeaderPair>,
}

/// Build the anchored host regex for a set of hostnames
fn host_pattern(hostnames: &[String]) -> String {
    let escaped: Vec<String> = hostnames.iter().map(|h| regex::escape(h)).collect();
    format!("^({})$", escaped.join("|"))
}

/// Derive the host pattern and header set from a rule's linked services.
///
/// Hostnames are collected in link order and not deduplicated. Monitored
/// services contribute the hostname their access credential is named after;
/// managed services contribute the host component of their URL.
pub fn compile_rule(links: &[LinkedService]) -> std::result::Result<CompiledRule, CompileError> {
    let hostnames: Vec<String> = links.iter().filter_map(|link| link.hostname()).collect();
    if hostnames.is_empty() {
        return Err(CompileError::NoHostnames);
    }

    let pattern = format!("http.host matches \"{}\"", host_pattern(&hostnames));

    // TODO: first-match-wins drops the credentials of every later service of
    // the same kind; revisit once headers can be scoped per hostname.
    let mut headers: Vec<HeaderPair> = Vec::new();
    if let Some(pairs) = links
        .iter()
        .filter(|link| matches!(link, LinkedService::Monitored { .. }))
        .map(|link| link.credential_headers())
        .find(|pairs| !pairs.is_empty())
    {
        headers.extend(pairs);
    }
    if let Some(pairs) = links
        .iter()
        .filter(|link| matches!(link, LinkedService::Managed(_)))
        .map(|link| link.credential_headers())
        .find(|pairs| !pairs.is_empty())
    {
        headers.extend(pairs);
    }

    if headers.is_empty() {
        return Err(CompileError::NoCredentials);
    }

    Ok(CompiledRule { pattern, headers })
}

/// Load a rule's linked services in link order, resolving each reference
pub async fn load_linked_services(
    db: &DatabaseConnection,
    rule_id: i64,
) -> Result<Vec<LinkedService>> {
    let links = RuleServiceLink::find()
        .filter(rule_service_link::Column::RuleId.eq(rule_id))
        .order_by_asc(rule_service_link::Column::Position)
        .all(db)
        .await?;

    let mut loaded = Vec::with_capacity(links.len());
    for link in links {
        match link.service_kind {
            ServiceKind::Monitored => {
                let service = match MonitoredService::find_by_id(link.service_id).one(db).await? {
                    Some(service) => service,
                    None => {
                        tracing::warn!(
                            rule_id = link.rule_id,
                            service_id = link.service_id,
                            "Linked monitored service no longer exists, skipping"
                        );
                        continue;
                    }
                };
                let credential = match service.access_credential_id {
                    Some(cred_id) => AccessCredential::find_by_id(cred_id).one(db).await?,
                    None => None,
                };
                loaded.push(LinkedService::Monitored {
                    service,
                    credential,
                });
            }
            ServiceKind::Managed => {
                let service = match ManagedService::find_by_id(link.service_id).one(db).await? {
                    Some(service) => service,
                    None => {
                        tracing::warn!(
                            rule_id = link.rule_id,
                            service_id = link.service_id,
                            "Linked managed service no longer exists, skipping"
                        );
                        continue;
                    }
                };
                loaded.push(LinkedService::Managed(service));
            }
        }
    }
    Ok(loaded)
}

// ============================================================================
// Deployer
// ============================================================================

/// Compile a rule from its current links and push it to the account's zone.
///
/// This path is user-facing: every failure propagates so the caller gets an
/// immediate success or failure signal.
pub async fn deploy_rule(
    db: &DatabaseConnection,
    gateway: &dyn EdgeGateway,
    rule: transform_rule::Model,
) -> Result<transform_rule::Model> {
    let links = load_linked_services(db, rule.id).await?;
    let compiled = compile_rule(&links)?;

    let account = Account::find_by_id(rule.account_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Account {} not found", rule.account_id)))?;

    let token = account.api_token.clone().unwrap_or_default();
    if token.is_empty() {
        return Err(AppError::BadRequest(format!(
            "Account '{}' has no API token configured",
            account.name
        )));
    }

    // Rules always deploy into the zone of the account's first domain
    let zone = Domain::find()
        .filter(domain::Column::AccountId.eq(account.id))
        .order_by_asc(domain::Column::Id)
        .one(db)
        .await?
        .ok_or(DeployError::NoDomain)?;

    let existing_ids: Vec<String> = serde_json::from_str(&rule.rule_ids_json)?;

    let remote_id = gateway
        .create_or_update_transform_rule(
            &token,
            &zone.zone_id,
            &rule.name,
            &compiled.pattern,
            &compiled.headers,
            existing_ids.first().map(String::as_str),
        )
        .await?;

    tracing::info!(
        rule = %rule.name,
        zone = %zone.zone_id,
        remote_id = %remote_id,
        "Deployed transform rule"
    );

    let mut active: transform_rule::ActiveModel = rule.into();
    active.pattern = Set(Some(compiled.pattern));
    active.headers_json = Set(serde_json::to_string(&compiled.headers)?);
    active.rule_ids_json = Set(serde_json::to_string(&vec![remote_id])?);
    active.updated_at = Set(Utc::now());
    Ok(active.update(db).await?)
}

// ============================================================================
// Persistence helpers
// ============================================================================

/// Reference to a service linked into a rule
#[derive(Debug, Clone, Copy, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ServiceRef {
    pub kind: ServiceKind,
    pub id: i64,
}

/// Fetch a rule or fail with 404
pub async fn get_rule(db: &DatabaseConnection, rule_id: i64) -> Result<transform_rule::Model> {
    TransformRule::find_by_id(rule_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Transform rule {} not found", rule_id)))
}

/// Create a rule and its service links, in the order supplied
pub async fn create_rule(
    db: &DatabaseConnection,
    account_id: i64,
    name: &str,
    services: &[ServiceRef],
) -> Result<transform_rule::Model> {
    let account = Account::find_by_id(account_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Account {} not found", account_id)))?;

    let now = Utc::now();
    let rule = transform_rule::ActiveModel {
        account_id: Set(account.id),
        name: Set(name.to_string()),
        pattern: Set(None),
        headers_json: Set("[]".to_string()),
        rule_ids_json: Set("[]".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    replace_links(db, rule.id, services).await?;
    Ok(rule)
}

/// Rename a rule and/or replace its linked services
pub async fn update_rule(
    db: &DatabaseConnection,
    rule_id: i64,
    name: Option<&str>,
    services: Option<&[ServiceRef]>,
) -> Result<transform_rule::Model> {
    let rule = get_rule(db, rule_id).await?;

    let rule = match name {
        Some(name) => {
            let mut active: transform_rule::ActiveModel = rule.into();
            active.name = Set(name.to_string());
            active.updated_at = Set(Utc::now());
            active.update(db).await?
        }
        None => rule,
    };

    if let Some(services) = services {
        replace_links(db, rule.id, services).await?;
    }

    Ok(rule)
}

/// Replace a rule's links with a new ordered set, validating each reference
pub async fn replace_links(
    db: &DatabaseConnection,
    rule_id: i64,
    services: &[ServiceRef],
) -> Result<()> {
    for service in services {
        match service.kind {
            ServiceKind::Monitored => {
                MonitoredService::find_by_id(service.id)
                    .one(db)
                    .await?
                    .ok_or_else(|| {
                        AppError::NotFound(format!("Monitored service {} not found", service.id))
                    })?;
            }
            ServiceKind::Managed => {
                ManagedService::find_by_id(service.id)
                    .one(db)
                    .await?
                    .ok_or_else(|| {
                        AppError::NotFound(format!("Managed service {} not found", service.id))
                    })?;
            }
        }
    }

    RuleServiceLink::delete_many()
        .filter(rule_service_link::Column::RuleId.eq(rule_id))
        .exec(db)
        .await?;

    for (position, service) in services.iter().enumerate() {
        rule_service_link::ActiveModel {
            rule_id: Set(rule_id),
            service_kind: Set(service.kind),
            service_id: Set(service.id),
            position: Set(position as i32),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

/// List a rule's links in order as API-facing references
pub async fn linked_service_refs(
    db: &DatabaseConnection,
    rule_id: i64,
) -> Result<Vec<ServiceRef>> {
    let links = RuleServiceLink::find()
        .filter(rule_service_link::Column::RuleId.eq(rule_id))
        .order_by_asc(rule_service_link::Column::Position)
        .all(db)
        .await?;

    Ok(links
        .into_iter()
        .map(|link| ServiceRef {
            kind: link.service_kind,
            id: link.service_id,
        })
        .collect())
}

// ============================================================================
// Tests
// ============================================================================
