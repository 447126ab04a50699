//! Cloudflare edge API gateway
//!
//! All remote traffic goes through the `EdgeGateway` trait so the sync and
//! deploy paths can be driven against a scripted implementation in tests.
//! `CloudflareGateway` is the production implementation; it receives its
//! configuration explicitly and never reads process-wide state.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::cloudflare::CloudflareConfig;
use crate::error::{AppError, Result};

// ============================================================================
// Gateway contract
// ============================================================================

/// A single request header set by a transform rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HeaderPair {
    pub name: String,
    pub value: String,
}

/// Tunnel entry from the account-level list endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteTunnel {
    pub id: String,
    pub name: String,
}

/// Detailed tunnel state from the per-tunnel endpoint
#[derive(Debug, Clone)]
pub struct TunnelDetails {
    pub name: String,
    pub status: String,
    pub conns_active_at: Option<DateTime<Utc>>,
    pub client_version: Option<String>,
}

/// Remote edge API operations used by the sync and deploy paths
#[async_trait]
pub trait EdgeGateway: Send + Sync {
    /// Check whether an API token is currently accepted by the remote side
    async fn verify_token(&self, token: &str) -> Result<bool>;

    /// List the account's tunnels (remotely-deleted ones filtered out)
    async fn list_tunnels(&self, token: &str, account_tag: &str) -> Result<Vec<RemoteTunnel>>;

    /// Fetch per-tunnel detail; `None` when the remote no longer knows the tunnel
    async fn tunnel_details(
        &self,
        token: &str,
        account_tag: &str,
        tunnel_id: &str,
    ) -> Result<Option<TunnelDetails>>;

    /// Create or update the named request-header transform rule in a zone
    /// and return the remote rule id
    async fn create_or_update_transform_rule(
        &self,
        token: &str,
        zone_id: &str,
        rule_name: &str,
        expression: &str,
        headers: &[HeaderPair],
        existing_rule_id: Option<&str>,
    ) -> Result<String>;
}

// ============================================================================
// Cloudflare API response envelope
// ============================================================================

#[derive(Deserialize)]
struct CfResponse<T> {
    success: bool,
    errors: Vec<CfApiError>,
    result: Option<T>,
    result_info: Option<CfResultInfo>,
}

#[derive(Deserialize)]
struct CfApiError {
    code: i64,
    message: String,
}

/// Pagination block returned by list endpoints
#[derive(Deserialize)]
struct CfResultInfo {
    page: u32,
    total_pages: u32,
}

impl<T> CfResponse<T> {
    fn into_result(self, context: &str) -> Result<T> {
        if !self.success {
            let msg = self
                .errors
                .first()
                .map(|e| format!("{} (code {})", e.message, e.code))
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(AppError::BadRequest(format!(
                "Cloudflare API error ({}): {}",
                context, msg
            )));
        }
        self.result.ok_or_else(|| {
            AppError::Internal(format!(
                "Cloudflare API returned no result for: {}",
                context
            ))
        })
    }
}

/// Ruleset as returned by the zone rulesets endpoints
#[derive(Deserialize)]
struct RulesetInfo {
    id: String,
    #[serde(default)]
    rules: Vec<RuleInfo>,
}

#[derive(Deserialize)]
struct RuleInfo {
    id: String,
    #[serde(default)]
    description: Option<String>,
}

/// Phase holding request-header transform rules
const TRANSFORM_PHASE: &str = "http_request_late_transform";

// ============================================================================
// Production implementation
// ============================================================================

pub struct CloudflareGateway {
    api_base: String,
    client: reqwest::Client,
}

impl CloudflareGateway {
    /// Build a gateway from explicit configuration
    pub fn new(config: CloudflareConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            api_base: config.api_base,
            client,
        })
    }

    /// Fetch the zone's transform-phase entrypoint ruleset, if one exists yet
    async fn get_entrypoint(&self, token: &str, zone_id: &str) -> Result<Option<RulesetInfo>> {
        let resp = self
            .client
            .get(format!(
                "{}/zones/{}/rulesets/phases/{}/entrypoint",
                self.api_base, zone_id, TRANSFORM_PHASE
            ))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await?;

        // A zone with no transform rules yet has no entrypoint ruleset
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let cf: CfResponse<RulesetInfo> = resp
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("Cloudflare API parse failed: {}", e)))?;

        cf.into_result("get transform entrypoint").map(Some)
    }

    /// Create the entrypoint ruleset with the rule as its first entry
    async fn create_ruleset_with_rule(
        &self,
        token: &str,
        zone_id: &str,
        rule: serde_json::Value,
    ) -> Result<RulesetInfo> {
        let resp = self
            .client
            .post(format!("{}/zones/{}/rulesets", self.api_base, zone_id))
            .header("Authorization", format!("Bearer {}", token))
            .json(&serde_json::json!({
                "name": "default",
                "kind": "zone",
                "phase": TRANSFORM_PHASE,
                "rules": [rule],
            }))
            .send()
            .await?;

        let cf: CfResponse<RulesetInfo> = resp
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("Cloudflare API parse failed: {}", e)))?;

        cf.into_result("create transform ruleset")
    }

    /// Add the rule to an existing ruleset; returns the full updated ruleset
    async fn add_rule(
        &self,
        token: &str,
        zone_id: &str,
        ruleset_id: &str,
        rule: serde_json::Value,
    ) -> Result<RulesetInfo> {
        let resp = self
            .client
            .post(format!(
                "{}/zones/{}/rulesets/{}/rules",
                self.api_base, zone_id, ruleset_id
            ))
            .header("Authorization", format!("Bearer {}", token))
            .json(&rule)
            .send()
            .await?;

        let cf: CfResponse<RulesetInfo> = resp
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("Cloudflare API parse failed: {}", e)))?;

        cf.into_result("add transform rule")
    }

    /// Update a rule in place; returns the full updated ruleset
    async fn update_rule(
        &self,
        token: &str,
        zone_id: &str,
        ruleset_id: &str,
        rule_id: &str,
        rule: serde_json::Value,
    ) -> Result<RulesetInfo> {
        let resp = self
            .client
            .patch(format!(
                "{}/zones/{}/rulesets/{}/rules/{}",
                self.api_base, zone_id, ruleset_id, rule_id
            ))
            .header("Authorization", format!("Bearer {}", token))
            .json(&rule)
            .send()
            .await?;

        let cf: CfResponse<RulesetInfo> = resp
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("Cloudflare API parse failed: {}", e)))?;

        cf.into_result("update transform rule")
    }
}

#[async_trait]
impl EdgeGateway for CloudflareGateway {
    async fn verify_token(&self, token: &str) -> Result<bool> {
        #[derive(Deserialize)]
        struct TokenStatus {
            status: String,
        }

        let resp = self
            .client
            .get(format!("{}/user/tokens/verify", self.api_base))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await?;

        // A rejected token comes back as a non-success envelope, not as a
        // transport error: that is a definitive "invalid", not a failure
        let cf: CfResponse<TokenStatus> = resp
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("Cloudflare API parse failed: {}", e)))?;

        if !cf.success {
            return Ok(false);
        }
        Ok(cf.result.map(|r| r.status == "active").unwrap_or(false))
    }

    async fn list_tunnels(&self, token: &str, account_tag: &str) -> Result<Vec<RemoteTunnel>> {
        let mut tunnels = Vec::new();
        let mut page = 1u32;

        // The list endpoint caps a response at 100 entries; walk
        // result_info until the last page
        loop {
            let page_param = page.to_string();
            let resp = self
                .client
                .get(format!(
                    "{}/accounts/{}/cfd_tunnel",
                    self.api_base, account_tag
                ))
                .header("Authorization", format!("Bearer {}", token))
                .query(&[
                    ("is_deleted", "false"),
                    ("per_page", "100"),
                    ("page", page_param.as_str()),
                ])
                .send()
                .await?;

            let cf: CfResponse<Vec<RemoteTunnel>> = resp
                .json()
                .await
                .map_err(|e| AppError::Internal(format!("Cloudflare API parse failed: {}", e)))?;

            let more = has_more_pages(cf.result_info.as_ref());
            tunnels.extend(cf.into_result("list tunnels")?);
            if !more {
                break;
            }
            page += 1;
        }

        Ok(tunnels)
    }

    async fn tunnel_details(
        &self,
        token: &str,
        account_tag: &str,
        tunnel_id: &str,
    ) -> Result<Option<TunnelDetails>> {
        #[derive(Deserialize)]
        struct Connection {
            client_version: Option<String>,
        }

        #[derive(Deserialize)]
        struct TunnelInfo {
            name: String,
            status: String,
            conns_active_at: Option<DateTime<Utc>>,
            #[serde(default)]
            connections: Vec<Connection>,
        }

        let resp = self
            .client
            .get(format!(
                "{}/accounts/{}/cfd_tunnel/{}",
                self.api_base, account_tag, tunnel_id
            ))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let cf: CfResponse<TunnelInfo> = resp
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("Cloudflare API parse failed: {}", e)))?;

        let info = cf.into_result("tunnel details")?;
        let client_version = info
            .connections
            .into_iter()
            .next()
            .and_then(|c| c.client_version);

        Ok(Some(TunnelDetails {
            name: info.name,
            status: info.status,
            conns_active_at: info.conns_active_at,
            client_version,
        }))
    }

    async fn create_or_update_transform_rule(
        &self,
        token: &str,
        zone_id: &str,
        rule_name: &str,
        expression: &str,
        headers: &[HeaderPair],
        existing_rule_id: Option<&str>,
    ) -> Result<String> {
        let rule = rule_payload(rule_name, expression, headers);

        let ruleset = match self.get_entrypoint(token, zone_id).await? {
            None => self.create_ruleset_with_rule(token, zone_id, rule).await?,
            Some(entrypoint) => match existing_rule_id {
                Some(rule_id) => {
                    self.update_rule(token, zone_id, &entrypoint.id, rule_id, rule)
                        .await?
                }
                None => self.add_rule(token, zone_id, &entrypoint.id, rule).await?,
            },
        };

        find_rule_id(&ruleset, rule_name)
    }
}

// ============================================================================
// Internal helpers
// ============================================================================

/// Build the JSON payload for a request-header rewrite rule
fn rule_payload(rule_name: &str, expression: &str, headers: &[HeaderPair]) -> serde_json::Value {
    let mut header_ops = serde_json::Map::new();
    for h in headers {
        header_ops.insert(
            h.name.clone(),
            serde_json::json!({ "operation": "set", "value": h.value }),
        );
    }

    serde_json::json!({
        "description": rule_name,
        "expression": expression,
        "action": "rewrite",
        "action_parameters": { "headers": header_ops },
        "enabled": true,
    })
}

/// Whether a list response reports pages beyond the one just fetched
fn has_more_pages(info: Option<&CfResultInfo>) -> bool {
    info.map(|i| i.page < i.total_pages).unwrap_or(false)
}

/// Locate our rule in the returned ruleset by description
fn find_rule_id(ruleset: &RulesetInfo, rule_name: &str) -> Result<String> {
    ruleset
        .rules
        .iter()
        .find(|r| r.description.as_deref() == Some(rule_name))
        .map(|r| r.id.clone())
        .ok_or_else(|| {
            AppError::Internal(format!(
                "Cloudflare did not return transform rule '{}' in the updated ruleset",
                rule_name
            ))
        })
}

// ============================================================================
// Tests
// ============================================================================
