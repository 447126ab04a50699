//! Test helpers and utilities for unit and integration testing.
//!
//! This module provides common utilities for setting up test environments,
//! seeding entities, and scripting the edge gateway without a network.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use edgarr::error::{AppError, Result};
use edgarr::migrations::Migrator;
use edgarr::services::gateway::{EdgeGateway, HeaderPair, RemoteTunnel, TunnelDetails};
use edgarr::state::AppState;

/// Create an in-memory SQLite database for testing
pub async fn create_test_db() -> DatabaseConnection {
    // Use simple in-memory SQLite - each connection gets its own database
    let db_url = "sqlite::memory:";

    let db = Database::connect(db_url)
        .await
        .expect("Failed to create test database");

    // Run migrations using the Migrator
    Migrator::up(&db, None)
        .await
        .expect("Failed to run test migrations");

    db
}

/// Build a router over a fresh database and the given gateway
pub async fn build_test_app(gateway: Arc<MockGateway>) -> (axum::Router, DatabaseConnection) {
    let db = create_test_db().await;
    let state = AppState::new(db.clone(), gateway);
    (edgarr::endpoints::create_router(state), db)
}

// ============================================================================
// Seed helpers
// ============================================================================

/// Create a test account, status starts Inactive
pub async fn create_test_account(
    db: &DatabaseConnection,
    name: &str,
    account_tag: &str,
    api_token: Option<&str>,
) -> edgarr::models::account::Model {
    use edgarr::models::account::{self, AccountStatus};
    use sea_orm::{ActiveModelTrait, Set};

    let now = chrono::Utc::now();

    let new_account = account::ActiveModel {
        name: Set(name.to_string()),
        account_tag: Set(account_tag.to_string()),
        api_token: Set(api_token.map(String::from)),
        status: Set(AccountStatus::Inactive),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    new_account.insert(db).await.unwrap()
}

/// Create a test domain under an account
pub async fn create_test_domain(
    db: &DatabaseConnection,
    account_id: i64,
    name: &str,
    zone_id: &str,
) -> edgarr::models::domain::Model {
    use edgarr::models::domain;
    use sea_orm::{ActiveModelTrait, Set};

    let now = chrono::Utc::now();

    let new_domain = domain::ActiveModel {
        account_id: Set(account_id),
        name: Set(name.to_string()),
        zone_id: Set(zone_id.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    new_domain.insert(db).await.unwrap()
}

/// Create a test tunnel under an account, not yet detailed
pub async fn create_test_tunnel(
    db: &DatabaseConnection,
    account_id: i64,
    tunnel_id: &str,
    name: &str,
) -> edgarr::models::tunnel::Model {
    use edgarr::models::tunnel;
    use sea_orm::{ActiveModelTrait, Set};

    let now = chrono::Utc::now();

    let new_tunnel = tunnel::ActiveModel {
        account_id: Set(account_id),
        tunnel_id: Set(tunnel_id.to_string()),
        name: Set(name.to_string()),
        status: Set("inactive".to_string()),
        is_active: Set(false),
        conns_active_at: Set(None),
        client_version: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    new_tunnel.insert(db).await.unwrap()
}

/// Create a test access credential
pub async fn create_test_credential(
    db: &DatabaseConnection,
    name: &str,
    client_id: &str,
    client_secret: &str,
) -> edgarr::models::access_credential::Model {
    use edgarr::models::access_credential;
    use sea_orm::{ActiveModelTrait, Set};

    let now = chrono::Utc::now();

    let new_credential = access_credential::ActiveModel {
        name: Set(name.to_string()),
        client_id: Set(client_id.to_string()),
        client_secret: Set(client_secret.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    new_credential.insert(db).await.unwrap()
}

/// Create a test monitored service, optionally carrying a credential
pub async fn create_test_monitored_service(
    db: &DatabaseConnection,
    name: &str,
    access_credential_id: Option<i64>,
) -> edgarr::models::monitored_service::Model {
    use edgarr::models::monitored_service;
    use sea_orm::{ActiveModelTrait, Set};

    let now = chrono::Utc::now();

    let new_service = monitored_service::ActiveModel {
        name: Set(name.to_string()),
        access_credential_id: Set(access_credential_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    new_service.insert(db).await.unwrap()
}

/// Create a test managed service
pub async fn create_test_managed_service(
    db: &DatabaseConnection,
    name: &str,
    url: &str,
    access_token: Option<&str>,
) -> edgarr::models::managed_service::Model {
    use edgarr::models::managed_service;
    use sea_orm::{ActiveModelTrait, Set};

    let now = chrono::Utc::now();

    let new_service = managed_service::ActiveModel {
        name: Set(name.to_string()),
        url: Set(url.to_string()),
        access_token: Set(access_token.map(String::from)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    new_service.insert(db).await.unwrap()
}

/// Create a test transform rule with no links yet
pub async fn create_test_rule(
    db: &DatabaseConnection,
    account_id: i64,
    name: &str,
) -> edgarr::models::transform_rule::Model {
    use edgarr::models::transform_rule;
    use sea_orm::{ActiveModelTrait, Set};

    let now = chrono::Utc::now();

    let new_rule = transform_rule::ActiveModel {
        account_id: Set(account_id),
        name: Set(name.to_string()),
        pattern: Set(None),
        headers_json: Set("[]".to_string()),
        rule_ids_json: Set("[]".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    new_rule.insert(db).await.unwrap()
}

/// Link a service into a rule at the given position
pub async fn link_test_service(
    db: &DatabaseConnection,
    rule_id: i64,
    kind: edgarr::models::rule_service_link::ServiceKind,
    service_id: i64,
    position: i32,
) -> edgarr::models::rule_service_link::Model {
    use edgarr::models::rule_service_link;
    use sea_orm::{ActiveModelTrait, Set};

    let new_link = rule_service_link::ActiveModel {
        rule_id: Set(rule_id),
        service_kind: Set(kind),
        service_id: Set(service_id),
        position: Set(position),
        ..Default::default()
    };

    new_link.insert(db).await.unwrap()
}

// ============================================================================
// Mock gateway
// ============================================================================

/// A recorded call against the mock gateway
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    VerifyToken {
        token: String,
    },
    ListTunnels {
        account_tag: String,
    },
    TunnelDetails {
        account_tag: String,
        tunnel_id: String,
    },
    DeployRule {
        zone_id: String,
        rule_name: String,
        expression: String,
        headers: Vec<HeaderPair>,
        existing_rule_id: Option<String>,
    },
}

/// Scripted stand-in for the Cloudflare API.
///
/// Every call is recorded. Unknown tokens verify as invalid, unknown
/// accounts list no tunnels and unknown tunnels have no details, so tests
/// only script the responses they care about.
pub struct MockGateway {
    pub calls: Mutex<Vec<GatewayCall>>,
    verify_outcomes: Mutex<HashMap<String, std::result::Result<bool, String>>>,
    tunnel_lists: Mutex<HashMap<String, std::result::Result<Vec<RemoteTunnel>, String>>>,
    tunnel_details: Mutex<HashMap<(String, String), std::result::Result<Option<TunnelDetails>, String>>>,
    rule_id: Mutex<String>,
    deploy_error: Mutex<Option<String>>,
}

impl Default for MockGateway {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            verify_outcomes: Mutex::new(HashMap::new()),
            tunnel_lists: Mutex::new(HashMap::new()),
            tunnel_details: Mutex::new(HashMap::new()),
            rule_id: Mutex::new("remote-rule-1".to_string()),
            deploy_error: Mutex::new(None),
        }
    }
}

impl MockGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script_verify(&self, token: &str, valid: bool) {
        self.verify_outcomes
            .lock()
            .unwrap()
            .insert(token.to_string(), Ok(valid));
    }

    pub fn script_verify_error(&self, token: &str, message: &str) {
        self.verify_outcomes
            .lock()
            .unwrap()
            .insert(token.to_string(), Err(message.to_string()));
    }

    pub fn script_tunnels(&self, account_tag: &str, tunnels: &[(&str, &str)]) {
        let list = tunnels
            .iter()
            .map(|(id, name)| RemoteTunnel {
                id: id.to_string(),
                name: name.to_string(),
            })
            .collect();
        self.tunnel_lists
            .lock()
            .unwrap()
            .insert(account_tag.to_string(), Ok(list));
    }

    pub fn script_tunnels_error(&self, account_tag: &str, message: &str) {
        self.tunnel_lists
            .lock()
            .unwrap()
            .insert(account_tag.to_string(), Err(message.to_string()));
    }

    pub fn script_details(&self, account_tag: &str, tunnel_id: &str, details: TunnelDetails) {
        self.tunnel_details.lock().unwrap().insert(
            (account_tag.to_string(), tunnel_id.to_string()),
            Ok(Some(details)),
        );
    }

    pub fn script_details_absent(&self, account_tag: &str, tunnel_id: &str) {
        self.tunnel_details
            .lock()
            .unwrap()
            .insert((account_tag.to_string(), tunnel_id.to_string()), Ok(None));
    }

    pub fn script_details_error(&self, account_tag: &str, tunnel_id: &str, message: &str) {
        self.tunnel_details.lock().unwrap().insert(
            (account_tag.to_string(), tunnel_id.to_string()),
            Err(message.to_string()),
        );
    }

    pub fn script_rule_id(&self, id: &str) {
        *self.rule_id.lock().unwrap() = id.to_string();
    }

    pub fn script_deploy_error(&self, message: &str) {
        *self.deploy_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn deploy_calls(&self) -> Vec<GatewayCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, GatewayCall::DeployRule { .. }))
            .collect()
    }
}

/// Build a detail response for scripting
pub fn details(name: &str, status: &str, client_version: Option<&str>) -> TunnelDetails {
    TunnelDetails {
        name: name.to_string(),
        status: status.to_string(),
        conns_active_at: Some(Utc::now()),
        client_version: client_version.map(String::from),
    }
}

#[async_trait]
impl EdgeGateway for MockGateway {
    async fn verify_token(&self, token: &str) -> Result<bool> {
        self.calls.lock().unwrap().push(GatewayCall::VerifyToken {
            token: token.to_string(),
        });
        match self.verify_outcomes.lock().unwrap().get(token) {
            Some(Ok(valid)) => Ok(*valid),
            Some(Err(message)) => Err(AppError::Internal(message.clone())),
            None => Ok(false),
        }
    }

    async fn list_tunnels(&self, _token: &str, account_tag: &str) -> Result<Vec<RemoteTunnel>> {
        self.calls.lock().unwrap().push(GatewayCall::ListTunnels {
            account_tag: account_tag.to_string(),
        });
        match self.tunnel_lists.lock().unwrap().get(account_tag) {
            Some(Ok(list)) => Ok(list.clone()),
            Some(Err(message)) => Err(AppError::Internal(message.clone())),
            None => Ok(Vec::new()),
        }
    }

    async fn tunnel_details(
        &self,
        _token: &str,
        account_tag: &str,
        tunnel_id: &str,
    ) -> Result<Option<TunnelDetails>> {
        self.calls.lock().unwrap().push(GatewayCall::TunnelDetails {
            account_tag: account_tag.to_string(),
            tunnel_id: tunnel_id.to_string(),
        });
        match self
            .tunnel_details
            .lock()
            .unwrap()
            .get(&(account_tag.to_string(), tunnel_id.to_string()))
        {
            Some(Ok(details)) => Ok(details.clone()),
            Some(Err(message)) => Err(AppError::Internal(message.clone())),
            None => Ok(None),
        }
    }

    async fn create_or_update_transform_rule(
        &self,
        _token: &str,
        zone_id: &str,
        rule_name: &str,
        expression: &str,
        headers: &[HeaderPair],
        existing_rule_id: Option<&str>,
    ) -> Result<String> {
        self.calls.lock().unwrap().push(GatewayCall::DeployRule {
            zone_id: zone_id.to_string(),
            rule_name: rule_name.to_string(),
            expression: expression.to_string(),
            headers: headers.to_vec(),
            existing_rule_id: existing_rule_id.map(String::from),
        });

        if let Some(message) = self.deploy_error.lock().unwrap().as_ref() {
            return Err(AppError::BadRequest(message.clone()));
        }
        Ok(self.rule_id.lock().unwrap().clone())
    }
}
