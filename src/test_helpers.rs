//! Test helpers and utilities for unit and integration testing.
//!
//! This module provides common utilities for setting up test environments,
//! creating mock data, and testing database operations.

use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

/// Create an in-memory SQLite database for testing
pub async fn create_test_db() -> DatabaseConnection {
    // Use simple in-memory SQLite - each connection gets its own database
    let db_url = "sqlite::memory:";

    let db = Database::connect(db_url)
        .await
        .expect("Failed to create test database");

    // Run migrations
    db.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        SCHEMA_SQL.to_string(),
    ))
    .await
    .expect("Failed to run test migrations");

    db
}

/// Create a test account, status starts Inactive
pub async fn create_test_account(
    db: &DatabaseConnection,
    name: &str,
    account_tag: &str,
    api_token: Option<&str>,
) -> crate::models::account::Model {
    use crate::models::account::{self, AccountStatus};
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
) -> crate::models::domain::Model {
    use crate::models::domain;
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
) -> crate::models::tunnel::Model {
    use crate::models::tunnel;
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
) -> crate::models::access_credential::Model {
    use crate::models::access_credential;
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
) -> crate::models::monitored_service::Model {
    use crate::models::monitored_service;
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
) -> crate::models::managed_service::Model {
    use crate::models::managed_service;
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
) -> crate::models::transform_rule::Model {
    use crate::models::transform_rule;
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
    kind: crate::models::rule_service_link::ServiceKind,
    service_id: i64,
    position: i32,
) -> crate::models::rule_service_link::Model {
    use crate::models::rule_service_link;
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

const SCHEMA_SQL: &str = r#"
-- Accounts table
CREATE TABLE IF NOT EXISTS accounts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    account_tag TEXT NOT NULL,
    api_token TEXT,
    status TEXT NOT NULL DEFAULT 'inactive',
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_accounts_account_tag ON accounts(account_tag);

-- Domains table
CREATE TABLE IF NOT EXISTS domains (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    account_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    zone_id TEXT NOT NULL,
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (account_id) REFERENCES accounts(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_domains_account ON domains(account_id);

-- Tunnels table
CREATE TABLE IF NOT EXISTS tunnels (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    account_id INTEGER NOT NULL,
    tunnel_id TEXT NOT NULL,
    name TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'inactive',
    is_active BOOLEAN NOT NULL DEFAULT 0,
    conns_active_at DATETIME,
    client_version TEXT,
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (account_id) REFERENCES accounts(id) ON DELETE CASCADE
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_tunnels_account_tunnel ON tunnels(account_id, tunnel_id);

-- Access credentials table
CREATE TABLE IF NOT EXISTS access_credentials (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    client_id TEXT NOT NULL,
    client_secret TEXT NOT NULL,
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_access_credentials_name ON access_credentials(name);

-- Monitored services table
CREATE TABLE IF NOT EXISTS monitored_services (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    access_credential_id INTEGER,
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (access_credential_id) REFERENCES access_credentials(id) ON DELETE SET NULL
);

-- Managed services table
CREATE TABLE IF NOT EXISTS managed_services (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    url TEXT NOT NULL,
    access_token TEXT,
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
);

-- Transform rules table
CREATE TABLE IF NOT EXISTS transform_rules (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    account_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    pattern TEXT,
    headers_json TEXT NOT NULL DEFAULT '[]',
    rule_ids_json TEXT NOT NULL DEFAULT '[]',
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (account_id) REFERENCES accounts(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_transform_rules_account ON transform_rules(account_id);

-- Rule service links table
CREATE TABLE IF NOT EXISTS rule_service_links (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    rule_id INTEGER NOT NULL,
    service_kind TEXT NOT NULL,
    service_id INTEGER NOT NULL,
    position INTEGER NOT NULL DEFAULT 0,
    FOREIGN KEY (rule_id) REFERENCES transform_rules(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_rule_service_links_rule ON rule_service_links(rule_id);
"#;
