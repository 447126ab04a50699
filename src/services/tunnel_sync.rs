//! Account credential validation and tunnel reconciliation
//!
//! One reconciliation pass walks every account in bounded chunks, checks its
//! API token, mirrors the remote tunnel list into the local tables, refreshes
//! per-tunnel state, and rolls the fleet health up into the account status.
//! A failing account never stops the batch.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Serialize;

use crate::error::Result;
use crate::models::account::AccountStatus;
use crate::models::prelude::*;
use crate::models::{account, tunnel};
use crate::services::gateway::EdgeGateway;

/// Accounts are pulled in chunks of this size to bound memory on large fleets
pub const SYNC_CHUNK_SIZE: u64 = 10;

/// Per-account outcome of one reconciliation pass
#[derive(Debug, Default)]
pub struct AccountSyncReport {
    pub tunnels_listed: u64,
    pub tunnels_refreshed: u64,
    pub tunnels_failed: u64,
}

/// Aggregate outcome of one full reconciliation pass
#[derive(Debug, Default, Serialize, utoipa::ToSchema)]
pub struct SyncSummary {
    pub accounts_synced: u64,
    pub accounts_failed: u64,
    pub tunnels_listed: u64,
    pub tunnels_refreshed: u64,
    pub tunnels_failed: u64,
}

// ============================================================================
// Credential validation
// ============================================================================

/// Check an account's API token against the remote side and persist the result.
///
/// An absent or empty token short-circuits to `Inactive` without a remote
/// call. A verification failure is logged and also maps to `Inactive` rather
/// than propagating. The status is saved every cycle, even when unchanged.
pub async fn validate_credentials(
    db: &DatabaseConnection,
    gateway: &dyn EdgeGateway,
    account: account::Model,
) -> Result<account::Model> {
    let status = match account.api_token.as_deref() {
        None | Some("") => AccountStatus::Inactive,
        Some(token) => match gateway.verify_token(token).await {
            Ok(true) => AccountStatus::Active,
            Ok(false) => AccountStatus::Inactive,
            Err(e) => {
                tracing::warn!(
                    account = %account.name,
                    error = %e,
                    "Token verification failed, marking account inactive"
                );
                AccountStatus::Inactive
            }
        },
    };

    let mut active: account::ActiveModel = account.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now());
    Ok(active.update(db).await?)
}

// ============================================================================
// Tunnel reconciliation
// ============================================================================

/// Reconcile one account's tunnels against the remote side.
///
/// The list phase only upserts names; status fields are authoritative from
/// the detail phase alone. The detail phase covers every locally known tunnel
/// of the account, including ones the list no longer mentions, and a single
/// tunnel's failure leaves that row untouched without aborting the rest.
pub async fn sync_account_tunnels(
    db: &DatabaseConnection,
    gateway: &dyn EdgeGateway,
    account: &account::Model,
) -> Result<AccountSyncReport> {
    let token = account.api_token.clone().unwrap_or_default();
    let mut report = AccountSyncReport::default();

    let remote = gateway.list_tunnels(&token, &account.account_tag).await?;
    report.tunnels_listed = remote.len() as u64;

    for entry in remote {
        let existing = Tunnel::find()
            .filter(tunnel::Column::AccountId.eq(account.id))
            .filter(tunnel::Column::TunnelId.eq(entry.id.clone()))
            .one(db)
            .await?;

        match existing {
            Some(row) => {
                let mut active: tunnel::ActiveModel = row.into();
                active.name = Set(entry.name);
                active.updated_at = Set(Utc::now());
                active.update(db).await?;
            }
            None => {
                let now = Utc::now();
                tunnel::ActiveModel {
                    account_id: Set(account.id),
                    tunnel_id: Set(entry.id),
                    name: Set(entry.name),
                    status: Set("inactive".to_string()),
                    is_active: Set(false),
                    conns_active_at: Set(None),
                    client_version: Set(None),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(db)
                .await?;
            }
        }
    }

    let local = Tunnel::find()
        .filter(tunnel::Column::AccountId.eq(account.id))
        .order_by_asc(tunnel::Column::Id)
        .all(db)
        .await?;

    for row in local {
        match gateway
            .tunnel_details(&token, &account.account_tag, &row.tunnel_id)
            .await
        {
            Ok(Some(details)) => {
                let is_active = details.status == "healthy";
                let mut active: tunnel::ActiveModel = row.into();
                active.name = Set(details.name);
                active.status = Set(details.status);
                active.is_active = Set(is_active);
                active.conns_active_at = Set(details.conns_active_at);
                active.client_version = Set(details.client_version);
                active.updated_at = Set(Utc::now());
                active.update(db).await?;
                report.tunnels_refreshed += 1;
            }
            Ok(None) => {
                report.tunnels_failed += 1;
                tracing::debug!(
                    account = %account.name,
                    tunnel = %row.tunnel_id,
                    "Tunnel unknown to the remote side, keeping last known state"
                );
            }
            Err(e) => {
                report.tunnels_failed += 1;
                tracing::warn!(
                    account = %account.name,
                    tunnel = %row.tunnel_id,
                    error = %e,
                    "Tunnel detail fetch failed, keeping last known state"
                );
            }
        }
    }

    Ok(report)
}

/// Fleet health from tunnel activity; `None` when there are no tunnels to judge
fn status_from_tunnels(tunnels: &[tunnel::Model]) -> Option<AccountStatus> {
    if tunnels.is_empty() {
        return None;
    }
    let active = tunnels.iter().filter(|t| t.is_active).count();
    Some(if active == tunnels.len() {
        AccountStatus::Healthy
    } else if active > 0 {
        AccountStatus::Degraded
    } else {
        AccountStatus::Down
    })
}

/// Recompute an account's status from its tunnel fleet after a detail pass
async fn rollup_account_health(
    db: &DatabaseConnection,
    account: account::Model,
) -> Result<account::Model> {
    let tunnels = Tunnel::find()
        .filter(tunnel::Column::AccountId.eq(account.id))
        .all(db)
        .await?;

    // No fleet to judge means the credential check's verdict stands
    let status = status_from_tunnels(&tunnels).unwrap_or(account.status);

    let mut active: account::ActiveModel = account.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now());
    Ok(active.update(db).await?)
}

// ============================================================================
// Batch orchestration
// ============================================================================

/// Validate one account and, when its token checks out, reconcile its tunnels
async fn sync_one_account(
    db: &DatabaseConnection,
    gateway: &dyn EdgeGateway,
    account: account::Model,
) -> Result<AccountSyncReport> {
    let account = validate_credentials(db, gateway, account).await?;
    if account.status != AccountStatus::Active {
        tracing::debug!(
            account = %account.name,
            "Skipping tunnel sync, credentials did not validate"
        );
        return Ok(AccountSyncReport::default());
    }

    let report = sync_account_tunnels(db, gateway, &account).await?;
    rollup_account_health(db, account).await?;
    Ok(report)
}

/// Run credential validation and tunnel reconciliation across every account.
///
/// Accounts are processed in id order, pulled in bounded chunks. A failing
/// account is logged with its identity and counted; it never stops the batch.
pub async fn sync_all_accounts(
    db: &DatabaseConnection,
    gateway: &dyn EdgeGateway,
) -> Result<SyncSummary> {
    let mut summary = SyncSummary::default();

    let mut pages = Account::find()
        .order_by_asc(account::Column::Id)
        .paginate(db, SYNC_CHUNK_SIZE);

    while let Some(accounts) = pages.fetch_and_next().await? {
        for account in accounts {
            let name = account.name.clone();
            match sync_one_account(db, gateway, account).await {
                Ok(report) => {
                    summary.accounts_synced += 1;
                    summary.tunnels_listed += report.tunnels_listed;
                    summary.tunnels_refreshed += report.tunnels_refreshed;
                    summary.tunnels_failed += report.tunnels_failed;
                }
                Err(e) => {
                    summary.accounts_failed += 1;
                    tracing::error!(account = %name, error = %e, "Account sync failed");
                }
            }
        }
    }

    tracing::info!(
        accounts_synced = summary.accounts_synced,
        accounts_failed = summary.accounts_failed,
        tunnels_listed = summary.tunnels_listed,
        tunnels_refreshed = summary.tunnels_refreshed,
        "Tunnel sync completed"
    );

    Ok(summary)
}

// ============================================================================
// Tests
// ============================================================================
