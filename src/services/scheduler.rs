//! Periodic task scheduler
//!
//! A simple scheduler for running background tasks at regular intervals.
//! Add new tasks by implementing the `PeriodicTask` trait.

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;

use crate::config::CONFIG;
use crate::services::tunnel_sync;
use crate::state::SharedGateway;

/// Trait for periodic background tasks
#[async_trait]
pub trait PeriodicTask: Send + Sync {
    /// Task name for logging
    fn name(&self) -> &'static str;

    /// How often to run (e.g., every 5 minutes)
    fn interval(&self) -> Duration;

    /// Execute the task
    async fn run(&self, db: &DatabaseConnection) -> anyhow::Result<()>;
}

/// Start all periodic tasks
pub fn start_scheduler(db: Arc<DatabaseConnection>, gateway: SharedGateway) {
    let tasks: Vec<Box<dyn PeriodicTask>> = vec![Box::new(TunnelSyncTask { gateway })];

    for task in tasks {
        let db = db.clone();
        tokio::spawn(async move {
            run_task(task, db).await;
        });
    }

    tracing::info!("Periodic task scheduler started");
}

/// Run a single task on its interval
async fn run_task(task: Box<dyn PeriodicTask>, db: Arc<DatabaseConnection>) {
    let mut ticker = interval(task.interval());

    // Skip the first immediate tick
    ticker.tick().await;

    loop {
        ticker.tick().await;

        tracing::debug!(task = task.name(), "Running periodic task");

        match task.run(&db).await {
            Ok(()) => {
                tracing::debug!(task = task.name(), "Periodic task completed");
            }
            Err(e) => {
                tracing::error!(task = task.name(), error = %e, "Periodic task failed");
            }
        }
    }
}

// ============================================================================
// Tunnel Sync Task
// ============================================================================

/// Revalidates account credentials and reconciles tunnel state
pub struct TunnelSyncTask {
    pub gateway: SharedGateway,
}

#[async_trait]
impl PeriodicTask for TunnelSyncTask {
    fn name(&self) -> &'static str {
        "tunnel_sync"
    }

    fn interval(&self) -> Duration {
        Duration::from_secs(CONFIG.sync.interval_secs)
    }

    async fn run(&self, db: &DatabaseConnection) -> anyhow::Result<()> {
        let summary = tunnel_sync::sync_all_accounts(db, self.gateway.as_ref()).await?;

        if summary.accounts_failed > 0 {
            tracing::warn!(
                accounts_failed = summary.accounts_failed,
                "Some accounts failed to sync"
            );
        }

        Ok(())
    }
}
