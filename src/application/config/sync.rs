use std::env;

/// Configuration for the periodic tunnel sync job
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Seconds between tunnel sync runs (env: `EDGARR_SYNC_INTERVAL_SECS`)
    pub interval_secs: u64,
}

impl SyncConfig {
    pub fn from_env() -> Self {
        Self {
            interval_secs: env::var("EDGARR_SYNC_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
        }
    }
}
