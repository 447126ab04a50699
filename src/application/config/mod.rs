pub mod cloudflare;
pub mod database;
pub mod server;
pub mod sync;

use once_cell::sync::Lazy;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server: server::ServerConfig,
    pub database: database::DatabaseConfig,
    pub cloudflare: cloudflare::CloudflareConfig,
    pub sync: sync::SyncConfig,

    // Build info
    pub version: String,

    // Logging
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server: server::ServerConfig::from_env(),
            database: database::DatabaseConfig::from_env(),
            cloudflare: cloudflare::CloudflareConfig::from_env(),
            sync: sync::SyncConfig::from_env(),

            // Build info
            version: env!("CARGO_PKG_VERSION").to_string(),

            // Logging
            log_level: env::var("EDGARR_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
