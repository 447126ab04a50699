use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::services::gateway::EdgeGateway;

/// Database connection type alias
pub type DbConn = DatabaseConnection;

/// Shared edge gateway handle
pub type SharedGateway = Arc<dyn EdgeGateway>;

/// Application state containing all shared resources
#[derive(Clone)]
pub struct AppState {
    pub db: DbConn,
    pub gateway: SharedGateway,
}

impl AppState {
    pub fn new(db: DbConn, gateway: SharedGateway) -> Self {
        Self { db, gateway }
    }
}
