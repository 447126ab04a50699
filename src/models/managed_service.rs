use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A service managed through its own HTTP API (Sonarr/Radarr-style)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "managed_services")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    /// Base URL of the service, e.g. "https://sonarr.example.com"
    pub url: String,
    /// Bearer token for the service API; never serialised in API responses
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
