use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account status, recomputed on every sync cycle and never set by the user.
///
/// `Active`/`Inactive` reflect credential validity; `Healthy`/`Degraded`/`Down`
/// reflect the tunnel fleet of an account whose credentials checked out.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum AccountStatus {
    #[sea_orm(string_value = "active")]
    #[serde(rename = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    #[serde(rename = "inactive")]
    Inactive,
    #[sea_orm(string_value = "healthy")]
    #[serde(rename = "healthy")]
    Healthy,
    #[sea_orm(string_value = "degraded")]
    #[serde(rename = "degraded")]
    Degraded,
    #[sea_orm(string_value = "down")]
    #[serde(rename = "down")]
    Down,
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountStatus::Active => write!(f, "active"),
            AccountStatus::Inactive => write!(f, "inactive"),
            AccountStatus::Healthy => write!(f, "healthy"),
            AccountStatus::Degraded => write!(f, "degraded"),
            AccountStatus::Down => write!(f, "down"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    /// Remote Cloudflare account identifier
    pub account_tag: String,
    /// CF API token; never serialised in API responses
    #[serde(skip_serializing)]
    pub api_token: Option<String>,
    pub status: AccountStatus,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::domain::Entity")]
    Domains,
    #[sea_orm(has_many = "super::tunnel::Entity")]
    Tunnels,
    #[sea_orm(has_many = "super::transform_rule::Entity")]
    TransformRules,
}

impl Related<super::domain::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Domains.def()
    }
}

impl Related<super::tunnel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tunnels.def()
    }
}

impl Related<super::transform_rule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransformRules.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
