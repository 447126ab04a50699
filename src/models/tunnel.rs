use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tunnels")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub account_id: i64,
    /// Remote tunnel UUID, unique within the owning account
    pub tunnel_id: String,
    pub name: String,
    /// Remote status string: healthy | degraded | down | inactive
    pub status: String,
    /// Derived: true iff status == "healthy"
    pub is_active: bool,
    /// When the tunnel last had active connections (from the detail endpoint)
    pub conns_active_at: Option<DateTimeUtc>,
    /// cloudflared version reported by the first connection
    pub client_version: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id"
    )]
    Account,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
