use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A service watched by the uptime monitor; protected behind Cloudflare Access
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "monitored_services")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    /// Access service token used to reach the service from the edge
    pub access_credential_id: Option<i64>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::access_credential::Entity",
        from = "Column::AccessCredentialId",
        to = "super::access_credential::Column::Id"
    )]
    AccessCredential,
}

impl Related<super::access_credential::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccessCredential.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
