use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "access_credentials")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Credential name; doubles as the public hostname the credential protects
    pub name: String,
    pub client_id: String,
    /// Service token secret; never serialised in API responses
    #[serde(skip_serializing)]
    pub client_secret: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::monitored_service::Entity")]
    MonitoredServices,
}

impl Related<super::monitored_service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MonitoredServices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
