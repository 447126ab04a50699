use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Which kind of service a rule link points at
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ServiceKind {
    #[sea_orm(string_value = "monitored")]
    #[serde(rename = "monitored")]
    Monitored,
    #[sea_orm(string_value = "managed")]
    #[serde(rename = "managed")]
    Managed,
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceKind::Monitored => write!(f, "monitored"),
            ServiceKind::Managed => write!(f, "managed"),
        }
    }
}

/// Join row linking a transform rule to one service, ordered by `position`
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rule_service_links")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub rule_id: i64,
    pub service_kind: ServiceKind,
    /// Id in `monitored_services` or `managed_services`, per `service_kind`
    pub service_id: i64,
    /// Link iteration order within the rule (0-based)
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::transform_rule::Entity",
        from = "Column::RuleId",
        to = "super::transform_rule::Column::Id"
    )]
    TransformRule,
}

impl Related<super::transform_rule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransformRule.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
