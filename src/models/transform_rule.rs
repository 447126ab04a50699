use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transform_rules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub account_id: i64,
    pub name: String,
    /// Compiled host-match expression; regenerated on every deploy
    pub pattern: Option<String>,
    /// JSON array of `{name, value}` header pairs, in link order
    pub headers_json: String,
    /// JSON array of remote rule ids (at most one today, kept as a list)
    pub rule_ids_json: String,
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
    #[sea_orm(has_many = "super::rule_service_link::Entity")]
    RuleServiceLinks,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::rule_service_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RuleServiceLinks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
