//! Migration: Create rule_service_links table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RuleServiceLinks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RuleServiceLinks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RuleServiceLinks::RuleId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RuleServiceLinks::ServiceKind)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RuleServiceLinks::ServiceId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RuleServiceLinks::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rule_service_links_rule")
                            .from(RuleServiceLinks::Table, RuleServiceLinks::RuleId)
                            .to(TransformRules::Table, TransformRules::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rule_service_links_rule")
                    .table(RuleServiceLinks::Table)
                    .col(RuleServiceLinks::RuleId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(RuleServiceLinks::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
#[iden = "rule_service_links"]
enum RuleServiceLinks {
    Table,
    Id,
    #[iden = "rule_id"]
    RuleId,
    #[iden = "service_kind"]
    ServiceKind,
    #[iden = "service_id"]
    ServiceId,
    Position,
}

#[derive(Iden)]
#[iden = "transform_rules"]
enum TransformRules {
    Table,
    Id,
}
