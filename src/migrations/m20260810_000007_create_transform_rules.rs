//! Migration: Create transform_rules table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TransformRules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TransformRules::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TransformRules::AccountId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TransformRules::Name).text().not_null())
                    .col(ColumnDef::new(TransformRules::Pattern).text().null())
                    .col(
                        ColumnDef::new(TransformRules::HeadersJson)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(TransformRules::RuleIdsJson)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(TransformRules::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TransformRules::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transform_rules_account")
                            .from(TransformRules::Table, TransformRules::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transform_rules_account")
                    .table(TransformRules::Table)
                    .col(TransformRules::AccountId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(TransformRules::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
#[iden = "transform_rules"]
enum TransformRules {
    Table,
    Id,
    #[iden = "account_id"]
    AccountId,
    Name,
    Pattern,
    #[iden = "headers_json"]
    HeadersJson,
    #[iden = "rule_ids_json"]
    RuleIdsJson,
    #[iden = "created_at"]
    CreatedAt,
    #[iden = "updated_at"]
    UpdatedAt,
}

#[derive(Iden)]
#[iden = "accounts"]
enum Accounts {
    Table,
    Id,
}
