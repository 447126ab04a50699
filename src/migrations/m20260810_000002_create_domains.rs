//! Migration: Create domains table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Domains::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Domains::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Domains::AccountId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Domains::Name).text().not_null())
                    .col(ColumnDef::new(Domains::ZoneId).text().not_null())
                    .col(
                        ColumnDef::new(Domains::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Domains::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_domains_account")
                            .from(Domains::Table, Domains::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_domains_account")
                    .table(Domains::Table)
                    .col(Domains::AccountId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Domains::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
#[iden = "domains"]
enum Domains {
    Table,
    Id,
    #[iden = "account_id"]
    AccountId,
    Name,
    #[iden = "zone_id"]
    ZoneId,
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
