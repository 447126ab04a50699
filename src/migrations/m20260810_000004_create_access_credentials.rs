//! Migration: Create access_credentials table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AccessCredentials::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AccessCredentials::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AccessCredentials::Name).text().not_null())
                    .col(
                        ColumnDef::new(AccessCredentials::ClientId)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccessCredentials::ClientSecret)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccessCredentials::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccessCredentials::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_access_credentials_name")
                    .table(AccessCredentials::Table)
                    .col(AccessCredentials::Name)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(AccessCredentials::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
#[iden = "access_credentials"]
enum AccessCredentials {
    Table,
    Id,
    Name,
    #[iden = "client_id"]
    ClientId,
    #[iden = "client_secret"]
    ClientSecret,
    #[iden = "created_at"]
    CreatedAt,
    #[iden = "updated_at"]
    UpdatedAt,
}
