//! Migration: Create managed_services table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ManagedServices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ManagedServices::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ManagedServices::Name).text().not_null())
                    .col(ColumnDef::new(ManagedServices::Url).text().not_null())
                    .col(ColumnDef::new(ManagedServices::AccessToken).text().null())
                    .col(
                        ColumnDef::new(ManagedServices::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ManagedServices::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(ManagedServices::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
#[iden = "managed_services"]
enum ManagedServices {
    Table,
    Id,
    Name,
    Url,
    #[iden = "access_token"]
    AccessToken,
    #[iden = "created_at"]
    CreatedAt,
    #[iden = "updated_at"]
    UpdatedAt,
}
