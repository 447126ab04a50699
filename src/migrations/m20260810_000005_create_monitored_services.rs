//! Migration: Create monitored_services table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MonitoredServices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MonitoredServices::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MonitoredServices::Name).text().not_null())
                    .col(
                        ColumnDef::new(MonitoredServices::AccessCredentialId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(MonitoredServices::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MonitoredServices::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_monitored_services_access_credential")
                            .from(
                                MonitoredServices::Table,
                                MonitoredServices::AccessCredentialId,
                            )
                            .to(AccessCredentials::Table, AccessCredentials::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(MonitoredServices::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
#[iden = "monitored_services"]
enum MonitoredServices {
    Table,
    Id,
    Name,
    #[iden = "access_credential_id"]
    AccessCredentialId,
    #[iden = "created_at"]
    CreatedAt,
    #[iden = "updated_at"]
    UpdatedAt,
}

#[derive(Iden)]
#[iden = "access_credentials"]
enum AccessCredentials {
    Table,
    Id,
}
