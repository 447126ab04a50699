//! Migration: Create tunnels table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tunnels::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tunnels::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Tunnels::AccountId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Tunnels::TunnelId).text().not_null())
                    .col(ColumnDef::new(Tunnels::Name).text().not_null())
                    .col(
                        ColumnDef::new(Tunnels::Status)
                            .string()
                            .not_null()
                            .default("inactive"),
                    )
                    .col(
                        ColumnDef::new(Tunnels::IsActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Tunnels::ConnsActiveAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Tunnels::ClientVersion).text().null())
                    .col(
                        ColumnDef::new(Tunnels::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Tunnels::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tunnels_account")
                            .from(Tunnels::Table, Tunnels::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tunnels_account_tunnel")
                    .table(Tunnels::Table)
                    .col(Tunnels::AccountId)
                    .col(Tunnels::TunnelId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tunnels::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
#[iden = "tunnels"]
enum Tunnels {
    Table,
    Id,
    #[iden = "account_id"]
    AccountId,
    #[iden = "tunnel_id"]
    TunnelId,
    Name,
    Status,
    #[iden = "is_active"]
    IsActive,
    #[iden = "conns_active_at"]
    ConnsActiveAt,
    #[iden = "client_version"]
    ClientVersion,
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
