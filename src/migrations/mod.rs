pub use sea_orm_migration::prelude::*;

mod m20260810_000001_create_accounts;
mod m20260810_000002_create_domains;
mod m20260810_000003_create_tunnels;
mod m20260810_000004_create_access_credentials;
mod m20260810_000005_create_monitored_services;
mod m20260810_000006_create_managed_services;
mod m20260810_000007_create_transform_rules;
mod m20260810_000008_create_rule_service_links;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260810_000001_create_accounts::Migration),
            Box::new(m20260810_000002_create_domains::Migration),
            Box::new(m20260810_000003_create_tunnels::Migration),
            Box::new(m20260810_000004_create_access_credentials::Migration),
            Box::new(m20260810_000005_create_monitored_services::Migration),
            Box::new(m20260810_000006_create_managed_services::Migration),
            Box::new(m20260810_000007_create_transform_rules::Migration),
            Box::new(m20260810_000008_create_rule_service_links::Migration),
        ]
    }
}
