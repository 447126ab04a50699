pub mod access_credential;
pub mod account;
pub mod domain;
pub mod managed_service;
pub mod monitored_service;
pub mod rule_service_link;
pub mod transform_rule;
pub mod tunnel;

#[allow(unused_imports)]
pub mod prelude {
    pub use super::access_credential::{self, Entity as AccessCredential};
    pub use super::account::{self, Entity as Account};
    pub use super::domain::{self, Entity as Domain};
    pub use super::managed_service::{self, Entity as ManagedService};
    pub use super::monitored_service::{self, Entity as MonitoredService};
    pub use super::rule_service_link::{self, Entity as RuleServiceLink};
    pub use super::transform_rule::{self, Entity as TransformRule};
    pub use super::tunnel::{self, Entity as Tunnel};
}
