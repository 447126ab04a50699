pub mod endpoints;
pub mod application;
pub mod migrations;
pub mod models;
pub mod services;

#[cfg(test)]
pub mod test_helpers;

// Re-export from application for convenience
pub use application::bootstrapper;
pub use application::config;
pub use application::error;
pub use application::database as db;
pub use application::state;
