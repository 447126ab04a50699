pub mod gateway;
pub mod rules;
pub mod scheduler;
pub mod tunnel_sync;

pub use gateway::*;
pub use rules::*;
pub use scheduler::*;
pub use tunnel_sync::*;
