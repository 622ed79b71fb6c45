//! CLI command implementations.

mod ask;
mod config;
mod delete;
mod doctor;
mod serve;
mod stats;

pub use ask::run_ask;
pub use config::run_config;
pub use delete::run_delete;
pub use doctor::run_doctor;
pub use serve::run_serve;
pub use stats::run_stats;
