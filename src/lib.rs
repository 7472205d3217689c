pub mod config;
pub mod monitor;
pub mod observability;
pub mod registry;
pub mod schema;
