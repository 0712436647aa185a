pub mod api;
pub mod config;
pub mod entities;
pub mod fertility;
pub mod geo;
pub mod metrics;
pub mod migrator;
pub mod monitor;
pub mod state;
pub mod store;
pub mod telemetry;

pub use sea_orm;
