//! Infrastructure layer: storage adapters, configuration, demo data.

pub mod config;
pub mod seed;
pub mod store;


pub use config::{AppConfig, ConfigError, DatabaseConfig};
pub use store::{InventoryStore, Snapshot, StoreError, StoreResult};
