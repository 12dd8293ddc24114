//! Infrastructure layer: transactional store, component services, admin
//! views and configuration.

pub mod catalog;
pub mod config;
pub mod error;
pub mod ledger;
pub mod locations;
pub mod store;
pub mod suppliers;
pub mod views;
pub mod warehouse;


pub use catalog::{Categories, Items};
pub use config::WarehouseConfig;
pub use error::{WarehouseError, WarehouseResult};
pub use ledger::Ledger;
pub use locations::Locations;
pub use store::{InMemoryStore, Store, Tables};
pub use suppliers::Suppliers;
pub use warehouse::Warehouse;
