//! Inventory ledger domain module.
//!
//! One ledger row per (item, sub area) pair holding a non-negative quantity,
//! implemented purely as deterministic domain logic (no IO, no storage).

pub mod ledger;

pub use ledger::{InventoryRecord, Quantity};
