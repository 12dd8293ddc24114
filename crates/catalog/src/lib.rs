//! Catalog domain module: item categories, items and monetary values.
//!
//! This crate contains business rules for the catalog, implemented purely as
//! deterministic domain logic (no IO, no storage).

pub mod category;
pub mod item;
pub mod money;

pub use category::Category;
pub use item::{Item, ItemChanges, NewItem};
pub use money::Money;
