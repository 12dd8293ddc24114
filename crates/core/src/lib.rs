//! `stockroom-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the error taxonomy, typed identifiers and shared field validation.

pub mod entity;
pub mod error;
pub mod id;
pub mod validate;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{
    AreaId, CategoryId, InventoryId, ItemId, LocationId, SubAreaId, SubLocationId, SupplierId,
};
pub use value_object::ValueObject;
