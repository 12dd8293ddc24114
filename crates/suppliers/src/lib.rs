//! Supplier registry domain module.
//!
//! Supplier identity, contact details, payment method and the active flag,
//! implemented purely as deterministic domain logic (no IO, no storage).

pub mod supplier;

pub use supplier::{NewSupplier, PaymentMethod, Supplier, SupplierChanges};
