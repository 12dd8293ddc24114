//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**; they are defined entirely by their
//! attribute values. `Money`, `Quantity` and `LocationPath` are value objects,
//! while `Supplier` or `SubArea` are entities.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by value. To "modify" one, build
/// a new one. Constructors are expected to validate, so holding a value
/// object means holding a value that already satisfies its invariants.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
