//! Storage hierarchy domain module.
//!
//! Four chained levels (Location > SubLocation > Area > SubArea), breadcrumb
//! path resolution and subtree delete planning. Pure domain logic; the store
//! supplies lookups through [`HierarchyLookup`] and [`HierarchyIndex`].

pub mod delete;
pub mod location;
pub mod path;
pub mod unassigned;

pub use delete::{plan_delete, DeletePlan, HierarchyIndex, NodeRef, StockPolicy};
pub use location::{node_label, Area, HierarchyNode, Level, Location, SubArea, SubLocation};
pub use path::{HierarchyLookup, LocationPath};
