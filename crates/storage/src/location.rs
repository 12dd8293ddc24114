//! The four storage levels: Location > SubLocation > Area > SubArea.
//!
//! Every level below the root holds a single forward reference to its parent
//! and is uniquely named among its siblings. Location names are unique across
//! the whole root level.

use serde::{Deserialize, Serialize};

use stockroom_core::validate::required_text;
use stockroom_core::{AreaId, DomainResult, Entity, LocationId, SubAreaId, SubLocationId};

/// Maximum name length at every level.
pub const NAME_MAX: usize = 100;

/// Position of a node in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Location,
    SubLocation,
    Area,
    SubArea,
}

impl Level {
    pub fn kind(self) -> &'static str {
        match self {
            Level::Location => "location",
            Level::SubLocation => "sub location",
            Level::Area => "area",
            Level::SubArea => "sub area",
        }
    }
}

/// Shared shape of the four levels.
pub trait HierarchyNode: Entity {
    /// Identifier of the parent node (`()` for the root level).
    type ParentId: Copy + Eq + core::fmt::Debug;

    const LEVEL: Level;

    fn parent_id(&self) -> Self::ParentId;

    fn name(&self) -> &str;
}

/// Display label of a non-root node, `"<parent name> - <name>"`.
pub fn node_label(parent_name: &str, name: &str) -> String {
    format!("{parent_name} - {name}")
}

macro_rules! hierarchy_node {
    (
        $(#[$meta:meta])*
        $t:ident, $id:ty, $level:ident, $kind:literal, parent: $pfield:ident: $pid:ty
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $t {
            id: $id,
            $pfield: $pid,
            name: String,
        }

        impl $t {
            pub fn new(id: $id, $pfield: $pid, name: &str) -> DomainResult<Self> {
                Ok(Self {
                    id,
                    $pfield,
                    name: required_text("name", name, NAME_MAX)?,
                })
            }

            pub fn renamed(&self, name: &str) -> DomainResult<Self> {
                Self::new(self.id, self.$pfield, name)
            }

            pub fn id_typed(&self) -> $id {
                self.id
            }

            pub fn $pfield(&self) -> $pid {
                self.$pfield
            }

            /// Label including the parent's name, e.g. `"Rack A - Shelf 1"`.
            pub fn label(&self, parent_name: &str) -> String {
                node_label(parent_name, &self.name)
            }
        }

        impl Entity for $t {
            type Id = $id;
            const KIND: &'static str = $kind;

            fn id(&self) -> &Self::Id {
                &self.id
            }
        }

        impl HierarchyNode for $t {
            type ParentId = $pid;
            const LEVEL: Level = Level::$level;

            fn parent_id(&self) -> Self::ParentId {
                self.$pfield
            }

            fn name(&self) -> &str {
                &self.name
            }
        }
    };
}

/// Root of the hierarchy (a site, building or warehouse).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    id: LocationId,
    name: String,
}

impl Location {
    pub fn new(id: LocationId, name: &str) -> DomainResult<Self> {
        Ok(Self {
            id,
            name: required_text("name", name, NAME_MAX)?,
        })
    }

    pub fn renamed(&self, name: &str) -> DomainResult<Self> {
        Self::new(self.id, name)
    }

    pub fn id_typed(&self) -> LocationId {
        self.id
    }
}

impl Entity for Location {
    type Id = LocationId;
    const KIND: &'static str = "location";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl HierarchyNode for Location {
    type ParentId = ();
    const LEVEL: Level = Level::Location;

    fn parent_id(&self) -> Self::ParentId {}

    fn name(&self) -> &str {
        &self.name
    }
}

impl core::fmt::Display for Location {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.name)
    }
}

hierarchy_node!(
    /// Second level, e.g. a floor or zone of a location.
    SubLocation, SubLocationId, SubLocation, "sub location", parent: location_id: LocationId
);

hierarchy_node!(
    /// Third level, e.g. a rack or aisle.
    Area, AreaId, Area, "area", parent: sub_location_id: SubLocationId
);

hierarchy_node!(
    /// Leaf level, e.g. a shelf or bin slot. Inventory rows point here.
    SubArea, SubAreaId, SubArea, "sub area", parent: area_id: AreaId
);
