//! Subtree delete planning.
//!
//! Deleting a node is decided in one pass over its whole subtree before
//! anything is removed. The result is either a complete [`DeletePlan`] or a
//! single rejection, so a caller applying the plan inside one transaction can
//! never leave a partially deleted branch behind.
//!
//! Stock policy per level:
//!
//! | target       | descendants | inventory rows beneath |
//! |--------------|-------------|------------------------|
//! | Location     | cascade     | cascade                |
//! | SubLocation  | cascade     | cascade                |
//! | Area         | cascade     | reject                 |
//! | SubArea      | (none)      | reject                 |

use serde::{Deserialize, Serialize};

use stockroom_core::{AreaId, DomainError, DomainResult, LocationId, SubAreaId, SubLocationId};

use crate::location::{HierarchyNode, Level};
use crate::path::HierarchyLookup;

/// Child enumeration and stock lookups needed to plan a delete.
pub trait HierarchyIndex: HierarchyLookup {
    fn sub_locations_in(&self, id: LocationId) -> Vec<SubLocationId>;
    fn areas_in(&self, id: SubLocationId) -> Vec<AreaId>;
    fn sub_areas_in(&self, id: AreaId) -> Vec<SubAreaId>;
    /// Number of inventory rows held at a sub area.
    fn stock_rows_at(&self, id: SubAreaId) -> usize;
}

/// A node at any level of the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeRef {
    Location(LocationId),
    SubLocation(SubLocationId),
    Area(AreaId),
    SubArea(SubAreaId),
}

impl NodeRef {
    pub fn level(&self) -> Level {
        match self {
            NodeRef::Location(_) => Level::Location,
            NodeRef::SubLocation(_) => Level::SubLocation,
            NodeRef::Area(_) => Level::Area,
            NodeRef::SubArea(_) => Level::SubArea,
        }
    }

    /// What happens to inventory rows beneath this node when it is deleted.
    pub fn stock_policy(&self) -> StockPolicy {
        match self.level() {
            Level::Location | Level::SubLocation => StockPolicy::Cascade,
            Level::Area | Level::SubArea => StockPolicy::Reject,
        }
    }

    fn id_string(&self) -> String {
        match self {
            NodeRef::Location(id) => id.to_string(),
            NodeRef::SubLocation(id) => id.to_string(),
            NodeRef::Area(id) => id.to_string(),
            NodeRef::SubArea(id) => id.to_string(),
        }
    }
}

impl From<LocationId> for NodeRef {
    fn from(id: LocationId) -> Self {
        NodeRef::Location(id)
    }
}

impl From<SubLocationId> for NodeRef {
    fn from(id: SubLocationId) -> Self {
        NodeRef::SubLocation(id)
    }
}

impl From<AreaId> for NodeRef {
    fn from(id: AreaId) -> Self {
        NodeRef::Area(id)
    }
}

impl From<SubAreaId> for NodeRef {
    fn from(id: SubAreaId) -> Self {
        NodeRef::SubArea(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockPolicy {
    /// Inventory rows beneath the node are deleted with it.
    Cascade,
    /// Any inventory row beneath the node blocks the delete.
    Reject,
}

/// Everything removed by deleting `target`, leaf-most first when applied.
///
/// The target itself is included in the list for its own level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePlan {
    pub locations: Vec<LocationId>,
    pub sub_locations: Vec<SubLocationId>,
    pub areas: Vec<AreaId>,
    pub sub_areas: Vec<SubAreaId>,
    /// Sub areas whose inventory rows are deleted along with them.
    pub stocked_sub_areas: Vec<SubAreaId>,
    /// Total inventory rows removed by the cascade.
    pub stock_rows: usize,
}

impl DeletePlan {
    pub fn node_count(&self) -> usize {
        self.locations.len() + self.sub_locations.len() + self.areas.len() + self.sub_areas.len()
    }
}

/// Walk the subtree under `target` and decide the delete.
///
/// Fails with `NotFound` when the target does not exist and with
/// `ReferentialIntegrityViolation` when the target's stock policy is
/// [`StockPolicy::Reject`] and any sub area beneath it holds inventory.
pub fn plan_delete(index: &impl HierarchyIndex, target: NodeRef) -> DomainResult<DeletePlan> {
    let mut plan = DeletePlan::default();

    match target {
        NodeRef::Location(id) => {
            index
                .location(id)
                .ok_or_else(|| DomainError::not_found(Level::Location.kind(), id))?;
            plan.locations.push(id);
            for sub_location in index.sub_locations_in(id) {
                collect_sub_location(index, sub_location, &mut plan);
            }
        }
        NodeRef::SubLocation(id) => {
            index
                .sub_location(id)
                .ok_or_else(|| DomainError::not_found(Level::SubLocation.kind(), id))?;
            collect_sub_location(index, id, &mut plan);
        }
        NodeRef::Area(id) => {
            index
                .area(id)
                .ok_or_else(|| DomainError::not_found(Level::Area.kind(), id))?;
            collect_area(index, id, &mut plan);
        }
        NodeRef::SubArea(id) => {
            index
                .sub_area(id)
                .ok_or_else(|| DomainError::not_found(Level::SubArea.kind(), id))?;
            collect_sub_area(index, id, &mut plan);
        }
    }

    if target.stock_policy() == StockPolicy::Reject {
        if let Some(&blocking) = plan.stocked_sub_areas.first() {
            let name = index
                .sub_area(blocking)
                .map(|s| s.name().to_string())
                .unwrap_or_else(|| blocking.to_string());
            return Err(DomainError::integrity(
                target.level().kind(),
                target.id_string(),
                format!(
                    "sub area '{name}' still holds {} inventory row(s)",
                    index.stock_rows_at(blocking)
                ),
            ));
        }
    }

    Ok(plan)
}

fn collect_sub_location(index: &impl HierarchyIndex, id: SubLocationId, plan: &mut DeletePlan) {
    plan.sub_locations.push(id);
    for area in index.areas_in(id) {
        collect_area(index, area, plan);
    }
}

fn collect_area(index: &impl HierarchyIndex, id: AreaId, plan: &mut DeletePlan) {
    plan.areas.push(id);
    for sub_area in index.sub_areas_in(id) {
        collect_sub_area(index, sub_area, plan);
    }
}

fn collect_sub_area(index: &impl HierarchyIndex, id: SubAreaId, plan: &mut DeletePlan) {
    plan.sub_areas.push(id);
    let rows = index.stock_rows_at(id);
    if rows > 0 {
        plan.stocked_sub_areas.push(id);
        plan.stock_rows += rows;
    }
}
