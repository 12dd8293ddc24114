//! Location hierarchy service.
//!
//! Names are unique among siblings (all locations are siblings of each other).
//! Deletes are planned over the whole subtree first and applied inside the
//! same transaction, so a rejected delete changes nothing.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{info, instrument};

use stockroom_core::{AreaId, DomainError, DomainResult, LocationId, SubAreaId, SubLocationId};
use stockroom_storage::{
    Area, DeletePlan, HierarchyLookup, HierarchyNode, Level, Location, LocationPath, NodeRef,
    SubArea, SubLocation, plan_delete, unassigned,
};

use crate::error::WarehouseResult;
use crate::store::{Store, Tables};

/// CRUD over the four hierarchy levels. Obtained from
/// [`Warehouse::locations`](crate::Warehouse::locations).
#[derive(Debug)]
pub struct Locations<'a, S> {
    store: &'a S,
}

impl<'a, S: Store> Locations<'a, S> {
    pub(crate) fn new(store: &'a S) -> Self {
        Self { store }
    }

    #[instrument(skip(self), err)]
    pub fn create_location(&self, name: &str) -> WarehouseResult<Location> {
        let node = Location::new(LocationId::new(), name)?;
        let created = self.store.transaction(|t| {
            ensure_name_free(&t.locations, &node)?;
            t.locations.insert(node.id_typed(), node.clone());
            Ok(node)
        })?;
        info!(location_id = %created.id_typed(), "location created");
        Ok(created)
    }

    #[instrument(skip(self), err)]
    pub fn create_sub_location(
        &self,
        location_id: LocationId,
        name: &str,
    ) -> WarehouseResult<SubLocation> {
        let node = SubLocation::new(SubLocationId::new(), location_id, name)?;
        let created = self.store.transaction(|t| {
            if t.location(location_id).is_none() {
                return Err(missing_parent(&node, location_id));
            }
            ensure_name_free(&t.sub_locations, &node)?;
            t.sub_locations.insert(node.id_typed(), node.clone());
            Ok(node)
        })?;
        info!(sub_location_id = %created.id_typed(), "sub location created");
        Ok(created)
    }

    #[instrument(skip(self), err)]
    pub fn create_area(&self, sub_location_id: SubLocationId, name: &str) -> WarehouseResult<Area> {
        let node = Area::new(AreaId::new(), sub_location_id, name)?;
        let created = self.store.transaction(|t| {
            if t.sub_location(sub_location_id).is_none() {
                return Err(missing_parent(&node, sub_location_id));
            }
            ensure_name_free(&t.areas, &node)?;
            t.areas.insert(node.id_typed(), node.clone());
            Ok(node)
        })?;
        info!(area_id = %created.id_typed(), "area created");
        Ok(created)
    }

    #[instrument(skip(self), err)]
    pub fn create_sub_area(&self, area_id: AreaId, name: &str) -> WarehouseResult<SubArea> {
        let node = SubArea::new(SubAreaId::new(), area_id, name)?;
        let created = self.store.transaction(|t| {
            if t.area(area_id).is_none() {
                return Err(missing_parent(&node, area_id));
            }
            ensure_name_free(&t.sub_areas, &node)?;
            t.sub_areas.insert(node.id_typed(), node.clone());
            Ok(node)
        })?;
        info!(sub_area_id = %created.id_typed(), "sub area created");
        Ok(created)
    }

    pub fn get_location(&self, id: LocationId) -> WarehouseResult<Location> {
        let found = self.store.read(|t| t.location(id).cloned())?;
        found.ok_or_else(|| DomainError::not_found(Level::Location.kind(), id).into())
    }

    pub fn get_sub_location(&self, id: SubLocationId) -> WarehouseResult<SubLocation> {
        let found = self.store.read(|t| t.sub_location(id).cloned())?;
        found.ok_or_else(|| DomainError::not_found(Level::SubLocation.kind(), id).into())
    }

    pub fn get_area(&self, id: AreaId) -> WarehouseResult<Area> {
        let found = self.store.read(|t| t.area(id).cloned())?;
        found.ok_or_else(|| DomainError::not_found(Level::Area.kind(), id).into())
    }

    pub fn get_sub_area(&self, id: SubAreaId) -> WarehouseResult<SubArea> {
        let found = self.store.read(|t| t.sub_area(id).cloned())?;
        found.ok_or_else(|| DomainError::not_found(Level::SubArea.kind(), id).into())
    }

    #[instrument(skip(self), err)]
    pub fn rename_location(&self, id: LocationId, name: &str) -> WarehouseResult<Location> {
        let renamed = self.store.transaction(|t| {
            let next = t
                .location(id)
                .ok_or_else(|| DomainError::not_found(Level::Location.kind(), id))?
                .renamed(name)?;
            ensure_name_free(&t.locations, &next)?;
            t.locations.insert(id, next.clone());
            Ok(next)
        })?;
        info!(location_id = %id, "location renamed");
        Ok(renamed)
    }

    #[instrument(skip(self), err)]
    pub fn rename_sub_location(&self, id: SubLocationId, name: &str) -> WarehouseResult<SubLocation> {
        let renamed = self.store.transaction(|t| {
            let next = t
                .sub_location(id)
                .ok_or_else(|| DomainError::not_found(Level::SubLocation.kind(), id))?
                .renamed(name)?;
            ensure_name_free(&t.sub_locations, &next)?;
            t.sub_locations.insert(id, next.clone());
            Ok(next)
        })?;
        info!(sub_location_id = %id, "sub location renamed");
        Ok(renamed)
    }

    #[instrument(skip(self), err)]
    pub fn rename_area(&self, id: AreaId, name: &str) -> WarehouseResult<Area> {
        let renamed = self.store.transaction(|t| {
            let next = t
                .area(id)
                .ok_or_else(|| DomainError::not_found(Level::Area.kind(), id))?
                .renamed(name)?;
            ensure_name_free(&t.areas, &next)?;
            t.areas.insert(id, next.clone());
            Ok(next)
        })?;
        info!(area_id = %id, "area renamed");
        Ok(renamed)
    }

    #[instrument(skip(self), err)]
    pub fn rename_sub_area(&self, id: SubAreaId, name: &str) -> WarehouseResult<SubArea> {
        let renamed = self.store.transaction(|t| {
            let next = t
                .sub_area(id)
                .ok_or_else(|| DomainError::not_found(Level::SubArea.kind(), id))?
                .renamed(name)?;
            ensure_name_free(&t.sub_areas, &next)?;
            t.sub_areas.insert(id, next.clone());
            Ok(next)
        })?;
        info!(sub_area_id = %id, "sub area renamed");
        Ok(renamed)
    }

    /// Delete a location with everything beneath it, stock included.
    pub fn delete_location(&self, id: LocationId) -> WarehouseResult<DeletePlan> {
        self.delete(id.into())
    }

    /// Delete a sub location with everything beneath it, stock included.
    pub fn delete_sub_location(&self, id: SubLocationId) -> WarehouseResult<DeletePlan> {
        self.delete(id.into())
    }

    /// Delete an area and its sub areas. Rejected if any of them holds stock.
    pub fn delete_area(&self, id: AreaId) -> WarehouseResult<DeletePlan> {
        self.delete(id.into())
    }

    /// Delete an empty sub area. Rejected if it holds stock.
    pub fn delete_sub_area(&self, id: SubAreaId) -> WarehouseResult<DeletePlan> {
        self.delete(id.into())
    }

    #[instrument(skip(self), err)]
    fn delete(&self, target: NodeRef) -> WarehouseResult<DeletePlan> {
        let plan = self.store.transaction(|t| {
            let plan = plan_delete(&*t, target)?;
            apply_delete(t, &plan);
            Ok(plan)
        })?;
        info!(
            level = target.level().kind(),
            nodes = plan.node_count(),
            stock_rows = plan.stock_rows,
            "hierarchy subtree deleted"
        );
        Ok(plan)
    }

    /// Breadcrumb of a sub area, e.g. `"Storehouse > Zone 1 > Bin A > Slot 1"`.
    pub fn resolve_path(&self, sub_area_id: SubAreaId) -> WarehouseResult<LocationPath> {
        Ok(self
            .store
            .read(|t| LocationPath::resolve(t, sub_area_id))??)
    }

    /// `"<Location> - <SubLocation>"`.
    pub fn label_sub_location(&self, id: SubLocationId) -> WarehouseResult<String> {
        let label = self.store.read(|t| -> DomainResult<String> {
            let node = t
                .sub_location(id)
                .ok_or_else(|| DomainError::not_found(Level::SubLocation.kind(), id))?;
            let parent = t
                .location(node.location_id())
                .ok_or_else(|| DomainError::not_found(Level::Location.kind(), node.location_id()))?;
            Ok(node.label(parent.name()))
        })??;
        Ok(label)
    }

    /// `"<SubLocation> - <Area>"`.
    pub fn label_area(&self, id: AreaId) -> WarehouseResult<String> {
        let label = self.store.read(|t| -> DomainResult<String> {
            let node = t
                .area(id)
                .ok_or_else(|| DomainError::not_found(Level::Area.kind(), id))?;
            let parent = t.sub_location(node.sub_location_id()).ok_or_else(|| {
                DomainError::not_found(Level::SubLocation.kind(), node.sub_location_id())
            })?;
            Ok(node.label(parent.name()))
        })??;
        Ok(label)
    }

    /// `"<Area> - <SubArea>"`.
    pub fn label_sub_area(&self, id: SubAreaId) -> WarehouseResult<String> {
        let label = self.store.read(|t| -> DomainResult<String> {
            let node = t
                .sub_area(id)
                .ok_or_else(|| DomainError::not_found(Level::SubArea.kind(), id))?;
            let parent = t
                .area(node.area_id())
                .ok_or_else(|| DomainError::not_found(Level::Area.kind(), node.area_id()))?;
            Ok(node.label(parent.name()))
        })??;
        Ok(label)
    }
}

/// Sibling-scoped name uniqueness. Locations all share the `()` parent.
fn ensure_name_free<K, N>(table: &BTreeMap<K, N>, candidate: &N) -> DomainResult<()>
where
    N: HierarchyNode,
{
    let taken = table.values().any(|node| {
        node.id() != candidate.id()
            && node.parent_id() == candidate.parent_id()
            && node.name() == candidate.name()
    });
    if taken {
        return Err(DomainError::duplicate(N::KIND, "name", candidate.name()));
    }
    Ok(())
}

fn missing_parent<N: HierarchyNode>(node: &N, parent: impl core::fmt::Display) -> DomainError {
    DomainError::integrity(
        N::KIND,
        node.name(),
        format!("parent {parent} does not exist"),
    )
}

/// Remove everything in `plan`, stock first, then leaf to root.
fn apply_delete(t: &mut Tables, plan: &DeletePlan) {
    let stocked: BTreeSet<SubAreaId> = plan.stocked_sub_areas.iter().copied().collect();
    t.inventory
        .retain(|_, row| !stocked.contains(&row.sub_area_id()));

    for id in &plan.sub_areas {
        t.sub_areas.remove(id);
    }
    for id in &plan.areas {
        t.areas.remove(id);
    }
    for id in &plan.sub_locations {
        t.sub_locations.remove(id);
    }
    for id in &plan.locations {
        t.locations.remove(id);
    }
}

/// Find or create the "Unassigned" chain and return its sub area.
pub(crate) fn unassigned_sub_area(t: &mut Tables) -> DomainResult<SubAreaId> {
    let existing = t
        .locations()
        .find(|l| l.name() == unassigned::LOCATION)
        .map(Location::id_typed);
    let location_id = match existing {
        Some(id) => id,
        None => {
            let node = Location::new(LocationId::new(), unassigned::LOCATION)?;
            t.locations.insert(node.id_typed(), node.clone());
            node.id_typed()
        }
    };

    let existing = t
        .sub_locations()
        .find(|s| s.location_id() == location_id && s.name() == unassigned::SUB_LOCATION)
        .map(SubLocation::id_typed);
    let sub_location_id = match existing {
        Some(id) => id,
        None => {
            let node = SubLocation::new(SubLocationId::new(), location_id, unassigned::SUB_LOCATION)?;
            t.sub_locations.insert(node.id_typed(), node.clone());
            node.id_typed()
        }
    };

    let existing = t
        .areas()
        .find(|a| a.sub_location_id() == sub_location_id && a.name() == unassigned::AREA)
        .map(Area::id_typed);
    let area_id = match existing {
        Some(id) => id,
        None => {
            let node = Area::new(AreaId::new(), sub_location_id, unassigned::AREA)?;
            t.areas.insert(node.id_typed(), node.clone());
            node.id_typed()
        }
    };

    let existing = t
        .sub_areas()
        .find(|s| s.area_id() == area_id && s.name() == unassigned::SUB_AREA)
        .map(SubArea::id_typed);
    match existing {
        Some(id) => Ok(id),
        None => {
            let node = SubArea::new(SubAreaId::new(), area_id, unassigned::SUB_AREA)?;
            t.sub_areas.insert(node.id_typed(), node.clone());
            Ok(node.id_typed())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Warehouse;
    use proptest::prelude::*;

    #[test]
    fn sibling_names_are_scoped_to_their_parent() {
        let warehouse = Warehouse::in_memory();
        let locations = warehouse.locations();
        let a = locations.create_location("Warehouse A").unwrap();
        let b = locations.create_location("Warehouse B").unwrap();

        locations.create_sub_location(a.id_typed(), "Zone 1").unwrap();
        locations.create_sub_location(b.id_typed(), "Zone 1").unwrap();

        let err = locations
            .create_sub_location(a.id_typed(), "Zone 1")
            .unwrap_err();
        assert!(matches!(
            err.domain(),
            Some(DomainError::UniquenessViolation { entity: "sub location", .. })
        ));
    }

    #[test]
    fn location_names_are_globally_unique() {
        let warehouse = Warehouse::in_memory();
        warehouse.locations().create_location("Storehouse").unwrap();
        assert!(warehouse.locations().create_location("Storehouse").is_err());
    }

    #[test]
    fn missing_parent_is_an_integrity_violation() {
        let warehouse = Warehouse::in_memory();
        let err = warehouse
            .locations()
            .create_area(SubLocationId::new(), "Rack 1")
            .unwrap_err();
        assert!(matches!(
            err.domain(),
            Some(DomainError::ReferentialIntegrityViolation { entity: "area", .. })
        ));
    }

    #[test]
    fn rename_rejects_sibling_collision_but_allows_own_name() {
        let warehouse = Warehouse::in_memory();
        let locations = warehouse.locations();
        let site = locations.create_location("Site").unwrap();
        let zone = locations.create_sub_location(site.id_typed(), "Zone 1").unwrap();
        locations.create_sub_location(site.id_typed(), "Zone 2").unwrap();

        assert!(locations.rename_sub_location(zone.id_typed(), "Zone 2").is_err());
        assert!(locations.rename_sub_location(zone.id_typed(), "Zone 1").is_ok());
        let renamed = locations.rename_sub_location(zone.id_typed(), "Zone 3").unwrap();
        assert_eq!(renamed.name(), "Zone 3");
    }

    #[test]
    fn rename_commits_at_every_level() {
        let warehouse = Warehouse::in_memory();
        let locations = warehouse.locations();
        let site = locations.create_location("Site").unwrap();
        let zone = locations.create_sub_location(site.id_typed(), "Zone").unwrap();
        let rack = locations.create_area(zone.id_typed(), "Rack").unwrap();
        let slot = locations.create_sub_area(rack.id_typed(), "Slot").unwrap();

        locations.rename_location(site.id_typed(), "Depot").unwrap();
        locations.rename_sub_location(zone.id_typed(), "Hall").unwrap();
        locations.rename_area(rack.id_typed(), "Aisle").unwrap();
        locations.rename_sub_area(slot.id_typed(), "Bin").unwrap();

        assert_eq!(
            locations.resolve_path(slot.id_typed()).unwrap().to_string(),
            "Depot > Hall > Aisle > Bin"
        );
        assert!(matches!(
            locations.rename_area(AreaId::new(), "Ghost").unwrap_err().domain(),
            Some(DomainError::NotFound { entity: "area", .. })
        ));
    }

    #[test]
    fn labels_include_parent_name() {
        let warehouse = Warehouse::in_memory();
        let locations = warehouse.locations();
        let site = locations.create_location("Warehouse Alpha").unwrap();
        let floor = locations.create_sub_location(site.id_typed(), "Ground Floor").unwrap();
        let rack = locations.create_area(floor.id_typed(), "Rack A").unwrap();
        let shelf = locations.create_sub_area(rack.id_typed(), "Shelf 1").unwrap();

        assert_eq!(
            locations.label_sub_location(floor.id_typed()).unwrap(),
            "Warehouse Alpha - Ground Floor"
        );
        assert_eq!(locations.label_area(rack.id_typed()).unwrap(), "Ground Floor - Rack A");
        assert_eq!(locations.label_sub_area(shelf.id_typed()).unwrap(), "Rack A - Shelf 1");
    }

    #[test]
    fn unassigned_chain_is_created_once() {
        let warehouse = Warehouse::in_memory();
        let first = warehouse.seed_unassigned().unwrap();
        let second = warehouse.seed_unassigned().unwrap();
        assert_eq!(first, second);
        assert_eq!(
            warehouse.locations().resolve_path(first).unwrap().to_string(),
            "Unassigned Location > Unassigned Sub Location > Unassigned Area > Unassigned Sub Area"
        );
        assert_eq!(warehouse.store().read(|t| t.locations().count()).unwrap(), 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 64,
            ..ProptestConfig::default()
        })]

        /// Property: within one parent, a create succeeds exactly when the
        /// trimmed name has not been used yet.
        #[test]
        fn sibling_uniqueness_holds(names in prop::collection::vec("[a-c]{1,2}", 1..12)) {
            let warehouse = Warehouse::in_memory();
            let locations = warehouse.locations();
            let site = locations.create_location("Site").unwrap();
            let zone = locations.create_sub_location(site.id_typed(), "Zone").unwrap();

            let mut seen = BTreeSet::new();
            for name in names {
                let result = locations.create_area(zone.id_typed(), &name);
                prop_assert_eq!(result.is_ok(), seen.insert(name));
            }
            let stored = warehouse.store().read(|t| t.areas().count()).unwrap();
            prop_assert_eq!(stored, seen.len());
        }
    }
}
