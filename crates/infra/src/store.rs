//! Transactional table storage.
//!
//! Every write goes through [`Store::transaction`]: the closure edits a private
//! working copy of all tables while the writer lock is held, and the copy
//! replaces the committed state only when the closure succeeds.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use stockroom_catalog::{Category, Item};
use stockroom_core::{
    AreaId, CategoryId, DomainResult, InventoryId, ItemId, LocationId, SubAreaId, SubLocationId,
    SupplierId,
};
use stockroom_inventory::InventoryRecord;
use stockroom_storage::{
    Area, HierarchyIndex, HierarchyLookup, HierarchyNode, Location, SubArea, SubLocation,
};
use stockroom_suppliers::Supplier;

use crate::error::{WarehouseError, WarehouseResult};

/// All persisted records, one ordered map per entity.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub(crate) suppliers: BTreeMap<SupplierId, Supplier>,
    pub(crate) categories: BTreeMap<CategoryId, Category>,
    pub(crate) items: BTreeMap<ItemId, Item>,
    pub(crate) locations: BTreeMap<LocationId, Location>,
    pub(crate) sub_locations: BTreeMap<SubLocationId, SubLocation>,
    pub(crate) areas: BTreeMap<AreaId, Area>,
    pub(crate) sub_areas: BTreeMap<SubAreaId, SubArea>,
    pub(crate) inventory: BTreeMap<InventoryId, InventoryRecord>,
}

impl Tables {
    pub fn supplier(&self, id: SupplierId) -> Option<&Supplier> {
        self.suppliers.get(&id)
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.get(&id)
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn inventory_row(&self, id: InventoryId) -> Option<&InventoryRecord> {
        self.inventory.get(&id)
    }

    pub fn suppliers(&self) -> impl Iterator<Item = &Supplier> {
        self.suppliers.values()
    }

    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.values()
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.values()
    }

    pub fn sub_locations(&self) -> impl Iterator<Item = &SubLocation> {
        self.sub_locations.values()
    }

    pub fn areas(&self) -> impl Iterator<Item = &Area> {
        self.areas.values()
    }

    pub fn sub_areas(&self) -> impl Iterator<Item = &SubArea> {
        self.sub_areas.values()
    }

    pub fn inventory(&self) -> impl Iterator<Item = &InventoryRecord> {
        self.inventory.values()
    }

    /// Ledger rows held for an item, at any location.
    pub fn stock_for_item(&self, item_id: ItemId) -> impl Iterator<Item = &InventoryRecord> {
        self.inventory
            .values()
            .filter(move |row| row.item_id() == item_id)
    }

    /// The ledger row for an exact (item, sub area) pair.
    pub fn stock_at(&self, item_id: ItemId, sub_area_id: SubAreaId) -> Option<&InventoryRecord> {
        self.inventory
            .values()
            .find(|row| row.item_id() == item_id && row.sub_area_id() == sub_area_id)
    }

    /// Total number of records across every table.
    pub fn record_count(&self) -> usize {
        self.suppliers.len()
            + self.categories.len()
            + self.items.len()
            + self.locations.len()
            + self.sub_locations.len()
            + self.areas.len()
            + self.sub_areas.len()
            + self.inventory.len()
    }
}

impl HierarchyLookup for Tables {
    fn location(&self, id: LocationId) -> Option<&Location> {
        self.locations.get(&id)
    }

    fn sub_location(&self, id: SubLocationId) -> Option<&SubLocation> {
        self.sub_locations.get(&id)
    }

    fn area(&self, id: AreaId) -> Option<&Area> {
        self.areas.get(&id)
    }

    fn sub_area(&self, id: SubAreaId) -> Option<&SubArea> {
        self.sub_areas.get(&id)
    }
}

impl HierarchyIndex for Tables {
    fn sub_locations_in(&self, id: LocationId) -> Vec<SubLocationId> {
        children(&self.sub_locations, id)
    }

    fn areas_in(&self, id: SubLocationId) -> Vec<AreaId> {
        children(&self.areas, id)
    }

    fn sub_areas_in(&self, id: AreaId) -> Vec<SubAreaId> {
        children(&self.sub_areas, id)
    }

    fn stock_rows_at(&self, id: SubAreaId) -> usize {
        self.inventory
            .values()
            .filter(|row| row.sub_area_id() == id)
            .count()
    }
}

fn children<K, N>(table: &BTreeMap<K, N>, parent: N::ParentId) -> Vec<K>
where
    K: Copy + Ord,
    N: HierarchyNode,
{
    table
        .iter()
        .filter(|(_, node)| node.parent_id() == parent)
        .map(|(id, _)| *id)
        .collect()
}

/// Serializable access to [`Tables`].
pub trait Store: Send + Sync {
    /// Run `f` against the committed state.
    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> WarehouseResult<T>;

    /// Run `f` atomically. Changes made by `f` are committed only if it
    /// returns `Ok`; on error the committed state is left exactly as it was.
    fn transaction<T>(&self, f: impl FnOnce(&mut Tables) -> DomainResult<T>) -> WarehouseResult<T>;
}

impl<S> Store for Arc<S>
where
    S: Store,
{
    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> WarehouseResult<T> {
        (**self).read(f)
    }

    fn transaction<T>(&self, f: impl FnOnce(&mut Tables) -> DomainResult<T>) -> WarehouseResult<T> {
        (**self).transaction(f)
    }
}

/// In-memory store.
///
/// Writers are serialized by a single lock, which gives every transaction
/// serializable isolation. Readers never observe a half-applied transaction.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for InMemoryStore {
    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> WarehouseResult<T> {
        let tables = self
            .tables
            .read()
            .map_err(|_| WarehouseError::Storage("lock poisoned".to_string()))?;
        Ok(f(&tables))
    }

    fn transaction<T>(&self, f: impl FnOnce(&mut Tables) -> DomainResult<T>) -> WarehouseResult<T> {
        let mut committed = self
            .tables
            .write()
            .map_err(|_| WarehouseError::Storage("lock poisoned".to_string()))?;

        let mut working = committed.clone();
        match f(&mut working) {
            Ok(value) => {
                *committed = working;
                Ok(value)
            }
            Err(err) => {
                tracing::debug!(error = %err, "transaction rolled back");
                Err(err.into())
            }
        }
    }
}
