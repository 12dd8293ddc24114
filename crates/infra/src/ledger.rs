//! Inventory ledger service.

use chrono::Utc;
use tracing::{info, instrument};

use stockroom_core::{DomainError, DomainResult, InventoryId, ItemId, SubAreaId};
use stockroom_inventory::{InventoryRecord, Quantity};
use stockroom_storage::{HierarchyLookup, HierarchyNode};

use crate::error::WarehouseResult;
use crate::locations::unassigned_sub_area;
use crate::store::{Store, Tables};

/// CRUD over ledger rows. Obtained from [`Warehouse::inventory`](crate::Warehouse::inventory).
#[derive(Debug)]
pub struct Ledger<'a, S> {
    store: &'a S,
}

impl<'a, S: Store> Ledger<'a, S> {
    pub(crate) fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Open a ledger row for an item at a sub area.
    ///
    /// Only one row may exist per (item, sub area); to add stock to an
    /// existing row use [`update`](Self::update) or [`adjust`](Self::adjust).
    #[instrument(skip(self), err)]
    pub fn create(
        &self,
        item_id: ItemId,
        sub_area_id: SubAreaId,
        quantity: i64,
    ) -> WarehouseResult<InventoryRecord> {
        let record = InventoryRecord::new(InventoryId::new(), item_id, sub_area_id, quantity, Utc::now())?;
        let created = self.store.transaction(|t| insert_row(t, record))?;
        info!(inventory_id = %created.id_typed(), "inventory row created");
        Ok(created)
    }

    /// Open a ledger row on the "Unassigned" shelf, creating the chain if needed.
    #[instrument(skip(self), err)]
    pub fn create_unassigned(&self, item_id: ItemId, quantity: i64) -> WarehouseResult<InventoryRecord> {
        Quantity::new(quantity)?;

        let created = self.store.transaction(|t| {
            let sub_area_id = unassigned_sub_area(t)?;
            let record =
                InventoryRecord::new(InventoryId::new(), item_id, sub_area_id, quantity, Utc::now())?;
            insert_row(t, record)
        })?;
        info!(inventory_id = %created.id_typed(), "inventory row created on unassigned shelf");
        Ok(created)
    }

    pub fn get(&self, id: InventoryId) -> WarehouseResult<InventoryRecord> {
        let found = self.store.read(|t| t.inventory_row(id).cloned())?;
        found.ok_or_else(|| DomainError::not_found("inventory", id).into())
    }

    /// The row for an exact (item, sub area) pair, if any.
    pub fn find(&self, item_id: ItemId, sub_area_id: SubAreaId) -> WarehouseResult<Option<InventoryRecord>> {
        self.store.read(|t| t.stock_at(item_id, sub_area_id).cloned())
    }

    /// Every ledger row, in id order.
    pub fn list(&self) -> WarehouseResult<Vec<InventoryRecord>> {
        self.store.read(|t| t.inventory().cloned().collect())
    }

    /// Number of ledger rows holding an item.
    pub fn count_for_item(&self, item_id: ItemId) -> WarehouseResult<usize> {
        self.store.read(|t| t.stock_for_item(item_id).count())
    }

    /// Set the quantity of a row.
    #[instrument(skip(self), err)]
    pub fn update(&self, id: InventoryId, quantity: i64) -> WarehouseResult<InventoryRecord> {
        let updated = self.store.transaction(|t| {
            let next = t
                .inventory_row(id)
                .ok_or_else(|| DomainError::not_found("inventory", id))?
                .with_quantity(quantity, Utc::now())?;
            t.inventory.insert(id, next.clone());
            Ok(next)
        })?;
        info!(inventory_id = %id, quantity = updated.quantity().get(), "inventory updated");
        Ok(updated)
    }

    /// Move stock in or out of a row. The result may not drop below zero.
    #[instrument(skip(self), err)]
    pub fn adjust(&self, id: InventoryId, delta: i64) -> WarehouseResult<InventoryRecord> {
        let adjusted = self.store.transaction(|t| {
            let next = t
                .inventory_row(id)
                .ok_or_else(|| DomainError::not_found("inventory", id))?
                .adjusted(delta, Utc::now())?;
            t.inventory.insert(id, next.clone());
            Ok(next)
        })?;
        info!(inventory_id = %id, quantity = adjusted.quantity().get(), "inventory adjusted");
        Ok(adjusted)
    }

    #[instrument(skip(self), err)]
    pub fn delete(&self, id: InventoryId) -> WarehouseResult<()> {
        self.store.transaction(|t| {
            t.inventory
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| DomainError::not_found("inventory", id))
        })?;
        info!(inventory_id = %id, "inventory row deleted");
        Ok(())
    }
}

/// Check references and pair uniqueness, then insert.
fn insert_row(t: &mut Tables, record: InventoryRecord) -> DomainResult<InventoryRecord> {
    let item = t.item(record.item_id()).ok_or_else(|| {
        DomainError::integrity(
            "inventory",
            record.id_typed(),
            format!("item {} does not exist", record.item_id()),
        )
    })?;
    let sub_area = t.sub_area(record.sub_area_id()).ok_or_else(|| {
        DomainError::integrity(
            "inventory",
            record.id_typed(),
            format!("sub area {} does not exist", record.sub_area_id()),
        )
    })?;
    if t.stock_at(record.item_id(), record.sub_area_id()).is_some() {
        return Err(DomainError::duplicate(
            "inventory",
            "item",
            record.label(item.name(), sub_area.name()),
        ));
    }

    t.inventory.insert(record.id_typed(), record.clone());
    Ok(record)
}
