use tracing::info;

use stockroom_core::SubAreaId;

use crate::catalog::{Categories, Items};
use crate::config::WarehouseConfig;
use crate::error::WarehouseResult;
use crate::ledger::Ledger;
use crate::locations::{Locations, unassigned_sub_area};
use crate::store::{InMemoryStore, Store};
use crate::suppliers::Suppliers;

/// Entry point: one handle per component, all sharing a single store.
#[derive(Debug, Default)]
pub struct Warehouse<S = InMemoryStore> {
    store: S,
}

impl Warehouse<InMemoryStore> {
    /// Empty in-memory warehouse without any seed data.
    pub fn in_memory() -> Self {
        Self::new(InMemoryStore::new())
    }

    /// In-memory warehouse prepared according to `config`.
    ///
    /// Installs the process-wide log subscriber in `config.log_format` first
    /// (a no-op if one is already installed), then applies the seed.
    pub fn open(config: &WarehouseConfig) -> WarehouseResult<Self> {
        stockroom_observability::init_with(config.log_format);

        let warehouse = Self::in_memory();
        if config.seed_unassigned {
            warehouse.seed_unassigned()?;
        }
        Ok(warehouse)
    }
}

impl<S: Store> Warehouse<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn suppliers(&self) -> Suppliers<'_, S> {
        Suppliers::new(&self.store)
    }

    pub fn categories(&self) -> Categories<'_, S> {
        Categories::new(&self.store)
    }

    pub fn items(&self) -> Items<'_, S> {
        Items::new(&self.store)
    }

    pub fn locations(&self) -> Locations<'_, S> {
        Locations::new(&self.store)
    }

    pub fn inventory(&self) -> Ledger<'_, S> {
        Ledger::new(&self.store)
    }

    /// Make sure the "Unassigned" location chain exists and return its sub
    /// area. Running it again returns the same sub area.
    pub fn seed_unassigned(&self) -> WarehouseResult<SubAreaId> {
        let sub_area_id = self.store.transaction(unassigned_sub_area)?;
        info!(sub_area_id = %sub_area_id, "unassigned shelf ready");
        Ok(sub_area_id)
    }
}
