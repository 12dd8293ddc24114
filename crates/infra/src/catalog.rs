//! Category and item services.

use tracing::{info, instrument};

use stockroom_catalog::{Category, Item, ItemChanges, NewItem};
use stockroom_core::{CategoryId, DomainError, DomainResult, ItemId};

use crate::error::WarehouseResult;
use crate::store::{Store, Tables};

/// CRUD over categories. Obtained from [`Warehouse::categories`](crate::Warehouse::categories).
#[derive(Debug)]
pub struct Categories<'a, S> {
    store: &'a S,
}

impl<'a, S: Store> Categories<'a, S> {
    pub(crate) fn new(store: &'a S) -> Self {
        Self { store }
    }

    #[instrument(skip(self), err)]
    pub fn create(&self, name: &str) -> WarehouseResult<Category> {
        let category = Category::new(CategoryId::new(), name)?;

        let created = self.store.transaction(|t| {
            ensure_category_name_free(t, &category)?;
            t.categories.insert(category.id_typed(), category.clone());
            Ok(category)
        })?;

        info!(category_id = %created.id_typed(), "category created");
        Ok(created)
    }

    pub fn get(&self, id: CategoryId) -> WarehouseResult<Category> {
        let found = self.store.read(|t| t.category(id).cloned())?;
        found.ok_or_else(|| DomainError::not_found("category", id).into())
    }

    /// All categories ordered by name.
    pub fn list(&self) -> WarehouseResult<Vec<Category>> {
        self.store.read(|t| {
            let mut all: Vec<Category> = t.categories().cloned().collect();
            all.sort_by(|a, b| a.name().cmp(b.name()));
            all
        })
    }

    #[instrument(skip(self), err)]
    pub fn rename(&self, id: CategoryId, name: &str) -> WarehouseResult<Category> {
        let renamed = self.store.transaction(|t| {
            let next = t
                .category(id)
                .ok_or_else(|| DomainError::not_found("category", id))?
                .renamed(name)?;
            ensure_category_name_free(t, &next)?;
            t.categories.insert(id, next.clone());
            Ok(next)
        })?;

        info!(category_id = %id, "category renamed");
        Ok(renamed)
    }

    /// Remove a category. Rejected while any item is filed under it.
    #[instrument(skip(self), err)]
    pub fn delete(&self, id: CategoryId) -> WarehouseResult<()> {
        self.store.transaction(|t| {
            if t.category(id).is_none() {
                return Err(DomainError::not_found("category", id));
            }
            let items = t.items().filter(|item| item.category_id() == id).count();
            if items > 0 {
                return Err(DomainError::integrity(
                    "category",
                    id,
                    format!("referenced by {items} item(s)"),
                ));
            }
            t.categories.remove(&id);
            Ok(())
        })?;

        info!(category_id = %id, "category deleted");
        Ok(())
    }
}

fn ensure_category_name_free(t: &Tables, candidate: &Category) -> DomainResult<()> {
    let taken = t
        .categories()
        .any(|c| c.id_typed() != candidate.id_typed() && c.name() == candidate.name());
    if taken {
        return Err(DomainError::duplicate("category", "name", candidate.name()));
    }
    Ok(())
}

/// CRUD over catalog items. Obtained from [`Warehouse::items`](crate::Warehouse::items).
#[derive(Debug)]
pub struct Items<'a, S> {
    store: &'a S,
}

impl<'a, S: Store> Items<'a, S> {
    pub(crate) fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Add an item to the catalog.
    ///
    /// Field ranges are checked before the store is touched; the code must be
    /// unused and the category and supplier must exist.
    #[instrument(skip(self, new), fields(code = %new.code), err)]
    pub fn create(&self, new: NewItem) -> WarehouseResult<Item> {
        let item = Item::new(ItemId::new(), &new)?;

        let created = self.store.transaction(|t| {
            ensure_code_free(t, &item)?;
            ensure_references(t, &item)?;
            t.items.insert(item.id_typed(), item.clone());
            Ok(item)
        })?;

        info!(item_id = %created.id_typed(), "item created");
        Ok(created)
    }

    pub fn get(&self, id: ItemId) -> WarehouseResult<Item> {
        let found = self.store.read(|t| t.item(id).cloned())?;
        found.ok_or_else(|| DomainError::not_found("item", id).into())
    }

    pub fn find_by_code(&self, code: &str) -> WarehouseResult<Option<Item>> {
        let code = code.trim();
        self.store
            .read(|t| t.items().find(|item| item.code() == code).cloned())
    }

    /// All items ordered by code.
    pub fn list(&self) -> WarehouseResult<Vec<Item>> {
        self.store.read(|t| {
            let mut all: Vec<Item> = t.items().cloned().collect();
            all.sort_by(|a, b| a.code().cmp(b.code()));
            all
        })
    }

    #[instrument(skip(self, changes), err)]
    pub fn update(&self, id: ItemId, changes: ItemChanges) -> WarehouseResult<Item> {
        let updated = self.store.transaction(|t| {
            let next = t
                .item(id)
                .ok_or_else(|| DomainError::not_found("item", id))?
                .with_changes(&changes)?;
            ensure_code_free(t, &next)?;
            if changes.touches_references() {
                ensure_references(t, &next)?;
            }
            t.items.insert(id, next.clone());
            Ok(next)
        })?;

        info!(item_id = %id, "item updated");
        Ok(updated)
    }

    /// Remove an item together with every ledger row that holds it.
    ///
    /// Returns the number of ledger rows removed.
    #[instrument(skip(self), err)]
    pub fn delete(&self, id: ItemId) -> WarehouseResult<usize> {
        let removed = self.store.transaction(|t| {
            if t.items.remove(&id).is_none() {
                return Err(DomainError::not_found("item", id));
            }
            let before = t.inventory.len();
            t.inventory.retain(|_, row| row.item_id() != id);
            Ok(before - t.inventory.len())
        })?;

        info!(item_id = %id, stock_rows = removed, "item deleted");
        Ok(removed)
    }
}

fn ensure_code_free(t: &Tables, candidate: &Item) -> DomainResult<()> {
    let taken = t
        .items()
        .any(|i| i.id_typed() != candidate.id_typed() && i.code() == candidate.code());
    if taken {
        return Err(DomainError::duplicate("item", "item_code", candidate.code()));
    }
    Ok(())
}

fn ensure_references(t: &Tables, item: &Item) -> DomainResult<()> {
    if t.category(item.category_id()).is_none() {
        return Err(DomainError::integrity(
            "item",
            item.code(),
            format!("category {} does not exist", item.category_id()),
        ));
    }
    if t.supplier(item.supplier_id()).is_none() {
        return Err(DomainError::integrity(
            "item",
            item.code(),
            format!("supplier {} does not exist", item.supplier_id()),
        ));
    }
    Ok(())
}
