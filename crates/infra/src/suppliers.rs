//! Supplier registry service.

use tracing::{info, instrument};

use stockroom_core::{DomainError, DomainResult, SupplierId};
use stockroom_suppliers::{NewSupplier, Supplier, SupplierChanges};

use crate::error::WarehouseResult;
use crate::store::{Store, Tables};

/// CRUD over suppliers. Obtained from [`Warehouse::suppliers`](crate::Warehouse::suppliers).
#[derive(Debug)]
pub struct Suppliers<'a, S> {
    store: &'a S,
}

impl<'a, S: Store> Suppliers<'a, S> {
    pub(crate) fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Register a supplier. Name and (non-null) email must be unused.
    #[instrument(skip(self, new), fields(name = %new.name), err)]
    pub fn create(&self, new: NewSupplier) -> WarehouseResult<Supplier> {
        let supplier = Supplier::register(SupplierId::new(), &new)?;

        let created = self.store.transaction(|t| {
            ensure_unique(t, &supplier)?;
            t.suppliers.insert(supplier.id_typed(), supplier.clone());
            Ok(supplier)
        })?;

        info!(supplier_id = %created.id_typed(), "supplier created");
        Ok(created)
    }

    pub fn get(&self, id: SupplierId) -> WarehouseResult<Supplier> {
        let found = self.store.read(|t| t.supplier(id).cloned())?;
        found.ok_or_else(|| DomainError::not_found("supplier", id).into())
    }

    /// All suppliers ordered by name.
    pub fn list(&self) -> WarehouseResult<Vec<Supplier>> {
        self.store.read(|t| {
            let mut all: Vec<Supplier> = t.suppliers().cloned().collect();
            all.sort_by(|a, b| a.name().cmp(b.name()));
            all
        })
    }

    #[instrument(skip(self, changes), err)]
    pub fn update(&self, id: SupplierId, changes: SupplierChanges) -> WarehouseResult<Supplier> {
        let updated = self.store.transaction(|t| {
            let current = t
                .supplier(id)
                .ok_or_else(|| DomainError::not_found("supplier", id))?;
            let next = current.with_changes(&changes)?;
            ensure_unique(t, &next)?;
            t.suppliers.insert(id, next.clone());
            Ok(next)
        })?;

        info!(supplier_id = %id, "supplier updated");
        Ok(updated)
    }

    /// Toggle the active flag without touching anything else.
    pub fn set_status(&self, id: SupplierId, active: bool) -> WarehouseResult<Supplier> {
        self.update(
            id,
            SupplierChanges {
                active: Some(active),
                ..SupplierChanges::default()
            },
        )
    }

    /// Remove a supplier. Rejected while any item still references it.
    #[instrument(skip(self), err)]
    pub fn delete(&self, id: SupplierId) -> WarehouseResult<()> {
        self.store.transaction(|t| {
            if t.supplier(id).is_none() {
                return Err(DomainError::not_found("supplier", id));
            }
            let items = t.items().filter(|item| item.supplier_id() == id).count();
            if items > 0 {
                return Err(DomainError::integrity(
                    "supplier",
                    id,
                    format!("referenced by {items} item(s)"),
                ));
            }
            t.suppliers.remove(&id);
            Ok(())
        })?;

        info!(supplier_id = %id, "supplier deleted");
        Ok(())
    }
}

/// Name is globally unique; email is unique when present.
fn ensure_unique(t: &Tables, candidate: &Supplier) -> DomainResult<()> {
    let others = t
        .suppliers()
        .filter(|s| s.id_typed() != candidate.id_typed());

    for other in others {
        if other.name() == candidate.name() {
            return Err(DomainError::duplicate("supplier", "name", candidate.name()));
        }
        if let (Some(email), Some(existing)) = (candidate.email(), other.email()) {
            if email == existing {
                return Err(DomainError::duplicate("supplier", "email", email));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Warehouse;
    use stockroom_suppliers::PaymentMethod;

    #[test]
    fn duplicate_name_is_rejected_and_nothing_is_written() {
        let warehouse = Warehouse::in_memory();
        let suppliers = warehouse.suppliers();
        suppliers.create(NewSupplier::named("Global Tech")).unwrap();

        let err = suppliers
            .create(NewSupplier::named("Global Tech").with_email("other@example.com"))
            .unwrap_err();
        match err.domain() {
            Some(DomainError::UniquenessViolation { field, .. }) => assert_eq!(*field, "name"),
            _ => panic!("Expected UniquenessViolation on name"),
        }
        assert_eq!(suppliers.list().unwrap().len(), 1);
    }

    #[test]
    fn update_checks_uniqueness_against_other_suppliers_only() {
        let warehouse = Warehouse::in_memory();
        let suppliers = warehouse.suppliers();
        let acme = suppliers
            .create(NewSupplier::named("Acme").with_email("sales@acme.test"))
            .unwrap();
        suppliers.create(NewSupplier::named("Beta")).unwrap();

        // Re-saving with its own email is fine.
        let same = SupplierChanges {
            email: Some(Some("sales@acme.test".to_string())),
            payment_method: Some(PaymentMethod::Cash),
            ..SupplierChanges::default()
        };
        let updated = suppliers.update(acme.id_typed(), same).unwrap();
        assert_eq!(updated.payment_method(), PaymentMethod::Cash);

        let clash = SupplierChanges {
            name: Some("Beta".to_string()),
            ..SupplierChanges::default()
        };
        assert!(suppliers.update(acme.id_typed(), clash).is_err());
        assert_eq!(suppliers.get(acme.id_typed()).unwrap().name(), "Acme");
    }

    #[test]
    fn set_status_only_changes_the_flag() {
        let warehouse = Warehouse::in_memory();
        let suppliers = warehouse.suppliers();
        let acme = suppliers
            .create(NewSupplier::named("Acme").with_main_contact("Dana"))
            .unwrap();

        let inactive = suppliers.set_status(acme.id_typed(), false).unwrap();
        assert!(!inactive.is_active());
        assert_eq!(inactive.main_contact(), Some("Dana"));
    }

    #[test]
    fn unknown_supplier_is_not_found() {
        let warehouse = Warehouse::in_memory();
        let err = warehouse.suppliers().delete(SupplierId::new()).unwrap_err();
        assert!(matches!(err.domain(), Some(DomainError::NotFound { .. })));
    }
}
