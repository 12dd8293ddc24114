//! Read-only list views for administrative screens.
//!
//! Each view takes a query, filters and orders the committed tables, and
//! returns flat rows. Search splits the query on whitespace; every term must
//! appear (case-insensitively) in at least one of the view's search fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_catalog::Money;
use stockroom_core::{
    AreaId, CategoryId, DomainResult, InventoryId, ItemId, LocationId, SubAreaId,
    SubLocationId, SupplierId,
};
use stockroom_storage::{HierarchyLookup, HierarchyNode, LocationPath, node_label};
use stockroom_suppliers::PaymentMethod;

use crate::store::Tables;

fn matches_search(search: Option<&str>, fields: &[&str]) -> bool {
    let Some(search) = search else {
        return true;
    };
    let fields: Vec<String> = fields.iter().map(|f| f.to_lowercase()).collect();
    search.split_whitespace().all(|term| {
        let term = term.to_lowercase();
        fields.iter().any(|field| field.contains(&term))
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierQuery {
    /// Matched against name, email and main contact.
    pub search: Option<String>,
    pub active: Option<bool>,
    pub payment_method: Option<PaymentMethod>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierRow {
    pub id: SupplierId,
    pub name: String,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub active: bool,
    pub payment_method: PaymentMethod,
}

/// Suppliers ordered by name.
pub fn suppliers(tables: &Tables, query: &SupplierQuery) -> Vec<SupplierRow> {
    let mut rows: Vec<SupplierRow> = tables
        .suppliers()
        .filter(|s| query.active.is_none_or(|active| s.is_active() == active))
        .filter(|s| query.payment_method.is_none_or(|m| s.payment_method() == m))
        .filter(|s| {
            matches_search(
                query.search.as_deref(),
                &[
                    s.name(),
                    s.email().unwrap_or_default(),
                    s.main_contact().unwrap_or_default(),
                ],
            )
        })
        .map(|s| SupplierRow {
            id: s.id_typed(),
            name: s.name().to_string(),
            contact_number: s.contact_number().map(str::to_string),
            email: s.email().map(str::to_string),
            active: s.is_active(),
            payment_method: s.payment_method(),
        })
        .collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name));
    rows
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemQuery {
    /// Matched against item code and name.
    pub search: Option<String>,
    pub category_id: Option<CategoryId>,
    pub supplier_id: Option<SupplierId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRow {
    pub id: ItemId,
    pub code: String,
    pub name: String,
    pub category: String,
    pub supplier: String,
    pub price: Money,
    pub internal_value: Money,
}

/// Catalog items ordered by code.
pub fn items(tables: &Tables, query: &ItemQuery) -> Vec<ItemRow> {
    let mut rows: Vec<ItemRow> = tables
        .items()
        .filter(|i| query.category_id.is_none_or(|id| i.category_id() == id))
        .filter(|i| query.supplier_id.is_none_or(|id| i.supplier_id() == id))
        .filter(|i| matches_search(query.search.as_deref(), &[i.code(), i.name()]))
        .map(|i| ItemRow {
            id: i.id_typed(),
            code: i.code().to_string(),
            name: i.name().to_string(),
            category: tables
                .category(i.category_id())
                .map(|c| c.name().to_string())
                .unwrap_or_default(),
            supplier: tables
                .supplier(i.supplier_id())
                .map(|s| s.name().to_string())
                .unwrap_or_default(),
            price: i.price(),
            internal_value: i.internal_value(),
        })
        .collect();
    rows.sort_by(|a, b| a.code.cmp(&b.code));
    rows
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryQuery {
    /// Matched against item name and item code.
    pub search: Option<String>,
    /// Only rows stored somewhere under this location.
    pub location_id: Option<LocationId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRow {
    pub id: InventoryId,
    pub item_id: ItemId,
    pub item_name: String,
    pub quantity: u32,
    pub path: LocationPath,
    pub last_updated: DateTime<Utc>,
}

/// Ledger rows ordered by item name, then breadcrumb.
///
/// Fails with `NotFound` only if a row points into a broken hierarchy chain.
pub fn inventory(tables: &Tables, query: &InventoryQuery) -> DomainResult<Vec<InventoryRow>> {
    let mut rows = Vec::new();
    for record in tables.inventory() {
        let Some(item) = tables.item(record.item_id()) else {
            continue;
        };
        if !matches_search(query.search.as_deref(), &[item.name(), item.code()]) {
            continue;
        }
        let path = LocationPath::resolve(tables, record.sub_area_id())?;
        if query.location_id.is_some_and(|id| path.location_id() != id) {
            continue;
        }
        rows.push(InventoryRow {
            id: record.id_typed(),
            item_id: item.id_typed(),
            item_name: item.name().to_string(),
            quantity: record.quantity().get(),
            path,
            last_updated: record.last_updated(),
        });
    }
    rows.sort_by(|a, b| {
        a.item_name
            .cmp(&b.item_name)
            .then_with(|| a.path.to_string().cmp(&b.path.to_string()))
    });
    Ok(rows)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeQuery<P> {
    /// Matched against the node's name and its parent's name.
    pub search: Option<String>,
    pub parent: Option<P>,
}

impl<P> Default for NodeQuery<P> {
    fn default() -> Self {
        Self {
            search: None,
            parent: None,
        }
    }
}

/// One hierarchy node with its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRow<Id, P> {
    pub id: Id,
    pub name: String,
    pub parent_id: P,
    pub parent_name: String,
    /// `"<parent name> - <name>"`.
    pub label: String,
}

/// Root locations ordered by name.
pub fn locations(tables: &Tables, search: Option<&str>) -> Vec<NodeRow<LocationId, ()>> {
    let mut rows: Vec<_> = tables
        .locations()
        .filter(|l| matches_search(search, &[l.name()]))
        .map(|l| NodeRow {
            id: l.id_typed(),
            name: l.name().to_string(),
            parent_id: (),
            parent_name: String::new(),
            label: l.name().to_string(),
        })
        .collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name));
    rows
}

pub fn sub_locations(
    tables: &Tables,
    query: &NodeQuery<LocationId>,
) -> Vec<NodeRow<SubLocationId, LocationId>> {
    child_rows(tables.sub_locations(), |id| tables.location(id).map(|p| p.name()), query)
}

pub fn areas(tables: &Tables, query: &NodeQuery<SubLocationId>) -> Vec<NodeRow<AreaId, SubLocationId>> {
    child_rows(tables.areas(), |id| tables.sub_location(id).map(|p| p.name()), query)
}

pub fn sub_areas(tables: &Tables, query: &NodeQuery<AreaId>) -> Vec<NodeRow<SubAreaId, AreaId>> {
    child_rows(tables.sub_areas(), |id| tables.area(id).map(|p| p.name()), query)
}

/// Rows ordered by label, so siblings group under their parent.
fn child_rows<'t, N, P>(
    nodes: impl Iterator<Item = &'t N>,
    parent_name: impl Fn(P) -> Option<&'t str>,
    query: &NodeQuery<P>,
) -> Vec<NodeRow<N::Id, P>>
where
    N: HierarchyNode<ParentId = P> + 't,
    P: Copy + Eq,
{
    let mut rows: Vec<NodeRow<N::Id, P>> = nodes
        .filter(|n| query.parent.is_none_or(|p| n.parent_id() == p))
        .filter_map(|n| {
            let parent = parent_name(n.parent_id()).unwrap_or_default();
            matches_search(query.search.as_deref(), &[n.name(), parent]).then(|| NodeRow {
                id: *n.id(),
                name: n.name().to_string(),
                parent_id: n.parent_id(),
                parent_name: parent.to_string(),
                label: node_label(parent, n.name()),
            })
        })
        .collect();
    rows.sort_by(|a, b| a.label.cmp(&b.label));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Warehouse;
    use crate::store::Store;
    use rust_decimal_macros::dec;
    use stockroom_catalog::NewItem;
    use stockroom_suppliers::NewSupplier;

    #[test]
    fn search_requires_every_term() {
        assert!(matches_search(Some("acme widg"), &["Acme", "Widgets Ltd"]));
        assert!(!matches_search(Some("acme bolts"), &["Acme", "Widgets Ltd"]));
        assert!(matches_search(Some("   "), &["anything"]));
        assert!(matches_search(None, &[]));
    }

    #[test]
    fn supplier_view_filters_and_orders() {
        let warehouse = Warehouse::in_memory();
        let suppliers = warehouse.suppliers();
        suppliers
            .create(NewSupplier::named("Zeta Parts").with_payment_method(PaymentMethod::Cash))
            .unwrap();
        let acme = suppliers
            .create(NewSupplier::named("Acme").with_main_contact("Road Runner"))
            .unwrap();
        suppliers.set_status(acme.id_typed(), false).unwrap();
        suppliers.create(NewSupplier::named("Beta Supply")).unwrap();

        let all = warehouse
            .store()
            .read(|t| suppliers_names(t, &SupplierQuery::default()))
            .unwrap();
        assert_eq!(all, ["Acme", "Beta Supply", "Zeta Parts"]);

        let active = SupplierQuery {
            active: Some(true),
            ..SupplierQuery::default()
        };
        let names = warehouse.store().read(|t| suppliers_names(t, &active)).unwrap();
        assert_eq!(names, ["Beta Supply", "Zeta Parts"]);

        let by_contact = SupplierQuery {
            search: Some("runner".to_string()),
            ..SupplierQuery::default()
        };
        let names = warehouse.store().read(|t| suppliers_names(t, &by_contact)).unwrap();
        assert_eq!(names, ["Acme"]);

        let cash = SupplierQuery {
            payment_method: Some(PaymentMethod::Cash),
            ..SupplierQuery::default()
        };
        let names = warehouse.store().read(|t| suppliers_names(t, &cash)).unwrap();
        assert_eq!(names, ["Zeta Parts"]);
    }

    fn suppliers_names(t: &Tables, query: &SupplierQuery) -> Vec<String> {
        suppliers(t, query).into_iter().map(|r| r.name).collect()
    }

    #[test]
    fn inventory_view_shows_paths_and_filters_by_root() {
        let warehouse = Warehouse::in_memory();
        let category = warehouse.categories().create("Parts").unwrap();
        let supplier = warehouse.suppliers().create(NewSupplier::named("Acme")).unwrap();
        let item = warehouse
            .items()
            .create(NewItem {
                code: "W-1".to_string(),
                name: "Widget".to_string(),
                description: None,
                category_id: category.id_typed(),
                supplier_id: supplier.id_typed(),
                price: dec!(1.50),
                internal_value: dec!(0.75),
            })
            .unwrap();

        let locations = warehouse.locations();
        let north = locations.create_location("North").unwrap();
        let zone = locations.create_sub_location(north.id_typed(), "Zone 1").unwrap();
        let rack = locations.create_area(zone.id_typed(), "Rack 1").unwrap();
        let shelf = locations.create_sub_area(rack.id_typed(), "Shelf 1").unwrap();
        warehouse.inventory().create(item.id_typed(), shelf.id_typed(), 4).unwrap();
        let unassigned = warehouse.inventory().create_unassigned(item.id_typed(), 1).unwrap();

        let rows = warehouse
            .store()
            .read(|t| inventory(t, &InventoryQuery::default()))
            .unwrap()
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].path.to_string(), "North > Zone 1 > Rack 1 > Shelf 1");

        let north_only = InventoryQuery {
            search: Some("w-1".to_string()),
            location_id: Some(north.id_typed()),
        };
        let rows = warehouse.store().read(|t| inventory(t, &north_only)).unwrap().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].quantity, 4);
        assert_ne!(rows[0].id, unassigned.id_typed());
    }

    fn new_item(code: &str, name: &str, category_id: CategoryId, supplier_id: SupplierId) -> NewItem {
        NewItem {
            code: code.to_string(),
            name: name.to_string(),
            description: None,
            category_id,
            supplier_id,
            price: dec!(2.00),
            internal_value: dec!(1.00),
        }
    }

    fn item_codes(t: &Tables, query: &ItemQuery) -> Vec<String> {
        items(t, query).into_iter().map(|r| r.code).collect()
    }

    #[test]
    fn item_view_searches_filters_and_orders_by_code() {
        let warehouse = Warehouse::in_memory();
        let hardware = warehouse.categories().create("Hardware").unwrap().id_typed();
        let cables = warehouse.categories().create("Cables").unwrap().id_typed();
        let acme = warehouse.suppliers().create(NewSupplier::named("Acme")).unwrap().id_typed();
        let bolt_co = warehouse.suppliers().create(NewSupplier::named("Bolt Co")).unwrap().id_typed();

        let catalog = warehouse.items();
        catalog.create(new_item("C-2", "Copper Cable", cables, acme)).unwrap();
        catalog.create(new_item("A-9", "Anchor Bolt", hardware, bolt_co)).unwrap();
        catalog.create(new_item("B-1", "Brass Hinge", hardware, acme)).unwrap();

        let all = warehouse
            .store()
            .read(|t| item_codes(t, &ItemQuery::default()))
            .unwrap();
        assert_eq!(all, ["A-9", "B-1", "C-2"]);

        let by_code = ItemQuery {
            search: Some("c-2".to_string()),
            ..ItemQuery::default()
        };
        assert_eq!(warehouse.store().read(|t| item_codes(t, &by_code)).unwrap(), ["C-2"]);

        let by_name = ItemQuery {
            search: Some("bolt anchor".to_string()),
            ..ItemQuery::default()
        };
        assert_eq!(warehouse.store().read(|t| item_codes(t, &by_name)).unwrap(), ["A-9"]);

        let by_category = ItemQuery {
            category_id: Some(hardware),
            ..ItemQuery::default()
        };
        assert_eq!(
            warehouse.store().read(|t| item_codes(t, &by_category)).unwrap(),
            ["A-9", "B-1"]
        );

        let by_supplier = ItemQuery {
            supplier_id: Some(acme),
            ..ItemQuery::default()
        };
        assert_eq!(
            warehouse.store().read(|t| item_codes(t, &by_supplier)).unwrap(),
            ["B-1", "C-2"]
        );

        let rows = warehouse
            .store()
            .read(|t| items(t, &by_category))
            .unwrap();
        assert_eq!(rows[0].category, "Hardware");
        assert_eq!(rows[0].supplier, "Bolt Co");
        assert_eq!(rows[0].price.to_string(), "2.00");
    }

    #[test]
    fn area_and_sub_area_views_filter_by_parent() {
        let warehouse = Warehouse::in_memory();
        let hierarchy = warehouse.locations();
        let site = hierarchy.create_location("Site").unwrap();
        let east = hierarchy.create_sub_location(site.id_typed(), "East Wing").unwrap();
        let west = hierarchy.create_sub_location(site.id_typed(), "West Wing").unwrap();
        let east_rack = hierarchy.create_area(east.id_typed(), "Rack 1").unwrap();
        let west_rack = hierarchy.create_area(west.id_typed(), "Rack 1").unwrap();
        hierarchy.create_area(west.id_typed(), "Rack 2").unwrap();
        hierarchy.create_sub_area(east_rack.id_typed(), "Shelf A").unwrap();
        hierarchy.create_sub_area(west_rack.id_typed(), "Shelf A").unwrap();
        hierarchy.create_sub_area(west_rack.id_typed(), "Shelf B").unwrap();

        let west_only = NodeQuery {
            search: None,
            parent: Some(west.id_typed()),
        };
        let rows = warehouse.store().read(|t| areas(t, &west_only)).unwrap();
        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["West Wing - Rack 1", "West Wing - Rack 2"]);
        assert!(rows.iter().all(|r| r.parent_id == west.id_typed()));

        let east_search = NodeQuery {
            search: Some("east".to_string()),
            parent: None,
        };
        let rows = warehouse.store().read(|t| areas(t, &east_search)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, east_rack.id_typed());

        let west_shelves = NodeQuery {
            search: None,
            parent: Some(west_rack.id_typed()),
        };
        let rows = warehouse.store().read(|t| sub_areas(t, &west_shelves)).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.parent_name == "Rack 1"));

        let by_parent_name = NodeQuery {
            search: Some("rack shelf b".to_string()),
            parent: None,
        };
        let rows = warehouse.store().read(|t| sub_areas(t, &by_parent_name)).unwrap();
        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["Rack 1 - Shelf B"]);
    }

    #[test]
    fn child_views_search_parent_names() {
        let warehouse = Warehouse::in_memory();
        let hierarchy = warehouse.locations();
        let alpha = hierarchy.create_location("Alpha").unwrap();
        let beta = hierarchy.create_location("Beta").unwrap();
        hierarchy.create_sub_location(alpha.id_typed(), "Ground").unwrap();
        hierarchy.create_sub_location(beta.id_typed(), "Ground").unwrap();
        hierarchy.create_sub_location(beta.id_typed(), "Mezzanine").unwrap();

        let query = NodeQuery {
            search: Some("beta".to_string()),
            parent: None,
        };
        let rows = warehouse.store().read(|t| sub_locations(t, &query)).unwrap();
        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["Beta - Ground", "Beta - Mezzanine"]);

        let query = NodeQuery {
            search: None,
            parent: Some(alpha.id_typed()),
        };
        let rows = warehouse.store().read(|t| sub_locations(t, &query)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].parent_name, "Alpha");

        let roots = warehouse.store().read(|t| locations(t, Some("alp"))).unwrap();
        assert_eq!(roots.len(), 1);
    }
}
