use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockroom_core::validate::{optional_free_text, required_text};
use stockroom_core::{CategoryId, DomainResult, Entity, ItemId, SupplierId};

use crate::money::Money;

pub const CODE_MAX: usize = 10;
pub const NAME_MAX: usize = 200;

/// A stocked item. `code` is globally unique.
///
/// Category and supplier are references that block their own deletion while
/// any item points at them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    code: String,
    name: String,
    description: Option<String>,
    category_id: CategoryId,
    supplier_id: SupplierId,
    price: Money,
    internal_value: Money,
}

/// Input for creating an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub category_id: CategoryId,
    pub supplier_id: SupplierId,
    pub price: Decimal,
    pub internal_value: Decimal,
}

/// Partial update of an item. `None` keeps the existing value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemChanges {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub category_id: Option<CategoryId>,
    pub supplier_id: Option<SupplierId>,
    pub price: Option<Decimal>,
    pub internal_value: Option<Decimal>,
}

impl ItemChanges {
    /// Whether the change re-points the item at another category or supplier.
    pub fn touches_references(&self) -> bool {
        self.category_id.is_some() || self.supplier_id.is_some()
    }
}

impl Item {
    /// Validate input and build the record.
    ///
    /// Code uniqueness and the existence of the category and supplier are
    /// checked by the store.
    pub fn new(id: ItemId, new: &NewItem) -> DomainResult<Self> {
        Ok(Self {
            id,
            code: required_text("item_code", &new.code, CODE_MAX)?,
            name: required_text("name", &new.name, NAME_MAX)?,
            description: optional_free_text(new.description.as_deref()),
            category_id: new.category_id,
            supplier_id: new.supplier_id,
            price: Money::for_field("price", new.price)?,
            internal_value: Money::for_field("internal_value", new.internal_value)?,
        })
    }

    pub fn with_changes(&self, changes: &ItemChanges) -> DomainResult<Self> {
        let mut next = self.clone();
        if let Some(code) = &changes.code {
            next.code = required_text("item_code", code, CODE_MAX)?;
        }
        if let Some(name) = &changes.name {
            next.name = required_text("name", name, NAME_MAX)?;
        }
        if let Some(description) = &changes.description {
            next.description = optional_free_text(description.as_deref());
        }
        if let Some(category_id) = changes.category_id {
            next.category_id = category_id;
        }
        if let Some(supplier_id) = changes.supplier_id {
            next.supplier_id = supplier_id;
        }
        if let Some(price) = changes.price {
            next.price = Money::for_field("price", price)?;
        }
        if let Some(value) = changes.internal_value {
            next.internal_value = Money::for_field("internal_value", value)?;
        }
        Ok(next)
    }

    pub fn id_typed(&self) -> ItemId {
        self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    pub fn supplier_id(&self) -> SupplierId {
        self.supplier_id
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn internal_value(&self) -> Money {
        self.internal_value
    }
}

impl Entity for Item {
    type Id = ItemId;
    const KIND: &'static str = "item";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl core::fmt::Display for Item {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[{}] {}", self.code, self.name)
    }
}
