use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{
    DomainError, DomainResult, Entity, InventoryId, ItemId, SubAreaId, ValueObject,
};

/// Units of one item held at one sub area. Never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Quantity(u32);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);

    /// Largest storable quantity (a signed 32-bit column's maximum).
    pub const MAX: Quantity = Quantity(i32::MAX as u32);

    pub fn new(value: i64) -> DomainResult<Self> {
        if value < 0 {
            return Err(DomainError::out_of_range("quantity", value, "must not be negative"));
        }
        if value > i64::from(Self::MAX.0) {
            return Err(DomainError::out_of_range(
                "quantity",
                value,
                format!("at most {}", Self::MAX.0),
            ));
        }
        Ok(Self(value as u32))
    }

    /// Apply a signed stock movement.
    pub fn adjusted(self, delta: i64) -> DomainResult<Self> {
        let next = i64::from(self.0)
            .checked_add(delta)
            .ok_or_else(|| DomainError::out_of_range("quantity", delta, "adjustment overflows"))?;
        if next < 0 {
            return Err(DomainError::out_of_range(
                "quantity",
                next,
                format!("stock cannot go negative (have {}, delta {delta})", self.0),
            ));
        }
        Self::new(next)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl ValueObject for Quantity {}

impl TryFrom<i64> for Quantity {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Quantity::new(value)
    }
}

impl From<Quantity> for i64 {
    fn from(value: Quantity) -> Self {
        i64::from(value.0)
    }
}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Ledger row: the quantity of one item at one sub area.
///
/// At most one row exists per (item, sub area) pair; the store enforces it.
/// `last_updated` moves on every successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    id: InventoryId,
    item_id: ItemId,
    sub_area_id: SubAreaId,
    quantity: Quantity,
    last_updated: DateTime<Utc>,
}

impl InventoryRecord {
    pub fn new(
        id: InventoryId,
        item_id: ItemId,
        sub_area_id: SubAreaId,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        Ok(Self {
            id,
            item_id,
            sub_area_id,
            quantity: Quantity::new(quantity)?,
            last_updated: now,
        })
    }

    /// Replace the quantity.
    pub fn with_quantity(&self, quantity: i64, now: DateTime<Utc>) -> DomainResult<Self> {
        Ok(Self {
            quantity: Quantity::new(quantity)?,
            last_updated: now,
            ..self.clone()
        })
    }

    /// Move stock in (`delta > 0`) or out (`delta < 0`).
    pub fn adjusted(&self, delta: i64, now: DateTime<Utc>) -> DomainResult<Self> {
        if delta == 0 {
            return Err(DomainError::out_of_range("delta", delta, "cannot be zero"));
        }
        Ok(Self {
            quantity: self.quantity.adjusted(delta)?,
            last_updated: now,
            ..self.clone()
        })
    }

    pub fn id_typed(&self) -> InventoryId {
        self.id
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn sub_area_id(&self) -> SubAreaId {
        self.sub_area_id
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    /// Display label, `"<item name> at <sub area name>"`.
    pub fn label(&self, item_name: &str, sub_area_name: &str) -> String {
        format!("{item_name} at {sub_area_name}")
    }
}

impl Entity for InventoryRecord {
    type Id = InventoryId;
    const KIND: &'static str = "inventory";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn record(quantity: i64) -> InventoryRecord {
        InventoryRecord::new(
            InventoryId::new(),
            ItemId::new(),
            SubAreaId::new(),
            quantity,
            test_time(),
        )
        .unwrap()
    }

    #[test]
    fn new_record_keeps_quantity() {
        let row = record(10);
        assert_eq!(row.quantity().get(), 10);
        assert_eq!(row.label("Test Item", "Shelf 1"), "Test Item at Shelf 1");
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let err = InventoryRecord::new(
            InventoryId::new(),
            ItemId::new(),
            SubAreaId::new(),
            -1,
            test_time(),
        )
        .unwrap_err();
        match err {
            DomainError::RangeViolation { field, .. } => assert_eq!(field, "quantity"),
            _ => panic!("Expected RangeViolation for negative quantity"),
        }
    }

    #[test]
    fn with_quantity_moves_timestamp_and_keeps_links() {
        let row = record(100);
        let later = row.last_updated() + Duration::seconds(5);
        let updated = row.with_quantity(7, later).unwrap();
        assert_eq!(updated.quantity().get(), 7);
        assert_eq!(updated.last_updated(), later);
        assert_eq!(updated.item_id(), row.item_id());
        assert_eq!(updated.sub_area_id(), row.sub_area_id());
        assert!(row.with_quantity(-1, later).is_err());
    }

    #[test]
    fn adjust_rejects_going_negative() {
        let row = record(3);
        let err = row.adjusted(-4, test_time()).unwrap_err();
        match err {
            DomainError::RangeViolation { reason, .. } => {
                assert!(reason.contains("stock cannot go negative"))
            }
            _ => panic!("Expected RangeViolation"),
        }
        assert_eq!(row.adjusted(-3, test_time()).unwrap().quantity(), Quantity::ZERO);
    }

    #[test]
    fn adjust_rejects_zero_delta() {
        assert!(record(1).adjusted(0, test_time()).is_err());
    }

    #[test]
    fn quantity_upper_bound() {
        assert_eq!(Quantity::new(i64::from(i32::MAX)).unwrap(), Quantity::MAX);
        assert!(Quantity::new(i64::from(i32::MAX) + 1).is_err());
        assert!(Quantity::MAX.adjusted(1).is_err());
    }

    #[test]
    fn quantity_deserialization_validates() {
        let q: Quantity = serde_json::from_str("12").unwrap();
        assert_eq!(q.get(), 12);
        assert!(serde_json::from_str::<Quantity>("-1").is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 512,
            ..ProptestConfig::default()
        })]

        /// Property: no sequence of adjustments can produce a negative quantity;
        /// rejected adjustments leave the quantity unchanged.
        #[test]
        fn adjustments_never_go_negative(
            start in 0i64..1_000,
            deltas in prop::collection::vec(-500i64..500, 0..30)
        ) {
            let mut quantity = Quantity::new(start).unwrap();
            let mut expected = start;
            for delta in deltas {
                match quantity.adjusted(delta) {
                    Ok(next) => {
                        expected += delta;
                        quantity = next;
                    }
                    Err(_) => prop_assert!(expected + delta < 0),
                }
                prop_assert_eq!(i64::from(quantity), expected);
            }
        }
    }
}
