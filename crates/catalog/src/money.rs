//! Non-negative monetary amounts with exactly two fractional digits.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, ValueObject};

/// Fractional digits stored for every amount.
pub const SCALE: u32 = 2;

/// Total significant digits allowed (integer part + [`SCALE`]).
pub const MAX_DIGITS: u32 = 10;

/// Monetary amount, always stored with scale 2 and never negative.
///
/// Inputs with more fractional digits are rounded half away from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::from_parts(0, 0, 0, false, SCALE));

    /// Largest storable amount: 99,999,999.99.
    pub fn max() -> Money {
        Money(Decimal::new(10_i64.pow(MAX_DIGITS) - 1, SCALE))
    }

    pub fn new(amount: Decimal) -> DomainResult<Self> {
        Self::for_field("amount", amount)
    }

    /// Validate `amount` on behalf of a named field so errors point at it.
    pub fn for_field(field: &'static str, amount: Decimal) -> DomainResult<Self> {
        if amount < Decimal::ZERO {
            return Err(DomainError::out_of_range(field, amount, "must not be negative"));
        }
        let mut rounded = amount.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(SCALE);
        if rounded > Self::max().0 {
            return Err(DomainError::out_of_range(
                field,
                amount,
                format!("at most {} digits with {SCALE} decimal places", MAX_DIGITS),
            ));
        }
        Ok(Self(rounded))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }
}

impl ValueObject for Money {}

impl TryFrom<Decimal> for Money {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Money::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl core::str::FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str_exact(s.trim())
            .map_err(|_| DomainError::invalid_format("amount", s))?;
        Money::new(amount)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}
