//! Numeric handles for prices and quantities
//!
//! Book entries and limit orders never own their numbers outright: the host
//! hands out values that may be referenced from many places at once (a level
//! in the book, a resting order, a snapshot sent downstream). [`Shared`] is a
//! read-only, reference-counted handle over any [`BookNumber`]; cloning it
//! shares the value and dropping the last clone releases it.
//!
//! `rust_decimal::Decimal` is the default numeric type (deterministic
//! arithmetic, no floating-point error).

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Deref, Div, Mul, Sub};
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Numeric contract a host type must satisfy to be stored in the book.
///
/// Only a total order and the handful of arithmetic operations used for
/// notional value, remaining quantity and volume-weighted prices are required.
pub trait BookNumber:
    Ord
    + Clone
    + fmt::Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    /// The additive identity.
    fn zero() -> Self;

    /// `self × rhs`, or `None` on overflow.
    fn checked_mul(&self, rhs: &Self) -> Option<Self>;

    /// `self + rhs`, or `None` on overflow.
    fn checked_add(&self, rhs: &Self) -> Option<Self>;

    fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    fn is_negative(&self) -> bool {
        *self < Self::zero()
    }
}

impl BookNumber for Decimal {
    fn zero() -> Self {
        Decimal::ZERO
    }

    fn checked_mul(&self, rhs: &Self) -> Option<Self> {
        Decimal::checked_mul(*self, *rhs)
    }

    fn checked_add(&self, rhs: &Self) -> Option<Self> {
        Decimal::checked_add(*self, *rhs)
    }
}

impl BookNumber for i64 {
    fn zero() -> Self {
        0
    }

    fn checked_mul(&self, rhs: &Self) -> Option<Self> {
        i64::checked_mul(*self, *rhs)
    }

    fn checked_add(&self, rhs: &Self) -> Option<Self> {
        i64::checked_add(*self, *rhs)
    }
}

impl BookNumber for u64 {
    fn zero() -> Self {
        0
    }

    fn checked_mul(&self, rhs: &Self) -> Option<Self> {
        u64::checked_mul(*self, *rhs)
    }

    fn checked_add(&self, rhs: &Self) -> Option<Self> {
        u64::checked_add(*self, *rhs)
    }
}

/// Shared, read-only handle to a host numeric value.
///
/// Ordering and equality delegate to the inner value, so handles can key a
/// `BTreeMap` directly.
pub struct Shared<N>(Arc<N>);

/// Price handle over the default decimal type
pub type Price = Shared<Decimal>;

/// Quantity handle over the default decimal type
pub type Quantity = Shared<Decimal>;

impl<N> Shared<N> {
    pub fn new(value: N) -> Self {
        Self(Arc::new(value))
    }

    /// Number of live handles sharing this value.
    pub fn handle_count(this: &Self) -> usize {
        Arc::strong_count(&this.0)
    }

    /// Whether two handles point at the same allocation.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl<N: BookNumber> Shared<N> {
    /// Copy of the inner value.
    pub fn value(&self) -> N {
        N::clone(&self.0)
    }

    /// Notional value: `price × amount`.
    pub fn notional(price: &Self, amount: &Self) -> N {
        price.value() * amount.value()
    }

    /// Notional value, or `None` when `price × amount` overflows `N`.
    pub fn checked_notional(price: &Self, amount: &Self) -> Option<N> {
        price.0.checked_mul(&amount.0)
    }

    pub fn zero() -> Self {
        Self::new(N::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }
}

impl Shared<Decimal> {
    /// Parse a decimal string into a handle.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, rust_decimal::Error> {
        s.parse::<Decimal>().map(Self::new)
    }

    pub fn from_u64(value: u64) -> Self {
        Self::new(Decimal::from(value))
    }

    pub fn as_decimal(&self) -> Decimal {
        *self.0
    }
}

impl<N> Clone for Shared<N> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<N> Deref for Shared<N> {
    type Target = N;

    fn deref(&self) -> &N {
        &self.0
    }
}

// Lets a `BTreeMap<Shared<N>, _>` be queried with a plain `&N`
impl<N> Borrow<N> for Shared<N> {
    fn borrow(&self) -> &N {
        &self.0
    }
}

impl<N> From<N> for Shared<N> {
    fn from(value: N) -> Self {
        Self::new(value)
    }
}

impl<N: PartialEq> PartialEq for Shared<N> {
    fn eq(&self, other: &Self) -> bool {
        *self.0 == *other.0
    }
}

impl<N: Eq> Eq for Shared<N> {}

impl<N: PartialOrd> PartialOrd for Shared<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        (*self.0).partial_cmp(&*other.0)
    }
}

impl<N: Ord> Ord for Shared<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        (*self.0).cmp(&*other.0)
    }
}

impl<N: fmt::Debug> fmt::Debug for Shared<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (*self.0).fmt(f)
    }
}

impl<N: fmt::Display> fmt::Display for Shared<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (*self.0).fmt(f)
    }
}

impl<N: Serialize> Serialize for Shared<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (*self.0).serialize(serializer)
    }
}

impl<'de, N: Deserialize<'de>> Deserialize<'de> for Shared<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        N::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_value() {
        let price = Price::from_str("100.25").unwrap();
        assert_eq!(Shared::handle_count(&price), 1);

        let copy = price.clone();
        assert!(Shared::ptr_eq(&price, &copy));
        assert_eq!(Shared::handle_count(&price), 2);

        drop(copy);
        assert_eq!(Shared::handle_count(&price), 1);
    }

    #[test]
    fn test_ordering_delegates_to_value() {
        let low = Price::from_str("99.9").unwrap();
        let high = Price::from_str("100.0").unwrap();
        assert!(low < high);
        // Distinct allocations with equal values compare equal
        assert_eq!(Price::from_u64(100), Price::from_str("100.00").unwrap());
    }

    #[test]
    fn test_notional() {
        let price = Price::from_str("100.91").unwrap();
        let amount = Quantity::from_str("2").unwrap();
        assert_eq!(
            Shared::notional(&price, &amount),
            Decimal::from_str_exact("201.82").unwrap()
        );
    }

    #[test]
    fn test_integer_handles() {
        let a: Shared<i64> = Shared::new(-3);
        assert!(a.is_negative());
        assert!(Shared::<u64>::zero().is_zero());
        assert_eq!(Shared::notional(&Shared::new(4u64), &Shared::new(5u64)), 20);
    }

    #[test]
    fn test_checked_notional_overflow() {
        let big = Shared::new(Decimal::MAX);
        assert_eq!(Shared::checked_notional(&big, &Shared::new(Decimal::TWO)), None);
        assert_eq!(
            Shared::checked_notional(&Shared::new(3i64), &Shared::new(7i64)),
            Some(21)
        );
        assert_eq!(Shared::checked_notional(&Shared::new(u64::MAX), &Shared::new(2u64)), None);
    }

    #[test]
    fn test_serializes_as_inner_value() {
        let qty = Quantity::from_str("1.5").unwrap();
        let json = serde_json::to_string(&qty).unwrap();
        assert_eq!(json, "\"1.5\"");

        let back: Quantity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, qty);
    }
}
