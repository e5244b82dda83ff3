//! Price level entry
//!
//! One resting quantity at one price, tagged with the feed sequence number
//! that last touched it. Entries are never edited in place: a repeated price
//! replaces the whole entry.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::numeric::{BookNumber, Shared};

/// A single aggregated level in one side of the book
///
/// `update_id` and `order_count` never take part in price ordering; the
/// cross resolver reads them only as tie-breaks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevelEntry<N = Decimal> {
    price: Shared<N>,
    amount: Shared<N>,
    update_id: u64,
    order_count: u32,
}

impl<N: BookNumber> PriceLevelEntry<N> {
    /// Create a level contributed by a single order
    pub fn new(price: Shared<N>, amount: Shared<N>, update_id: u64) -> Self {
        Self::with_order_count(price, amount, update_id, 1)
    }

    /// Create an aggregated level
    pub fn with_order_count(
        price: Shared<N>,
        amount: Shared<N>,
        update_id: u64,
        order_count: u32,
    ) -> Self {
        Self {
            price,
            amount,
            update_id,
            order_count,
        }
    }

    pub fn price(&self) -> &Shared<N> {
        &self.price
    }

    pub fn amount(&self) -> &Shared<N> {
        &self.amount
    }

    pub fn update_id(&self) -> u64 {
        self.update_id
    }

    pub fn order_count(&self) -> u32 {
        self.order_count
    }

    /// `price × amount`
    pub fn notional(&self) -> N {
        Shared::notional(&self.price, &self.amount)
    }

    /// `price × amount`, or `None` when it overflows `N`
    pub fn checked_notional(&self) -> Option<N> {
        Shared::checked_notional(&self.price, &self.amount)
    }

    /// A zero-amount level is logically absent
    pub fn is_empty(&self) -> bool {
        self.amount.is_zero()
    }
}
