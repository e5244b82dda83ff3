//! Order expiry entries
//!
//! [`OrderExpirationEntry`] orders by expiration time first and order id
//! second, so a `BTreeSet` (or a min-heap via `Reverse`) of entries always
//! yields the earliest-expiring order first. The queue itself belongs to the
//! host.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::ids::{ClientOrderId, TradingPair};

/// Expiry record for one resting order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderExpirationEntry {
    trading_pair: TradingPair,
    order_id: ClientOrderId,
    /// Unix nanos at which the order was placed
    timestamp: i64,
    /// Unix nanos at which the order expires
    expiration_timestamp: i64,
}

impl OrderExpirationEntry {
    pub fn new(
        trading_pair: impl Into<TradingPair>,
        order_id: impl Into<ClientOrderId>,
        timestamp: i64,
        expiration_timestamp: i64,
    ) -> Self {
        Self {
            trading_pair: trading_pair.into(),
            order_id: order_id.into(),
            timestamp,
            expiration_timestamp,
        }
    }

    pub fn trading_pair(&self) -> &TradingPair {
        &self.trading_pair
    }

    pub fn order_id(&self) -> &ClientOrderId {
        &self.order_id
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn expiration_timestamp(&self) -> i64 {
        self.expiration_timestamp
    }

    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.expiration_timestamp
    }
}

impl PartialOrd for OrderExpirationEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderExpirationEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.expiration_timestamp
            .cmp(&other.expiration_timestamp)
            .then_with(|| self.order_id.cmp(&other.order_id))
            // Keeps Ord consistent with the derived Eq
            .then_with(|| self.trading_pair.cmp(&other.trading_pair))
            .then_with(|| self.timestamp.cmp(&other.timestamp))
    }
}
