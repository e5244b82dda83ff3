//! Feed-facing event structures
//!
//! Level updates consumed from a venue feed, and the snapshots and outcomes
//! the book hands back.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::ids::{Side, TradingPair};
use types::numeric::{BookNumber, Shared};

use crate::book::PriceLevelEntry;
use crate::crossing::CrossResolution;

/// One `(price, amount, update_id[, order_count])` level update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookUpdate<N = Decimal> {
    pub price: Shared<N>,
    /// Zero erases the level
    pub amount: Shared<N>,
    pub update_id: u64,
    /// Aggregated feeds only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_count: Option<u32>,
}

impl<N: BookNumber> BookUpdate<N> {
    pub fn new(price: Shared<N>, amount: Shared<N>, update_id: u64) -> Self {
        Self {
            price,
            amount,
            update_id,
            order_count: None,
        }
    }

    pub fn with_order_count(mut self, order_count: u32) -> Self {
        self.order_count = Some(order_count);
        self
    }

    pub fn into_entry(self) -> PriceLevelEntry<N> {
        PriceLevelEntry::with_order_count(
            self.price,
            self.amount,
            self.update_id,
            self.order_count.unwrap_or(1),
        )
    }
}

/// Public trade print from the venue feed
///
/// Trades only move the last traded price; resting levels change through
/// the level updates that follow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeEvent<N = Decimal> {
    pub price: Shared<N>,
    pub amount: Shared<N>,
    /// Aggressor side
    pub side: Side,
    /// Unix nanos
    pub timestamp: i64,
}

impl<N: BookNumber> TradeEvent<N> {
    pub fn new(price: Shared<N>, amount: Shared<N>, side: Side, timestamp: i64) -> Self {
        Self {
            price,
            amount,
            side,
            timestamp,
        }
    }
}

/// Depth snapshot of one instrument's book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthSnapshot<N = Decimal> {
    pub trading_pair: TradingPair,
    /// Bids in descending price order (best first)
    pub bids: Vec<PriceLevelEntry<N>>,
    /// Asks in ascending price order (best first)
    pub asks: Vec<PriceLevelEntry<N>>,
    pub snapshot_uid: Option<u64>,
    pub last_diff_uid: Option<u64>,
}

/// Outcome of applying a diff batch
#[derive(Debug, Clone, PartialEq)]
pub enum DiffOutcome<N = Decimal> {
    /// Batch applied; carries the levels removed to uncross the book
    Applied(CrossResolution<N>),
    /// Batch predates the current snapshot and was ignored
    Stale { update_id: u64, snapshot_uid: u64 },
}

impl<N> DiffOutcome<N> {
    pub fn is_stale(&self) -> bool {
        matches!(self, DiffOutcome::Stale { .. })
    }
}
