//! Crossed-book resolution
//!
//! Restores `best bid < best ask` by repeatedly removing one of the two top
//! levels, chosen by a [`CrossPolicy`]. Terminates when the book is
//! uncrossed or either side is empty; each pass removes one level, so a
//! call does at most `bids + asks` removals.

use rust_decimal::Decimal;
use tracing::debug;
use types::ids::Side;
use types::numeric::BookNumber;

use super::policy::CrossPolicy;
use crate::book::{OrderBookSide, PriceLevelEntry};

/// Check if a bid and ask price cross (`bid >= ask`)
pub fn can_match<N: Ord>(bid_price: &N, ask_price: &N) -> bool {
    bid_price >= ask_price
}

/// Levels removed by one resolution pass, in removal order
#[derive(Debug, Clone, PartialEq)]
pub struct CrossResolution<N = Decimal> {
    pub removed_bids: Vec<PriceLevelEntry<N>>,
    pub removed_asks: Vec<PriceLevelEntry<N>>,
}

impl<N> CrossResolution<N> {
    pub fn new() -> Self {
        Self {
            removed_bids: Vec::new(),
            removed_asks: Vec::new(),
        }
    }

    /// True when the book was not crossed
    pub fn is_empty(&self) -> bool {
        self.removed_bids.is_empty() && self.removed_asks.is_empty()
    }

    pub fn removed_count(&self) -> usize {
        self.removed_bids.len() + self.removed_asks.len()
    }
}

impl<N> Default for CrossResolution<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Stateless resolver bound to one policy
///
/// Not safe to run concurrently with mutation of either side; callers
/// serialize access per instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CrossResolver {
    policy: CrossPolicy,
}

impl CrossResolver {
    pub fn new(policy: CrossPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> CrossPolicy {
        self.policy
    }

    pub fn resolve<N: BookNumber>(
        &self,
        bids: &mut OrderBookSide<N>,
        asks: &mut OrderBookSide<N>,
    ) -> CrossResolution<N> {
        resolve_crossed(bids, asks, self.policy)
    }
}

/// Remove top levels until the book is no longer crossed
pub fn resolve_crossed<N: BookNumber>(
    bids: &mut OrderBookSide<N>,
    asks: &mut OrderBookSide<N>,
    policy: CrossPolicy,
) -> CrossResolution<N> {
    debug_assert_eq!(bids.side(), Side::BUY);
    debug_assert_eq!(asks.side(), Side::SELL);

    let mut resolution = CrossResolution::new();

    loop {
        let remove_ask = match (bids.best(), asks.best()) {
            (Some(top_bid), Some(top_ask)) => {
                if !can_match(top_bid.price(), top_ask.price()) {
                    break;
                }
                policy.removes_ask(top_bid, top_ask)
            }
            _ => break,
        };

        let (side, removed) = if remove_ask {
            (Side::SELL, asks.pop_best())
        } else {
            (Side::BUY, bids.pop_best())
        };

        // Both sides were non-empty above
        let Some(removed) = removed else { break };

        debug!(
            ?side,
            ?policy,
            price = ?removed.price(),
            amount = ?removed.amount(),
            update_id = removed.update_id(),
            "Removed crossed level"
        );

        match side {
            Side::BUY => resolution.removed_bids.push(removed),
            Side::SELL => resolution.removed_asks.push(removed),
        }
    }

    resolution
}
