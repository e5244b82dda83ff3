//! One side of an instrument's book
//!
//! Levels are keyed by price in a `BTreeMap`, which keeps them ascending
//! and gives deterministic iteration. The same container serves both
//! sides; only the meaning of "best" differs (highest bid, lowest ask).

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use types::ids::Side;
use types::numeric::{BookNumber, Shared};

use super::price_level::PriceLevelEntry;

/// Price-ordered levels for one side of the book
///
/// At most one entry per price. Zero-amount updates erase rather than store.
#[derive(Debug, Clone)]
pub struct OrderBookSide<N = Decimal> {
    side: Side,
    /// Price levels sorted ascending
    levels: BTreeMap<Shared<N>, PriceLevelEntry<N>>,
}

impl<N: BookNumber> OrderBookSide<N> {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
        }
    }

    /// Create an empty bid side
    pub fn bids() -> Self {
        Self::new(Side::BUY)
    }

    /// Create an empty ask side
    pub fn asks() -> Self {
        Self::new(Side::SELL)
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Apply one feed update at `price`
    ///
    /// A zero `amount` erases the level (no-op if absent); anything else
    /// inserts or replaces it. `order_count` defaults to 1.
    pub fn insert_or_update(
        &mut self,
        price: Shared<N>,
        amount: Shared<N>,
        update_id: u64,
        order_count: Option<u32>,
    ) {
        let entry =
            PriceLevelEntry::with_order_count(price, amount, update_id, order_count.unwrap_or(1));
        self.insert_entry(entry);
    }

    /// Insert a prepared entry, with the same zero-amount rule as
    /// [`insert_or_update`](Self::insert_or_update)
    pub fn insert_entry(&mut self, entry: PriceLevelEntry<N>) {
        if entry.is_empty() {
            self.levels.remove::<N>(entry.price());
        } else {
            self.levels.insert(entry.price().clone(), entry);
        }
    }

    /// Remove the level at `price`, returning it if present
    pub fn remove(&mut self, price: &N) -> Option<PriceLevelEntry<N>> {
        self.levels.remove(price)
    }

    pub fn get(&self, price: &N) -> Option<&PriceLevelEntry<N>> {
        self.levels.get(price)
    }

    /// Best level: highest price for bids, lowest for asks
    pub fn best(&self) -> Option<&PriceLevelEntry<N>> {
        match self.side {
            Side::BUY => self.levels.values().next_back(),
            Side::SELL => self.levels.values().next(),
        }
    }

    pub fn best_price(&self) -> Option<&Shared<N>> {
        self.best().map(PriceLevelEntry::price)
    }

    /// Remove and return the best level
    pub fn pop_best(&mut self) -> Option<PriceLevelEntry<N>> {
        match self.side {
            Side::BUY => self.levels.pop_last(),
            Side::SELL => self.levels.pop_first(),
        }
        .map(|(_, entry)| entry)
    }

    /// All levels, ascending by price
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &PriceLevelEntry<N>> + '_ {
        self.levels.values()
    }

    /// All levels, best first
    pub fn iter_best_first(&self) -> Box<dyn Iterator<Item = &PriceLevelEntry<N>> + '_> {
        match self.side {
            Side::BUY => Box::new(self.levels.values().rev()),
            Side::SELL => Box::new(self.levels.values()),
        }
    }

    /// Get depth snapshot (top N price levels, best first)
    pub fn depth_snapshot(&self, depth: usize) -> Vec<PriceLevelEntry<N>> {
        self.iter_best_first().take(depth).cloned().collect()
    }

    /// Sum of resting amount across all levels
    pub fn total_amount(&self) -> N {
        self.levels
            .values()
            .fold(N::zero(), |acc, level| acc + level.amount().value())
    }

    pub fn clear(&mut self) {
        self.levels.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Get the total number of price levels
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}
