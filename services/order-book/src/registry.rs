//! Multi-instrument book registry
//!
//! Owns one [`OrderBook`] per trading pair, created lazily with a shared
//! configuration. Uses `BTreeMap` so iteration over instruments is
//! deterministic.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use types::errors::BookError;
use types::ids::TradingPair;
use types::numeric::BookNumber;

use crate::book::OrderBook;
use crate::config::BookConfig;

/// Books keyed by trading pair
pub struct BookRegistry<N = Decimal> {
    books: BTreeMap<TradingPair, OrderBook<N>>,
    config: BookConfig,
}

impl<N: BookNumber> BookRegistry<N> {
    pub fn new(config: BookConfig) -> Self {
        Self {
            books: BTreeMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &BookConfig {
        &self.config
    }

    /// Get the book for `trading_pair`, creating it on first use
    pub fn get_or_create(&mut self, trading_pair: &TradingPair) -> &mut OrderBook<N> {
        let config = &self.config;
        self.books
            .entry(trading_pair.clone())
            .or_insert_with(|| OrderBook::new(trading_pair.clone(), config))
    }

    pub fn book(&self, trading_pair: &TradingPair) -> Option<&OrderBook<N>> {
        self.books.get(trading_pair)
    }

    pub fn book_mut(&mut self, trading_pair: &TradingPair) -> Result<&mut OrderBook<N>, BookError> {
        self.books
            .get_mut(trading_pair)
            .ok_or_else(|| BookError::UnknownTradingPair {
                trading_pair: trading_pair.to_string(),
            })
    }

    pub fn remove(&mut self, trading_pair: &TradingPair) -> Option<OrderBook<N>> {
        self.books.remove(trading_pair)
    }

    /// Tracked trading pairs in sorted order
    pub fn trading_pairs(&self) -> Vec<&TradingPair> {
        self.books.keys().collect()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

impl<N: BookNumber> Default for BookRegistry<N> {
    fn default() -> Self {
        Self::new(BookConfig::default())
    }
}
