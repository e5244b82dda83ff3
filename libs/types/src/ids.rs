//! Identity types shared by books and orders
//!
//! Instruments are identified by a [`TradingPair`]; the host's own orders by
//! a caller-assigned [`ClientOrderId`]. Both order lexicographically so they
//! can serve as deterministic tie-breaks inside sorted containers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Book side (bids are buy interest, asks are sell interest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy side (bid)
    BUY,
    /// Sell side (ask)
    SELL,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::BUY => Side::SELL,
            Side::SELL => Side::BUY,
        }
    }

    pub fn from_is_buy(is_buy: bool) -> Self {
        if is_buy {
            Side::BUY
        } else {
            Side::SELL
        }
    }
}

/// Caller-assigned order identifier, unique for the order's lifetime
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientOrderId(String);

impl ClientOrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ClientOrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ClientOrderId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Instrument identifier
///
/// Format: "BASE-QUOTE" or "BASE/QUOTE" (e.g., "BTC-USDT", "ETH/USDC").
/// Informational only to the book; no format is enforced at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradingPair(String);

impl TradingPair {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    /// Get the symbol string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into base and quote assets, if the symbol carries a separator
    pub fn split(&self) -> Option<(&str, &str)> {
        self.0
            .split_once('-')
            .or_else(|| self.0.split_once('/'))
    }

    pub fn base(&self) -> Option<&str> {
        self.split().map(|(base, _)| base)
    }

    pub fn quote(&self) -> Option<&str> {
        self.split().map(|(_, quote)| quote)
    }
}

impl fmt::Display for TradingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TradingPair {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
