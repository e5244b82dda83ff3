//! Limit order value object
//!
//! A [`LimitOrder`] records one of the host's own resting orders: identity,
//! instrument, side, price, quantity, fill progress and an opaque lifecycle
//! code. The order-management layer creates, mutates and discards these;
//! the book never does.
//!
//! Orders form a strict total order (price ascending, then client order id)
//! so they can live in a `BTreeSet` or any other sorted index without two
//! distinct orders colliding.

use std::cmp::Ordering;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::OrderError;
use crate::ids::{ClientOrderId, Side, TradingPair};
use crate::numeric::{BookNumber, Shared};

/// Position effect recorded when none is supplied
pub const DEFAULT_POSITION_EFFECT: &str = "NIL";

/// Length of the microsecond nonce some clients append to their order ids
const NONCE_DIGITS: usize = 16;

const MICROS_PER_SECOND: i64 = 1_000_000;

/// Order type; a resting order tracked here is always a limit order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Limit,
}

/// One of the host's resting limit orders
///
/// `price` has no setter: it is the ordering key and must stay fixed while
/// the order is a member of any sorted container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitOrder<N = Decimal> {
    client_order_id: ClientOrderId,
    trading_pair: TradingPair,
    is_buy: bool,
    base_currency: String,
    quote_currency: String,
    price: Shared<N>,
    quantity: Shared<N>,
    filled_quantity: Shared<N>,
    /// Unix micros; zero or negative when unknown
    creation_timestamp: i64,
    /// Opaque lifecycle code owned by the host
    status: u8,
    position_effect: String,
}

impl<N: BookNumber> LimitOrder<N> {
    /// Create an unfilled order with no creation timestamp and default
    /// status/position effect
    pub fn new(
        client_order_id: impl Into<ClientOrderId>,
        trading_pair: impl Into<TradingPair>,
        is_buy: bool,
        base_currency: impl Into<String>,
        quote_currency: impl Into<String>,
        price: Shared<N>,
        quantity: Shared<N>,
    ) -> Self {
        Self::with_state(
            client_order_id,
            trading_pair,
            is_buy,
            base_currency,
            quote_currency,
            price,
            quantity,
            Shared::zero(),
            0,
            0,
            DEFAULT_POSITION_EFFECT,
        )
    }

    /// Create an order with every field bound explicitly
    #[allow(clippy::too_many_arguments)]
    pub fn with_state(
        client_order_id: impl Into<ClientOrderId>,
        trading_pair: impl Into<TradingPair>,
        is_buy: bool,
        base_currency: impl Into<String>,
        quote_currency: impl Into<String>,
        price: Shared<N>,
        quantity: Shared<N>,
        filled_quantity: Shared<N>,
        creation_timestamp: i64,
        status: u8,
        position_effect: impl Into<String>,
    ) -> Self {
        Self {
            client_order_id: client_order_id.into(),
            trading_pair: trading_pair.into(),
            is_buy,
            base_currency: base_currency.into(),
            quote_currency: quote_currency.into(),
            price,
            quantity,
            filled_quantity,
            creation_timestamp,
            status,
            position_effect: position_effect.into(),
        }
    }

    /// Check the fields the host is expected to have validated
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.client_order_id.is_empty() {
            return Err(OrderError::EmptyClientOrderId);
        }
        if self.quantity.is_negative() {
            return Err(OrderError::InvalidQuantity(format!("{:?}", self.quantity)));
        }
        Ok(())
    }

    pub fn client_order_id(&self) -> &ClientOrderId {
        &self.client_order_id
    }

    pub fn trading_pair(&self) -> &TradingPair {
        &self.trading_pair
    }

    pub fn is_buy(&self) -> bool {
        self.is_buy
    }

    pub fn side(&self) -> Side {
        Side::from_is_buy(self.is_buy)
    }

    pub fn base_currency(&self) -> &str {
        &self.base_currency
    }

    pub fn quote_currency(&self) -> &str {
        &self.quote_currency
    }

    pub fn price(&self) -> &Shared<N> {
        &self.price
    }

    pub fn quantity(&self) -> &Shared<N> {
        &self.quantity
    }

    pub fn filled_quantity(&self) -> &Shared<N> {
        &self.filled_quantity
    }

    pub fn creation_timestamp(&self) -> i64 {
        self.creation_timestamp
    }

    pub fn status(&self) -> u8 {
        self.status
    }

    pub fn position_effect(&self) -> &str {
        &self.position_effect
    }

    pub fn order_type(&self) -> OrderType {
        OrderType::Limit
    }

    /// Record fill progress. `filled_quantity ≤ quantity` is the caller's
    /// invariant and is not checked here.
    pub fn set_filled_quantity(&mut self, filled_quantity: Shared<N>) {
        self.filled_quantity = filled_quantity;
    }

    pub fn set_status(&mut self, status: u8) {
        self.status = status;
    }

    /// `quantity - filled_quantity`, unclamped
    pub fn remaining_quantity(&self) -> N {
        self.quantity.value() - self.filled_quantity.value()
    }

    pub fn is_filled(&self) -> bool {
        *self.filled_quantity >= *self.quantity
    }

    /// Timestamp (Unix micros) the order's age is measured from.
    ///
    /// Falls back to a trailing microsecond nonce in the client order id
    /// when no creation timestamp was recorded. The id must be longer than
    /// the nonce itself.
    fn start_timestamp(&self) -> Option<i64> {
        if self.creation_timestamp > 0 {
            return Some(self.creation_timestamp);
        }
        let id = self.client_order_id.as_str();
        if id.len() <= NONCE_DIGITS {
            return None;
        }
        let nonce = id.get(id.len() - NONCE_DIGITS..)?;
        if !nonce.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        nonce.parse::<i64>().ok().filter(|ts| *ts > 0)
    }

    /// Whole seconds from the order's start until `end_timestamp` (Unix
    /// micros), or -1 when the start is unknown or not before the end
    pub fn age_til(&self, end_timestamp: i64) -> i64 {
        match self.start_timestamp() {
            Some(start) if start < end_timestamp => (end_timestamp - start) / MICROS_PER_SECOND,
            _ => -1,
        }
    }

    /// Age in whole seconds as of the current wall clock
    pub fn age(&self) -> i64 {
        self.age_til(chrono::Utc::now().timestamp_micros())
    }
}

impl<N: BookNumber> PartialEq for LimitOrder<N> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<N: BookNumber> Eq for LimitOrder<N> {}

impl<N: BookNumber> PartialOrd for LimitOrder<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Price ascending, then client order id lexicographically
impl<N: BookNumber> Ord for LimitOrder<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.price
            .cmp(&other.price)
            .then_with(|| self.client_order_id.cmp(&other.client_order_id))
    }
}

impl<N: BookNumber + fmt::Display> fmt::Display for LimitOrder<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LimitOrder('{}', '{}', {}, '{}', '{}', {}, {}, {}, {}, {}, '{}')",
            self.client_order_id,
            self.trading_pair,
            self.is_buy,
            self.base_currency,
            self.quote_currency,
            self.price,
            self.quantity,
            self.filled_quantity,
            self.creation_timestamp,
            self.status,
            self.position_effect,
        )
    }
}
