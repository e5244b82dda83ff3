//! Error types for book maintenance
//!
//! The containers and the cross resolver are infallible; these errors come
//! from the validation layer that sits in front of them.

use thiserror::Error;

/// Feed update and registry errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookError {
    #[error("Negative amount {amount} at price {price}")]
    NegativeAmount { price: String, amount: String },

    #[error("Unknown trading pair: {trading_pair}")]
    UnknownTradingPair { trading_pair: String },
}

/// Limit order construction errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderError {
    #[error("Client order id must not be empty")]
    EmptyClientOrderId,

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),
}
