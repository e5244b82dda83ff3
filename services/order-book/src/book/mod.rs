//! Order book infrastructure module
//!
//! Contains price level entries, the per-side container, and the
//! per-instrument book that pairs a bid side with an ask side.

pub mod price_level;
pub mod side;
pub mod order_book;

pub use order_book::{OrderBook, VolumeQuery};
pub use price_level::PriceLevelEntry;
pub use side::OrderBookSide;
