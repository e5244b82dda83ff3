//! Order Book Service
//!
//! Maintains a two-sided, price-ordered view of a venue's resting liquidity
//! and keeps it uncrossed.
//!
//! **Key Invariants:**
//! - At most one level per price on each side
//! - Zero-amount levels are erased, never stored
//! - After every snapshot or diff batch: best bid < best ask, or a side is empty
//! - Deterministic resolution (same inputs → same book)
//!
//! Crossed books are resolved by notional value on decentralized venues and
//! by update recency on centralized ones. All operations are synchronous and
//! single-writer; callers serialize access per instrument.

pub mod book;
pub mod config;
pub mod crossing;
pub mod events;
pub mod registry;

pub use book::{OrderBook, OrderBookSide, PriceLevelEntry};
pub use config::{BookConfig, VenueKind};
pub use crossing::{resolve_crossed, CrossPolicy, CrossResolution, CrossResolver};
pub use registry::BookRegistry;
