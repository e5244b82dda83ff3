//! Types library for order book maintenance
//!
//! Value types shared by the book service and the host's order management:
//! numeric handles, identities, limit orders and expiry entries.
//!
//! # Modules
//! - `numeric`: Shared numeric handles (Price, Quantity) and the host numeric contract
//! - `ids`: Sides, trading pairs, client order ids
//! - `order`: Limit order value object
//! - `expiration`: Expiry-ordered order entries
//! - `errors`: Error taxonomy

pub mod ids;
pub mod numeric;
pub mod order;
pub mod expiration;
pub mod errors;

pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::errors::*;
    pub use crate::expiration::*;
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::order::*;
}
