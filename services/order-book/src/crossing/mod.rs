//! Crossed-book resolution module
//!
//! A single resolution loop parameterized by a tie-break policy

pub mod policy;
pub mod resolver;

pub use policy::CrossPolicy;
pub use resolver::{can_match, resolve_crossed, CrossResolution, CrossResolver};
