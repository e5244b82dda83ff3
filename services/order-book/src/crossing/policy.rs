//! Tie-break policies for crossed books
//!
//! When the best bid is at or above the best ask, exactly one of the two
//! top levels must go. Which one depends on the venue:
//! - on-chain venues carry no authoritative sequence, so the level with the
//!   smaller notional value is dropped
//! - centralized feeds carry monotonic update ids, so the staler level is
//!   dropped

use serde::{Deserialize, Serialize};
use types::numeric::BookNumber;

use crate::book::PriceLevelEntry;
use crate::config::VenueKind;

/// Decides which top level to remove from a crossed pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CrossPolicy {
    /// Keep the economically larger level
    ByNotionalValue,
    /// Keep the more recently updated level
    #[default]
    ByRecency,
}

impl CrossPolicy {
    pub fn for_venue(venue: VenueKind) -> Self {
        match venue {
            VenueKind::Decentralized => CrossPolicy::ByNotionalValue,
            VenueKind::Centralized => CrossPolicy::ByRecency,
        }
    }

    /// True when the ask should be removed, false when the bid should.
    ///
    /// Ties remove the bid under both policies. A notional that overflows `N`
    /// counts as larger than any representable one.
    pub fn removes_ask<N: BookNumber>(
        &self,
        top_bid: &PriceLevelEntry<N>,
        top_ask: &PriceLevelEntry<N>,
    ) -> bool {
        match self {
            CrossPolicy::ByNotionalValue => {
                match (top_bid.checked_notional(), top_ask.checked_notional()) {
                    (Some(bid), Some(ask)) => bid > ask,
                    (None, Some(_)) => true,
                    // Ask overflowed alone, or both did and they tie
                    (_, None) => false,
                }
            }
            CrossPolicy::ByRecency => top_bid.update_id() > top_ask.update_id(),
        }
    }
}
