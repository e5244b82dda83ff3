//! Book configuration
//!
//! Chosen by the host at book-setup time and not re-evaluated per update.

use serde::{Deserialize, Serialize};

use crate::crossing::CrossPolicy;

/// Kind of venue the book mirrors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VenueKind {
    /// On-chain venue without an authoritative update sequence
    Decentralized,
    /// Exchange feed with monotonic update ids
    Centralized,
}

/// Configuration for an instrument's book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookConfig {
    /// Venue type; selects the cross-resolution policy.
    pub venue: VenueKind,
    /// Upper bound on levels per side returned by depth snapshots.
    pub max_snapshot_depth: usize,
}

impl BookConfig {
    pub fn decentralized() -> Self {
        Self {
            venue: VenueKind::Decentralized,
            ..Self::default()
        }
    }

    pub fn centralized() -> Self {
        Self {
            venue: VenueKind::Centralized,
            ..Self::default()
        }
    }

    pub fn with_max_snapshot_depth(mut self, depth: usize) -> Self {
        self.max_snapshot_depth = depth;
        self
    }

    pub fn policy(&self) -> CrossPolicy {
        CrossPolicy::for_venue(self.venue)
    }
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            venue: VenueKind::Centralized,
            max_snapshot_depth: 20,
        }
    }
}
