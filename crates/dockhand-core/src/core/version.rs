// crates/dockhand-core/src/core/version.rs
// ============================================================================
// Module: Dockhand Schema Version
// Description: Schema version tag for the persisted record store.
// Purpose: Give the single version record a dedicated, ordered type.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`SchemaVersion`] identifies the shape of the persisted store. It
//! serializes as a bare non-negative integer so that every future binary can
//! read it regardless of how old the store is.
//!
//! ## Invariants
//! - The stored value never decreases across the store's lifetime.
//! - Version `0` denotes a fresh or pre-versioning store.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Schema Version
// ============================================================================

/// Schema version of the persisted record store.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SchemaVersion(u32);

impl SchemaVersion {
    /// Version of a store that has never been migrated.
    pub const INITIAL: Self = Self(0);

    /// Creates a schema version from its raw value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns the version immediately following this one, if representable.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u32> for SchemaVersion {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}
