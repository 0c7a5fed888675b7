// crates/dockhand-core/src/core/identifiers.rs
// ============================================================================
// Module: Dockhand Identifiers
// Description: Numeric identifiers for persisted Dockhand records.
// Purpose: Provide strongly typed, serializable IDs with stable numeric forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Every persisted record kind is keyed by a numeric identifier. Identifiers
//! serialize as bare integers (including when used as JSON map keys) so the
//! on-disk layout stays readable by every binary version.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Declares a transparent numeric identifier newtype.
macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Creates a new identifier from its raw value.
            #[must_use]
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            /// Returns the raw numeric value.
            #[must_use]
            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                Self::new(value)
            }
        }
    };
}

numeric_id!(
    /// Endpoint (environment) identifier.
    EndpointId
);
numeric_id!(
    /// Endpoint group identifier.
    EndpointGroupId
);
numeric_id!(
    /// Container registry identifier.
    RegistryId
);
numeric_id!(
    /// User account identifier.
    UserId
);
numeric_id!(
    /// Team identifier.
    TeamId
);
numeric_id!(
    /// Resource control identifier.
    ResourceControlId
);
numeric_id!(
    /// Stack identifier.
    StackId
);
numeric_id!(
    /// Tag identifier.
    TagId
);
numeric_id!(
    /// Role identifier.
    RoleId
);

impl EndpointGroupId {
    /// Identifier of the built-in group holding endpoints without a group.
    pub const UNASSIGNED: Self = Self(1);
}

impl UserId {
    /// Identifier of the initial administrator account.
    pub const INITIAL_ADMIN: Self = Self(1);
}
