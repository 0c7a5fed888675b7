// crates/dockhand-migrator/src/error.rs
// ============================================================================
// Module: Migration Errors
// Description: Error types for registry construction, steps, and passes.
// Purpose: Give the entry point enough context to log and exit non-zero.
// Dependencies: dockhand-core, thiserror
// ============================================================================

//! ## Overview
//! Three error families cover the engine. [`RegistryIntegrityError`] is raised
//! while building a registry and is fatal at startup. [`StepError`] is what a
//! step body returns. [`MigrationError`] is what a migration pass returns and
//! annotates step failures with the failing version and description.

// ============================================================================
// SECTION: Imports
// ============================================================================

use dockhand_core::SchemaVersion;
use dockhand_core::StoreError;
use thiserror::Error;

// ============================================================================
// SECTION: Registry Errors
// ============================================================================

/// Registry construction failures.
///
/// # Invariants
/// - Reported against the version-sorted step sequence.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryIntegrityError {
    /// A step targets version 0, which is reserved for fresh stores.
    #[error("migration step '{description}' targets reserved version 0")]
    ZeroVersion {
        /// Description of the offending step.
        description: &'static str,
    },
    /// Two steps claim the same target version.
    #[error("migration version {version} is claimed by '{first}' and '{second}'")]
    DuplicateVersion {
        /// Contested version.
        version: SchemaVersion,
        /// Description of the first step claiming it.
        first: &'static str,
        /// Description of the second step claiming it.
        second: &'static str,
    },
    /// A version below the highest declared version has no step.
    #[error("migration version {missing} is missing below latest version {latest}")]
    Gap {
        /// First missing version.
        missing: SchemaVersion,
        /// Highest declared version.
        latest: SchemaVersion,
    },
}

// ============================================================================
// SECTION: Step Errors
// ============================================================================

/// Failure reported by a step body.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StepError {
    /// A collaborator service read or write failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A bootstrap value the step requires was not supplied.
    #[error("required bootstrap value '{key}' is not set")]
    MissingBootstrap {
        /// Bootstrap key name.
        key: &'static str,
    },
    /// Stored data does not satisfy the step's expectations.
    #[error("precondition failed: {0}")]
    Precondition(String),
}

// ============================================================================
// SECTION: Migration Errors
// ============================================================================

/// Migration pass failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MigrationError {
    /// A step failed; the stored version is the last committed step.
    #[error("migration to version {version} ({description}) failed: {source}")]
    StepExecution {
        /// Version the failing step targets.
        version: SchemaVersion,
        /// Description of the failing step.
        description: &'static str,
        /// Underlying step failure.
        #[source]
        source: StepError,
    },
    /// The version record could not be read or committed.
    #[error("record store unavailable: {0}")]
    StoreUnavailable(StoreError),
    /// The store was written by a newer binary.
    #[error("stored schema version {stored} is newer than supported version {latest}")]
    StoreAhead {
        /// Version found in the store.
        stored: SchemaVersion,
        /// Latest version this binary knows.
        latest: SchemaVersion,
    },
}
