// crates/dockhand-migrator/src/step.rs
// ============================================================================
// Module: Migration Step
// Description: A single forward upgrade tagged with the version it produces.
// Purpose: Pair a target version with the transformation that reaches it.
// Dependencies: dockhand-core, crate::bootstrap, crate::error
// ============================================================================

//! ## Overview
//! A [`MigrationStep`] upgrades a store from version `N - 1` to version `N`.
//! Its body receives a [`StepContext`] exposing every collaborator service
//! and the bootstrap configuration, and nothing else: the version record is
//! owned by the orchestrator.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use dockhand_core::RecordStore;
use dockhand_core::SchemaVersion;

use crate::bootstrap::BootstrapConfig;
use crate::error::StepError;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Step body signature.
pub type StepFn = Arc<dyn Fn(&StepContext<'_>) -> Result<(), StepError> + Send + Sync>;

/// Inputs available to a step body.
#[derive(Clone, Copy)]
pub struct StepContext<'a> {
    /// Collaborator services over the record store.
    store: &'a dyn RecordStore,
    /// Operator-supplied bootstrap values.
    bootstrap: &'a BootstrapConfig,
}

impl<'a> StepContext<'a> {
    /// Creates a step context.
    #[must_use]
    pub const fn new(store: &'a dyn RecordStore, bootstrap: &'a BootstrapConfig) -> Self {
        Self {
            store,
            bootstrap,
        }
    }

    /// Returns the collaborator services.
    #[must_use]
    pub const fn store(&self) -> &'a dyn RecordStore {
        self.store
    }

    /// Returns the bootstrap configuration.
    #[must_use]
    pub const fn bootstrap(&self) -> &'a BootstrapConfig {
        self.bootstrap
    }
}

/// Forward upgrade producing one schema version.
///
/// # Invariants
/// - `version` is the version the store is at after `apply` succeeds.
#[derive(Clone)]
pub struct MigrationStep {
    /// Version produced by this step.
    version: SchemaVersion,
    /// Human-readable description used in logs and errors.
    description: &'static str,
    /// Step body.
    apply: StepFn,
}

impl MigrationStep {
    /// Creates a step producing `version`.
    pub fn new<F>(version: u32, description: &'static str, apply: F) -> Self
    where
        F: Fn(&StepContext<'_>) -> Result<(), StepError> + Send + Sync + 'static,
    {
        Self {
            version: SchemaVersion::new(version),
            description,
            apply: Arc::new(apply),
        }
    }

    /// Returns the version produced by this step.
    #[must_use]
    pub const fn version(&self) -> SchemaVersion {
        self.version
    }

    /// Returns the step description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.description
    }

    /// Runs the step body.
    ///
    /// # Errors
    ///
    /// Returns [`StepError`] when the body fails.
    pub fn apply(&self, context: &StepContext<'_>) -> Result<(), StepError> {
        (self.apply)(context)
    }
}

impl fmt::Debug for MigrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationStep")
            .field("version", &self.version)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
