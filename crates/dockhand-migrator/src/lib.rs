// crates/dockhand-migrator/src/lib.rs
// ============================================================================
// Module: Dockhand Migrator Library
// Description: Public API surface for the store migration engine.
// Purpose: Expose the step registry, orchestrator, bootstrap inputs, and audit.
// Dependencies: dockhand-core, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The migrator brings a persistent record store from whatever schema version
//! it was last written at up to the version the running binary expects. Each
//! upgrade is a [`MigrationStep`] tagged with the version it produces. The
//! [`StepRegistry`] holds those steps sorted and gap-free, and the
//! [`MigrationOrchestrator`] runs the pending suffix in order, committing the
//! version record as steps succeed.
//!
//! ## Invariants
//! - The engine is forward-only: it never lowers the stored version.
//! - A failed step leaves the stored version at the last committed step.
//! - A store already at the latest version is left untouched.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod bootstrap;
pub mod error;
pub mod orchestrator;
pub mod registry;
pub mod step;
pub mod steps;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::MigrationAuditEvent;
pub use audit::MigrationAuditSink;
pub use audit::MigrationFileAuditSink;
pub use audit::MigrationNoopAuditSink;
pub use audit::MigrationStderrAuditSink;
pub use bootstrap::BootstrapConfig;
pub use error::MigrationError;
pub use error::RegistryIntegrityError;
pub use error::StepError;
pub use orchestrator::CommitPolicy;
pub use orchestrator::MigrationOrchestrator;
pub use orchestrator::MigrationPlan;
pub use orchestrator::MigrationReport;
pub use orchestrator::PlannedStep;
pub use registry::StepRegistry;
pub use step::MigrationStep;
pub use step::StepContext;
pub use step::StepFn;
