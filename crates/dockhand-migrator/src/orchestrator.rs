// crates/dockhand-migrator/src/orchestrator.rs
// ============================================================================
// Module: Migration Orchestrator
// Description: Runs pending steps in order and commits the schema version.
// Purpose: Bring a record store up to the registry's latest version.
// Dependencies: dockhand-core, serde, crate::{audit, bootstrap, error, registry, step}
// ============================================================================

//! ## Overview
//! [`MigrationOrchestrator::migrate`] reads the stored version (absent means
//! 0), asks the registry for the pending suffix, and applies those steps in
//! order. Under [`CommitPolicy::PerStep`] the version record is committed
//! after every successful step, so an interrupted pass resumes at the first
//! uncommitted step. Under [`CommitPolicy::EndOfPass`] it is committed once at
//! the end of the pass, or at the last successful step when a step fails.
//!
//! ## Invariants
//! - A store at the latest version receives no writes.
//! - A store ahead of the registry is refused untouched.
//! - The stored version never decreases.

// ============================================================================
// SECTION: Imports
// ============================================================================

use dockhand_core::RecordStore;
use dockhand_core::SchemaVersion;
use serde::Deserialize;
use serde::Serialize;

use crate::audit::EVENT_MIGRATION_COMPLETED;
use crate::audit::EVENT_MIGRATION_SKIPPED;
use crate::audit::EVENT_MIGRATION_STARTED;
use crate::audit::EVENT_STEP_APPLIED;
use crate::audit::EVENT_STEP_FAILED;
use crate::audit::EVENT_STEP_STARTED;
use crate::audit::EVENT_VERSION_COMMITTED;
use crate::audit::MigrationAuditEvent;
use crate::audit::MigrationAuditSink;
use crate::audit::MigrationNoopAuditSink;
use crate::bootstrap::BootstrapConfig;
use crate::error::MigrationError;
use crate::registry::StepRegistry;
use crate::step::MigrationStep;
use crate::step::StepContext;

// ============================================================================
// SECTION: Types
// ============================================================================

/// When the schema version record is committed during a pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitPolicy {
    /// Commit after every successful step.
    #[default]
    PerStep,
    /// Commit once after the last successful step of the pass.
    EndOfPass,
}

/// Step scheduled by a migration plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedStep {
    /// Version the step produces.
    pub version: SchemaVersion,
    /// Step description.
    pub description: &'static str,
}

/// Dry-run view of a migration pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationPlan {
    /// Stored version (0 when absent).
    pub current: SchemaVersion,
    /// Latest version known to the registry.
    pub target: SchemaVersion,
    /// Steps that would run, in order.
    pub pending: Vec<PlannedStep>,
}

impl MigrationPlan {
    /// Returns true when the store is already current.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Outcome of a successful migration pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// Version before the pass.
    pub from: SchemaVersion,
    /// Version after the pass.
    pub to: SchemaVersion,
    /// Versions applied during the pass, in order.
    pub applied: Vec<SchemaVersion>,
}

impl MigrationReport {
    /// Returns true when no step ran.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

// ============================================================================
// SECTION: Orchestrator
// ============================================================================

/// Drives one migration pass over a record store.
pub struct MigrationOrchestrator<'a> {
    /// Record store being migrated.
    store: &'a dyn RecordStore,
    /// Validated step catalogue.
    registry: &'a StepRegistry,
    /// Values handed to step bodies.
    bootstrap: &'a BootstrapConfig,
    /// Audit sink receiving progress events.
    audit: &'a dyn MigrationAuditSink,
    /// Version commit policy.
    policy: CommitPolicy,
}

impl<'a> MigrationOrchestrator<'a> {
    /// Creates an orchestrator with no audit output and per-step commits.
    #[must_use]
    pub fn new(
        store: &'a dyn RecordStore,
        registry: &'a StepRegistry,
        bootstrap: &'a BootstrapConfig,
    ) -> Self {
        Self {
            store,
            registry,
            bootstrap,
            audit: &MigrationNoopAuditSink,
            policy: CommitPolicy::default(),
        }
    }

    /// Routes progress events to `audit`.
    #[must_use]
    pub fn with_audit(mut self, audit: &'a dyn MigrationAuditSink) -> Self {
        self.audit = audit;
        self
    }

    /// Sets the version commit policy.
    #[must_use]
    pub const fn with_commit_policy(mut self, policy: CommitPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Reports what a pass would do without running any step.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::StoreUnavailable`] when the version cannot be
    /// read and [`MigrationError::StoreAhead`] when the store is newer than
    /// the registry.
    pub fn plan(&self) -> Result<MigrationPlan, MigrationError> {
        let current = self.current_version()?;
        let pending = self
            .registry
            .pending_after(current)
            .iter()
            .map(|step| PlannedStep {
                version: step.version(),
                description: step.description(),
            })
            .collect();
        Ok(MigrationPlan {
            current,
            target: self.registry.latest_version(),
            pending,
        })
    }

    /// Applies every pending step in version order.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::StepExecution`] when a step fails, leaving
    /// the stored version at the last successful step;
    /// [`MigrationError::StoreUnavailable`] when the version cannot be read or
    /// committed; and [`MigrationError::StoreAhead`] when the store is newer
    /// than the registry.
    pub fn migrate(&self) -> Result<MigrationReport, MigrationError> {
        let from = self.current_version()?;
        let target = self.registry.latest_version();
        let pending = self.registry.pending_after(from);
        if pending.is_empty() {
            self.audit.record(&MigrationAuditEvent::new(EVENT_MIGRATION_SKIPPED, from, target));
            return Ok(MigrationReport {
                from,
                to: from,
                applied: Vec::new(),
            });
        }

        self.audit.record(&MigrationAuditEvent::new(EVENT_MIGRATION_STARTED, from, target));
        let context = StepContext::new(self.store, self.bootstrap);
        let mut committed = from;
        let mut applied = Vec::with_capacity(pending.len());
        for step in pending {
            self.audit.record(
                &MigrationAuditEvent::new(EVENT_STEP_STARTED, committed, target).with_step(step),
            );
            if let Err(source) = step.apply(&context) {
                self.audit.record(
                    &MigrationAuditEvent::new(EVENT_STEP_FAILED, committed, target)
                        .with_step(step)
                        .with_error(source.to_string()),
                );
                if let Some(last) = applied.last().copied()
                    && last > committed
                {
                    self.commit(last, target)?;
                }
                return Err(MigrationError::StepExecution {
                    version: step.version(),
                    description: step.description(),
                    source,
                });
            }
            self.audit.record(
                &MigrationAuditEvent::new(EVENT_STEP_APPLIED, committed, target).with_step(step),
            );
            applied.push(step.version());
            if self.policy == CommitPolicy::PerStep {
                committed = self.commit(step.version(), target)?;
            }
        }

        let to = pending.last().map_or(committed, MigrationStep::version);
        if committed < to {
            committed = self.commit(to, target)?;
        }
        self.audit.record(&MigrationAuditEvent::new(EVENT_MIGRATION_COMPLETED, committed, target));
        Ok(MigrationReport {
            from,
            to,
            applied,
        })
    }

    /// Reads the stored version and refuses stores ahead of the registry.
    fn current_version(&self) -> Result<SchemaVersion, MigrationError> {
        let stored = self
            .store
            .schema_version()
            .map_err(MigrationError::StoreUnavailable)?
            .unwrap_or(SchemaVersion::INITIAL);
        let latest = self.registry.latest_version();
        if stored > latest {
            return Err(MigrationError::StoreAhead {
                stored,
                latest,
            });
        }
        Ok(stored)
    }

    /// Durably records `version` as the store's schema version.
    fn commit(
        &self,
        version: SchemaVersion,
        target: SchemaVersion,
    ) -> Result<SchemaVersion, MigrationError> {
        self.store.store_schema_version(version).map_err(MigrationError::StoreUnavailable)?;
        self.audit.record(&MigrationAuditEvent::new(EVENT_VERSION_COMMITTED, version, target));
        Ok(version)
    }
}
