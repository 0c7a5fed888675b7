// crates/dockhand-migrator/src/audit.rs
// ============================================================================
// Module: Migration Audit Logging
// Description: Structured audit events for migration passes.
// Purpose: Emit JSON-line progress records without hard logging dependencies.
// Dependencies: dockhand-core, serde, serde_json
// ============================================================================

//! ## Overview
//! The orchestrator reports each phase of a pass as a [`MigrationAuditEvent`]
//! through a [`MigrationAuditSink`]. Sinks are deliberately small so that a
//! deployment can route events to its own pipeline. The provided sinks write
//! JSON lines to stderr or to an append-only file, or drop events.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use dockhand_core::SchemaVersion;
use serde::Serialize;

use crate::step::MigrationStep;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// A pass with pending steps began.
pub const EVENT_MIGRATION_STARTED: &str = "migration_started";
/// The store was already current.
pub const EVENT_MIGRATION_SKIPPED: &str = "migration_skipped";
/// A step body is about to run.
pub const EVENT_STEP_STARTED: &str = "step_started";
/// A step body returned successfully.
pub const EVENT_STEP_APPLIED: &str = "step_applied";
/// The version record was committed.
pub const EVENT_VERSION_COMMITTED: &str = "version_committed";
/// A step body failed and the pass stopped.
pub const EVENT_STEP_FAILED: &str = "step_failed";
/// Every pending step was applied and committed.
pub const EVENT_MIGRATION_COMPLETED: &str = "migration_completed";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Migration audit event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Last committed schema version when the event was emitted.
    pub committed_version: SchemaVersion,
    /// Latest version known to the registry.
    pub target_version: SchemaVersion,
    /// Version of the step the event concerns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_version: Option<SchemaVersion>,
    /// Description of the step the event concerns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_description: Option<&'static str>,
    /// Failure reason for `step_failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MigrationAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(
        event: &'static str,
        committed_version: SchemaVersion,
        target_version: SchemaVersion,
    ) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event,
            timestamp_ms,
            committed_version,
            target_version,
            step_version: None,
            step_description: None,
            error: None,
        }
    }

    /// Attaches the step the event concerns.
    #[must_use]
    pub fn with_step(mut self, step: &MigrationStep) -> Self {
        self.step_version = Some(step.version());
        self.step_description = Some(step.description());
        self
    }

    /// Attaches a failure reason.
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for migration events.
pub trait MigrationAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &MigrationAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct MigrationStderrAuditSink;

impl MigrationAuditSink for MigrationStderrAuditSink {
    fn record(&self, event: &MigrationAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct MigrationFileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl MigrationFileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl MigrationAuditSink for MigrationFileAuditSink {
    fn record(&self, event: &MigrationAuditEvent) {
        let Ok(payload) = serde_json::to_string(event) else {
            return;
        };
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct MigrationNoopAuditSink;

impl MigrationAuditSink for MigrationNoopAuditSink {
    fn record(&self, _event: &MigrationAuditEvent) {}
}

// ============================================================================
// SECTION: Tests
// ============================================================================
