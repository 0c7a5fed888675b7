// crates/dockhand-migrator/src/registry.rs
// ============================================================================
// Module: Step Registry
// Description: Version-sorted, gap-free catalogue of migration steps.
// Purpose: Answer "which steps are pending after version N" without branching.
// Dependencies: dockhand-core, crate::error, crate::step, crate::steps
// ============================================================================

//! ## Overview
//! [`StepRegistry`] owns the ordered list of steps. Construction sorts by
//! target version and validates the sequence, so a registry that exists is
//! always exactly `1..=latest` with one step per version.
//!
//! ## Invariants
//! - Step versions are strictly increasing, start at 1, and have no gaps.
//! - An empty registry is valid and has latest version 0.

// ============================================================================
// SECTION: Imports
// ============================================================================

use dockhand_core::SchemaVersion;

use crate::error::RegistryIntegrityError;
use crate::step::MigrationStep;
use crate::steps::builtin_steps;

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Validated, version-ordered migration step catalogue.
#[derive(Debug, Clone, Default)]
pub struct StepRegistry {
    /// Steps sorted by target version.
    steps: Vec<MigrationStep>,
}

impl StepRegistry {
    /// Builds a registry from steps given in any order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryIntegrityError`] when a step targets version 0, two
    /// steps share a version, or a version below the highest is missing.
    pub fn new(mut steps: Vec<MigrationStep>) -> Result<Self, RegistryIntegrityError> {
        steps.sort_by_key(MigrationStep::version);
        let latest = steps.last().map_or(SchemaVersion::INITIAL, MigrationStep::version);
        let mut previous: Option<&MigrationStep> = None;
        let mut expected: u32 = 1;
        for step in &steps {
            let version = step.version().get();
            if version == 0 {
                return Err(RegistryIntegrityError::ZeroVersion {
                    description: step.description(),
                });
            }
            if let Some(prior) = previous
                && prior.version() == step.version()
            {
                return Err(RegistryIntegrityError::DuplicateVersion {
                    version: step.version(),
                    first: prior.description(),
                    second: step.description(),
                });
            }
            if version != expected {
                return Err(RegistryIntegrityError::Gap {
                    missing: SchemaVersion::new(expected),
                    latest,
                });
            }
            previous = Some(step);
            expected = expected.saturating_add(1);
        }
        Ok(Self {
            steps,
        })
    }

    /// Builds the registry of every step shipped with this binary.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryIntegrityError`] when the built-in catalogue is
    /// malformed.
    pub fn builtin() -> Result<Self, RegistryIntegrityError> {
        Self::new(builtin_steps())
    }

    /// Returns the highest version any step produces, or 0 when empty.
    #[must_use]
    pub fn latest_version(&self) -> SchemaVersion {
        self.steps.last().map_or(SchemaVersion::INITIAL, MigrationStep::version)
    }

    /// Returns every step in version order.
    #[must_use]
    pub fn steps(&self) -> &[MigrationStep] {
        &self.steps
    }

    /// Returns the steps whose version is strictly greater than `version`.
    #[must_use]
    pub fn pending_after(&self, version: SchemaVersion) -> &[MigrationStep] {
        let start = self.steps.partition_point(|step| step.version() <= version);
        self.steps.get(start ..).unwrap_or_default()
    }

    /// Returns the step producing `version`.
    #[must_use]
    pub fn get(&self, version: SchemaVersion) -> Option<&MigrationStep> {
        self.steps
            .binary_search_by_key(&version, MigrationStep::version)
            .ok()
            .and_then(|index| self.steps.get(index))
    }

    /// Returns the number of registered steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true when no steps are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use explicit unwraps for clarity."
    )]

    use super::*;

    fn noop(version: u32, description: &'static str) -> MigrationStep {
        MigrationStep::new(version, description, |_| Ok(()))
    }

    #[test]
    fn sorts_steps_registered_out_of_order() {
        let registry =
            StepRegistry::new(vec![noop(3, "three"), noop(1, "one"), noop(2, "two")]).unwrap();
        let versions: Vec<u32> =
            registry.steps().iter().map(|step| step.version().get()).collect();
        assert_eq!(versions, vec![1, 2, 3]);
        assert_eq!(registry.latest_version(), SchemaVersion::new(3));
    }

    #[test]
    fn empty_registry_is_valid_at_version_zero() {
        let registry = StepRegistry::new(Vec::new()).unwrap();
        assert!(registry.is_empty());
        assert_eq!(registry.latest_version(), SchemaVersion::INITIAL);
        assert!(registry.pending_after(SchemaVersion::INITIAL).is_empty());
    }

    #[test]
    fn rejects_zero_version() {
        let err = StepRegistry::new(vec![noop(0, "zero"), noop(1, "one")]).unwrap_err();
        assert_eq!(err, RegistryIntegrityError::ZeroVersion {
            description: "zero"
        });
    }

    #[test]
    fn rejects_duplicate_version() {
        let err = StepRegistry::new(vec![noop(1, "one"), noop(2, "a"), noop(2, "b")]).unwrap_err();
        assert!(matches!(
            err,
            RegistryIntegrityError::DuplicateVersion { version, .. } if version == SchemaVersion::new(2)
        ));
    }

    #[test]
    fn rejects_gap_below_latest() {
        let steps = vec![noop(1, "1"), noop(2, "2"), noop(3, "3"), noop(4, "4"), noop(6, "6")];
        let err = StepRegistry::new(steps).unwrap_err();
        assert_eq!(err, RegistryIntegrityError::Gap {
            missing: SchemaVersion::new(5),
            latest: SchemaVersion::new(6),
        });
    }

    #[test]
    fn rejects_sequence_not_starting_at_one() {
        let err = StepRegistry::new(vec![noop(2, "2"), noop(3, "3")]).unwrap_err();
        assert_eq!(err, RegistryIntegrityError::Gap {
            missing: SchemaVersion::new(1),
            latest: SchemaVersion::new(3),
        });
    }

    #[test]
    fn pending_after_is_a_suffix() {
        let registry =
            StepRegistry::new(vec![noop(1, "1"), noop(2, "2"), noop(3, "3"), noop(4, "4")])
                .unwrap();
        let pending: Vec<u32> = registry
            .pending_after(SchemaVersion::new(2))
            .iter()
            .map(|step| step.version().get())
            .collect();
        assert_eq!(pending, vec![3, 4]);
        assert!(registry.pending_after(SchemaVersion::new(4)).is_empty());
        assert!(registry.pending_after(SchemaVersion::new(9)).is_empty());
        assert_eq!(registry.pending_after(SchemaVersion::INITIAL).len(), 4);
    }

    #[test]
    fn get_finds_step_by_version() {
        let registry = StepRegistry::new(vec![noop(1, "one"), noop(2, "two")]).unwrap();
        assert_eq!(registry.get(SchemaVersion::new(2)).unwrap().description(), "two");
        assert!(registry.get(SchemaVersion::new(3)).is_none());
    }

    #[test]
    fn builtin_registry_is_valid() {
        let registry = StepRegistry::builtin().unwrap();
        assert_eq!(registry.latest_version(), SchemaVersion::new(33));
        assert_eq!(registry.len(), 33);
    }
}
