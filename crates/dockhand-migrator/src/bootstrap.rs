// crates/dockhand-migrator/src/bootstrap.rs
// ============================================================================
// Module: Bootstrap Configuration
// Description: Startup values consumed by migration steps.
// Purpose: Carry operator-supplied seeds into the steps that persist them.
// Dependencies: serde, crate::error
// ============================================================================

//! ## Overview
//! Some steps persist a value chosen at startup rather than a constant, for
//! example the kubectl shell image. [`BootstrapConfig`] holds those values.
//! Steps either require a value, failing with
//! [`StepError::MissingBootstrap`] when it is absent, or fall back to a
//! documented default.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::error::StepError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Bootstrap key for the kubectl shell image.
pub const KUBECTL_SHELL_IMAGE_KEY: &str = "kubectl_shell_image";
/// Default application templates definition URL.
pub const DEFAULT_TEMPLATES_URL: &str =
    "https://raw.githubusercontent.com/dockhand/templates/master/templates.json";
/// Default snapshot interval.
pub const DEFAULT_SNAPSHOT_INTERVAL: &str = "5m";
/// Default edge agent check-in interval in seconds.
pub const DEFAULT_EDGE_CHECKIN_INTERVAL_SECS: u32 = 5;
/// Default Helm chart repository URL.
pub const DEFAULT_HELM_REPOSITORY_URL: &str = "https://charts.bitnami.com/bitnami";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Operator-supplied values consumed by migration steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BootstrapConfig {
    /// Image used for in-browser kubectl shells.
    pub kubectl_shell_image: Option<String>,
    /// Application templates definition URL.
    pub templates_url: Option<String>,
    /// Endpoint snapshot interval (duration string).
    pub snapshot_interval: Option<String>,
    /// Edge agent check-in interval in seconds.
    pub edge_checkin_interval_secs: Option<u32>,
    /// Helm chart repository URL.
    pub helm_repository_url: Option<String>,
}

impl BootstrapConfig {
    /// Returns a copy where every value set in `overrides` replaces ours.
    #[must_use]
    pub fn merged_with(&self, overrides: &Self) -> Self {
        Self {
            kubectl_shell_image: overrides
                .kubectl_shell_image
                .clone()
                .or_else(|| self.kubectl_shell_image.clone()),
            templates_url: overrides.templates_url.clone().or_else(|| self.templates_url.clone()),
            snapshot_interval: overrides
                .snapshot_interval
                .clone()
                .or_else(|| self.snapshot_interval.clone()),
            edge_checkin_interval_secs: overrides
                .edge_checkin_interval_secs
                .or(self.edge_checkin_interval_secs),
            helm_repository_url: overrides
                .helm_repository_url
                .clone()
                .or_else(|| self.helm_repository_url.clone()),
        }
    }

    /// Returns the kubectl shell image.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::MissingBootstrap`] when the image is unset or blank.
    pub fn require_kubectl_shell_image(&self) -> Result<&str, StepError> {
        match self.kubectl_shell_image.as_deref() {
            Some(image) if !image.trim().is_empty() => Ok(image),
            _ => Err(StepError::MissingBootstrap {
                key: KUBECTL_SHELL_IMAGE_KEY,
            }),
        }
    }

    /// Returns the templates URL, or the built-in default.
    #[must_use]
    pub fn templates_url_or_default(&self) -> &str {
        self.templates_url.as_deref().unwrap_or(DEFAULT_TEMPLATES_URL)
    }

    /// Returns the snapshot interval, or the built-in default.
    #[must_use]
    pub fn snapshot_interval_or_default(&self) -> &str {
        self.snapshot_interval.as_deref().unwrap_or(DEFAULT_SNAPSHOT_INTERVAL)
    }

    /// Returns the edge check-in interval, or the built-in default.
    #[must_use]
    pub fn edge_checkin_interval_or_default(&self) -> u32 {
        self.edge_checkin_interval_secs.unwrap_or(DEFAULT_EDGE_CHECKIN_INTERVAL_SECS)
    }

    /// Returns the Helm repository URL, or the built-in default.
    #[must_use]
    pub fn helm_repository_url_or_default(&self) -> &str {
        self.helm_repository_url.as_deref().unwrap_or(DEFAULT_HELM_REPOSITORY_URL)
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

    #[test]
    fn blank_kubectl_image_counts_as_missing() {
        let config = BootstrapConfig {
            kubectl_shell_image: Some("  ".to_string()),
            ..BootstrapConfig::default()
        };
        assert_eq!(
            config.require_kubectl_shell_image(),
            Err(StepError::MissingBootstrap {
                key: KUBECTL_SHELL_IMAGE_KEY
            })
        );
    }

    #[test]
    fn overrides_win_and_gaps_fall_through() {
        let base = BootstrapConfig {
            kubectl_shell_image: Some("base/image:1".to_string()),
            snapshot_interval: Some("10m".to_string()),
            ..BootstrapConfig::default()
        };
        let overrides = BootstrapConfig {
            kubectl_shell_image: Some("override/image:2".to_string()),
            ..BootstrapConfig::default()
        };
        let merged = base.merged_with(&overrides);
        assert_eq!(merged.require_kubectl_shell_image().unwrap(), "override/image:2");
        assert_eq!(merged.snapshot_interval_or_default(), "10m");
        assert_eq!(merged.templates_url_or_default(), DEFAULT_TEMPLATES_URL);
    }
}
