// crates/dockhand-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic example for docs and `dockhand config example`.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example for Dockhand configuration. The example is validated by
//! the test suite so that it never drifts from the model.

/// Returns a canonical example `dockhand.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[store]
path = "/var/lib/dockhand/dockhand.db"
journal_mode = "wal"
sync_mode = "full"
busy_timeout_ms = 5000

[migration]
commit_policy = "per_step"

[migration.audit]
sink = "file"
path = "/var/log/dockhand/migration.log"

[bootstrap]
kubectl_shell_image = "dockhand/kubectl-shell:latest"
templates_url = "https://raw.githubusercontent.com/dockhand/templates/master/templates.json"
snapshot_interval = "5m"
edge_checkin_interval_secs = 5
helm_repository_url = "https://charts.bitnami.com/bitnami"
"#,
    )
}
