// crates/dockhand-migrator/src/steps/mod.rs
// ============================================================================
// Module: Built-in Migration Steps
// Description: Every schema upgrade shipped with this binary.
// Purpose: Provide the catalogue behind `StepRegistry::builtin`.
// Dependencies: dockhand-core, crate::{error, step}
// ============================================================================

//! ## Overview
//! Steps are grouped by the records they touch. Each step fills in what its
//! schema version introduced and leaves already-populated fields alone,
//! except where a step explicitly overwrites a value. Records are written
//! only when the step actually changes them.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod access;
pub mod endpoints;
pub mod settings;
pub mod stacks;
pub mod tags;

// ============================================================================
// SECTION: Imports
// ============================================================================

use dockhand_core::Settings;
use dockhand_core::StoreError;

use crate::error::StepError;
use crate::step::MigrationStep;
use crate::step::StepContext;

// ============================================================================
// SECTION: Catalogue
// ============================================================================

/// Returns every built-in step, in version order.
#[must_use]
pub fn builtin_steps() -> Vec<MigrationStep> {
    vec![
        MigrationStep::new(1, "users: assign roles to legacy accounts", access::assign_user_roles),
        MigrationStep::new(2, "endpoints: initialize access lists", endpoints::init_access_lists),
        MigrationStep::new(
            3,
            "settings: default authentication method",
            settings::default_authentication_method,
        ),
        MigrationStep::new(
            4,
            "endpoints: move legacy TLS flag into TLS configuration",
            endpoints::fold_legacy_tls_flag,
        ),
        MigrationStep::new(
            5,
            "settings: allow bind mounts for regular users",
            settings::allow_bind_mounts,
        ),
        MigrationStep::new(
            6,
            "settings: allow privileged mode for regular users",
            settings::allow_privileged_mode,
        ),
        MigrationStep::new(
            7,
            "settings: hide external contributor templates",
            settings::hide_external_contributors,
        ),
        MigrationStep::new(8, "endpoints: initialize extension list", endpoints::init_extensions),
        MigrationStep::new(
            9,
            "endpoints: assign ungrouped endpoints to the unassigned group",
            endpoints::assign_unassigned_group,
        ),
        MigrationStep::new(10, "endpoints: default endpoint kind", endpoints::default_kind),
        MigrationStep::new(11, "endpoints: enable TLS for agent endpoints", endpoints::agent_tls),
        MigrationStep::new(
            12,
            "stacks and endpoints: default stack kind, initialize tag lists",
            stacks::default_kind_and_tag_lists,
        ),
        MigrationStep::new(
            13,
            "settings: LDAP user provisioning defaults",
            settings::ldap_provisioning_defaults,
        ),
        MigrationStep::new(
            14,
            "resource controls: restrict ownerless controls to administrators",
            access::restrict_ownerless_controls,
        ),
        MigrationStep::new(15, "settings: seed templates URL", settings::seed_templates_url),
        MigrationStep::new(
            16,
            "settings: seed snapshot interval",
            settings::seed_snapshot_interval,
        ),
        MigrationStep::new(
            17,
            "settings: disable host management features",
            settings::disable_host_management,
        ),
        MigrationStep::new(
            18,
            "endpoints, groups, registries: convert access lists to access policies",
            access::access_lists_to_policies,
        ),
        MigrationStep::new(
            19,
            "settings: default user session timeout",
            settings::default_session_timeout,
        ),
        MigrationStep::new(
            20,
            "users and settings: default authorizations, volume browser",
            access::default_authorizations,
        ),
        MigrationStep::new(
            21,
            "resource controls: default access level",
            access::default_access_levels,
        ),
        MigrationStep::new(22, "roles: seed built-in roles", access::seed_builtin_roles),
        MigrationStep::new(
            23,
            "tags: convert tag names to tag identifiers",
            tags::tag_names_to_identifiers,
        ),
        MigrationStep::new(
            24,
            "settings: seed edge agent check-in interval",
            settings::seed_edge_checkin_interval,
        ),
        MigrationStep::new(
            25,
            "settings and stacks: edge compute flag, stack status",
            stacks::edge_compute_and_stack_status,
        ),
        MigrationStep::new(
            26,
            "endpoints: security settings from global settings",
            endpoints::security_settings_from_globals,
        ),
        MigrationStep::new(
            27,
            "resource controls: scope stack identifiers by endpoint",
            stacks::scope_stack_resource_controls,
        ),
        MigrationStep::new(28, "users: default theme", access::default_user_theme),
        MigrationStep::new(
            29,
            "endpoints: Kubernetes configuration defaults",
            endpoints::kubernetes_defaults,
        ),
        MigrationStep::new(30, "settings: OAuth single sign-on defaults", settings::oauth_defaults),
        MigrationStep::new(
            31,
            "registries: per-endpoint registry accesses",
            access::per_endpoint_registry_accesses,
        ),
        MigrationStep::new(
            32,
            "settings: Helm repository URL and kubeconfig expiry",
            settings::helm_and_kubeconfig_defaults,
        ),
        MigrationStep::new(33, "settings: kubectl shell image", settings::kubectl_shell_image),
    ]
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Applies `mutate` to the settings record and writes it back when changed.
///
/// A store without a settings record is treated as holding the defaults, and
/// the mutated record is written so later steps and the application find it.
pub(crate) fn update_settings<F>(context: &StepContext<'_>, mutate: F) -> Result<(), StepError>
where
    F: FnOnce(&mut Settings),
{
    let stored = context.store().settings()?;
    let mut settings = stored.clone().unwrap_or_default();
    mutate(&mut settings);
    if stored.as_ref() != Some(&settings) {
        context.store().update_settings(&settings)?;
    }
    Ok(())
}

/// Applies `mutate` to each record and writes back the ones it changed.
pub(crate) fn rewrite_each<T, M, W>(
    records: Vec<T>,
    mut mutate: M,
    mut write: W,
) -> Result<(), StepError>
where
    T: Clone + PartialEq,
    M: FnMut(&mut T),
    W: FnMut(&T) -> Result<(), StoreError>,
{
    for record in records {
        let mut updated = record.clone();
        mutate(&mut updated);
        if updated != record {
            write(&updated)?;
        }
    }
    Ok(())
}
