// crates/dockhand-migrator/src/steps/endpoints.rs
// ============================================================================
// Module: Endpoint Steps
// Description: Upgrades that reshape endpoint and endpoint group records.
// Purpose: Default endpoint fields and retire legacy endpoint layouts.
// Dependencies: dockhand-core, crate::{error, step, steps}
// ============================================================================

//! ## Overview
//! Endpoint steps run over every endpoint record and rewrite only the ones
//! they change.

// ============================================================================
// SECTION: Imports
// ============================================================================

use dockhand_core::EndpointGroup;
use dockhand_core::EndpointGroupId;
use dockhand_core::EndpointKind;
use dockhand_core::EndpointSecuritySettings;
use dockhand_core::KubernetesConfiguration;
use dockhand_core::TlsConfig;

use crate::error::StepError;
use crate::step::StepContext;
use crate::steps::rewrite_each;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Name of the group holding endpoints that predate endpoint groups.
pub const UNASSIGNED_GROUP_NAME: &str = "Unassigned";
/// Description of the unassigned group.
const UNASSIGNED_GROUP_DESCRIPTION: &str = "Unassigned endpoints";

// ============================================================================
// SECTION: Steps
// ============================================================================

/// Version 2.
pub fn init_access_lists(context: &StepContext<'_>) -> Result<(), StepError> {
    let store = context.store();
    rewrite_each(
        store.endpoints()?,
        |endpoint| {
            endpoint.authorized_users.get_or_insert_with(Vec::new);
            endpoint.authorized_teams.get_or_insert_with(Vec::new);
        },
        |endpoint| store.update_endpoint(endpoint),
    )
}

/// Version 4.
pub fn fold_legacy_tls_flag(context: &StepContext<'_>) -> Result<(), StepError> {
    let store = context.store();
    rewrite_each(
        store.endpoints()?,
        |endpoint| {
            if let Some(flag) = endpoint.tls.take() {
                endpoint.tls_config.get_or_insert_with(|| TlsConfig {
                    tls: flag,
                    ..TlsConfig::default()
                });
            }
        },
        |endpoint| store.update_endpoint(endpoint),
    )
}

/// Version 8.
pub fn init_extensions(context: &StepContext<'_>) -> Result<(), StepError> {
    let store = context.store();
    rewrite_each(
        store.endpoints()?,
        |endpoint| {
            endpoint.extensions.get_or_insert_with(Vec::new);
        },
        |endpoint| store.update_endpoint(endpoint),
    )
}

/// Version 9: creates the unassigned group and moves ungrouped endpoints in.
pub fn assign_unassigned_group(context: &StepContext<'_>) -> Result<(), StepError> {
    let store = context.store();
    if store.endpoint_group(EndpointGroupId::UNASSIGNED)?.is_none() {
        store.update_endpoint_group(&EndpointGroup {
            id: EndpointGroupId::UNASSIGNED,
            name: UNASSIGNED_GROUP_NAME.to_string(),
            description: UNASSIGNED_GROUP_DESCRIPTION.to_string(),
            authorized_users: Some(Vec::new()),
            authorized_teams: Some(Vec::new()),
            ..EndpointGroup::default()
        })?;
    }
    rewrite_each(
        store.endpoints()?,
        |endpoint| {
            if endpoint.group_id.get() == 0 {
                endpoint.group_id = EndpointGroupId::UNASSIGNED;
            }
        },
        |endpoint| store.update_endpoint(endpoint),
    )
}

/// Version 10.
pub fn default_kind(context: &StepContext<'_>) -> Result<(), StepError> {
    let store = context.store();
    rewrite_each(
        store.endpoints()?,
        |endpoint| {
            if endpoint.kind == EndpointKind::Unset {
                endpoint.kind = EndpointKind::Docker;
            }
        },
        |endpoint| store.update_endpoint(endpoint),
    )
}

/// Version 11: agents always speak TLS with a self-signed certificate.
pub fn agent_tls(context: &StepContext<'_>) -> Result<(), StepError> {
    let store = context.store();
    rewrite_each(
        store.endpoints()?,
        |endpoint| {
            if endpoint.kind.is_agent() {
                let tls = endpoint.tls_config.get_or_insert_with(TlsConfig::default);
                tls.tls = true;
                tls.tls_skip_verify = true;
            }
        },
        |endpoint| store.update_endpoint(endpoint),
    )
}

/// Version 26.
pub fn security_settings_from_globals(context: &StepContext<'_>) -> Result<(), StepError> {
    let store = context.store();
    let settings = store.settings()?.unwrap_or_default();
    let inherited = EndpointSecuritySettings {
        allow_bind_mounts_for_regular_users: settings
            .allow_bind_mounts_for_regular_users
            .unwrap_or(true),
        allow_privileged_mode_for_regular_users: settings
            .allow_privileged_mode_for_regular_users
            .unwrap_or(true),
        allow_volume_browser_for_regular_users: settings
            .allow_volume_browser_for_regular_users
            .unwrap_or(false),
        enable_host_management_features: settings
            .enable_host_management_features
            .unwrap_or(false),
    };
    rewrite_each(
        store.endpoints()?,
        |endpoint| {
            endpoint.security_settings.get_or_insert_with(|| inherited.clone());
        },
        |endpoint| store.update_endpoint(endpoint),
    )
}

/// Version 29.
pub fn kubernetes_defaults(context: &StepContext<'_>) -> Result<(), StepError> {
    let store = context.store();
    rewrite_each(
        store.endpoints()?,
        |endpoint| {
            if endpoint.kind.is_kubernetes() {
                endpoint.kubernetes.get_or_insert_with(KubernetesConfiguration::default);
            }
        },
        |endpoint| store.update_endpoint(endpoint),
    )
}

// ============================================================================
// SECTION: Tests
// ============================================================================
