// crates/dockhand-migrator/src/steps/settings.rs
// ============================================================================
// Module: Settings Steps
// Description: Upgrades that seed or default fields of the settings record.
// Purpose: Fill settings fields in the version that introduced them.
// Dependencies: dockhand-core, crate::{error, step, steps}
// ============================================================================

//! ## Overview
//! Most settings steps fill one missing field with a constant or a bootstrap
//! value. The kubectl shell image step is the exception: it always writes the
//! configured image and fails when none was supplied.

// ============================================================================
// SECTION: Imports
// ============================================================================

use dockhand_core::AuthenticationMethod;
use dockhand_core::LdapGroupSearchSettings;
use dockhand_core::LdapSearchSettings;
use dockhand_core::LdapSettings;
use dockhand_core::OAuthSettings;

use crate::error::StepError;
use crate::step::StepContext;
use crate::steps::update_settings;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default idle session timeout.
pub const DEFAULT_USER_SESSION_TIMEOUT: &str = "8h";
/// Kubeconfig expiry meaning "never".
pub const KUBECONFIG_NO_EXPIRY: &str = "0";

// ============================================================================
// SECTION: Steps
// ============================================================================

/// Version 3.
pub fn default_authentication_method(context: &StepContext<'_>) -> Result<(), StepError> {
    update_settings(context, |settings| {
        settings.authentication_method.get_or_insert(AuthenticationMethod::Internal);
        settings.ldap_settings.get_or_insert_with(default_ldap_settings);
    })
}

/// Version 5.
pub fn allow_bind_mounts(context: &StepContext<'_>) -> Result<(), StepError> {
    update_settings(context, |settings| {
        settings.allow_bind_mounts_for_regular_users.get_or_insert(true);
    })
}

/// Version 6.
pub fn allow_privileged_mode(context: &StepContext<'_>) -> Result<(), StepError> {
    update_settings(context, |settings| {
        settings.allow_privileged_mode_for_regular_users.get_or_insert(true);
    })
}

/// Version 7.
pub fn hide_external_contributors(context: &StepContext<'_>) -> Result<(), StepError> {
    update_settings(context, |settings| {
        settings.display_external_contributors.get_or_insert(false);
    })
}

/// Version 13.
pub fn ldap_provisioning_defaults(context: &StepContext<'_>) -> Result<(), StepError> {
    update_settings(context, |settings| {
        let ldap = settings.ldap_settings.get_or_insert_with(default_ldap_settings);
        ldap.auto_create_users.get_or_insert(false);
        ldap.group_search_settings
            .get_or_insert_with(|| vec![LdapGroupSearchSettings::default()]);
    })
}

/// Version 15.
pub fn seed_templates_url(context: &StepContext<'_>) -> Result<(), StepError> {
    let url = context.bootstrap().templates_url_or_default();
    update_settings(context, |settings| {
        settings.templates_url.get_or_insert_with(|| url.to_string());
    })
}

/// Version 16.
pub fn seed_snapshot_interval(context: &StepContext<'_>) -> Result<(), StepError> {
    let interval = context.bootstrap().snapshot_interval_or_default();
    update_settings(context, |settings| {
        settings.snapshot_interval.get_or_insert_with(|| interval.to_string());
    })
}

/// Version 17.
pub fn disable_host_management(context: &StepContext<'_>) -> Result<(), StepError> {
    update_settings(context, |settings| {
        settings.enable_host_management_features.get_or_insert(false);
    })
}

/// Version 19.
pub fn default_session_timeout(context: &StepContext<'_>) -> Result<(), StepError> {
    update_settings(context, |settings| {
        settings
            .user_session_timeout
            .get_or_insert_with(|| DEFAULT_USER_SESSION_TIMEOUT.to_string());
    })
}

/// Version 24.
pub fn seed_edge_checkin_interval(context: &StepContext<'_>) -> Result<(), StepError> {
    let interval = context.bootstrap().edge_checkin_interval_or_default();
    update_settings(context, |settings| {
        settings.edge_agent_checkin_interval.get_or_insert(interval);
    })
}

/// Version 30.
pub fn oauth_defaults(context: &StepContext<'_>) -> Result<(), StepError> {
    update_settings(context, |settings| {
        settings.oauth_settings.get_or_insert_with(OAuthSettings::default);
    })
}

/// Version 32.
pub fn helm_and_kubeconfig_defaults(context: &StepContext<'_>) -> Result<(), StepError> {
    let helm_url = context.bootstrap().helm_repository_url_or_default();
    update_settings(context, |settings| {
        settings.helm_repository_url.get_or_insert_with(|| helm_url.to_string());
        settings.kubeconfig_expiry.get_or_insert_with(|| KUBECONFIG_NO_EXPIRY.to_string());
    })
}

/// Version 33: persists the configured kubectl shell image.
///
/// The image is resolved before the settings record is read, so a missing
/// value fails the step without touching the store.
pub fn kubectl_shell_image(context: &StepContext<'_>) -> Result<(), StepError> {
    let image = context.bootstrap().require_kubectl_shell_image()?;
    update_settings(context, |settings| {
        settings.kubectl_shell_image = Some(image.to_string());
    })
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// LDAP block seeded for stores that predate LDAP support.
fn default_ldap_settings() -> LdapSettings {
    LdapSettings {
        search_settings: vec![LdapSearchSettings::default()],
        ..LdapSettings::default()
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

    use dockhand_core::InMemoryRecordStore;
    use dockhand_core::Settings;
    use dockhand_core::SettingsService;

    use super::*;
    use crate::bootstrap::BootstrapConfig;
    use crate::bootstrap::DEFAULT_SNAPSHOT_INTERVAL;

    fn run(
        store: &InMemoryRecordStore,
        bootstrap: &BootstrapConfig,
        step: fn(&StepContext<'_>) -> Result<(), StepError>,
    ) -> Result<(), StepError> {
        step(&StepContext::new(store, bootstrap))
    }

    #[test]
    fn missing_settings_record_is_created_with_defaults() {
        let store = InMemoryRecordStore::new();
        run(&store, &BootstrapConfig::default(), allow_bind_mounts).unwrap();
        let settings = store.settings().unwrap().unwrap();
        assert_eq!(settings.allow_bind_mounts_for_regular_users, Some(true));
    }

    #[test]
    fn populated_field_is_left_alone_and_not_rewritten() {
        let store = InMemoryRecordStore::new();
        store
            .update_settings(&Settings {
                snapshot_interval: Some("1h".to_string()),
                ..Settings::default()
            })
            .unwrap();
        store.reset_write_counts().unwrap();

        run(&store, &BootstrapConfig::default(), seed_snapshot_interval).unwrap();
        assert_eq!(store.settings().unwrap().unwrap().snapshot_interval.as_deref(), Some("1h"));
        assert_eq!(store.write_count().unwrap(), 0);
    }

    #[test]
    fn snapshot_interval_falls_back_to_default() {
        let store = InMemoryRecordStore::new();
        run(&store, &BootstrapConfig::default(), seed_snapshot_interval).unwrap();
        assert_eq!(
            store.settings().unwrap().unwrap().snapshot_interval.as_deref(),
            Some(DEFAULT_SNAPSHOT_INTERVAL)
        );
    }

    #[test]
    fn ldap_defaults_add_one_group_search_entry() {
        let store = InMemoryRecordStore::new();
        run(&store, &BootstrapConfig::default(), default_authentication_method).unwrap();
        run(&store, &BootstrapConfig::default(), ldap_provisioning_defaults).unwrap();
        let ldap = store.settings().unwrap().unwrap().ldap_settings.unwrap();
        assert_eq!(ldap.auto_create_users, Some(false));
        assert_eq!(ldap.group_search_settings.unwrap().len(), 1);
        assert_eq!(ldap.search_settings.len(), 1);
    }

    #[test]
    fn kubectl_image_overwrites_existing_value() {
        let store = InMemoryRecordStore::new();
        store
            .update_settings(&Settings {
                kubectl_shell_image: Some("old/image:1".to_string()),
                ..Settings::default()
            })
            .unwrap();
        let bootstrap = BootstrapConfig {
            kubectl_shell_image: Some("new/image:2".to_string()),
            ..BootstrapConfig::default()
        };
        run(&store, &bootstrap, kubectl_shell_image).unwrap();
        assert_eq!(
            store.settings().unwrap().unwrap().kubectl_shell_image.as_deref(),
            Some("new/image:2")
        );
    }

    #[test]
    fn kubectl_image_missing_fails_without_writes() {
        let store = InMemoryRecordStore::new();
        let err = run(&store, &BootstrapConfig::default(), kubectl_shell_image).unwrap_err();
        assert!(matches!(err, StepError::MissingBootstrap { .. }));
        assert_eq!(store.write_count().unwrap(), 0);
    }
}
