// crates/dockhand-migrator/tests/builtin_steps.rs
// ============================================================================
// Module: Built-in Step Chain Tests
// Description: End-to-end passes of the shipped step catalogue.
// Purpose: Validate legacy stores reach the latest version with every record
//          upgraded, over both the in-memory and SQLite stores.
// ============================================================================

//! ## Overview
//! Runs the built-in registry over legacy fixtures:
//! - Fresh legacy store migrated from version 0 to 33
//! - Store at 32 picking up the kubectl shell image
//! - Missing bootstrap image failing step 33 and keeping version 32
//! - SQLite-backed pass surviving a reopen

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use dockhand_core::AuthenticationMethod;
use dockhand_core::Endpoint;
use dockhand_core::EndpointGroupId;
use dockhand_core::EndpointGroupService;
use dockhand_core::EndpointId;
use dockhand_core::EndpointKind;
use dockhand_core::EndpointService;
use dockhand_core::InMemoryRecordStore;
use dockhand_core::RecordStore;
use dockhand_core::RoleService;
use dockhand_core::SchemaVersion;
use dockhand_core::Settings;
use dockhand_core::SettingsService;
use dockhand_core::Stack;
use dockhand_core::StackId;
use dockhand_core::StackKind;
use dockhand_core::StackService;
use dockhand_core::StackStatus;
use dockhand_core::TagService;
use dockhand_core::User;
use dockhand_core::UserId;
use dockhand_core::UserRole;
use dockhand_core::UserService;
use dockhand_core::VersionStore;
use dockhand_migrator::BootstrapConfig;
use dockhand_migrator::MigrationError;
use dockhand_migrator::MigrationOrchestrator;
use dockhand_migrator::StepError;
use dockhand_migrator::StepRegistry;
use dockhand_store_sqlite::SqliteRecordStore;
use dockhand_store_sqlite::SqliteStoreConfig;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

const IMAGE: &str = "example/image:tag";

fn bootstrap_with_image() -> BootstrapConfig {
    BootstrapConfig {
        kubectl_shell_image: Some(IMAGE.to_string()),
        ..BootstrapConfig::default()
    }
}

/// Seeds records shaped the way the earliest binaries wrote them.
fn seed_legacy_records(store: &dyn RecordStore) {
    store
        .update_settings(&Settings {
            logo_url: "https://example.invalid/logo.png".to_string(),
            ..Settings::default()
        })
        .unwrap();
    store
        .update_user(&User {
            id: UserId::new(1),
            username: "admin".to_string(),
            ..User::default()
        })
        .unwrap();
    store
        .update_user(&User {
            id: UserId::new(2),
            username: "alice".to_string(),
            ..User::default()
        })
        .unwrap();
    store
        .update_endpoint(&Endpoint {
            id: EndpointId::new(1),
            name: "local".to_string(),
            tls: Some(false),
            authorized_users: Some(vec![UserId::new(2)]),
            ..Endpoint::default()
        })
        .unwrap();
    store
        .update_stack(&Stack {
            id: StackId::new(1),
            name: "web".to_string(),
            endpoint_id: EndpointId::new(1),
            ..Stack::default()
        })
        .unwrap();
}

// ============================================================================
// SECTION: In-Memory Chain
// ============================================================================

#[test]
fn legacy_store_reaches_latest_version() {
    let registry = StepRegistry::builtin().unwrap();
    let store = InMemoryRecordStore::new();
    seed_legacy_records(&store);
    let bootstrap = bootstrap_with_image();

    let report = MigrationOrchestrator::new(&store, &registry, &bootstrap).migrate().unwrap();

    assert_eq!(report.from, SchemaVersion::INITIAL);
    assert_eq!(report.to, SchemaVersion::new(33));
    assert_eq!(report.applied.len(), 33);
    assert_eq!(store.schema_version().unwrap(), Some(SchemaVersion::new(33)));

    let settings = store.settings().unwrap().unwrap();
    assert_eq!(settings.logo_url, "https://example.invalid/logo.png");
    assert_eq!(settings.authentication_method, Some(AuthenticationMethod::Internal));
    assert_eq!(settings.allow_bind_mounts_for_regular_users, Some(true));
    assert_eq!(settings.user_session_timeout.as_deref(), Some("8h"));
    assert_eq!(settings.kubeconfig_expiry.as_deref(), Some("0"));
    assert_eq!(settings.kubectl_shell_image.as_deref(), Some(IMAGE));
    assert!(settings.oauth_settings.is_some());

    let users = store.users().unwrap();
    assert_eq!(users[0].role, UserRole::Administrator);
    assert_eq!(users[1].role, UserRole::Standard);
    assert!(users.iter().all(|user| user.theme.is_some() && user.authorizations.is_some()));

    let endpoint = store.endpoints().unwrap().remove(0);
    assert_eq!(endpoint.kind, EndpointKind::Docker);
    assert_eq!(endpoint.group_id, EndpointGroupId::UNASSIGNED);
    assert_eq!(endpoint.tls, None);
    assert!(endpoint.user_access_policies.contains_key(&UserId::new(2)));
    assert!(endpoint.security_settings.is_some());
    assert!(store.endpoint_group(EndpointGroupId::UNASSIGNED).unwrap().is_some());

    let stack = store.stacks().unwrap().remove(0);
    assert_eq!(stack.kind, StackKind::Swarm);
    assert_eq!(stack.status, StackStatus::Active);
    assert_eq!(store.roles().unwrap().len(), 4);
}

#[test]
fn second_pass_over_migrated_store_is_write_free() {
    let registry = StepRegistry::builtin().unwrap();
    let store = InMemoryRecordStore::new();
    seed_legacy_records(&store);
    let bootstrap = bootstrap_with_image();
    MigrationOrchestrator::new(&store, &registry, &bootstrap).migrate().unwrap();
    store.reset_write_counts().unwrap();

    let report = MigrationOrchestrator::new(&store, &registry, &bootstrap).migrate().unwrap();

    assert!(report.is_noop());
    assert_eq!(store.write_count().unwrap(), 0);
}

#[test]
fn store_at_32_picks_up_kubectl_shell_image() {
    let registry = StepRegistry::builtin().unwrap();
    let store = InMemoryRecordStore::at_version(SchemaVersion::new(32));
    store.update_settings(&Settings::default()).unwrap();
    let bootstrap = bootstrap_with_image();

    let report = MigrationOrchestrator::new(&store, &registry, &bootstrap).migrate().unwrap();

    assert_eq!(report.applied, vec![SchemaVersion::new(33)]);
    assert_eq!(store.schema_version().unwrap(), Some(SchemaVersion::new(33)));
    let settings = store.settings().unwrap().unwrap();
    assert_eq!(settings.kubectl_shell_image.as_deref(), Some(IMAGE));
    assert_eq!(store.tags().unwrap().len(), 0);
}

#[test]
fn missing_kubectl_image_fails_step_33_and_keeps_version_32() {
    let registry = StepRegistry::builtin().unwrap();
    let store = InMemoryRecordStore::at_version(SchemaVersion::new(32));
    store.update_settings(&Settings::default()).unwrap();
    store.reset_write_counts().unwrap();
    let bootstrap = BootstrapConfig::default();

    let Err(err) = MigrationOrchestrator::new(&store, &registry, &bootstrap).migrate() else {
        panic!("missing image should fail step 33");
    };

    assert!(matches!(
        err,
        MigrationError::StepExecution {
            version,
            source: StepError::MissingBootstrap { key: "kubectl_shell_image" },
            ..
        } if version == SchemaVersion::new(33)
    ));
    assert_eq!(store.schema_version().unwrap(), Some(SchemaVersion::new(32)));
    assert_eq!(store.settings().unwrap().unwrap().kubectl_shell_image, None);
    assert_eq!(store.write_count().unwrap(), 0);
}

#[test]
fn bootstrap_values_seed_settings_during_chain() {
    let registry = StepRegistry::builtin().unwrap();
    let store = InMemoryRecordStore::new();
    let bootstrap = BootstrapConfig {
        kubectl_shell_image: Some(IMAGE.to_string()),
        templates_url: Some("https://templates.example.invalid/t.json".to_string()),
        snapshot_interval: Some("15m".to_string()),
        edge_checkin_interval_secs: Some(30),
        helm_repository_url: Some("https://charts.example.invalid".to_string()),
    };

    MigrationOrchestrator::new(&store, &registry, &bootstrap).migrate().unwrap();

    let settings = store.settings().unwrap().unwrap();
    assert_eq!(settings.templates_url.as_deref(), Some("https://templates.example.invalid/t.json"));
    assert_eq!(settings.snapshot_interval.as_deref(), Some("15m"));
    assert_eq!(settings.edge_agent_checkin_interval, Some(30));
    assert_eq!(settings.helm_repository_url.as_deref(), Some("https://charts.example.invalid"));
}

// ============================================================================
// SECTION: SQLite Chain
// ============================================================================

#[test]
fn sqlite_store_migrates_and_survives_reopen() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("dockhand.db");
    let registry = StepRegistry::builtin().unwrap();
    let bootstrap = bootstrap_with_image();
    {
        let store = SqliteRecordStore::new(SqliteStoreConfig::for_path(&path)).unwrap();
        seed_legacy_records(&store);
        MigrationOrchestrator::new(&store, &registry, &bootstrap).migrate().unwrap();
    }

    let reopened = SqliteRecordStore::new(SqliteStoreConfig::for_path(&path)).unwrap();
    assert_eq!(reopened.schema_version().unwrap(), Some(SchemaVersion::new(33)));
    let settings = reopened.settings().unwrap().unwrap();
    assert_eq!(settings.kubectl_shell_image.as_deref(), Some(IMAGE));

    let report = MigrationOrchestrator::new(&reopened, &registry, &bootstrap).migrate().unwrap();
    assert!(report.is_noop());
}

#[test]
fn sqlite_failed_pass_resumes_after_fix() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("dockhand.db");
    let registry = StepRegistry::builtin().unwrap();
    {
        let store = SqliteRecordStore::new(SqliteStoreConfig::for_path(&path)).unwrap();
        seed_legacy_records(&store);
        let result =
            MigrationOrchestrator::new(&store, &registry, &BootstrapConfig::default()).migrate();
        assert!(result.is_err());
        assert_eq!(store.schema_version().unwrap(), Some(SchemaVersion::new(32)));
    }

    let reopened = SqliteRecordStore::new(SqliteStoreConfig::for_path(&path)).unwrap();
    let bootstrap = bootstrap_with_image();
    let report = MigrationOrchestrator::new(&reopened, &registry, &bootstrap).migrate().unwrap();
    assert_eq!(report.applied, vec![SchemaVersion::new(33)]);
}
