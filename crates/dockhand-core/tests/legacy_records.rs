// crates/dockhand-core/tests/legacy_records.rs
// ============================================================================
// Module: Legacy Record Decoding Tests
// Description: Records written by older binaries must stay readable.
// Purpose: Validate serde defaults on fields introduced by later schema versions.
// ============================================================================

//! ## Overview
//! Migration steps can only run if the records they read still decode. These
//! tests feed minimal legacy documents through the current record types.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

use dockhand_core::AccessPolicy;
use dockhand_core::Endpoint;
use dockhand_core::EndpointGroupId;
use dockhand_core::EndpointKind;
use dockhand_core::SchemaVersion;
use dockhand_core::Settings;
use dockhand_core::User;
use dockhand_core::UserId;
use dockhand_core::UserRole;

#[test]
fn legacy_settings_document_decodes_with_unset_fields() {
    let settings: Settings =
        serde_json::from_str(r#"{"logo_url":"https://example.test/logo.png"}"#).unwrap();
    assert_eq!(settings.logo_url, "https://example.test/logo.png");
    assert!(settings.authentication_method.is_none());
    assert!(settings.kubectl_shell_image.is_none());
}

#[test]
fn legacy_endpoint_document_decodes_with_legacy_fields() {
    let endpoint: Endpoint = serde_json::from_str(
        r#"{"id":4,"name":"local","url":"unix:///var/run/docker.sock","tls":true,"tags":["prod"]}"#,
    )
    .unwrap();
    assert_eq!(endpoint.kind, EndpointKind::Unset);
    assert_eq!(endpoint.group_id, EndpointGroupId::new(0));
    assert_eq!(endpoint.tls, Some(true));
    assert_eq!(endpoint.tags, Some(vec!["prod".to_string()]));
    assert!(endpoint.tls_config.is_none());
}

#[test]
fn legacy_user_without_role_decodes_as_unset() {
    let user: User = serde_json::from_str(r#"{"id":1,"username":"admin"}"#).unwrap();
    assert_eq!(user.role, UserRole::Unset);
}

#[test]
fn access_policy_maps_use_numeric_keys() {
    let mut endpoint = Endpoint::default();
    endpoint.user_access_policies.insert(UserId::new(12), AccessPolicy::default());
    let json = serde_json::to_value(&endpoint).unwrap();
    assert!(json["user_access_policies"].get("12").is_some());

    let decoded: Endpoint = serde_json::from_value(json).unwrap();
    assert!(decoded.user_access_policies.contains_key(&UserId::new(12)));
}

#[test]
fn schema_version_serializes_as_bare_integer() {
    let text = serde_json::to_string(&SchemaVersion::new(33)).unwrap();
    assert_eq!(text, "33");
    let decoded: SchemaVersion = serde_json::from_str("32").unwrap();
    assert_eq!(decoded.next(), Some(SchemaVersion::new(33)));
}
