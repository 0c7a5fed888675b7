// crates/dockhand-core/src/core/settings.rs
// ============================================================================
// Module: Dockhand Settings Record
// Description: Singleton application settings persisted in the record store.
// Purpose: Model every settings field ever introduced by a schema version.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`Settings`] is the singleton record most migration steps touch. Fields
//! introduced after the first schema version are optional: a record written
//! by an older binary deserializes with those fields unset, and the step that
//! introduced the field seeds it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Application-wide settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Custom logo URL shown in the UI.
    pub logo_url: String,
    /// Container labels hidden from regular users.
    pub blacklisted_labels: Vec<String>,
    /// Authentication method used for logins.
    pub authentication_method: Option<AuthenticationMethod>,
    /// LDAP configuration block.
    pub ldap_settings: Option<LdapSettings>,
    /// OAuth configuration block.
    pub oauth_settings: Option<OAuthSettings>,
    /// Whether regular users may use bind mounts.
    pub allow_bind_mounts_for_regular_users: Option<bool>,
    /// Whether regular users may run privileged containers.
    pub allow_privileged_mode_for_regular_users: Option<bool>,
    /// Whether regular users may browse volumes.
    pub allow_volume_browser_for_regular_users: Option<bool>,
    /// Whether host management features are enabled.
    pub enable_host_management_features: Option<bool>,
    /// Whether edge compute features are enabled.
    pub enable_edge_compute_features: Option<bool>,
    /// Whether templates from external contributors are displayed.
    pub display_external_contributors: Option<bool>,
    /// URL of the application templates definition.
    pub templates_url: Option<String>,
    /// Interval between endpoint snapshots (duration string).
    pub snapshot_interval: Option<String>,
    /// Edge agent check-in interval in seconds.
    pub edge_agent_checkin_interval: Option<u32>,
    /// Idle session timeout (duration string).
    pub user_session_timeout: Option<String>,
    /// Helm chart repository URL.
    pub helm_repository_url: Option<String>,
    /// Kubeconfig expiry (duration string, `0` for never).
    pub kubeconfig_expiry: Option<String>,
    /// Image used for in-browser kubectl shells.
    pub kubectl_shell_image: Option<String>,
}

/// Login authentication method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthenticationMethod {
    /// Built-in username/password authentication.
    Internal,
    /// LDAP directory authentication.
    Ldap,
    /// OAuth provider authentication.
    #[serde(rename = "oauth")]
    OAuth,
}

/// LDAP directory configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LdapSettings {
    /// LDAP server URL.
    pub url: String,
    /// Reader account distinguished name.
    pub reader_dn: String,
    /// Whether unknown directory users are provisioned on first login.
    pub auto_create_users: Option<bool>,
    /// TLS configuration for the directory connection.
    pub tls_config: TlsConfig,
    /// User search settings.
    pub search_settings: Vec<LdapSearchSettings>,
    /// Group search settings.
    pub group_search_settings: Option<Vec<LdapGroupSearchSettings>>,
}

/// LDAP user search settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LdapSearchSettings {
    /// Base distinguished name for user searches.
    pub base_dn: String,
    /// Search filter.
    pub filter: String,
    /// Attribute holding the username.
    pub user_name_attribute: String,
}

/// LDAP group search settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LdapGroupSearchSettings {
    /// Base distinguished name for group searches.
    pub group_base_dn: String,
    /// Group search filter.
    pub group_filter: String,
    /// Attribute holding group membership.
    pub group_attribute: String,
}

/// OAuth provider configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthSettings {
    /// OAuth client identifier.
    pub client_id: String,
    /// Whether single sign-on is enabled.
    pub sso: bool,
    /// Provider logout URI.
    pub logout_uri: String,
    /// Whether the internal login form is hidden.
    pub hide_internal_auth: bool,
}

/// TLS client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    /// Whether TLS is enabled.
    pub tls: bool,
    /// Whether server certificate verification is skipped.
    pub tls_skip_verify: bool,
    /// CA certificate path.
    pub tls_ca_cert_path: Option<String>,
    /// Client certificate path.
    pub tls_cert_path: Option<String>,
    /// Client key path.
    pub tls_key_path: Option<String>,
}
