// crates/dockhand-core/src/core/records.rs
// ============================================================================
// Module: Dockhand Entity Records
// Description: Persisted records for endpoints, registries, users, and more.
// Purpose: Model the entity kinds the migration steps read and rewrite.
// Dependencies: serde, crate::core::identifiers, crate::core::settings
// ============================================================================

//! ## Overview
//! Entity records are stored as JSON documents keyed by their identifier.
//! Legacy fields (for example an endpoint's tag names before tags became
//! first-class records) stay in the types so that old documents remain
//! readable until the step that retires them has run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::EndpointGroupId;
use crate::core::identifiers::EndpointId;
use crate::core::identifiers::RegistryId;
use crate::core::identifiers::ResourceControlId;
use crate::core::identifiers::RoleId;
use crate::core::identifiers::StackId;
use crate::core::identifiers::TagId;
use crate::core::identifiers::TeamId;
use crate::core::identifiers::UserId;
use crate::core::settings::TlsConfig;

// ============================================================================
// SECTION: Access Policies
// ============================================================================

/// Access policy granted to a user or team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessPolicy {
    /// Role bound to the policy; `None` means access without a role.
    pub role_id: Option<RoleId>,
}

/// Per-user access policies.
pub type UserAccessPolicies = BTreeMap<UserId, AccessPolicy>;
/// Per-team access policies.
pub type TeamAccessPolicies = BTreeMap<TeamId, AccessPolicy>;

// ============================================================================
// SECTION: Endpoints
// ============================================================================

/// Endpoint (managed environment) kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKind {
    /// Written before endpoint kinds existed.
    #[default]
    Unset,
    /// Docker engine API.
    Docker,
    /// Agent on Docker.
    Agent,
    /// Azure container instances.
    Azure,
    /// Edge agent on Docker.
    EdgeAgent,
    /// Local Kubernetes cluster.
    KubernetesLocal,
    /// Agent on Kubernetes.
    KubernetesAgent,
    /// Edge agent on Kubernetes.
    KubernetesEdgeAgent,
}

impl EndpointKind {
    /// Returns true for Kubernetes-backed endpoints.
    #[must_use]
    pub const fn is_kubernetes(self) -> bool {
        matches!(self, Self::KubernetesLocal | Self::KubernetesAgent | Self::KubernetesEdgeAgent)
    }

    /// Returns true for endpoints reached through a non-edge agent.
    #[must_use]
    pub const fn is_agent(self) -> bool {
        matches!(self, Self::Agent | Self::KubernetesAgent)
    }
}

/// Endpoint extension registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointExtension {
    /// Extension kind code.
    pub kind: u32,
    /// Extension URL.
    pub url: String,
}

/// Per-endpoint permissions for regular users.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointSecuritySettings {
    /// Whether regular users may use bind mounts.
    pub allow_bind_mounts_for_regular_users: bool,
    /// Whether regular users may run privileged containers.
    pub allow_privileged_mode_for_regular_users: bool,
    /// Whether regular users may browse volumes.
    pub allow_volume_browser_for_regular_users: bool,
    /// Whether host management features are enabled.
    pub enable_host_management_features: bool,
}

/// Kubernetes cluster configuration for an endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KubernetesConfiguration {
    /// Whether load balancer services may be created.
    pub use_load_balancer: bool,
    /// Whether the metrics server is queried.
    pub use_server_metrics: bool,
    /// Enabled storage classes.
    pub storage_classes: Vec<String>,
    /// Enabled ingress classes.
    pub ingress_classes: Vec<String>,
}

/// Managed environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoint {
    /// Endpoint identifier.
    pub id: EndpointId,
    /// Display name.
    pub name: String,
    /// Endpoint kind.
    pub kind: EndpointKind,
    /// Management URL.
    pub url: String,
    /// Public URL used for published ports.
    pub public_url: String,
    /// Owning endpoint group; `0` for endpoints predating groups.
    pub group_id: EndpointGroupId,
    /// Legacy TLS flag, retired in favor of `tls_config`.
    pub tls: Option<bool>,
    /// TLS configuration.
    pub tls_config: Option<TlsConfig>,
    /// Registered extensions.
    pub extensions: Option<Vec<EndpointExtension>>,
    /// Legacy tag names, retired in favor of `tag_ids`.
    pub tags: Option<Vec<String>>,
    /// Tag identifiers.
    pub tag_ids: Vec<TagId>,
    /// Legacy authorized user list.
    pub authorized_users: Option<Vec<UserId>>,
    /// Legacy authorized team list.
    pub authorized_teams: Option<Vec<TeamId>>,
    /// Per-user access policies.
    pub user_access_policies: UserAccessPolicies,
    /// Per-team access policies.
    pub team_access_policies: TeamAccessPolicies,
    /// Regular-user permissions.
    pub security_settings: Option<EndpointSecuritySettings>,
    /// Kubernetes configuration for Kubernetes endpoints.
    pub kubernetes: Option<KubernetesConfiguration>,
}

/// Group of endpoints sharing access rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointGroup {
    /// Group identifier.
    pub id: EndpointGroupId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Legacy tag names, retired in favor of `tag_ids`.
    pub tags: Option<Vec<String>>,
    /// Tag identifiers.
    pub tag_ids: Vec<TagId>,
    /// Legacy authorized user list.
    pub authorized_users: Option<Vec<UserId>>,
    /// Legacy authorized team list.
    pub authorized_teams: Option<Vec<TeamId>>,
    /// Per-user access policies.
    pub user_access_policies: UserAccessPolicies,
    /// Per-team access policies.
    pub team_access_policies: TeamAccessPolicies,
}

// ============================================================================
// SECTION: Registries
// ============================================================================

/// Registry access policies scoped to one endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryAccessPolicies {
    /// Per-user access policies.
    pub user_access_policies: UserAccessPolicies,
    /// Per-team access policies.
    pub team_access_policies: TeamAccessPolicies,
}

/// Container image registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Registry {
    /// Registry identifier.
    pub id: RegistryId,
    /// Display name.
    pub name: String,
    /// Registry URL.
    pub url: String,
    /// Whether credentials are sent.
    pub authentication: bool,
    /// Registry username.
    pub username: String,
    /// Legacy authorized user list.
    pub authorized_users: Option<Vec<UserId>>,
    /// Legacy authorized team list.
    pub authorized_teams: Option<Vec<TeamId>>,
    /// Registry-wide per-user access policies.
    pub user_access_policies: UserAccessPolicies,
    /// Registry-wide per-team access policies.
    pub team_access_policies: TeamAccessPolicies,
    /// Access policies scoped per endpoint.
    pub registry_accesses: Option<BTreeMap<EndpointId, RegistryAccessPolicies>>,
}

// ============================================================================
// SECTION: Users and Roles
// ============================================================================

/// User account role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Written before roles existed.
    #[default]
    Unset,
    /// Full administrator.
    Administrator,
    /// Regular user.
    Standard,
}

/// User interface theme preference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserTheme {
    /// Theme color; empty selects the default theme.
    pub color: String,
}

/// User account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    /// User identifier.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Account role.
    pub role: UserRole,
    /// Default authorizations, keyed by authorization name.
    pub authorizations: Option<BTreeMap<String, bool>>,
    /// Theme preference.
    pub theme: Option<UserTheme>,
}

/// Access role bound through access policies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Role {
    /// Role identifier.
    pub id: RoleId,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Precedence when several roles apply; lower wins.
    pub priority: u32,
}

// ============================================================================
// SECTION: Resource Controls
// ============================================================================

/// Kind of resource guarded by a resource control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceControlKind {
    /// Container.
    #[default]
    Container,
    /// Swarm service.
    Service,
    /// Volume.
    Volume,
    /// Network.
    Network,
    /// Secret.
    Secret,
    /// Stack.
    Stack,
    /// Config.
    Config,
}

/// Access level granted by a resource control entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    /// Written before access levels existed.
    #[default]
    Unset,
    /// Read and write access.
    ReadWrite,
}

/// User entry on a resource control.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserResourceAccess {
    /// User granted access.
    pub user_id: UserId,
    /// Granted level.
    pub access_level: AccessLevel,
}

/// Team entry on a resource control.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamResourceAccess {
    /// Team granted access.
    pub team_id: TeamId,
    /// Granted level.
    pub access_level: AccessLevel,
}

/// Ownership and visibility rule for a managed resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceControl {
    /// Resource control identifier.
    pub id: ResourceControlId,
    /// Identifier of the guarded resource.
    pub resource_id: String,
    /// Kind of the guarded resource.
    pub kind: ResourceControlKind,
    /// User entries.
    pub user_accesses: Vec<UserResourceAccess>,
    /// Team entries.
    pub team_accesses: Vec<TeamResourceAccess>,
    /// Whether every user may access the resource.
    pub public: bool,
    /// Whether only administrators may access the resource.
    pub administrators_only: bool,
}

// ============================================================================
// SECTION: Stacks and Tags
// ============================================================================

/// Stack deployment kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackKind {
    /// Written before stack kinds existed.
    #[default]
    Unset,
    /// Docker swarm stack.
    Swarm,
    /// Docker compose project.
    Compose,
    /// Kubernetes manifest.
    Kubernetes,
}

/// Stack lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackStatus {
    /// Written before stack status existed.
    #[default]
    Unset,
    /// Deployed.
    Active,
    /// Stopped.
    Inactive,
}

/// Deployed stack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stack {
    /// Stack identifier.
    pub id: StackId,
    /// Stack name.
    pub name: String,
    /// Deployment kind.
    pub kind: StackKind,
    /// Endpoint the stack is deployed to.
    pub endpoint_id: EndpointId,
    /// Entry point file.
    pub entry_point: String,
    /// Lifecycle status.
    pub status: StackStatus,
}

impl Stack {
    /// Returns the resource control identifier for this stack.
    #[must_use]
    pub fn resource_control_id(&self) -> String {
        format!("{}_{}", self.endpoint_id, self.name)
    }
}

/// Tag attached to endpoints and endpoint groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tag {
    /// Tag identifier.
    pub id: TagId,
    /// Tag name.
    pub name: String,
    /// Endpoints carrying the tag.
    pub endpoints: BTreeMap<EndpointId, bool>,
    /// Endpoint groups carrying the tag.
    pub endpoint_groups: BTreeMap<EndpointGroupId, bool>,
}
