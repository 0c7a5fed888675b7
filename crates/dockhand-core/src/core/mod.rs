// crates/dockhand-core/src/core/mod.rs
// ============================================================================
// Module: Dockhand Core Types
// Description: Persisted record types and the schema version tag.
// Purpose: Provide stable, serializable types shared by stores and migrations.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Core types define the records held by the Dockhand store and the
//! [`SchemaVersion`] that tags the store's layout. These types are the
//! canonical source of truth for both store implementations and every
//! migration step.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod identifiers;
pub mod records;
pub mod settings;
pub mod version;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use identifiers::EndpointGroupId;
pub use identifiers::EndpointId;
pub use identifiers::RegistryId;
pub use identifiers::ResourceControlId;
pub use identifiers::RoleId;
pub use identifiers::StackId;
pub use identifiers::TagId;
pub use identifiers::TeamId;
pub use identifiers::UserId;
pub use records::AccessLevel;
pub use records::AccessPolicy;
pub use records::Endpoint;
pub use records::EndpointExtension;
pub use records::EndpointGroup;
pub use records::EndpointKind;
pub use records::EndpointSecuritySettings;
pub use records::KubernetesConfiguration;
pub use records::Registry;
pub use records::RegistryAccessPolicies;
pub use records::ResourceControl;
pub use records::ResourceControlKind;
pub use records::Role;
pub use records::Stack;
pub use records::StackKind;
pub use records::StackStatus;
pub use records::Tag;
pub use records::TeamAccessPolicies;
pub use records::TeamResourceAccess;
pub use records::User;
pub use records::UserAccessPolicies;
pub use records::UserResourceAccess;
pub use records::UserRole;
pub use records::UserTheme;
pub use settings::AuthenticationMethod;
pub use settings::LdapGroupSearchSettings;
pub use settings::LdapSearchSettings;
pub use settings::LdapSettings;
pub use settings::OAuthSettings;
pub use settings::Settings;
pub use settings::TlsConfig;
pub use version::SchemaVersion;
