// crates/dockhand-core/src/interfaces/mod.rs
// ============================================================================
// Module: Dockhand Interfaces
// Description: Typed collaborator services over the persisted record store.
// Purpose: Define the read/update surfaces consumed by migration steps.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Each persisted entity kind is reached through a small service trait with
//! typed read and update operations. [`RecordStore`] aggregates every service
//! together with the [`VersionStore`] holding the schema version, and is the
//! single handle the migration engine receives.
//!
//! ## Invariants
//! - `update_*` operations insert or replace the record keyed by its id.
//! - Listing operations return records ordered by identifier.
//! - [`VersionStore::store_schema_version`] is durable once it returns `Ok`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::Endpoint;
use crate::core::EndpointGroup;
use crate::core::EndpointGroupId;
use crate::core::Registry;
use crate::core::ResourceControl;
use crate::core::Role;
use crate::core::SchemaVersion;
use crate::core::Settings;
use crate::core::Stack;
use crate::core::Tag;
use crate::core::User;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Record store errors.
///
/// # Invariants
/// - Error messages avoid embedding raw record payloads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Store I/O error.
    #[error("record store io error: {0}")]
    Io(String),
    /// Stored data is corrupted or cannot be decoded.
    #[error("record store corruption: {0}")]
    Corrupt(String),
    /// Stored layout version is incompatible.
    #[error("record store version mismatch: {0}")]
    VersionMismatch(String),
    /// Record data is invalid.
    #[error("record store invalid data: {0}")]
    Invalid(String),
    /// Store reported an error.
    #[error("record store error: {0}")]
    Store(String),
}

// ============================================================================
// SECTION: Version Record
// ============================================================================

/// Access to the single persisted schema version record.
pub trait VersionStore {
    /// Returns the stored schema version, or `None` when none was ever written.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the version record cannot be read.
    fn schema_version(&self) -> Result<Option<SchemaVersion>, StoreError>;

    /// Durably persists the schema version.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the version record cannot be written.
    fn store_schema_version(&self, version: SchemaVersion) -> Result<(), StoreError>;
}

// ============================================================================
// SECTION: Entity Services
// ============================================================================

/// Settings singleton service.
pub trait SettingsService {
    /// Returns the settings record, or `None` for a store without one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the record cannot be read.
    fn settings(&self) -> Result<Option<Settings>, StoreError>;

    /// Writes the settings record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the record cannot be written.
    fn update_settings(&self, settings: &Settings) -> Result<(), StoreError>;
}

/// Endpoint service.
pub trait EndpointService {
    /// Lists every endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when records cannot be read.
    fn endpoints(&self) -> Result<Vec<Endpoint>, StoreError>;

    /// Inserts or replaces an endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the record cannot be written.
    fn update_endpoint(&self, endpoint: &Endpoint) -> Result<(), StoreError>;
}

/// Endpoint group service.
pub trait EndpointGroupService {
    /// Lists every endpoint group.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when records cannot be read.
    fn endpoint_groups(&self) -> Result<Vec<EndpointGroup>, StoreError>;

    /// Returns one endpoint group by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the record cannot be read.
    fn endpoint_group(&self, id: EndpointGroupId) -> Result<Option<EndpointGroup>, StoreError>;

    /// Inserts or replaces an endpoint group.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the record cannot be written.
    fn update_endpoint_group(&self, group: &EndpointGroup) -> Result<(), StoreError>;
}

/// Registry service.
pub trait RegistryService {
    /// Lists every registry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when records cannot be read.
    fn registries(&self) -> Result<Vec<Registry>, StoreError>;

    /// Inserts or replaces a registry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the record cannot be written.
    fn update_registry(&self, registry: &Registry) -> Result<(), StoreError>;
}

/// User service.
pub trait UserService {
    /// Lists every user.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when records cannot be read.
    fn users(&self) -> Result<Vec<User>, StoreError>;

    /// Inserts or replaces a user.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the record cannot be written.
    fn update_user(&self, user: &User) -> Result<(), StoreError>;
}

/// Resource control service.
pub trait ResourceControlService {
    /// Lists every resource control.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when records cannot be read.
    fn resource_controls(&self) -> Result<Vec<ResourceControl>, StoreError>;

    /// Inserts or replaces a resource control.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the record cannot be written.
    fn update_resource_control(&self, control: &ResourceControl) -> Result<(), StoreError>;
}

/// Stack service.
pub trait StackService {
    /// Lists every stack.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when records cannot be read.
    fn stacks(&self) -> Result<Vec<Stack>, StoreError>;

    /// Inserts or replaces a stack.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the record cannot be written.
    fn update_stack(&self, stack: &Stack) -> Result<(), StoreError>;
}

/// Tag service.
pub trait TagService {
    /// Lists every tag.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when records cannot be read.
    fn tags(&self) -> Result<Vec<Tag>, StoreError>;

    /// Creates a tag with a freshly allocated identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the record cannot be written.
    fn create_tag(&self, name: &str) -> Result<Tag, StoreError>;

    /// Inserts or replaces a tag.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the record cannot be written.
    fn update_tag(&self, tag: &Tag) -> Result<(), StoreError>;
}

/// Role service.
pub trait RoleService {
    /// Lists every role.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when records cannot be read.
    fn roles(&self) -> Result<Vec<Role>, StoreError>;

    /// Inserts or replaces a role.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the record cannot be written.
    fn update_role(&self, role: &Role) -> Result<(), StoreError>;
}

// ============================================================================
// SECTION: Aggregate Store
// ============================================================================

/// Versioned record store exposing every collaborator service.
pub trait RecordStore:
    VersionStore
    + SettingsService
    + EndpointService
    + EndpointGroupService
    + RegistryService
    + UserService
    + ResourceControlService
    + StackService
    + TagService
    + RoleService
{
}

impl<T> RecordStore for T where
    T: VersionStore
        + SettingsService
        + EndpointService
        + EndpointGroupService
        + RegistryService
        + UserService
        + ResourceControlService
        + StackService
        + TagService
        + RoleService
{
}
