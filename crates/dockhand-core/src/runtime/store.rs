// crates/dockhand-core/src/runtime/store.rs
// ============================================================================
// Module: Dockhand In-Memory Store
// Description: Simple in-memory record store for tests and examples.
// Purpose: Provide a deterministic store implementation without external deps.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! This module provides an in-memory implementation of every collaborator
//! service. Clones share the same underlying state, so a test can hand one
//! clone to the migration engine and inspect another. Every successful write
//! increments a counter used to assert write-free passes. It is not intended
//! for production use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::core::Endpoint;
use crate::core::EndpointGroup;
use crate::core::EndpointGroupId;
use crate::core::EndpointId;
use crate::core::Registry;
use crate::core::RegistryId;
use crate::core::ResourceControl;
use crate::core::ResourceControlId;
use crate::core::Role;
use crate::core::RoleId;
use crate::core::SchemaVersion;
use crate::core::Settings;
use crate::core::Stack;
use crate::core::StackId;
use crate::core::Tag;
use crate::core::TagId;
use crate::core::User;
use crate::core::UserId;
use crate::interfaces::EndpointGroupService;
use crate::interfaces::EndpointService;
use crate::interfaces::RegistryService;
use crate::interfaces::ResourceControlService;
use crate::interfaces::RoleService;
use crate::interfaces::SettingsService;
use crate::interfaces::StackService;
use crate::interfaces::StoreError;
use crate::interfaces::TagService;
use crate::interfaces::UserService;
use crate::interfaces::VersionStore;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// Mutable contents of the in-memory store.
#[derive(Debug, Default)]
struct MemoryState {
    /// Stored schema version.
    version: Option<SchemaVersion>,
    /// Settings singleton.
    settings: Option<Settings>,
    /// Endpoints by id.
    endpoints: BTreeMap<EndpointId, Endpoint>,
    /// Endpoint groups by id.
    endpoint_groups: BTreeMap<EndpointGroupId, EndpointGroup>,
    /// Registries by id.
    registries: BTreeMap<RegistryId, Registry>,
    /// Users by id.
    users: BTreeMap<UserId, User>,
    /// Resource controls by id.
    resource_controls: BTreeMap<ResourceControlId, ResourceControl>,
    /// Stacks by id.
    stacks: BTreeMap<StackId, Stack>,
    /// Tags by id.
    tags: BTreeMap<TagId, Tag>,
    /// Roles by id.
    roles: BTreeMap<RoleId, Role>,
    /// Number of successful writes of any kind.
    writes: u64,
    /// Number of successful schema version writes.
    version_writes: u64,
}

/// In-memory record store for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRecordStore {
    /// Shared store state protected by a mutex.
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryRecordStore {
    /// Creates a new, empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an in-memory store already tagged with a schema version.
    ///
    /// Seeding the version does not count as a write.
    #[must_use]
    pub fn at_version(version: SchemaVersion) -> Self {
        let store = Self::new();
        if let Ok(mut guard) = store.state.lock() {
            guard.version = Some(version);
        }
        store
    }

    /// Returns the number of successful writes since creation or the last reset.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store mutex is poisoned.
    pub fn write_count(&self) -> Result<u64, StoreError> {
        Ok(self.lock()?.writes)
    }

    /// Returns the number of successful schema version writes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store mutex is poisoned.
    pub fn version_write_count(&self) -> Result<u64, StoreError> {
        Ok(self.lock()?.version_writes)
    }

    /// Resets the write counters, typically after seeding fixtures.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store mutex is poisoned.
    pub fn reset_write_counts(&self) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        guard.writes = 0;
        guard.version_writes = 0;
        drop(guard);
        Ok(())
    }

    /// Locks the shared state.
    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StoreError> {
        self.state.lock().map_err(|_| StoreError::Store("record store mutex poisoned".to_string()))
    }

    /// Applies a mutation and counts it as one write.
    fn write<F>(&self, mutation: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut MemoryState),
    {
        let mut guard = self.lock()?;
        mutation(&mut guard);
        guard.writes += 1;
        drop(guard);
        Ok(())
    }
}

impl VersionStore for InMemoryRecordStore {
    fn schema_version(&self) -> Result<Option<SchemaVersion>, StoreError> {
        Ok(self.lock()?.version)
    }

    fn store_schema_version(&self, version: SchemaVersion) -> Result<(), StoreError> {
        self.write(|state| {
            state.version = Some(version);
            state.version_writes += 1;
        })
    }
}

impl SettingsService for InMemoryRecordStore {
    fn settings(&self) -> Result<Option<Settings>, StoreError> {
        Ok(self.lock()?.settings.clone())
    }

    fn update_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        self.write(|state| state.settings = Some(settings.clone()))
    }
}

impl EndpointService for InMemoryRecordStore {
    fn endpoints(&self) -> Result<Vec<Endpoint>, StoreError> {
        Ok(self.lock()?.endpoints.values().cloned().collect())
    }

    fn update_endpoint(&self, endpoint: &Endpoint) -> Result<(), StoreError> {
        self.write(|state| {
            state.endpoints.insert(endpoint.id, endpoint.clone());
        })
    }
}

impl EndpointGroupService for InMemoryRecordStore {
    fn endpoint_groups(&self) -> Result<Vec<EndpointGroup>, StoreError> {
        Ok(self.lock()?.endpoint_groups.values().cloned().collect())
    }

    fn endpoint_group(&self, id: EndpointGroupId) -> Result<Option<EndpointGroup>, StoreError> {
        Ok(self.lock()?.endpoint_groups.get(&id).cloned())
    }

    fn update_endpoint_group(&self, group: &EndpointGroup) -> Result<(), StoreError> {
        self.write(|state| {
            state.endpoint_groups.insert(group.id, group.clone());
        })
    }
}

impl RegistryService for InMemoryRecordStore {
    fn registries(&self) -> Result<Vec<Registry>, StoreError> {
        Ok(self.lock()?.registries.values().cloned().collect())
    }

    fn update_registry(&self, registry: &Registry) -> Result<(), StoreError> {
        self.write(|state| {
            state.registries.insert(registry.id, registry.clone());
        })
    }
}

impl UserService for InMemoryRecordStore {
    fn users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.lock()?.users.values().cloned().collect())
    }

    fn update_user(&self, user: &User) -> Result<(), StoreError> {
        self.write(|state| {
            state.users.insert(user.id, user.clone());
        })
    }
}

impl ResourceControlService for InMemoryRecordStore {
    fn resource_controls(&self) -> Result<Vec<ResourceControl>, StoreError> {
        Ok(self.lock()?.resource_controls.values().cloned().collect())
    }

    fn update_resource_control(&self, control: &ResourceControl) -> Result<(), StoreError> {
        self.write(|state| {
            state.resource_controls.insert(control.id, control.clone());
        })
    }
}

impl StackService for InMemoryRecordStore {
    fn stacks(&self) -> Result<Vec<Stack>, StoreError> {
        Ok(self.lock()?.stacks.values().cloned().collect())
    }

    fn update_stack(&self, stack: &Stack) -> Result<(), StoreError> {
        self.write(|state| {
            state.stacks.insert(stack.id, stack.clone());
        })
    }
}

impl TagService for InMemoryRecordStore {
    fn tags(&self) -> Result<Vec<Tag>, StoreError> {
        Ok(self.lock()?.tags.values().cloned().collect())
    }

    fn create_tag(&self, name: &str) -> Result<Tag, StoreError> {
        let mut guard = self.lock()?;
        let next = guard.tags.keys().next_back().map_or(Some(1), |id| id.get().checked_add(1));
        let Some(next) = next else {
            return Err(StoreError::Invalid("tag identifier space exhausted".to_string()));
        };
        let tag = Tag {
            id: TagId::new(next),
            name: name.to_string(),
            ..Tag::default()
        };
        guard.tags.insert(tag.id, tag.clone());
        guard.writes += 1;
        drop(guard);
        Ok(tag)
    }

    fn update_tag(&self, tag: &Tag) -> Result<(), StoreError> {
        self.write(|state| {
            state.tags.insert(tag.id, tag.clone());
        })
    }
}

impl RoleService for InMemoryRecordStore {
    fn roles(&self) -> Result<Vec<Role>, StoreError> {
        Ok(self.lock()?.roles.values().cloned().collect())
    }

    fn update_role(&self, role: &Role) -> Result<(), StoreError> {
        self.write(|state| {
            state.roles.insert(role.id, role.clone());
        })
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

    use super::*;

    #[test]
    fn clones_share_state_and_count_writes() {
        let store = InMemoryRecordStore::new();
        let observer = store.clone();
        store.update_settings(&Settings::default()).unwrap();
        store.store_schema_version(SchemaVersion::new(3)).unwrap();

        assert_eq!(observer.schema_version().unwrap(), Some(SchemaVersion::new(3)));
        assert!(observer.settings().unwrap().is_some());
        assert_eq!(observer.write_count().unwrap(), 2);
        assert_eq!(observer.version_write_count().unwrap(), 1);
    }

    #[test]
    fn at_version_does_not_count_as_write() {
        let store = InMemoryRecordStore::at_version(SchemaVersion::new(7));
        assert_eq!(store.schema_version().unwrap(), Some(SchemaVersion::new(7)));
        assert_eq!(store.write_count().unwrap(), 0);
    }

    #[test]
    fn create_tag_allocates_increasing_ids() {
        let store = InMemoryRecordStore::new();
        let first = store.create_tag("prod").unwrap();
        let second = store.create_tag("edge").unwrap();
        assert_eq!(first.id, TagId::new(1));
        assert_eq!(second.id, TagId::new(2));
        assert_eq!(store.tags().unwrap().len(), 2);
    }

    #[test]
    fn reset_write_counts_clears_counters() {
        let store = InMemoryRecordStore::new();
        store.update_user(&User::default()).unwrap();
        store.reset_write_counts().unwrap();
        assert_eq!(store.write_count().unwrap(), 0);
    }
}
