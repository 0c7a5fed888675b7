// crates/dockhand-migrator/tests/common/mod.rs
// ============================================================================
// Module: Migrator Test Helpers
// Description: Record store double that fails selected writes once.
// Purpose: Exercise step and orchestrator behavior after collaborator failures.
// Dependencies: dockhand-core
// ============================================================================

//! Shared helpers for migrator integration tests.

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::sync::Mutex;

use dockhand_core::Endpoint;
use dockhand_core::EndpointGroup;
use dockhand_core::EndpointGroupId;
use dockhand_core::EndpointGroupService;
use dockhand_core::EndpointId;
use dockhand_core::EndpointService;
use dockhand_core::InMemoryRecordStore;
use dockhand_core::Registry;
use dockhand_core::RegistryService;
use dockhand_core::ResourceControl;
use dockhand_core::ResourceControlId;
use dockhand_core::ResourceControlService;
use dockhand_core::Role;
use dockhand_core::RoleService;
use dockhand_core::SchemaVersion;
use dockhand_core::Settings;
use dockhand_core::SettingsService;
use dockhand_core::Stack;
use dockhand_core::StackService;
use dockhand_core::StoreError;
use dockhand_core::Tag;
use dockhand_core::TagId;
use dockhand_core::TagService;
use dockhand_core::User;
use dockhand_core::UserService;
use dockhand_core::VersionStore;

// ============================================================================
// SECTION: Faulty Store
// ============================================================================

/// Message carried by every injected failure.
pub const INJECTED_FAILURE: &str = "injected write failure";

/// Write that fails the next time it is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Every schema version commit.
    Version,
    /// The next write of this endpoint.
    Endpoint(EndpointId),
    /// The next write of this endpoint group.
    EndpointGroup(EndpointGroupId),
    /// The next write of this resource control.
    ResourceControl(ResourceControlId),
    /// The next write of this tag.
    Tag(TagId),
}

/// In-memory store that fails one armed write and delegates everything else.
///
/// Record faults fire once and disarm themselves, so rerunning a step
/// against the same store models a retry after a crash. [`Fault::Version`]
/// stays armed until [`FaultyRecordStore::disarm`] is called.
pub struct FaultyRecordStore {
    /// Backing store holding the committed state.
    pub inner: InMemoryRecordStore,
    /// Currently armed fault.
    fault: Mutex<Option<Fault>>,
}

impl FaultyRecordStore {
    /// Wraps `inner` with no fault armed.
    pub fn new(inner: InMemoryRecordStore) -> Self {
        Self {
            inner,
            fault: Mutex::new(None),
        }
    }

    /// Arms `fault`, replacing any previously armed one.
    pub fn arm(&self, fault: Fault) {
        *self.fault.lock().unwrap() = Some(fault);
    }

    /// Clears any armed fault.
    pub fn disarm(&self) {
        *self.fault.lock().unwrap() = None;
    }

    /// Returns whether a fault is still armed.
    pub fn armed(&self) -> bool {
        self.fault.lock().unwrap().is_some()
    }

    /// Fails when `target` matches the armed fault.
    fn check(&self, target: Fault) -> Result<(), StoreError> {
        let mut guard = self.fault.lock().unwrap();
        if *guard != Some(target) {
            return Ok(());
        }
        if target != Fault::Version {
            *guard = None;
        }
        Err(StoreError::Io(INJECTED_FAILURE.to_string()))
    }
}

impl VersionStore for FaultyRecordStore {
    fn schema_version(&self) -> Result<Option<SchemaVersion>, StoreError> {
        self.inner.schema_version()
    }

    fn store_schema_version(&self, version: SchemaVersion) -> Result<(), StoreError> {
        self.check(Fault::Version)?;
        self.inner.store_schema_version(version)
    }
}

impl SettingsService for FaultyRecordStore {
    fn settings(&self) -> Result<Option<Settings>, StoreError> {
        self.inner.settings()
    }

    fn update_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        self.inner.update_settings(settings)
    }
}

impl EndpointService for FaultyRecordStore {
    fn endpoints(&self) -> Result<Vec<Endpoint>, StoreError> {
        self.inner.endpoints()
    }

    fn update_endpoint(&self, endpoint: &Endpoint) -> Result<(), StoreError> {
        self.check(Fault::Endpoint(endpoint.id))?;
        self.inner.update_endpoint(endpoint)
    }
}

impl EndpointGroupService for FaultyRecordStore {
    fn endpoint_groups(&self) -> Result<Vec<EndpointGroup>, StoreError> {
        self.inner.endpoint_groups()
    }

    fn endpoint_group(&self, id: EndpointGroupId) -> Result<Option<EndpointGroup>, StoreError> {
        self.inner.endpoint_group(id)
    }

    fn update_endpoint_group(&self, group: &EndpointGroup) -> Result<(), StoreError> {
        self.check(Fault::EndpointGroup(group.id))?;
        self.inner.update_endpoint_group(group)
    }
}

impl RegistryService for FaultyRecordStore {
    fn registries(&self) -> Result<Vec<Registry>, StoreError> {
        self.inner.registries()
    }

    fn update_registry(&self, registry: &Registry) -> Result<(), StoreError> {
        self.inner.update_registry(registry)
    }
}

impl UserService for FaultyRecordStore {
    fn users(&self) -> Result<Vec<User>, StoreError> {
        self.inner.users()
    }

    fn update_user(&self, user: &User) -> Result<(), StoreError> {
        self.inner.update_user(user)
    }
}

impl ResourceControlService for FaultyRecordStore {
    fn resource_controls(&self) -> Result<Vec<ResourceControl>, StoreError> {
        self.inner.resource_controls()
    }

    fn update_resource_control(&self, control: &ResourceControl) -> Result<(), StoreError> {
        self.check(Fault::ResourceControl(control.id))?;
        self.inner.update_resource_control(control)
    }
}

impl StackService for FaultyRecordStore {
    fn stacks(&self) -> Result<Vec<Stack>, StoreError> {
        self.inner.stacks()
    }

    fn update_stack(&self, stack: &Stack) -> Result<(), StoreError> {
        self.inner.update_stack(stack)
    }
}

impl TagService for FaultyRecordStore {
    fn tags(&self) -> Result<Vec<Tag>, StoreError> {
        self.inner.tags()
    }

    fn create_tag(&self, name: &str) -> Result<Tag, StoreError> {
        self.inner.create_tag(name)
    }

    fn update_tag(&self, tag: &Tag) -> Result<(), StoreError> {
        self.check(Fault::Tag(tag.id))?;
        self.inner.update_tag(tag)
    }
}

impl RoleService for FaultyRecordStore {
    fn roles(&self) -> Result<Vec<Role>, StoreError> {
        self.inner.roles()
    }

    fn update_role(&self, role: &Role) -> Result<(), StoreError> {
        self.inner.update_role(role)
    }
}
