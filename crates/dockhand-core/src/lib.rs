// crates/dockhand-core/src/lib.rs
// ============================================================================
// Module: Dockhand Core Library
// Description: Public API surface for the Dockhand core.
// Purpose: Expose record types, collaborator interfaces, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Dockhand core defines the records persisted by the Dockhand store, the
//! typed collaborator services that read and update them, and the schema
//! version record the migration engine advances. It is backend-agnostic:
//! storage backends implement [`RecordStore`] rather than the engine reaching
//! into a specific database.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::EndpointGroupService;
pub use interfaces::EndpointService;
pub use interfaces::RecordStore;
pub use interfaces::RegistryService;
pub use interfaces::ResourceControlService;
pub use interfaces::RoleService;
pub use interfaces::SettingsService;
pub use interfaces::StackService;
pub use interfaces::StoreError;
pub use interfaces::TagService;
pub use interfaces::UserService;
pub use interfaces::VersionStore;
pub use runtime::InMemoryRecordStore;
