// crates/dockhand-core/src/runtime/mod.rs
// ============================================================================
// Module: Dockhand Runtime Helpers
// Description: In-process store implementations.
// Purpose: Provide a record store usable without external dependencies.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime helpers implement the collaborator interfaces in memory so the
//! migration engine can be exercised in tests and local demos.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::InMemoryRecordStore;
