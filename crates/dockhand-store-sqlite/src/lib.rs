// crates/dockhand-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Record Store
// Description: Durable versioned record store backend using SQLite.
// Purpose: Provide production persistence for Dockhand records and version.
// Dependencies: dockhand-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`RecordStore`] implementation. Records
//! are stored as JSON documents grouped into buckets, and the schema version
//! lives in one well-known record so that every binary, old or new, can read
//! it. Writes commit in their own transaction under full synchronous mode by
//! default, so a committed schema version survives process termination.
//!
//! [`RecordStore`]: dockhand_core::RecordStore

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::MAX_RECORD_BYTES;
pub use store::SqliteRecordStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
