// crates/dockhand-config/src/lib.rs
// ============================================================================
// Module: Dockhand Config Library
// Description: Canonical config model, loading, and validation.
// Purpose: Single source of truth for dockhand.toml semantics.
// Dependencies: dockhand-migrator, dockhand-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `dockhand-config` defines the configuration consumed by the Dockhand CLI:
//! where the record store lives, how migration passes commit and audit, and
//! the bootstrap values handed to migration steps. Validation is strict and
//! fail-closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
