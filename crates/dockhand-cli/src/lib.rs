// crates/dockhand-cli/src/lib.rs
// ============================================================================
// Module: Dockhand CLI Library
// Description: Shared helpers for the Dockhand command-line interface.
// Purpose: Provide reusable components (message catalog) for the CLI binary.
// Dependencies: Standard library.
// ============================================================================

//! ## Overview
//! This library houses shared CLI utilities, including the message catalog.
//! The binary entry point (`src/main.rs`) imports these helpers to keep all
//! user-facing output consistent.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Message catalog and substitution helpers.
pub mod i18n;
