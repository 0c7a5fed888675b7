// crates/dockhand-cli/src/i18n.rs
// ============================================================================
// Module: CLI Message Catalog
// Description: Provides the message catalog and substitution for CLI output.
// Purpose: Centralize user-facing strings so wording stays consistent.
// Dependencies: Standard library collections.
// ============================================================================

//! ## Overview
//! The Dockhand CLI keeps user-facing strings in a small catalog. All runtime
//! output should be routed through the [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is built once and read-only thereafter.
//! - Missing keys fall back to the key itself.
//! - Placeholder substitutions preserve argument order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A formatted message argument captured by the [`macro@crate::t`] macro.
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static catalog entries.
const CATALOG: &[(&str, &str)] = &[
    ("main.version", "dockhand {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("output.json_failed", "Failed to render JSON output: {error}"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.validate.ok", "Config validated successfully."),
    ("config.override_failed", "Invalid command-line override: {error}"),
    ("store.open_failed", "Failed to open record store: {error}"),
    ("store.not_found", "No record store exists at {path}; run `dockhand migrate` to create it."),
    ("registry.invalid", "Built-in migration registry is invalid: {error}"),
    ("audit.open_failed", "Failed to open migration audit log at {path}: {error}"),
    ("audit.path_missing", "The file audit sink requires `migration.audit.path` to be set."),
    ("migrate.plan_failed", "Failed to plan migration: {error}"),
    ("migrate.failed", "Migration failed: {error}"),
    ("migrate.up_to_date", "Store is at version {version}; nothing to migrate."),
    (
        "migrate.dry_run.header",
        "Store is at version {current}; {count} step(s) pending to {target}:",
    ),
    ("migrate.step", "  {version}: {description}"),
    ("migrate.done", "Migrated store from version {from} to {to} ({count} step(s) applied)."),
    ("status.current", "Stored version: {version}"),
    ("status.latest", "Latest version: {version}"),
    ("status.pending", "Pending steps: {count}"),
];

/// Returns the message catalog.
pub(crate) fn catalog() -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    CATALOG_MAP.get_or_init(|| CATALOG.iter().copied().collect())
}

/// Returns the raw catalog entries in declaration order.
#[cfg(test)]
pub(crate) const fn catalog_entries() -> &'static [(&'static str, &'static str)] {
    CATALOG
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Renders `key` from the catalog while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog().get(key).copied().unwrap_or(key);
    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a catalog message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
