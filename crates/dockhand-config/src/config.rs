// crates/dockhand-config/src/config.rs
// ============================================================================
// Module: Dockhand Configuration
// Description: Configuration loading and validation for Dockhand.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: dockhand-migrator, dockhand-store-sqlite, serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! The file path comes from the caller, then the `DOCKHAND_CONFIG`
//! environment variable, then `dockhand.toml` in the working directory. An
//! explicitly named file must exist; a missing default file yields the
//! built-in defaults. Invalid configuration fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use dockhand_migrator::BootstrapConfig;
use dockhand_migrator::CommitPolicy;
use dockhand_store_sqlite::SqliteStoreConfig;
use dockhand_store_sqlite::SqliteStoreMode;
use dockhand_store_sqlite::SqliteSyncMode;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "dockhand.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "DOCKHAND_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default `SQLite` database filename.
const DEFAULT_STORE_PATH: &str = "dockhand.db";
/// Default busy timeout (ms).
const DEFAULT_STORE_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum busy timeout (ms).
const MAX_STORE_BUSY_TIMEOUT_MS: u64 = 600_000;
/// Maximum edge agent check-in interval in seconds.
const MAX_EDGE_CHECKIN_INTERVAL_SECS: u32 = 86_400;
/// Maximum length of a bootstrap string value.
const MAX_BOOTSTRAP_VALUE_LENGTH: usize = 2048;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Dockhand configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DockhandConfig {
    /// Record store configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// Migration pass configuration.
    #[serde(default)]
    pub migration: MigrationConfig,
    /// Values handed to migration steps.
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

impl DockhandConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, explicit) = resolve_path(path)?;
        validate_path(&resolved)?;
        if !explicit && !resolved.exists() {
            return Ok(Self::default());
        }
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.store.validate()?;
        self.migration.validate()?;
        validate_bootstrap(&self.bootstrap)
    }

    /// Applies bootstrap overrides (for example from command-line flags) and
    /// revalidates the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an override is invalid.
    pub fn apply_bootstrap_overrides(
        &mut self,
        overrides: &BootstrapConfig,
    ) -> Result<(), ConfigError> {
        let merged = self.bootstrap.merged_with(overrides);
        validate_bootstrap(&merged)?;
        self.bootstrap = merged;
        Ok(())
    }
}

/// Record store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// `SQLite` database path.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_store_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` synchronous mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            busy_timeout_ms: default_store_busy_timeout_ms(),
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

impl StoreConfig {
    /// Returns the `SQLite` store configuration.
    #[must_use]
    pub fn sqlite_config(&self) -> SqliteStoreConfig {
        SqliteStoreConfig {
            path: self.path.clone(),
            busy_timeout_ms: self.busy_timeout_ms,
            journal_mode: self.journal_mode,
            sync_mode: self.sync_mode,
        }
    }

    /// Validates record store configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("store path must be non-empty".to_string()));
        }
        validate_path_limits("store path", &self.path)?;
        if self.busy_timeout_ms == 0 || self.busy_timeout_ms > MAX_STORE_BUSY_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "store busy_timeout_ms must be between 1 and {MAX_STORE_BUSY_TIMEOUT_MS}"
            )));
        }
        Ok(())
    }
}

/// Migration pass configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MigrationConfig {
    /// When the schema version is committed.
    #[serde(default)]
    pub commit_policy: CommitPolicy,
    /// Where migration audit events go.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl MigrationConfig {
    /// Validates migration configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        self.audit.validate()
    }
}

/// Migration audit sink configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Sink kind.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Log file path for the file sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl AuditConfig {
    /// Validates audit sink configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("file audit sink requires path".to_string()))
            }
            (AuditSinkKind::File, Some(path)) => {
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::Invalid("audit path must be non-empty".to_string()));
                }
                validate_path_limits("audit path", path)
            }
            (AuditSinkKind::Stderr | AuditSinkKind::None, Some(_)) => Err(ConfigError::Invalid(
                "audit path is only valid with the file sink".to_string(),
            )),
            (AuditSinkKind::Stderr | AuditSinkKind::None, None) => Ok(()),
        }
    }
}

/// Migration audit sink kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Discard events.
    None,
}

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the default `SQLite` database path.
fn default_store_path() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_PATH)
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_store_busy_timeout_ms() -> u64 {
    DEFAULT_STORE_BUSY_TIMEOUT_MS
}

/// Resolves the config path from CLI or environment defaults.
///
/// The flag reports whether the path was named explicitly.
fn resolve_path(path: Option<&Path>) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), true));
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok((PathBuf::from(env_path), true));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), false))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    validate_path_limits("config path", path)
}

/// Validates a path against total and per-component length limits.
fn validate_path_limits(field: &str, path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} component too long")));
        }
    }
    Ok(())
}

/// Validates bootstrap values handed to migration steps.
fn validate_bootstrap(bootstrap: &BootstrapConfig) -> Result<(), ConfigError> {
    if let Some(image) = &bootstrap.kubectl_shell_image {
        validate_bootstrap_string("bootstrap.kubectl_shell_image", image)?;
        if image.chars().any(char::is_whitespace) {
            return Err(ConfigError::Invalid(
                "bootstrap.kubectl_shell_image must not contain whitespace".to_string(),
            ));
        }
    }
    if let Some(url) = &bootstrap.templates_url {
        validate_bootstrap_url("bootstrap.templates_url", url)?;
    }
    if let Some(url) = &bootstrap.helm_repository_url {
        validate_bootstrap_url("bootstrap.helm_repository_url", url)?;
    }
    if let Some(interval) = &bootstrap.snapshot_interval {
        validate_bootstrap_string("bootstrap.snapshot_interval", interval)?;
        if !is_duration(interval) {
            return Err(ConfigError::Invalid(
                "bootstrap.snapshot_interval must be a duration such as 5m or 1h30m".to_string(),
            ));
        }
    }
    if let Some(interval) = bootstrap.edge_checkin_interval_secs
        && (interval == 0 || interval > MAX_EDGE_CHECKIN_INTERVAL_SECS)
    {
        return Err(ConfigError::Invalid(format!(
            "bootstrap.edge_checkin_interval_secs must be between 1 and \
             {MAX_EDGE_CHECKIN_INTERVAL_SECS}"
        )));
    }
    Ok(())
}

/// Validates a non-blank bootstrap string within the length limit.
fn validate_bootstrap_string(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if value.len() > MAX_BOOTSTRAP_VALUE_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    Ok(())
}

/// Validates a bootstrap URL.
fn validate_bootstrap_url(field: &str, value: &str) -> Result<(), ConfigError> {
    validate_bootstrap_string(field, value)?;
    let url = Url::parse(value)
        .map_err(|_| ConfigError::Invalid(format!("{field} must be an http or https URL")))?;
    match url.scheme() {
        "https" | "http" => {}
        _ => return Err(ConfigError::Invalid(format!("{field} must be an http or https URL"))),
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ConfigError::Invalid(format!("{field} must include a host")));
    }
    Ok(())
}

/// Returns true for duration strings made of `<digits><unit>` groups with
/// units `h`, `m`, or `s`.
fn is_duration(value: &str) -> bool {
    let mut saw_group = false;
    let mut digits = 0_usize;
    for ch in value.chars() {
        if ch.is_ascii_digit() {
            digits += 1;
        } else if matches!(ch, 'h' | 'm' | 's') && digits > 0 {
            digits = 0;
            saw_group = true;
        } else {
            return false;
        }
    }
    saw_group && digits == 0
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions and helpers are permitted."
    )]

    use super::*;

    #[test]
    fn duration_grammar() {
        assert!(is_duration("5m"));
        assert!(is_duration("1h30m"));
        assert!(is_duration("45s"));
        assert!(!is_duration(""));
        assert!(!is_duration("5"));
        assert!(!is_duration("m5"));
        assert!(!is_duration("5 m"));
        assert!(!is_duration("5d"));
    }

    #[test]
    fn path_limits_reject_long_component() {
        let path = PathBuf::from("a".repeat(MAX_PATH_COMPONENT_LENGTH + 1));
        assert!(validate_path_limits("store path", &path).is_err());
    }

    #[test]
    fn explicit_path_is_flagged() {
        let (path, explicit) = resolve_path(Some(Path::new("custom.toml"))).unwrap();
        assert_eq!(path, PathBuf::from("custom.toml"));
        assert!(explicit);
    }
}
