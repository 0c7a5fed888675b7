// crates/dockhand-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Record Store
// Description: Durable RecordStore backed by SQLite.
// Purpose: Persist Dockhand records and the schema version record.
// Dependencies: dockhand-core, rusqlite, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This module implements every Dockhand collaborator service on top of a
//! single `SQLite` table of JSON documents keyed by `(bucket, key)`. The
//! schema version record lives at bucket [`VERSION_BUCKET`], key
//! [`VERSION_KEY`], as a decimal JSON integer. The table layout itself is
//! versioned separately in `store_meta` and rejected when unknown.
//! Security posture: database contents are untrusted; decode failures surface
//! as corruption instead of being repaired silently.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use dockhand_core::Endpoint;
use dockhand_core::EndpointGroup;
use dockhand_core::EndpointGroupId;
use dockhand_core::EndpointGroupService;
use dockhand_core::EndpointService;
use dockhand_core::Registry;
use dockhand_core::RegistryService;
use dockhand_core::ResourceControl;
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
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` table layout version for the store.
const LAYOUT_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum encoded record size accepted by the store.
pub const MAX_RECORD_BYTES: usize = 1024 * 1024;

/// Bucket holding the schema version record.
pub const VERSION_BUCKET: &str = "version";
/// Key of the schema version record.
pub const VERSION_KEY: &str = "DB_VERSION";
/// Bucket holding the settings singleton.
const SETTINGS_BUCKET: &str = "settings";
/// Key of the settings singleton.
const SETTINGS_KEY: &str = "SETTINGS";
/// Bucket holding endpoints.
const ENDPOINT_BUCKET: &str = "endpoints";
/// Bucket holding endpoint groups.
const ENDPOINT_GROUP_BUCKET: &str = "endpoint_groups";
/// Bucket holding registries.
const REGISTRY_BUCKET: &str = "registries";
/// Bucket holding users.
const USER_BUCKET: &str = "users";
/// Bucket holding resource controls.
const RESOURCE_CONTROL_BUCKET: &str = "resource_control";
/// Bucket holding stacks.
const STACK_BUCKET: &str = "stacks";
/// Bucket holding tags.
const TAG_BUCKET: &str = "tags";
/// Bucket holding roles.
const ROLE_BUCKET: &str = "roles";

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `synchronous` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` record store.
///
/// # Invariants
/// - `path` must resolve to a file path (not a directory).
/// - `busy_timeout_ms` is interpreted as milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Returns a configuration for `path` with default tuning.
    #[must_use]
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
///
/// # Invariants
/// - Error messages avoid embedding raw record payloads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// No database exists at the path and creation was not requested.
    #[error("sqlite store not found: {0}")]
    NotFound(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Stored record cannot be decoded.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store layout version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data or configuration.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
    /// Record payload exceeded the size limit.
    #[error("sqlite store payload too large: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual payload size in bytes.
        actual_bytes: usize,
    },
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::NotFound(path) => Self::Io(format!("store not found: {path}")),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
            SqliteStoreError::TooLarge {
                max_bytes,
                actual_bytes,
            } => Self::Invalid(format!(
                "record exceeds size limit: {actual_bytes} bytes (max {max_bytes})"
            )),
        }
    }
}

/// Maps a `rusqlite` error into a store error.
#[allow(clippy::needless_pass_by_value, reason = "Used directly as a map_err adapter.")]
fn db_error(err: rusqlite::Error) -> SqliteStoreError {
    SqliteStoreError::Db(err.to_string())
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed versioned record store.
///
/// # Invariants
/// - Connection access is serialized through a mutex.
/// - Every write commits its own transaction before returning.
#[derive(Clone)]
pub struct SqliteRecordStore {
    /// Store configuration.
    config: SqliteStoreConfig,
    /// Shared connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteRecordStore {
    /// Opens (or creates) the store described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the path is invalid, the database
    /// cannot be opened, or its layout version is unsupported.
    pub fn new(config: SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(&config, OpenFlags::SQLITE_OPEN_CREATE)?;
        initialize_layout(&mut connection)?;
        Ok(Self {
            config,
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Opens the store described by `config` only if its database exists.
    ///
    /// Neither the database file nor its parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError::NotFound`] when no database exists at the
    /// configured path, and the same errors as [`Self::new`] otherwise.
    pub fn open_existing(config: SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        if !config.path.is_file() {
            return Err(SqliteStoreError::NotFound(config.path.display().to_string()));
        }
        let mut connection = open_connection(&config, OpenFlags::empty())?;
        initialize_layout(&mut connection)?;
        Ok(Self {
            config,
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Returns the store configuration.
    #[must_use]
    pub const fn config(&self) -> &SqliteStoreConfig {
        &self.config
    }

    /// Locks the shared connection.
    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SqliteStoreError> {
        self.connection
            .lock()
            .map_err(|_| SqliteStoreError::Io("sqlite mutex poisoned".to_string()))
    }

    /// Reads and decodes a single record.
    fn get_record<T: DeserializeOwned>(
        &self,
        bucket: &str,
        key: &str,
    ) -> Result<Option<T>, SqliteStoreError> {
        let guard = self.lock()?;
        let bytes: Option<Vec<u8>> = guard
            .query_row(
                "SELECT value FROM records WHERE bucket = ?1 AND key = ?2",
                params![bucket, key],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_error)?;
        drop(guard);
        bytes.map(|bytes| decode_record(bucket, key, &bytes)).transpose()
    }

    /// Reads and decodes every record in a bucket, ordered by numeric key.
    fn list_records<T: DeserializeOwned>(&self, bucket: &str) -> Result<Vec<T>, SqliteStoreError> {
        let guard = self.lock()?;
        let rows: Vec<(String, Vec<u8>)> = {
            let mut statement = guard
                .prepare(
                    "SELECT key, value FROM records WHERE bucket = ?1 ORDER BY CAST(key AS \
                     INTEGER), key",
                )
                .map_err(db_error)?;
            let mapped = statement
                .query_map(params![bucket], |row| Ok((row.get(0)?, row.get(1)?)))
                .map_err(db_error)?;
            mapped.collect::<Result<_, _>>().map_err(db_error)?
        };
        drop(guard);
        rows.iter().map(|(key, bytes)| decode_record(bucket, key, bytes)).collect()
    }

    /// Encodes and writes a single record in its own transaction.
    fn put_record<T: Serialize>(
        &self,
        bucket: &str,
        key: &str,
        record: &T,
    ) -> Result<(), SqliteStoreError> {
        let bytes = encode_record(bucket, record)?;
        let mut guard = self.lock()?;
        let tx = guard.transaction().map_err(db_error)?;
        tx.execute(
            "INSERT OR REPLACE INTO records (bucket, key, value) VALUES (?1, ?2, ?3)",
            params![bucket, key, bytes],
        )
        .map_err(db_error)?;
        tx.commit().map_err(db_error)?;
        drop(guard);
        Ok(())
    }
}

// ============================================================================
// SECTION: Collaborator Services
// ============================================================================

impl VersionStore for SqliteRecordStore {
    fn schema_version(&self) -> Result<Option<SchemaVersion>, StoreError> {
        Ok(self.get_record(VERSION_BUCKET, VERSION_KEY)?)
    }

    fn store_schema_version(&self, version: SchemaVersion) -> Result<(), StoreError> {
        Ok(self.put_record(VERSION_BUCKET, VERSION_KEY, &version)?)
    }
}

impl SettingsService for SqliteRecordStore {
    fn settings(&self) -> Result<Option<Settings>, StoreError> {
        Ok(self.get_record(SETTINGS_BUCKET, SETTINGS_KEY)?)
    }

    fn update_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        Ok(self.put_record(SETTINGS_BUCKET, SETTINGS_KEY, settings)?)
    }
}

impl EndpointService for SqliteRecordStore {
    fn endpoints(&self) -> Result<Vec<Endpoint>, StoreError> {
        Ok(self.list_records(ENDPOINT_BUCKET)?)
    }

    fn update_endpoint(&self, endpoint: &Endpoint) -> Result<(), StoreError> {
        Ok(self.put_record(ENDPOINT_BUCKET, &endpoint.id.to_string(), endpoint)?)
    }
}

impl EndpointGroupService for SqliteRecordStore {
    fn endpoint_groups(&self) -> Result<Vec<EndpointGroup>, StoreError> {
        Ok(self.list_records(ENDPOINT_GROUP_BUCKET)?)
    }

    fn endpoint_group(&self, id: EndpointGroupId) -> Result<Option<EndpointGroup>, StoreError> {
        Ok(self.get_record(ENDPOINT_GROUP_BUCKET, &id.to_string())?)
    }

    fn update_endpoint_group(&self, group: &EndpointGroup) -> Result<(), StoreError> {
        Ok(self.put_record(ENDPOINT_GROUP_BUCKET, &group.id.to_string(), group)?)
    }
}

impl RegistryService for SqliteRecordStore {
    fn registries(&self) -> Result<Vec<Registry>, StoreError> {
        Ok(self.list_records(REGISTRY_BUCKET)?)
    }

    fn update_registry(&self, registry: &Registry) -> Result<(), StoreError> {
        Ok(self.put_record(REGISTRY_BUCKET, &registry.id.to_string(), registry)?)
    }
}

impl UserService for SqliteRecordStore {
    fn users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.list_records(USER_BUCKET)?)
    }

    fn update_user(&self, user: &User) -> Result<(), StoreError> {
        Ok(self.put_record(USER_BUCKET, &user.id.to_string(), user)?)
    }
}

impl ResourceControlService for SqliteRecordStore {
    fn resource_controls(&self) -> Result<Vec<ResourceControl>, StoreError> {
        Ok(self.list_records(RESOURCE_CONTROL_BUCKET)?)
    }

    fn update_resource_control(&self, control: &ResourceControl) -> Result<(), StoreError> {
        Ok(self.put_record(RESOURCE_CONTROL_BUCKET, &control.id.to_string(), control)?)
    }
}

impl StackService for SqliteRecordStore {
    fn stacks(&self) -> Result<Vec<Stack>, StoreError> {
        Ok(self.list_records(STACK_BUCKET)?)
    }

    fn update_stack(&self, stack: &Stack) -> Result<(), StoreError> {
        Ok(self.put_record(STACK_BUCKET, &stack.id.to_string(), stack)?)
    }
}

impl TagService for SqliteRecordStore {
    fn tags(&self) -> Result<Vec<Tag>, StoreError> {
        Ok(self.list_records(TAG_BUCKET)?)
    }

    fn create_tag(&self, name: &str) -> Result<Tag, StoreError> {
        let mut guard = self.lock()?;
        let tx = guard.transaction().map_err(db_error)?;
        let max_id: Option<i64> = tx
            .query_row(
                "SELECT MAX(CAST(key AS INTEGER)) FROM records WHERE bucket = ?1",
                params![TAG_BUCKET],
                |row| row.get(0),
            )
            .map_err(db_error)?;
        let next = u32::try_from(max_id.unwrap_or(0))
            .ok()
            .and_then(|value| value.checked_add(1))
            .ok_or_else(|| {
                SqliteStoreError::Invalid("tag identifier space exhausted".to_string())
            })?;
        let tag = Tag {
            id: TagId::new(next),
            name: name.to_string(),
            ..Tag::default()
        };
        let bytes = encode_record(TAG_BUCKET, &tag)?;
        tx.execute(
            "INSERT INTO records (bucket, key, value) VALUES (?1, ?2, ?3)",
            params![TAG_BUCKET, tag.id.to_string(), bytes],
        )
        .map_err(db_error)?;
        tx.commit().map_err(db_error)?;
        drop(guard);
        Ok(tag)
    }

    fn update_tag(&self, tag: &Tag) -> Result<(), StoreError> {
        Ok(self.put_record(TAG_BUCKET, &tag.id.to_string(), tag)?)
    }
}

impl RoleService for SqliteRecordStore {
    fn roles(&self) -> Result<Vec<Role>, StoreError> {
        Ok(self.list_records(ROLE_BUCKET)?)
    }

    fn update_role(&self, role: &Role) -> Result<(), StoreError> {
        Ok(self.put_record(ROLE_BUCKET, &role.id.to_string(), role)?)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    if path.as_os_str().is_empty() {
        return Err(SqliteStoreError::Invalid("store path must not be empty".to_string()));
    }
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.exists() && path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with durable defaults.
///
/// `create` is either empty or `SQLITE_OPEN_CREATE`.
fn open_connection(
    config: &SqliteStoreConfig,
    create: OpenFlags,
) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_FULL_MUTEX | create;
    let connection = Connection::open_with_flags(&config.path, flags).map_err(db_error)?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(db_error)?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(db_error)?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(db_error)?;
    Ok(())
}

/// Creates the table layout or validates an existing layout version.
fn initialize_layout(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(db_error)?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (layout_version INTEGER NOT NULL);")
        .map_err(db_error)?;
    let layout: Option<i64> = tx
        .query_row("SELECT layout_version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(db_error)?;
    match layout {
        None => {
            tx.execute("INSERT INTO store_meta (layout_version) VALUES (?1)", params![
                LAYOUT_VERSION
            ])
            .map_err(db_error)?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS records (
                    bucket TEXT NOT NULL,
                    key TEXT NOT NULL,
                    value BLOB NOT NULL,
                    PRIMARY KEY (bucket, key)
                );",
            )
            .map_err(db_error)?;
        }
        Some(value) if value == LAYOUT_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported store layout version: {value}"
            )));
        }
    }
    tx.commit().map_err(db_error)?;
    Ok(())
}

/// Serializes a record, enforcing the size limit.
fn encode_record<T: Serialize>(bucket: &str, record: &T) -> Result<Vec<u8>, SqliteStoreError> {
    let bytes = serde_json::to_vec(record)
        .map_err(|err| SqliteStoreError::Invalid(format!("{bucket} record encode failed: {err}")))?;
    if bytes.len() > MAX_RECORD_BYTES {
        return Err(SqliteStoreError::TooLarge {
            max_bytes: MAX_RECORD_BYTES,
            actual_bytes: bytes.len(),
        });
    }
    Ok(bytes)
}

/// Deserializes a stored record, enforcing the size limit.
fn decode_record<T: DeserializeOwned>(
    bucket: &str,
    key: &str,
    bytes: &[u8],
) -> Result<T, SqliteStoreError> {
    if bytes.len() > MAX_RECORD_BYTES {
        return Err(SqliteStoreError::TooLarge {
            max_bytes: MAX_RECORD_BYTES,
            actual_bytes: bytes.len(),
        });
    }
    serde_json::from_slice(bytes).map_err(|err| {
        SqliteStoreError::Corrupt(format!("{bucket}/{key} record decode failed: {err}"))
    })
}

#[cfg(test)]
mod tests {
    use super::SqliteStoreError;
    use super::StoreError;

    #[test]
    fn too_large_maps_to_invalid_store_error() {
        let mapped = StoreError::from(SqliteStoreError::TooLarge {
            max_bytes: 10,
            actual_bytes: 11,
        });
        assert!(matches!(mapped, StoreError::Invalid(message) if message.contains("11 bytes")));
    }

    #[test]
    fn db_errors_map_to_generic_store_error() {
        let mapped = StoreError::from(SqliteStoreError::Db("locked".to_string()));
        assert_eq!(mapped, StoreError::Store("locked".to_string()));
    }
}
