// crates/dockhand-config/tests/common/mod.rs
// ============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for configuration validation tests.
// Purpose: Build configs from TOML and assert failure messages.
// Dependencies: dockhand-config, tempfile
// ============================================================================

//! Shared helpers for config integration tests.

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::fs;
use std::path::PathBuf;

use dockhand_config::ConfigError;
use dockhand_config::DockhandConfig;
use tempfile::TempDir;

/// Result type used by config test suites.
pub type TestResult = Result<(), String>;

/// Parses a config from TOML text without validating it.
pub fn config_from_toml(toml_str: &str) -> Result<DockhandConfig, String> {
    toml::from_str(toml_str).map_err(|err| err.to_string())
}

/// Writes a config file into a fresh temp directory.
pub fn write_config(contents: &str) -> Result<(TempDir, PathBuf), String> {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("dockhand.toml");
    fs::write(&path, contents).map_err(|err| err.to_string())?;
    Ok((dir, path))
}

/// Asserts that a config result failed with a message containing `needle`.
pub fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> TestResult {
    match result {
        Ok(_) => Err(format!("expected failure containing '{needle}'")),
        Err(err) => {
            let message = err.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error '{message}' did not contain '{needle}'"))
            }
        }
    }
}
