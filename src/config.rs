use crate::core::db::ErrorPolicy;
use crate::core::{HandleError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Handle configuration parsed from a TOML file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HandleConfig {
    /// Filesystem path of the store, or `:memory:`
    pub location: String,
    /// Whether failures are logged and swallowed or returned
    #[serde(default)]
    pub error_policy: ErrorPolicy,
    /// Default for `create_table_with_defaults`
    #[serde(default)]
    pub apply_constraints: bool,
}

impl HandleConfig {
    /// Parses configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: HandleConfig =
            toml::from_str(content).map_err(|e| HandleError::Config(e.to_string()))?;
        if config.location.trim().is_empty() {
            return Err(HandleError::Config("location must not be empty".to_string()));
        }
        Ok(config)
    }
}

/// Loads configuration from a TOML file at the given path.
///
/// # Example
///
/// ```no_run
/// use sqlite_connect::{load_config, DatabaseHandle};
///
/// let config = load_config("handle.toml")?;
/// let mut db = DatabaseHandle::from_config(&config);
/// db.open()?;
/// # Ok::<(), sqlite_connect::HandleError>(())
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<HandleConfig> {
    let content = fs::read_to_string(path)?;
    HandleConfig::from_toml_str(&content)
}
