//! Wrapper configuration loaded from TOML.
//!
//! ```toml
//! name = "exchange-rate"
//! enabled = true
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{CachedMethodError, Result};

/// Defaults applied to a wrapper at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Label attached to log events for this wrapper.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Whether caching starts enabled (default: true).
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            name: None,
            enabled: true,
        }
    }
}

impl CacheConfig {
    /// Parse a config from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| CachedMethodError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Name used in log events.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("anonymous")
    }
}
