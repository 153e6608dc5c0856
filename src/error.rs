//! Error types for cached method construction and configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, CachedMethodError>;

/// Stable machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No usable method after resolving positional and option arguments.
    InvalidArgument,
    /// Config file could not be read.
    ConfigRead,
    /// Config file could not be parsed.
    ConfigParse,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument => write!(f, "INVALID_ARGUMENT"),
            Self::ConfigRead => write!(f, "CONFIG_READ"),
            Self::ConfigParse => write!(f, "CONFIG_PARSE"),
        }
    }
}

/// Errors raised while building a cached method.
///
/// Invocation itself never produces one of these: whatever the wrapped
/// method returns or panics with reaches the caller untouched.
#[derive(Debug, Error)]
pub enum CachedMethodError {
    #[error("invalid method argument: {0}")]
    InvalidArgument(String),

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl CachedMethodError {
    /// Error for a construction that resolved to no method.
    pub fn missing_method() -> Self {
        Self::InvalidArgument("must be a function".to_string())
    }

    /// Machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::ConfigRead { .. } => ErrorCode::ConfigRead,
            Self::ConfigParse(_) => ErrorCode::ConfigParse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_method_message() {
        let err = CachedMethodError::missing_method();
        assert_eq!(err.to_string(), "invalid method argument: must be a function");
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
    }

    #[test]
    fn test_error_code_display_matches_serde() {
        for code in [
            ErrorCode::InvalidArgument,
            ErrorCode::ConfigRead,
            ErrorCode::ConfigParse,
        ] {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code));
        }
    }

    #[test]
    fn test_config_parse_converts() {
        let toml_err = toml::from_str::<toml::Value>("enabled = ").unwrap_err();
        let err: CachedMethodError = toml_err.into();
        assert_eq!(err.code(), ErrorCode::ConfigParse);
    }
}
