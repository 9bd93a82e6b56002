// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Decode limits.
//!
//! With the `config-loaders` feature the limits load from YAML. Missing keys
//! keep the defaults shown here:
//!
//! ```yaml
//! # codec.yaml
//! max_depth: 64
//! max_container_len: 1048576
//! max_string_len: 16777216
//! ```

use std::fmt;

/// Limits applied while decoding untrusted input.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "config-loaders",
    derive(serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct CodecConfig {
    /// Maximum nesting of structs and containers.
    pub max_depth: usize,
    /// Maximum element count of one list, set or map.
    pub max_container_len: usize,
    /// Maximum byte length of one string or binary value.
    pub max_string_len: usize,
}

impl CodecConfig {
    pub const DEFAULT_MAX_DEPTH: usize = 64;
    pub const DEFAULT_MAX_CONTAINER_LEN: usize = 1 << 20;
    pub const DEFAULT_MAX_STRING_LEN: usize = 16 * 1024 * 1024;

    /// Reject zero limits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = [
            ("max_depth", self.max_depth),
            ("max_container_len", self.max_container_len),
            ("max_string_len", self.max_string_len),
        ];
        match limits.iter().find(|(_, value)| *value == 0) {
            Some((name, _)) => Err(ConfigError::Invalid(format!("{} must be positive", name))),
            None => Ok(()),
        }
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            max_container_len: Self::DEFAULT_MAX_CONTAINER_LEN,
            max_string_len: Self::DEFAULT_MAX_STRING_LEN,
        }
    }
}

#[cfg(feature = "config-loaders")]
impl CodecConfig {
    /// Parse limits from a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml).map_err(ConfigError::Parse)?;
        config.validate()?;
        log::debug!("[codec] loaded config {:?}", config);
        Ok(config)
    }

    /// Read and parse a YAML file.
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_yaml_str(&yaml)
    }
}

/// Configuration loading failures.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    #[cfg(feature = "config-loaders")]
    Parse(serde_yaml::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Failed to read config file: {}", e),
            #[cfg(feature = "config-loaders")]
            Self::Parse(e) => write!(f, "Failed to parse YAML: {}", e),
            Self::Invalid(msg) => write!(f, "Invalid codec config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config-loaders")]
            Self::Parse(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}

#[cfg(all(test, feature = "config-loaders"))]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = CodecConfig::from_yaml_str("max_depth: 8\n").expect("parse");
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.max_container_len, CodecConfig::DEFAULT_MAX_CONTAINER_LEN);
        assert_eq!(config.max_string_len, CodecConfig::DEFAULT_MAX_STRING_LEN);
    }

    #[test]
    fn test_documented_values_are_the_defaults() {
        let yaml = "max_depth: 64\nmax_container_len: 1048576\nmax_string_len: 16777216\n";
        let config = CodecConfig::from_yaml_str(yaml).expect("parse");
        assert_eq!(config, CodecConfig::default());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let err = CodecConfig::from_yaml_str("max_depht: 8\n").expect_err("typo");
        assert!(matches!(err, ConfigError::Parse(_)), "{}", err);
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        let err = CodecConfig::from_yaml_str("max_string_len: 0\n").expect_err("zero");
        match err {
            ConfigError::Invalid(msg) => assert!(msg.contains("max_string_len"), "{}", msg),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "max_depth: 4").expect("write");
        writeln!(file, "max_container_len: 10").expect("write");
        let config = CodecConfig::from_yaml_file(file.path()).expect("load");
        assert_eq!((config.max_depth, config.max_container_len), (4, 10));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = CodecConfig::from_yaml_file(dir.path().join("absent.yaml")).expect_err("missing");
        assert!(matches!(err, ConfigError::Io(_)), "{}", err);
    }
}
