//! Engine configuration (`navex.toml`)
//!
//! Every section and field is optional; missing values take their defaults.
//!
//! ```toml
//! [sampling]
//! read = "fatal"
//! write = "advisory"
//! skip_when_declared = false
//!
//! [pool]
//! max_retained_per_length = 16
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::compiler::Role;

/// Errors that can occur while loading or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or write the file
    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// What to do when the sample evaluation raises during compilation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleFailure {
    /// Abort compilation of the node with the invocation failure
    Fatal,
    /// Log the failure and keep the fragment
    Advisory,
}

/// Sample evaluation policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Failure handling in the value-production role
    pub read: SampleFailure,

    /// Failure handling in the value-acceptance role
    pub write: SampleFailure,

    /// Skip the sample when the declared return type alone describes the
    /// result (void or primitive) and no chain step navigates from it
    pub skip_when_declared: bool,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            read: SampleFailure::Fatal,
            write: SampleFailure::Advisory,
            skip_when_declared: false,
        }
    }
}

impl SamplingConfig {
    /// Failure handling for a compile role
    pub fn on_failure(&self, role: Role) -> SampleFailure {
        match role {
            Role::Read => self.read,
            Role::Write => self.write,
        }
    }
}

/// Argument pool tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Released arrays kept per length; extra arrays are dropped
    pub max_retained_per_length: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_retained_per_length: 16,
        }
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Sample evaluation policy
    pub sampling: SamplingConfig,

    /// Argument pool tuning
    pub pool: PoolConfig,
}

impl EngineConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Serialize to TOML text
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_asymmetric() {
        let config = EngineConfig::default();
        assert_eq!(config.sampling.on_failure(Role::Read), SampleFailure::Fatal);
        assert_eq!(config.sampling.on_failure(Role::Write), SampleFailure::Advisory);
        assert!(!config.sampling.skip_when_declared);
        assert_eq!(config.pool.max_retained_per_length, 16);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = EngineConfig::from_toml_str(
            r#"
[sampling]
write = "fatal"
"#,
        )
        .unwrap();
        assert_eq!(config.sampling.write, SampleFailure::Fatal);
        assert_eq!(config.sampling.read, SampleFailure::Fatal);
        assert_eq!(config.pool, PoolConfig::default());
    }

    #[test]
    fn test_rejects_unknown_policy() {
        let result = EngineConfig::from_toml_str("[sampling]\nread = \"sometimes\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_serialize_round_trip() {
        let mut config = EngineConfig::default();
        config.sampling.skip_when_declared = true;
        config.pool.max_retained_per_length = 4;
        let text = config.to_toml_string().unwrap();
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
    }
}
