//! Configuration system
//!
//! Reconciler settings plus the file loading helpers shared by every
//! configuration type. Files are TOML or RON, picked by extension.

pub use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(path, &contents)
    }

    /// Parse configuration text, using `path` only to pick the format
    fn parse(path: &str, contents: &str) -> Result<Self, ConfigError> {
        if path.ends_with(".toml") {
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// When removed objects are disposed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisposalPolicy {
    /// Queue disposal and run it from [`Host::run_idle`](crate::host::Host::run_idle)
    #[default]
    Deferred,
    /// Dispose inline while the removal is processed
    Immediate,
}

/// Conventional attach slots for auto-attach categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoAttachConfig {
    /// Slot used by geometry objects
    pub geometry: String,
    /// Slot used by material objects
    pub material: String,
}

impl Default for AutoAttachConfig {
    fn default() -> Self {
        Self {
            geometry: "geometry".to_string(),
            material: "material".to_string(),
        }
    }
}

/// # Reconciler Configuration
///
/// Host behavior that is not part of the declared tree: how disposal is
/// scheduled, how much deferred work one idle slice may do, and the default
/// attach slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilerConfig {
    /// Disposal scheduling
    pub disposal: DisposalPolicy,
    /// Maximum disposals performed per idle slice
    pub idle_budget: usize,
    /// Default attach slots
    pub auto_attach: AutoAttachConfig,
}

impl ReconcilerConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self {
            disposal: DisposalPolicy::Deferred,
            idle_budget: 64,
            auto_attach: AutoAttachConfig::default(),
        }
    }

    /// Set the disposal policy
    #[must_use]
    pub fn with_disposal(mut self, disposal: DisposalPolicy) -> Self {
        self.disposal = disposal;
        self
    }

    /// Set the idle budget
    #[must_use]
    pub fn with_idle_budget(mut self, budget: usize) -> Self {
        self.idle_budget = budget;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.idle_budget == 0 {
            return Err("idle_budget must be at least 1".to_string());
        }
        if self.auto_attach.geometry.is_empty() || self.auto_attach.material.is_empty() {
            return Err("auto_attach slots must not be empty".to_string());
        }
        Ok(())
    }
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for ReconcilerConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReconcilerConfig::default();
        assert_eq!(config.disposal, DisposalPolicy::Deferred);
        assert_eq!(config.auto_attach.material, "material");
        assert!(config.validate().is_ok());
        assert!(config.with_idle_budget(0).validate().is_err());
    }

    #[test]
    fn test_parse_toml_with_partial_fields() {
        let text = r#"
            disposal = "immediate"

            [auto_attach]
            material = "skin"
        "#;
        let config = ReconcilerConfig::parse("reconciler.toml", text).unwrap();
        assert_eq!(config.disposal, DisposalPolicy::Immediate);
        assert_eq!(config.idle_budget, 64);
        assert_eq!(config.auto_attach.material, "skin");
        assert_eq!(config.auto_attach.geometry, "geometry");
    }

    #[test]
    fn test_parse_ron() {
        let config = ReconcilerConfig::parse("reconciler.ron", "(idle_budget: 8)").unwrap();
        assert_eq!(config.idle_budget, 8);
    }

    #[test]
    fn test_unsupported_format() {
        let err = ReconcilerConfig::parse("reconciler.json", "{}").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }
}
