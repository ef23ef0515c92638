//! Engine configuration structures

use crate::criteria::{ParseOptions, DEFAULT_BOOLEAN_FIELD_TARGET, DEFAULT_MAX_DEPTH};
use crate::error::{CriteriaError, Result};
use serde::Deserialize;

/// Default initial capacity of the parse cache
pub const DEFAULT_CACHE_CAPACITY: usize = 2048;

/// Engine-wide settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum tuple nesting depth accepted by the decoder
    pub max_depth: usize,
    /// Equals-target of a boolean field referenced without parameters
    pub boolean_field_default: bool,
    /// Initial capacity of the parse cache
    pub cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            boolean_field_default: DEFAULT_BOOLEAN_FIELD_TARGET,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Deserialize and validate a configuration from JSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(CriteriaError::InvalidConfig(
                "max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Decode-time projection of this configuration
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            max_depth: self.max_depth,
            boolean_field_default: self.boolean_field_default,
        }
    }
}
