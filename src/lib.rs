//! Scan Criteria Core - Typed criteria expressions for instrument scans
//!
//! This crate provides the scan criteria AST, the field taxonomy it ranges
//! over, and a lossless codec between the AST and the JSON tuple node wire
//! form, with a validating decoder that reports where decoding stopped.

pub mod config;
pub mod criteria;
pub mod error;
pub mod field;

pub use crate::config::EngineConfig;
pub use crate::criteria::{
    encode_boolean, encode_criteria_text, encode_numeric, parse_boolean, parse_boolean_with,
    parse_criteria_text, parse_numeric_with, BooleanNode, NodeTypeId, NumericNode,
    NumericOperand, ParseOptions, ParseProgress, Parsed,
};
pub use crate::error::{CriteriaError, DecodeFailure, NodeError, ParseError, Result};
pub use crate::field::{FieldDataType, FieldId, SubField};

use once_cell::sync::OnceCell;
use parking_lot::RwLock;

// ============================================================================
// Cached Configuration
// ============================================================================

/// Global engine configuration
static ENGINE_CONFIG: OnceCell<RwLock<EngineConfig>> = OnceCell::new();

/// Serializes tests that touch process-wide state (config and parse cache)
#[cfg(test)]
pub(crate) static GLOBAL_STATE_LOCK: parking_lot::Mutex<()> = parking_lot::const_mutex(());

// ============================================================================
// Configuration Functions
// ============================================================================

/// Install the engine configuration (call once at startup)
///
/// Calling again replaces the configuration. The parse cache is cleared
/// since cached trees were decoded under the previous options, and decodes
/// still running under those options are not cached.
pub fn init_config(config: EngineConfig) -> Result<()> {
    config.validate()?;

    if let Some(existing) = ENGINE_CONFIG.get() {
        let mut guard = existing.write();
        *guard = config;
    } else if let Err(config) = ENGINE_CONFIG.set(RwLock::new(config)) {
        // Lost an initialization race; overwrite the winner
        if let Some(existing) = ENGINE_CONFIG.get() {
            *existing.write() = config.into_inner();
        }
    }

    criteria::clear_cache();
    tracing::debug!("engine config initialized");
    Ok(())
}

/// Install the engine configuration from JSON text
pub fn init_config_from_json(text: &str) -> Result<()> {
    init_config(EngineConfig::from_json_str(text)?)
}

/// Check if config is initialized
pub fn is_config_initialized() -> bool {
    ENGINE_CONFIG.get().is_some()
}

/// Current engine configuration, or the defaults if none was installed
pub fn engine_config() -> EngineConfig {
    ENGINE_CONFIG
        .get()
        .map(|config| config.read().clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_init_config_applies_to_cache() {
        let _guard = GLOBAL_STATE_LOCK.lock();
        let text = r#"["isIndex"]"#;

        init_config(EngineConfig {
            boolean_field_default: false,
            ..EngineConfig::default()
        })
        .unwrap();
        assert!(is_config_initialized());
        assert_eq!(
            criteria::get_or_parse(text).unwrap(),
            BooleanNode::BooleanFieldEquals {
                field: FieldId::IsIndex,
                target: false
            }
        );

        init_config(EngineConfig::default()).unwrap();
        assert!(!criteria::is_cached(text));
        assert_eq!(
            criteria::get_or_parse(text).unwrap(),
            BooleanNode::BooleanFieldEquals {
                field: FieldId::IsIndex,
                target: true
            }
        );
        assert_eq!(engine_config(), EngineConfig::default());
    }

    #[test]
    fn test_init_config_rejects_invalid() {
        let _guard = GLOBAL_STATE_LOCK.lock();
        let err = init_config_from_json(r#"{"max_depth": 0}"#).unwrap_err();
        assert!(matches!(err, CriteriaError::InvalidConfig(_)));
    }

    #[test]
    fn test_public_surface_round_trip() {
        let input = json!([
            "or",
            ["code", "BHP", {"As": "FromStart", "IgnoreCase": true}],
            ["gte", ["abs", "vwap"], 2.5]
        ]);
        let parsed = parse_boolean(&input).unwrap();
        assert_eq!(parsed.node.node_type(), NodeTypeId::Or);
        assert_eq!(encode_boolean(&parsed.node), input);
    }
}
