//! Criteria parsing cache keyed by JSON text

use crate::criteria::ast::BooleanNode;
use crate::criteria::parser;
use crate::error::Result;
use ahash::AHashMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;

/// Cached trees plus a generation bumped on every clear
struct CacheState {
    generation: u64,
    entries: AHashMap<String, BooleanNode>,
}

/// Global criteria cache with fast hashing (ahash)
static CRITERIA_CACHE: Lazy<RwLock<CacheState>> = Lazy::new(|| {
    RwLock::new(CacheState {
        generation: 0,
        entries: AHashMap::with_capacity(crate::engine_config().cache_capacity),
    })
});

/// Get or parse criteria text, using the cache for repeated criteria.
///
/// Decoding uses the engine configuration's options. Failures are not cached.
/// A decode that overlaps a config change is returned but not cached.
#[inline]
pub fn get_or_parse(text: &str) -> Result<BooleanNode> {
    // Fast path: check read lock first
    let generation = {
        let cache = CRITERIA_CACHE.read();
        if let Some(node) = cache.entries.get(text) {
            tracing::trace!(len = text.len(), "criteria cache hit");
            return Ok(node.clone());
        }
        cache.generation
    };

    // Generation is read before the options, so a config installed from here
    // on bumps it and the insert below is dropped
    tracing::trace!(len = text.len(), "criteria cache miss");
    let options = crate::engine_config().parse_options();
    let node = parser::parse_criteria_text_with(text, &options)?;

    if !insert_if_current(text, &node, generation) {
        tracing::debug!(len = text.len(), "config changed during decode, not caching");
    }

    Ok(node)
}

/// Current cache generation
#[cfg(test)]
pub(crate) fn generation() -> u64 {
    CRITERIA_CACHE.read().generation
}

/// Cache `node` unless the cache was cleared since `generation` was read
pub(crate) fn insert_if_current(text: &str, node: &BooleanNode, generation: u64) -> bool {
    let mut cache = CRITERIA_CACHE.write();
    if cache.generation != generation {
        return false;
    }
    cache.entries.insert(text.to_string(), node.clone());
    true
}

/// Whether `text` currently has a cached decode
pub fn is_cached(text: &str) -> bool {
    CRITERIA_CACHE.read().entries.contains_key(text)
}

/// Clear the criteria cache
pub fn clear_cache() {
    let mut cache = CRITERIA_CACHE.write();
    cache.entries.clear();
    cache.generation = cache.generation.wrapping_add(1);
}

/// Get cache statistics
pub fn cache_size() -> usize {
    let cache = CRITERIA_CACHE.read();
    cache.entries.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::ast::{NumericOperand, OperandPair};
    use crate::error::CriteriaError;
    use crate::field::FieldId;
    use crate::{init_config, EngineConfig, GLOBAL_STATE_LOCK};

    #[test]
    fn test_cache_hit() {
        let _guard = GLOBAL_STATE_LOCK.lock();
        let text = r#"["gt","openInterest",4321]"#;

        let first = get_or_parse(text).unwrap();
        assert!(is_cached(text));
        let size = cache_size();
        assert!(size >= 1);

        let second = get_or_parse(text).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first,
            BooleanNode::GreaterThan(OperandPair::new(
                NumericOperand::field(FieldId::OpenInterest),
                4321.0
            ))
        );
    }

    #[test]
    fn test_failures_not_cached() {
        let _guard = GLOBAL_STATE_LOCK.lock();
        let text = r#"["price","Dividend"]"#;
        let err = get_or_parse(text).unwrap_err();
        assert!(matches!(err, CriteriaError::Decode(_)));
        assert!(!is_cached(text));

        let malformed = r#"["and", "#;
        let err = get_or_parse(malformed).unwrap_err();
        assert!(matches!(err, CriteriaError::Json(_)));
        assert!(!is_cached(malformed));
    }

    #[test]
    fn test_whitespace_variants_cached_separately() {
        let _guard = GLOBAL_STATE_LOCK.lock();
        let compact = r#"["lotSize",{"Min":100}]"#;
        let spaced = r#"[ "lotSize", { "Min": 100 } ]"#;
        assert_eq!(get_or_parse(compact).unwrap(), get_or_parse(spaced).unwrap());
        assert!(is_cached(compact));
        assert!(is_cached(spaced));
    }

    #[test]
    fn test_decode_under_old_config_not_cached() {
        let _guard = GLOBAL_STATE_LOCK.lock();
        init_config(EngineConfig::default()).unwrap();
        let text = r#"["isIndex"]"#;

        // A decode that started before the config change
        let started = generation();
        let stale = parser::parse_criteria_text_with(text, &crate::engine_config().parse_options())
            .unwrap();

        init_config(EngineConfig {
            boolean_field_default: false,
            ..EngineConfig::default()
        })
        .unwrap();

        assert!(!insert_if_current(text, &stale, started));
        assert!(!is_cached(text));
        assert_eq!(
            get_or_parse(text).unwrap(),
            BooleanNode::BooleanFieldEquals {
                field: FieldId::IsIndex,
                target: false
            }
        );
        assert!(is_cached(text));

        init_config(EngineConfig::default()).unwrap();
    }

    #[test]
    fn test_clear_bumps_generation() {
        let _guard = GLOBAL_STATE_LOCK.lock();
        let before = generation();
        clear_cache();
        assert_ne!(generation(), before);
        assert_eq!(cache_size(), 0);
    }
}
