//! Compiler configuration

use serde::{Deserialize, Serialize};

use super::{cache::EvictionPolicy, error::CompileError};

/// Default capacity of each cache
pub const DEFAULT_CACHE_SIZE: usize = 1000;

/// Default number of classes per processing batch
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Default debounce window for pending classes, in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 16;

/// Configuration options for the compiler and incremental processor
///
/// Use [`CompilerConfig::default()`] for sensible defaults, or customize
/// individual fields as needed.
///
/// # Example
///
/// ```rust
/// use classjit::jit::{CompilerConfig, EvictionPolicy};
///
/// let config = CompilerConfig::new()
///     .with_ast_cache_size(5000)
///     .with_eviction(EvictionPolicy::Lru)
///     .with_debounce_ms(32);
/// assert_eq!(config.batch_size, 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompilerConfig {
    /// Capacity of the parse-result cache
    pub parse_cache_size: usize,

    /// Capacity of the AST cache
    pub ast_cache_size: usize,

    /// Capacity of the utility-prefix cache
    pub utility_cache_size: usize,

    /// Eviction policy shared by all caches
    pub eviction: EvictionPolicy,

    /// Classes per batch in `process_classes`
    pub batch_size: usize,

    /// Debounce window for `add_to_pending`
    pub debounce_ms: u64,

    /// Emit minified CSS
    pub minify: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            parse_cache_size: DEFAULT_CACHE_SIZE,
            ast_cache_size: DEFAULT_CACHE_SIZE,
            utility_cache_size: DEFAULT_CACHE_SIZE,
            eviction: EvictionPolicy::Fifo,
            batch_size: DEFAULT_BATCH_SIZE,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            minify: false,
        }
    }
}

impl CompilerConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from JSON; missing fields take their defaults
    pub fn from_json(s: &str) -> Result<Self, CompileError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Serialize the config to JSON
    pub fn to_json(&self) -> Result<String, CompileError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Set the parse-result cache capacity
    pub fn with_parse_cache_size(mut self, size: usize) -> Self {
        self.parse_cache_size = size;
        self
    }

    /// Set the AST cache capacity
    pub fn with_ast_cache_size(mut self, size: usize) -> Self {
        self.ast_cache_size = size;
        self
    }

    /// Set the utility-prefix cache capacity
    pub fn with_utility_cache_size(mut self, size: usize) -> Self {
        self.utility_cache_size = size;
        self
    }

    /// Set the eviction policy
    pub fn with_eviction(mut self, eviction: EvictionPolicy) -> Self {
        self.eviction = eviction;
        self
    }

    /// Set the batch size (clamped to at least 1)
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Set the debounce window
    pub fn with_debounce_ms(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    /// Emit minified CSS
    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CompilerConfig::default();
        assert_eq!(config.ast_cache_size, DEFAULT_CACHE_SIZE);
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.debounce_ms, 16);
        assert_eq!(config.eviction, EvictionPolicy::Fifo);
        assert!(!config.minify);
    }

    #[test]
    fn test_from_json_partial() {
        let config = CompilerConfig::from_json(r#"{"batchSize": 10, "eviction": "lru"}"#).unwrap();
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.eviction, EvictionPolicy::Lru);
        assert_eq!(config.parse_cache_size, DEFAULT_CACHE_SIZE);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = CompilerConfig::new().with_minify(true).with_debounce_ms(5);
        let json = config.to_json().unwrap();
        assert_eq!(CompilerConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            CompilerConfig::from_json("{\"batchSize\": \"x\"}"),
            Err(CompileError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_batch_size_clamped() {
        assert_eq!(CompilerConfig::new().with_batch_size(0).batch_size, 1);
    }
}
