//! JIT core for classjit
//!
//! This module contains the class-name compiler: everything between a raw
//! class string observed at runtime and the CSS text emitted for it.
//!
//! # Module Organization
//!
//! ## Front End
//! - [`tokenizer`] - Bracket/paren-aware `:` splitting
//! - [`parser`] - Bidirectional modifier/utility parsing
//!
//! ## Registry
//! - [`registry`] - Utility and modifier rule traits, the ordered registry
//! - [`plugin`] - Plugins that populate a registry
//!
//! ## Back End
//! - [`ast`] - CSS AST nodes and declaration paths
//! - [`selector`] - Structured selector algebra around the `&` anchor
//! - [`compose`] - Declaration-path folding and AST tree merging
//! - [`generator`] - Registry-driven AST generation
//! - [`serialize`] - CSS text output
//!
//! ## Runtime
//! - [`compiler`] - Registry + caches + context, versioned
//! - [`processor`] - Incremental, deduplicating, batched processing
//! - [`scheduler`] - Debounce scheduling abstraction
//! - [`cache`] - Bounded caches with FIFO/LRU eviction

/// Logging macros - no-op when logging feature is disabled
#[cfg(not(feature = "logging"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

/// Logging macros - use log crate when logging feature is enabled
#[cfg(feature = "logging")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "logging"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "logging")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

// ============================================================================
// Module Declarations
// ============================================================================

pub mod ast;
pub mod cache;
pub mod compiler;
pub mod compose;
pub mod config;
pub mod error;
pub mod generator;
pub mod parser;
pub mod patterns;
pub mod plugin;
pub mod processor;
pub mod registry;
pub mod scheduler;
pub mod selector;
pub mod serialize;
pub mod tokenizer;

// ============================================================================
// Front End
// ============================================================================

pub use parser::{ClassParser, ParseResult, ParsedModifier, ParsedUtility};
pub use tokenizer::{tokenize, Token};

// ============================================================================
// Registry
// ============================================================================

pub use plugin::Plugin;
pub use registry::{Context, Modifier, ModifierRule, Registry, Utility, UtilityRule};

// ============================================================================
// Back End
// ============================================================================

pub use ast::{AstNode, DeclPath, PathSegment};
pub use compose::{decl_path_to_ast, merge_ast_tree_list};
pub use selector::{Combinator, Compound, Selector};
pub use serialize::{escape_class_name, CssOutput, SerializeOptions};

// ============================================================================
// Runtime
// ============================================================================

pub use cache::{BoundedCache, CacheSet, CacheStats, EvictionPolicy};
pub use compiler::Compiler;
pub use config::CompilerConfig;
pub use error::CompileError;
pub use processor::{IncrementalProcessor, ProcessedClass, ProcessorCacheStats, ProcessorStats};
pub use scheduler::{DebounceScheduler, ImmediateScheduler, Schedule, Scheduler};
