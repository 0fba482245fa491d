//! Prelude module for convenient imports
//!
//! ```
//! use classjit::prelude::*;
//! ```
//!
//! # Re-exported Items
//!
//! ## Compiling
//! - [`Compiler`] - Registry, context and caches
//! - [`CompilerConfig`] - Cache sizes, eviction, batching, output style
//! - [`IncrementalProcessor`] - Deduplicating, batching front end
//! - [`ProcessedClass`] - CSS and AST for one class
//!
//! ## Defining Rules
//! - [`Utility`], [`Modifier`] - Closure-backed rules
//! - [`UtilityRule`], [`ModifierRule`] - Rule traits
//! - [`Plugin`] - Bundles of rules
//! - [`BasicPreset`] - Reference catalogue
//! - [`Context`] - Theme passed to every rule
//!
//! ## Data
//! - [`AstNode`], [`PathSegment`], [`DeclPath`]
//! - [`ParseResult`], [`ParsedModifier`], [`ParsedUtility`]
//! - [`CompileError`]

pub use crate::jit::{
    AstNode, CompileError, Compiler, CompilerConfig, Context, DeclPath, EvictionPolicy,
    IncrementalProcessor, Modifier, ModifierRule, ParseResult, ParsedModifier, ParsedUtility,
    PathSegment, Plugin, ProcessedClass, Registry, Utility, UtilityRule,
};
pub use crate::preset::BasicPreset;
