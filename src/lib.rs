//! classjit - Just-in-time CSS utility compiler
//!
//! Compiles free-form class names observed at runtime into CSS:
//! - Bracket/paren-aware tokenizer
//! - Bidirectional class-name parser (`sm:hover:bg-red` and `bg-red:hover:sm`)
//! - Trait-based utility/modifier registry, extensible through plugins
//! - Selector algebra around the `&` anchor, AST composition and merging
//! - CSS serializer with at-rule hoisting
//! - Incremental processor with deduplication, batching and debouncing
//! - Bounded FIFO/LRU caches invalidated on every registry change
//!
//! ## Quick Start
//!
//! ```rust
//! use classjit::prelude::*;
//!
//! let mut compiler = Compiler::new();
//! compiler.use_plugin(&BasicPreset);
//!
//! let mut processor = IncrementalProcessor::new(compiler);
//! let out = processor.process_class("hover:bg-[#0af]").unwrap();
//! assert_eq!(out.css, ".hover\\:bg-\\[\\#0af\\]:hover {\n  background-color: #0af;\n}\n");
//! ```
//!
//! ## Custom Rules
//!
//! ```rust
//! use classjit::prelude::*;
//!
//! let mut compiler = Compiler::new();
//! compiler.register_utility(Utility::new("gap", |u, _| {
//!     Ok(vec![AstNode::decl("gap", u.resolved_value())])
//! }));
//! compiler.register_modifier(Modifier::at_rule("print", "media", "print"));
//!
//! let parsed = compiler.parse("print:gap-[2px]");
//! assert_eq!(parsed.modifiers[0].kind, "print");
//! assert_eq!(parsed.utility.unwrap().value, "2px");
//! ```
//!
//! ## Feature Flags
//!
//! - `logging` - Enable debug logging using the `log` crate

// Lint configuration for production quality
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all)]
#![allow(clippy::new_without_default)]
#![allow(clippy::module_inception)]
#![allow(clippy::redundant_closure)]

// Prelude module for convenient imports
pub mod prelude;

// Compiler core
pub mod jit;

// Reference catalogue
pub mod preset;

/// Re-export commonly used types for convenience
pub use jit::{
    decl_path_to_ast, merge_ast_tree_list, tokenize, AstNode, ClassParser, CompileError, Compiler,
    CompilerConfig, DeclPath, IncrementalProcessor, ParseResult, ParsedModifier, ParsedUtility,
    PathSegment, Plugin, ProcessedClass, Registry, Token,
};
pub use preset::BasicPreset;
