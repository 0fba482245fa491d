//! Incremental class processing
//!
//! Sits between a stream of discovered class names (typically a DOM mutation
//! observer) and a stylesheet injector. Every class is compiled at most once
//! until [`IncrementalProcessor::clear_processed`] is called.
//!
//! # Class Lifecycle
//!
//! ```text
//!            add_to_pending                 flush (timer / poll / sync)
//!  unseen ─────────────────────▶ pending ─────────────────────────────┐
//!    │                                                                 │
//!    │ process_class / process_classes                                 ▼
//!    └──────────────────────────────────▶ compile ──── CSS ──▶ processed
//!                                            │
//!                                            └─ no CSS / error ──▶ unseen
//!                                               (retried on a later call)
//! ```
//!
//! A class that yields no CSS is *not* marked processed, so it succeeds once
//! the registry gains a matching utility.
//!
//! # Usage
//!
//! ```
//! use classjit::jit::{AstNode, Compiler, IncrementalProcessor, Utility};
//!
//! let mut compiler = Compiler::new();
//! compiler.register_utility(Utility::new("m", |u, _| {
//!     Ok(vec![AstNode::decl("margin", u.resolved_value())])
//! }));
//!
//! let mut processor = IncrementalProcessor::new(compiler);
//! let out = processor.process_classes(["m-[1px]", "m-[2px]", "m-[1px]"]);
//! assert_eq!(out.len(), 2);
//! assert!(processor.process_class("m-[1px]").is_none());
//! ```

use std::time::{Duration, Instant};

use ahash::AHashSet;
use serde::Serialize;

use super::{
    ast::AstNode,
    cache::CacheStats,
    compiler::Compiler,
    error::CompileError,
    scheduler::{DebounceScheduler, ImmediateScheduler, Schedule, Scheduler},
};

/// Output for one successfully compiled class
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedClass {
    /// The class string
    pub cls: String,
    /// Generated AST (selectors still carry `&`)
    pub ast: Vec<AstNode>,
    /// Serialized class-scoped CSS
    pub css: String,
    /// One CSS string per class-scoped top-level node
    pub css_list: Vec<String>,
    /// Global CSS, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_css: Option<String>,
    /// One CSS string per global top-level node, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_css_list: Option<Vec<String>>,
}

/// Cache statistics reported by [`IncrementalProcessor::get_stats`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProcessorCacheStats {
    /// AST cache
    pub ast: CacheStats,
    /// Parse-result cache
    pub parse: CacheStats,
    /// Utility-prefix cache
    pub utility: CacheStats,
}

/// Processor statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorStats {
    /// Classes marked processed
    pub processed_classes: usize,
    /// Classes waiting for a flush
    pub pending_classes: usize,
    /// Compile attempts that raised an error
    pub failed_classes: u64,
    /// Cache statistics
    pub cache_stats: ProcessorCacheStats,
}

/// Deduplicating, batching front end over a [`Compiler`]
#[derive(Debug)]
pub struct IncrementalProcessor<S: Scheduler = ImmediateScheduler> {
    compiler: Compiler,
    processed: AHashSet<String>,
    processed_order: Vec<String>,
    pending: Vec<String>,
    pending_set: AHashSet<String>,
    scheduler: S,
    failed: u64,
    last_error: Option<CompileError>,
}

impl IncrementalProcessor<ImmediateScheduler> {
    /// Create a processor that flushes pending classes synchronously
    pub fn new(compiler: Compiler) -> Self {
        Self::with_scheduler(compiler, ImmediateScheduler)
    }
}

impl IncrementalProcessor<DebounceScheduler> {
    /// Create a processor that debounces pending classes
    pub fn debounced(compiler: Compiler) -> Self {
        Self::with_scheduler(compiler, DebounceScheduler::new())
    }
}

impl<S: Scheduler> IncrementalProcessor<S> {
    /// Create a processor with an explicit scheduler
    pub fn with_scheduler(compiler: Compiler, scheduler: S) -> Self {
        Self {
            compiler,
            processed: AHashSet::new(),
            processed_order: Vec::new(),
            pending: Vec::new(),
            pending_set: AHashSet::new(),
            scheduler,
            failed: 0,
            last_error: None,
        }
    }

    /// Compile one class
    ///
    /// Returns `None` if the class was already processed or produced no CSS.
    /// Errors raised by registry rules are logged and counted, never
    /// propagated.
    pub fn process_class(&mut self, cls: &str) -> Option<ProcessedClass> {
        if self.processed.contains(cls) {
            return None;
        }

        let ast = match self.compiler.generate(cls) {
            Ok(ast) => ast,
            Err(err) => {
                log_warn!("failed to compile class '{}': {}", cls, err);
                self.failed += 1;
                self.last_error = Some(err);
                return None;
            }
        };
        if ast.is_empty() {
            if self.is_generation_failure(cls) {
                log_warn!("class '{}' matched a utility but produced no CSS", cls);
            } else {
                log_debug!("class '{}' is not a known utility", cls);
            }
            return None;
        }

        let out = self.compiler.serialize(&ast, cls);
        if out.is_empty() {
            log_warn!("class '{}' produced an AST but no CSS", cls);
            return None;
        }

        self.processed.insert(cls.to_string());
        self.processed_order.push(cls.to_string());
        Some(ProcessedClass {
            cls: cls.to_string(),
            ast,
            css: out.css,
            css_list: out.css_list,
            root_css: out.root_css,
            root_css_list: out.root_css_list,
        })
    }

    /// Did `cls` parse to a registered utility whose generation came back empty?
    ///
    /// Unknown prefixes (the permissive fallback) are not failures.
    fn is_generation_failure(&mut self, cls: &str) -> bool {
        let cached = self.compiler.caches().parse.peek(cls).cloned();
        let parsed = match cached {
            Some(parsed) => parsed,
            None => self.compiler.parse(cls),
        };
        parsed
            .utility
            .is_some_and(|u| self.compiler.registry().find_utility(&u.prefix).is_some())
    }

    /// Compile unseen classes in input order, in batches of the configured size
    ///
    /// Duplicates within `classes` are compiled once.
    pub fn process_classes<I, T>(&mut self, classes: I) -> Vec<ProcessedClass>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut seen = AHashSet::new();
        let unseen: Vec<String> = classes
            .into_iter()
            .filter_map(|c| {
                let c = c.as_ref();
                (!self.processed.contains(c) && seen.insert(c.to_string())).then(|| c.to_string())
            })
            .collect();

        let batch_size = self.compiler.config().batch_size.max(1);
        let mut results = Vec::with_capacity(unseen.len());
        for batch in unseen.chunks(batch_size) {
            log_debug!("processing batch of {} classes", batch.len());
            results.extend(batch.iter().filter_map(|cls| self.process_class(cls)));
        }
        results
    }

    /// Queue classes and (re)schedule a flush
    ///
    /// With a synchronous scheduler the flush happens here and its results are
    /// returned; otherwise the result is empty and the host drives the flush
    /// with [`poll`](Self::poll).
    pub fn add_to_pending<I, T>(&mut self, classes: I) -> Vec<ProcessedClass>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        for cls in classes {
            let cls = cls.as_ref();
            if !self.processed.contains(cls) && self.pending_set.insert(cls.to_string()) {
                self.pending.push(cls.to_string());
            }
        }
        if self.pending.is_empty() {
            return Vec::new();
        }

        let delay = Duration::from_millis(self.compiler.config().debounce_ms);
        match self.scheduler.schedule(delay) {
            Schedule::Now => self.flush_pending(),
            Schedule::Deferred => Vec::new(),
        }
    }

    /// Flush if the scheduled window has elapsed at `now`
    pub fn poll(&mut self, now: Instant) -> Vec<ProcessedClass> {
        if self.scheduler.is_due(now) {
            self.flush_pending()
        } else {
            Vec::new()
        }
    }

    /// Flush every pending class now
    pub fn flush_pending(&mut self) -> Vec<ProcessedClass> {
        self.scheduler.cancel();
        let pending = std::mem::take(&mut self.pending);
        self.pending_set.clear();
        log_debug!("flushing {} pending classes", pending.len());
        self.process_classes(pending)
    }

    /// Check whether a class has been processed
    #[inline]
    pub fn is_processed(&self, cls: &str) -> bool {
        self.processed.contains(cls)
    }

    /// Processed classes in processing order
    #[inline]
    pub fn get_processed_classes(&self) -> &[String] {
        &self.processed_order
    }

    /// Classes awaiting a flush, in arrival order
    #[inline]
    pub fn pending_classes(&self) -> &[String] {
        &self.pending
    }

    /// Forget processed and pending classes and cancel any scheduled flush
    pub fn clear_processed(&mut self) {
        self.scheduler.cancel();
        self.processed.clear();
        self.processed_order.clear();
        self.pending.clear();
        self.pending_set.clear();
    }

    /// Clear the compiler's caches
    pub fn clear_caches(&mut self) {
        self.compiler.clear_caches();
    }

    /// Number of compile errors so far
    #[inline]
    pub fn failed(&self) -> u64 {
        self.failed
    }

    /// The most recent compile error
    #[inline]
    pub fn last_error(&self) -> Option<&CompileError> {
        self.last_error.as_ref()
    }

    /// Counts plus cache statistics
    pub fn get_stats(&self) -> ProcessorStats {
        let caches = self.compiler.caches();
        ProcessorStats {
            processed_classes: self.processed.len(),
            pending_classes: self.pending.len(),
            failed_classes: self.failed,
            cache_stats: ProcessorCacheStats {
                ast: caches.ast.stats(),
                parse: caches.parse.stats(),
                utility: caches.utility.stats(),
            },
        }
    }

    /// The compiler
    #[inline]
    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    /// The compiler, for registering rules
    #[inline]
    pub fn compiler_mut(&mut self) -> &mut Compiler {
        &mut self.compiler
    }

    /// The scheduler
    #[inline]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }
}
