//! The compiler: registry, context and caches under one owner
//!
//! Caches are only valid for one registry generation. Every registration
//! (direct or through a plugin) and every theme change bumps
//! [`Compiler::registry_version`] and clears all three caches, so a stale
//! parse or AST can never outlive the rules that produced it.

use serde_json::Value;

use super::{
    ast::AstNode,
    cache::CacheSet,
    config::CompilerConfig,
    error::CompileError,
    generator::generate_ast,
    parser::{ClassParser, ParseResult},
    plugin::{Plugin, PluginInfo},
    registry::{Context, ModifierRule, Registry, UtilityRule},
    serialize::{to_css, CssOutput, SerializeOptions},
};

/// Class-name compiler
///
/// # Example
///
/// ```
/// use classjit::jit::{AstNode, Compiler, Modifier, Utility};
///
/// let mut compiler = Compiler::new();
/// compiler.register_utility(Utility::new("text", |u, _| {
///     Ok(vec![AstNode::decl("color", u.resolved_value())])
/// }));
/// compiler.register_modifier(Modifier::selector("hover", "&:hover"));
///
/// let ast = compiler.generate("hover:text-red").unwrap();
/// let css = compiler.serialize(&ast, "hover:text-red");
/// assert_eq!(css.css, ".hover\\:text-red:hover {\n  color: red;\n}\n");
/// ```
#[derive(Debug)]
pub struct Compiler {
    registry: Registry,
    context: Context,
    caches: CacheSet,
    config: CompilerConfig,
    registry_version: u64,
    plugins: Vec<PluginInfo>,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::with_config(CompilerConfig::default())
    }
}

impl Compiler {
    /// Create an empty compiler with the default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty compiler
    pub fn with_config(config: CompilerConfig) -> Self {
        Self {
            registry: Registry::new(),
            context: Context::default(),
            caches: CacheSet::from_config(&config),
            config,
            registry_version: 0,
            plugins: Vec::new(),
        }
    }

    /// Replace the theme (builder form)
    pub fn with_theme(mut self, theme: Value) -> Self {
        self.set_theme(theme);
        self
    }

    /// Replace the theme; invalidates every cache
    pub fn set_theme(&mut self, theme: Value) {
        self.context = Context::new(theme);
        self.invalidate();
    }

    /// Register a utility; invalidates every cache
    pub fn register_utility(&mut self, rule: impl UtilityRule + 'static) {
        self.registry.add_utility(rule);
        self.invalidate();
    }

    /// Register a modifier; invalidates every cache
    pub fn register_modifier(&mut self, rule: impl ModifierRule + 'static) {
        self.registry.add_modifier(rule);
        self.invalidate();
    }

    /// Install a plugin; invalidates every cache
    pub fn use_plugin(&mut self, plugin: &dyn Plugin) {
        plugin.register(&mut self.registry);
        self.invalidate();
        self.plugins
            .push(PluginInfo::of(plugin, self.registry_version));
        log_debug!(
            "installed plugin {} {} (registry version {})",
            plugin.name(),
            plugin.version(),
            self.registry_version
        );
    }

    /// Parse a raw class string (memoized)
    pub fn parse(&mut self, raw: &str) -> ParseResult {
        ClassParser::new(&self.registry, &self.context, &mut self.caches).parse(raw)
    }

    /// Generate the AST for a class (memoized)
    ///
    /// An empty AST means the class produces no CSS. Only non-empty ASTs are
    /// cached, so a class rejected now is retried after a registry change.
    pub fn generate(&mut self, class: &str) -> Result<Vec<AstNode>, CompileError> {
        if let Some(hit) = self.caches.ast.get(class) {
            return Ok(hit.clone());
        }

        let parsed = self.parse(class);
        let mut ast = generate_ast(&self.registry, &self.context, &parsed)?;
        if !ast.is_empty() {
            ast.iter_mut().for_each(|node| node.set_source(class));
            self.caches.ast.insert(class.to_string(), ast.clone());
        }
        Ok(ast)
    }

    /// Serialize an AST generated for `class` using the configured style
    pub fn serialize(&self, ast: &[AstNode], class: &str) -> CssOutput {
        let options = SerializeOptions {
            minify: self.config.minify,
        };
        to_css(ast, class, &options)
    }

    /// Clear every cache without bumping the registry version
    pub fn clear_caches(&mut self) {
        self.caches.clear_all();
    }

    /// The registry
    #[inline]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The theme context
    #[inline]
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// The caches
    #[inline]
    pub fn caches(&self) -> &CacheSet {
        &self.caches
    }

    /// The config
    #[inline]
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Incremented on every registration or theme change
    #[inline]
    pub fn registry_version(&self) -> u64 {
        self.registry_version
    }

    /// Installed plugins, in installation order
    #[inline]
    pub fn plugins(&self) -> &[PluginInfo] {
        &self.plugins
    }

    fn invalidate(&mut self) {
        self.registry_version += 1;
        self.caches.clear_all();
        log_debug!(
            "registry version {}: caches cleared",
            self.registry_version
        );
    }
}
