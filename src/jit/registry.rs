//! Utility and modifier registry
//!
//! The core never hard-codes a utility or a modifier. It depends only on the
//! lookup/dispatch interface defined here:
//!
//! - [`UtilityRule`] - matches a utility token and turns a parsed utility into
//!   declarations
//! - [`ModifierRule`] - matches a modifier name and wraps the active
//!   declaration path in a new scope
//!
//! [`Utility`] and [`Modifier`] are closure-backed implementations for the
//! common case; anything else can implement the traits directly.
//!
//! # Ordering
//!
//! Utilities are kept sorted by descending name length (stable for equal
//! lengths) so longest-prefix matching tries `pt` before `p`. Modifiers are
//! kept in registration order; the first matching modifier wins.
//!
//! # Example
//!
//! ```
//! use classjit::jit::{AstNode, Modifier, Registry, Utility};
//!
//! let mut registry = Registry::new();
//! registry.add_utility(Utility::new("p", |u, _| Ok(vec![AstNode::decl("padding", u.resolved_value())])));
//! registry.add_utility(Utility::new("pt", |u, _| Ok(vec![AstNode::decl("padding-top", u.resolved_value())])));
//! registry.add_modifier(Modifier::selector("hover", "&:hover"));
//!
//! assert_eq!(registry.utilities()[0].name(), "pt");
//! ```

use std::fmt;

use serde_json::Value;

use super::{
    ast::{AstNode, DeclPath, PathSegment},
    error::CompileError,
    parser::{ParsedModifier, ParsedUtility},
};

// ============================================================================
// Context
// ============================================================================

/// Theme/context object threaded unmodified through every handler and
/// modifier transform
///
/// The core never inspects it; rules may look values up with
/// [`Context::lookup`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    /// Arbitrary theme data
    pub theme: Value,
}

impl Context {
    /// Create a context around a theme value
    pub fn new(theme: Value) -> Self {
        Self { theme }
    }

    /// Look up a nested theme value by key path
    pub fn lookup(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(&self.theme, |v, key| v.get(*key))
    }

    /// Look up a nested theme string
    pub fn lookup_str(&self, path: &[&str]) -> Option<&str> {
        self.lookup(path).and_then(Value::as_str)
    }
}

// ============================================================================
// Rule Traits
// ============================================================================

/// A utility definition
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a registry can be moved to a
/// dedicated compiler thread.
pub trait UtilityRule: Send + Sync {
    /// Registered name (`bg`, `pt`, `underline`)
    fn name(&self) -> &str;

    /// Category copied into parse results
    fn category(&self) -> &str {
        ""
    }

    /// Priority copied into parse results
    fn priority(&self) -> i32 {
        0
    }

    /// Exact match against a whole utility token
    ///
    /// The default accepts the bare name and `name-...`.
    fn matches(&self, token: &str) -> bool {
        token
            .strip_prefix(self.name())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('-'))
    }

    /// Produce declarations for a parsed utility
    ///
    /// `Ok(vec![])` rejects the value; only [`AstNode::Declaration`] nodes are
    /// allowed in the output.
    fn handle(&self, utility: &ParsedUtility, ctx: &Context) -> Result<Vec<AstNode>, CompileError>;
}

/// A modifier (variant) definition
pub trait ModifierRule: Send + Sync {
    /// Registered name (`hover`, `sm`, `supports`)
    fn name(&self) -> &str;

    /// Exact match against a modifier name
    fn matches(&self, modifier: &str, _ctx: &Context) -> bool {
        modifier == self.name()
    }

    /// Wrap the active declaration path in a new scope
    ///
    /// Typically pushes one segment; may insert at the front to hoist. Returns
    /// `Ok(false)` when the modifier rejects its argument.
    fn transform(
        &self,
        modifier: &ParsedModifier,
        path: &mut DeclPath,
        ctx: &Context,
    ) -> Result<bool, CompileError>;
}

// ============================================================================
// Closure-Backed Rules
// ============================================================================

type HandleFn = dyn Fn(&ParsedUtility, &Context) -> Result<Vec<AstNode>, CompileError> + Send + Sync;
type TokenMatchFn = dyn Fn(&str) -> bool + Send + Sync;
type ModifierMatchFn = dyn Fn(&str, &Context) -> bool + Send + Sync;
type TransformFn =
    dyn Fn(&ParsedModifier, &mut DeclPath, &Context) -> Result<bool, CompileError> + Send + Sync;

/// A utility defined by a handler closure
pub struct Utility {
    name: String,
    category: String,
    priority: i32,
    matcher: Option<Box<TokenMatchFn>>,
    handler: Box<HandleFn>,
}

impl Utility {
    /// Create a utility
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&ParsedUtility, &Context) -> Result<Vec<AstNode>, CompileError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            category: String::new(),
            priority: 0,
            matcher: None,
            handler: Box::new(handler),
        }
    }

    /// A zero-value utility emitting fixed declarations (`underline`, `flex`)
    ///
    /// Values and negation (`-underline`) are rejected.
    pub fn fixed(name: impl Into<String>, decls: &[(&str, &str)]) -> Self {
        let decls: Vec<AstNode> = decls.iter().map(|(p, v)| AstNode::decl(*p, *v)).collect();
        Self::new(name, move |u, _| {
            if u.value.is_empty() && !u.negative {
                Ok(decls.clone())
            } else {
                Ok(Vec::new())
            }
        })
        .with_matcher_exact()
    }

    /// Set the category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Replace the default token matcher
    pub fn with_matcher<F>(mut self, matcher: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.matcher = Some(Box::new(matcher));
        self
    }

    fn with_matcher_exact(self) -> Self {
        let name = self.name.clone();
        self.with_matcher(move |token| token == name)
    }
}

impl UtilityRule for Utility {
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn matches(&self, token: &str) -> bool {
        match &self.matcher {
            Some(m) => m(token),
            None => token
                .strip_prefix(self.name.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('-')),
        }
    }

    fn handle(&self, utility: &ParsedUtility, ctx: &Context) -> Result<Vec<AstNode>, CompileError> {
        (self.handler)(utility, ctx)
    }
}

impl fmt::Debug for Utility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Utility")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

/// A modifier defined by a transform closure
pub struct Modifier {
    name: String,
    matcher: Option<Box<ModifierMatchFn>>,
    transform: Box<TransformFn>,
}

impl Modifier {
    /// Create a modifier
    pub fn new<F>(name: impl Into<String>, transform: F) -> Self
    where
        F: Fn(&ParsedModifier, &mut DeclPath, &Context) -> Result<bool, CompileError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            matcher: None,
            transform: Box::new(transform),
        }
    }

    /// A modifier wrapping the path in a rule with a fixed selector template
    ///
    /// A negated use (`-hover`) is rejected.
    pub fn selector(name: impl Into<String>, template: impl Into<String>) -> Self {
        let template = template.into();
        Self::new(name, move |m, path, _| {
            if m.negative {
                return Ok(false);
            }
            path.push(PathSegment::rule(template.clone()));
            Ok(true)
        })
    }

    /// A modifier wrapping the path in a fixed at-rule
    ///
    /// A negated use is rejected.
    pub fn at_rule(
        name: impl Into<String>,
        at_name: impl Into<String>,
        params: impl Into<String>,
    ) -> Self {
        let at_name = at_name.into();
        let params = params.into();
        Self::new(name, move |m, path, _| {
            if m.negative {
                return Ok(false);
            }
            path.push(PathSegment::at_rule(at_name.clone(), params.clone()));
            Ok(true)
        })
    }

    /// Replace the default name matcher
    pub fn with_matcher<F>(mut self, matcher: F) -> Self
    where
        F: Fn(&str, &Context) -> bool + Send + Sync + 'static,
    {
        self.matcher = Some(Box::new(matcher));
        self
    }
}

impl ModifierRule for Modifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn matches(&self, modifier: &str, ctx: &Context) -> bool {
        match &self.matcher {
            Some(m) => m(modifier, ctx),
            None => modifier == self.name,
        }
    }

    fn transform(
        &self,
        modifier: &ParsedModifier,
        path: &mut DeclPath,
        ctx: &Context,
    ) -> Result<bool, CompileError> {
        (self.transform)(modifier, path, ctx)
    }
}

impl fmt::Debug for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Modifier")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Ordered set of utility and modifier rules
#[derive(Default)]
pub struct Registry {
    utilities: Vec<Box<dyn UtilityRule>>,
    modifiers: Vec<Box<dyn ModifierRule>>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a utility, keeping descending name-length order
    pub fn add_utility(&mut self, rule: impl UtilityRule + 'static) {
        self.add_utility_boxed(Box::new(rule));
    }

    /// Register a boxed utility
    pub fn add_utility_boxed(&mut self, rule: Box<dyn UtilityRule>) {
        let len = rule.name().len();
        let at = self
            .utilities
            .iter()
            .position(|u| u.name().len() < len)
            .unwrap_or(self.utilities.len());
        self.utilities.insert(at, rule);
    }

    /// Register a modifier
    pub fn add_modifier(&mut self, rule: impl ModifierRule + 'static) {
        self.modifiers.push(Box::new(rule));
    }

    /// Register a boxed modifier
    pub fn add_modifier_boxed(&mut self, rule: Box<dyn ModifierRule>) {
        self.modifiers.push(rule);
    }

    /// Utilities, longest name first
    #[inline]
    pub fn utilities(&self) -> &[Box<dyn UtilityRule>] {
        &self.utilities
    }

    /// Modifiers in registration order
    #[inline]
    pub fn modifiers(&self) -> &[Box<dyn ModifierRule>] {
        &self.modifiers
    }

    /// Utility registered under exactly `name`
    pub fn find_utility(&self, name: &str) -> Option<&dyn UtilityRule> {
        self.utilities
            .iter()
            .find(|u| u.name() == name)
            .map(|u| u.as_ref())
    }

    /// Longest registered utility name `N` with `token == N` or
    /// `token.starts_with(N + "-")`
    ///
    /// Returns the rule and the remaining value (empty on an exact match).
    pub fn longest_utility<'t>(&self, token: &'t str) -> Option<(&dyn UtilityRule, &'t str)> {
        if let Some(rule) = self.find_utility(token) {
            return Some((rule, ""));
        }
        self.utilities.iter().find_map(|u| {
            token
                .strip_prefix(u.name())
                .and_then(|rest| rest.strip_prefix('-'))
                .map(|value| (u.as_ref(), value))
        })
    }

    /// First modifier whose exact matcher accepts `name`
    pub fn find_modifier(&self, name: &str, ctx: &Context) -> Option<&dyn ModifierRule> {
        self.modifier_candidates(name)
            .find(|m| m.matches(name, ctx))
    }

    /// Does some utility match `token` while no modifier does?
    ///
    /// Both sides are pre-filtered by a cheap name check before the exact
    /// matchers run. Modifiers win ties.
    pub fn is_utility_token(&self, token: &str, ctx: &Context) -> bool {
        let bare = token.strip_prefix('-').unwrap_or(token);

        let utility_hit = self
            .utility_candidates(bare)
            .any(|u| u.matches(bare));
        if !utility_hit {
            return false;
        }

        !self
            .modifier_candidates(token)
            .any(|m| m.matches(token, ctx))
    }

    /// Number of utilities plus modifiers
    pub fn len(&self) -> usize {
        self.utilities.len() + self.modifiers.len()
    }

    /// Check whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.utilities.is_empty() && self.modifiers.is_empty()
    }

    /// Remove every rule
    pub fn clear(&mut self) {
        self.utilities.clear();
        self.modifiers.clear();
    }

    fn utility_candidates<'a, 't>(
        &'a self,
        token: &'t str,
    ) -> impl Iterator<Item = &'a dyn UtilityRule> + 't
    where
        'a: 't,
    {
        self.utilities
            .iter()
            .filter(move |u| prefilter(token, u.name()))
            .map(|u| u.as_ref())
    }

    fn modifier_candidates<'a, 't>(
        &'a self,
        token: &'t str,
    ) -> impl Iterator<Item = &'a dyn ModifierRule> + 't
    where
        'a: 't,
    {
        let bare = token.strip_prefix('-').unwrap_or(token);
        self.modifiers
            .iter()
            .filter(move |m| prefilter(token, m.name()) || prefilter(bare, m.name()))
            .map(|m| m.as_ref())
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field(
                "utilities",
                &self.utilities.iter().map(|u| u.name()).collect::<Vec<_>>(),
            )
            .field(
                "modifiers",
                &self.modifiers.iter().map(|m| m.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Cheap name check run before a rule's exact matcher
#[inline]
fn prefilter(token: &str, name: &str) -> bool {
    token == name || token.starts_with(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padding(prop: &'static str) -> impl Fn(&ParsedUtility, &Context) -> Result<Vec<AstNode>, CompileError> {
        move |u, _| Ok(vec![AstNode::decl(prop, u.resolved_value())])
    }

    #[test]
    fn test_find_modifier_outlives_name() {
        let mut registry = Registry::new();
        registry.add_modifier(Modifier::selector("hover", "&:hover"));
        let ctx = Context::default();

        let found = {
            let name = String::from("hover");
            registry.find_modifier(&name, &ctx)
        };
        assert_eq!(found.map(|m| m.name()), Some("hover"));
    }

    #[test]
    fn test_utilities_sorted_longest_first() {
        let mut registry = Registry::new();
        registry.add_utility(Utility::new("p", padding("padding")));
        registry.add_utility(Utility::new("pt", padding("padding-top")));
        registry.add_utility(Utility::new("m", padding("margin")));

        let names: Vec<_> = registry.utilities().iter().map(|u| u.name()).collect();
        assert_eq!(names, ["pt", "p", "m"]);
    }

    #[test]
    fn test_longest_utility() {
        let mut registry = Registry::new();
        registry.add_utility(Utility::new("p", padding("padding")));
        registry.add_utility(Utility::new("pt", padding("padding-top")));
        registry.add_utility(Utility::fixed("underline", &[("text-decoration-line", "underline")]));

        let (rule, value) = registry.longest_utility("pt-4").unwrap();
        assert_eq!(rule.name(), "pt");
        assert_eq!(value, "4");

        let (rule, value) = registry.longest_utility("underline").unwrap();
        assert_eq!(rule.name(), "underline");
        assert_eq!(value, "");

        assert!(registry.longest_utility("ptx").is_none());
    }

    #[test]
    fn test_default_matcher() {
        let u = Utility::new("bg", padding("background"));
        assert!(u.matches("bg"));
        assert!(u.matches("bg-red"));
        assert!(u.matches("bg-[red]"));
        assert!(!u.matches("bgx"));
    }

    #[test]
    fn test_modifier_wins_ties() {
        let ctx = Context::default();
        let mut registry = Registry::new();
        registry.add_utility(Utility::new("group", padding("x")));
        registry.add_modifier(Modifier::selector("group-hover", ".group:hover &"));

        assert!(registry.is_utility_token("group-4", &ctx));
        assert!(!registry.is_utility_token("group-hover", &ctx));
        assert!(!registry.is_utility_token("hover", &ctx));
    }

    #[test]
    fn test_negative_utility_token() {
        let ctx = Context::default();
        let mut registry = Registry::new();
        registry.add_utility(Utility::new("m", padding("margin")));
        assert!(registry.is_utility_token("-m-4", &ctx));
    }

    #[test]
    fn test_custom_modifier_matcher() {
        let ctx = Context::default();
        let mut registry = Registry::new();
        registry.add_modifier(
            Modifier::new("supports", |_, _, _| Ok(true))
                .with_matcher(|name, _| name.starts_with("supports-[")),
        );

        assert!(registry.find_modifier("supports-[display:grid]", &ctx).is_some());
        assert!(registry.find_modifier("supports", &ctx).is_none());
    }

    #[test]
    fn test_context_lookup() {
        let ctx = Context::new(serde_json::json!({ "colors": { "red": "#f00" } }));
        assert_eq!(ctx.lookup_str(&["colors", "red"]), Some("#f00"));
        assert!(ctx.lookup(&["colors", "blue"]).is_none());
    }
}
