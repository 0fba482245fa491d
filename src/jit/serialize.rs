//! CSS serialization
//!
//! Flattens a generated AST into plain CSS text for one class:
//!
//! - `&` is replaced by the escaped class selector through the selector
//!   algebra ([`selector::resolve`]); style rules keep their literal text
//!   ([`selector::resolve_verbatim`])
//! - rules nested in rules become sibling rules with composed selectors
//! - at-rules nested in rules are hoisted, wrapping the rule's selector
//! - declarations directly under an at-rule use the enclosing selector
//!
//! Global nodes (rules without `&`, and `@keyframes` / `@property` /
//! `@font-face`) do not belong to the class and are reported separately.

use serde::{Deserialize, Serialize};

use super::{ast::AstNode, selector};

/// At-rules whose bodies are never scoped to the class
const GLOBAL_AT_RULES: &[&str] = &["keyframes", "property", "font-face"];

/// Output style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializeOptions {
    /// No whitespace, no trailing semicolons
    pub minify: bool,
}

impl SerializeOptions {
    /// Pretty-printed output
    pub fn pretty() -> Self {
        Self { minify: false }
    }

    /// Minified output
    pub fn minified() -> Self {
        Self { minify: true }
    }
}

/// Serialized CSS for one class
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CssOutput {
    /// All class-scoped CSS
    pub css: String,
    /// One entry per class-scoped top-level node
    pub css_list: Vec<String>,
    /// Global CSS, if any
    pub root_css: Option<String>,
    /// One entry per global top-level node, if any
    pub root_css_list: Option<Vec<String>>,
}

impl CssOutput {
    /// Check whether nothing was produced
    pub fn is_empty(&self) -> bool {
        self.css_list.is_empty() && self.root_css_list.is_none()
    }
}

/// Escape a class name for use in a selector, like `CSS.escape`
///
/// ```
/// use classjit::jit::escape_class_name;
///
/// assert_eq!(escape_class_name("hover:bg-red"), r"hover\:bg-red");
/// assert_eq!(escape_class_name("w-1/2"), r"w-1\/2");
/// assert_eq!(escape_class_name("2xl"), r"\32 xl");
/// ```
pub fn escape_class_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 8);
    let first_is_dash = name.starts_with('-');
    let single_dash = name == "-";

    for (i, c) in name.chars().enumerate() {
        match c {
            '\0' => out.push('\u{FFFD}'),
            '\u{1}'..='\u{1f}' | '\u{7f}' => push_hex_escape(&mut out, c),
            '0'..='9' if i == 0 || (i == 1 && first_is_dash) => push_hex_escape(&mut out, c),
            '-' if single_dash => out.push_str("\\-"),
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() => out.push(c),
            c => {
                out.push('\\');
                out.push(c);
            }
        }
    }
    out
}

fn push_hex_escape(out: &mut String, c: char) {
    out.push_str(&format!("\\{:x} ", c as u32));
}

/// Selector for a class name (`.` plus the escaped name)
pub fn class_selector(name: &str) -> String {
    format!(".{}", escape_class_name(name))
}

/// Is this top-level node independent of the class?
pub fn is_global(node: &AstNode) -> bool {
    match node {
        AstNode::Rule { selector, .. } => !selector::contains_anchor(selector),
        AstNode::AtRule { name, .. } => GLOBAL_AT_RULES.contains(&name.as_str()),
        AstNode::StyleRule { .. } | AstNode::Declaration { .. } => false,
    }
}

/// Serialize an AST generated for `class`
pub fn to_css(ast: &[AstNode], class: &str, options: &SerializeOptions) -> CssOutput {
    let anchor = class_selector(class);
    let mut css_list = Vec::new();
    let mut root_list = Vec::new();

    for node in ast {
        let (parent, list) = if is_global(node) {
            (None, &mut root_list)
        } else {
            (Some(anchor.as_str()), &mut css_list)
        };
        let text = serialize_node(node, parent, options);
        if !text.is_empty() {
            list.push(text);
        }
    }

    let sep = if options.minify { "" } else { "\n" };
    let root_css = (!root_list.is_empty()).then(|| root_list.join(sep));
    CssOutput {
        css: css_list.join(sep),
        css_list,
        root_css,
        root_css_list: (!root_list.is_empty()).then_some(root_list),
    }
}

/// Serialize one node against an already-resolved parent selector
///
/// `parent: None` keeps rule selectors as written.
pub fn serialize_node(node: &AstNode, parent: Option<&str>, options: &SerializeOptions) -> String {
    let mut blocks = Vec::new();
    match node {
        AstNode::Declaration { prop, value } => {
            if let Some(parent) = parent {
                blocks.push(Block::Style {
                    selector: parent.to_string(),
                    decls: vec![(prop.clone(), value.clone())],
                });
            }
        }
        _ => flatten(node, parent, &mut blocks),
    }

    let mut out = String::new();
    let mut writer = Writer {
        out: &mut out,
        minify: options.minify,
    };
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 && !options.minify {
            writer.out.push('\n');
        }
        writer.block(block, 0);
    }
    out
}

// ============================================================================
// Flattening
// ============================================================================

enum Block {
    Style {
        selector: String,
        decls: Vec<(String, String)>,
    },
    At {
        name: String,
        params: String,
        decls: Vec<(String, String)>,
        blocks: Vec<Block>,
    },
}

fn direct_decls(nodes: &[AstNode]) -> Vec<(String, String)> {
    nodes
        .iter()
        .filter_map(|n| match n {
            AstNode::Declaration { prop, value } => Some((prop.clone(), value.clone())),
            _ => None,
        })
        .collect()
}

fn flatten(node: &AstNode, parent: Option<&str>, out: &mut Vec<Block>) {
    match node {
        AstNode::Declaration { .. } => {}
        AstNode::Rule {
            selector: template,
            nodes,
            ..
        } => {
            let resolved = match parent {
                Some(p) => selector::resolve(p, template),
                None => template.clone(),
            };
            scoped(resolved, nodes, out);
        }
        AstNode::StyleRule {
            selector: template,
            nodes,
        } => {
            let resolved = match parent {
                Some(p) => selector::resolve_verbatim(p, template),
                None => template.clone(),
            };
            scoped(resolved, nodes, out);
        }
        AstNode::AtRule {
            name, params, nodes, ..
        } => {
            if GLOBAL_AT_RULES.contains(&name.as_str()) {
                // Bodies are literal: keyframe selectors, descriptors
                let mut inner = Vec::new();
                for child in nodes.iter().filter(|n| !n.is_declaration()) {
                    flatten(child, None, &mut inner);
                }
                out.push(Block::At {
                    name: name.clone(),
                    params: params.clone(),
                    decls: direct_decls(nodes),
                    blocks: inner,
                });
                return;
            }

            let mut inner = Vec::new();
            let decls = direct_decls(nodes);
            if !decls.is_empty() {
                match parent {
                    Some(p) => inner.push(Block::Style {
                        selector: p.to_string(),
                        decls,
                    }),
                    None => {
                        out.push(Block::At {
                            name: name.clone(),
                            params: params.clone(),
                            decls,
                            blocks: Vec::new(),
                        });
                        return;
                    }
                }
            }
            for child in nodes.iter().filter(|n| !n.is_declaration()) {
                flatten(child, parent, &mut inner);
            }
            if !inner.is_empty() {
                out.push(Block::At {
                    name: name.clone(),
                    params: params.clone(),
                    decls: Vec::new(),
                    blocks: inner,
                });
            }
        }
    }
}

fn scoped(selector: String, nodes: &[AstNode], out: &mut Vec<Block>) {
    let decls = direct_decls(nodes);
    if !decls.is_empty() {
        out.push(Block::Style {
            selector: selector.clone(),
            decls,
        });
    }
    for child in nodes.iter().filter(|n| !n.is_declaration()) {
        flatten(child, Some(&selector), out);
    }
}

// ============================================================================
// Writing
// ============================================================================

struct Writer<'a> {
    out: &'a mut String,
    minify: bool,
}

impl Writer<'_> {
    fn block(&mut self, block: &Block, depth: usize) {
        match block {
            Block::Style { selector, decls } => {
                self.open(selector, depth);
                self.decls(decls, depth + 1);
                self.close(depth);
            }
            Block::At {
                name,
                params,
                decls,
                blocks,
            } => {
                let head = if params.is_empty() {
                    format!("@{}", name)
                } else {
                    format!("@{} {}", name, params)
                };
                self.open(&head, depth);
                self.decls(decls, depth + 1);
                for inner in blocks {
                    self.block(inner, depth + 1);
                }
                self.close(depth);
            }
        }
    }

    fn indent(&mut self, depth: usize) {
        if !self.minify {
            for _ in 0..depth {
                self.out.push_str("  ");
            }
        }
    }

    fn open(&mut self, head: &str, depth: usize) {
        self.indent(depth);
        self.out.push_str(head);
        self.out.push_str(if self.minify { "{" } else { " {\n" });
    }

    fn close(&mut self, depth: usize) {
        self.indent(depth);
        self.out.push_str(if self.minify { "}" } else { "}\n" });
    }

    fn decls(&mut self, decls: &[(String, String)], depth: usize) {
        for (i, (prop, value)) in decls.iter().enumerate() {
            if self.minify {
                if i > 0 {
                    self.out.push(';');
                }
                self.out.push_str(prop);
                self.out.push(':');
                self.out.push_str(value);
            } else {
                self.indent(depth);
                self.out.push_str(prop);
                self.out.push_str(": ");
                self.out.push_str(value);
                self.out.push_str(";\n");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pretty(ast: &[AstNode], class: &str) -> CssOutput {
        to_css(ast, class, &SerializeOptions::pretty())
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape_class_name("bg-red"), "bg-red");
        assert_eq!(escape_class_name("bg-[#f00]"), r"bg-\[\#f00\]");
        assert_eq!(escape_class_name("-mt-4"), "-mt-4");
        assert_eq!(escape_class_name("-4"), r"-\34 ");
        assert_eq!(escape_class_name("-"), r"\-");
        assert_eq!(escape_class_name("!p-4"), r"\!p-4");
    }

    #[test]
    fn test_simple_rule() {
        let ast = vec![AstNode::rule("&", vec![AstNode::decl("color", "red")])];
        let out = pretty(&ast, "text-red");
        assert_eq!(out.css, ".text-red {\n  color: red;\n}\n");
        assert_eq!(out.css_list.len(), 1);
        assert!(out.root_css.is_none());
        assert!(out.root_css_list.is_none());
    }

    #[test]
    fn test_minified() {
        let ast = vec![AstNode::rule(
            "&:hover",
            vec![AstNode::decl("color", "red"), AstNode::decl("margin", "0")],
        )];
        let out = to_css(&ast, "hover:x", &SerializeOptions::minified());
        assert_eq!(out.css, r".hover\:x:hover{color:red;margin:0}");
    }

    #[test]
    fn test_media_wraps_rule() {
        let ast = vec![AstNode::at_rule(
            "media",
            "(min-width: 640px)",
            vec![AstNode::rule("&:hover", vec![AstNode::decl("color", "red")])],
        )];
        let out = to_css(&ast, "a", &SerializeOptions::minified());
        assert_eq!(out.css, "@media (min-width: 640px){.a:hover{color:red}}");
    }

    #[test]
    fn test_pretty_nesting() {
        let ast = vec![AstNode::at_rule(
            "media",
            "(min-width: 640px)",
            vec![AstNode::rule("&", vec![AstNode::decl("color", "red")])],
        )];
        let out = pretty(&ast, "a");
        assert_eq!(
            out.css,
            "@media (min-width: 640px) {\n  .a {\n    color: red;\n  }\n}\n"
        );
    }

    #[test]
    fn test_hoisted_at_rule() {
        let ast = vec![AstNode::rule(
            "&:hover",
            vec![AstNode::at_rule(
                "supports",
                "(display: grid)",
                vec![AstNode::decl("display", "grid")],
            )],
        )];
        let out = to_css(&ast, "a", &SerializeOptions::minified());
        assert_eq!(out.css, "@supports (display: grid){.a:hover{display:grid}}");
    }

    #[test]
    fn test_compound_selector() {
        let ast = vec![AstNode::rule(
            ".group:hover &:focus",
            vec![AstNode::decl("color", "red")],
        )];
        let out = to_css(&ast, "b", &SerializeOptions::minified());
        assert_eq!(out.css, ".group:hover .b:focus{color:red}");
    }

    #[test]
    fn test_style_rule_verbatim() {
        let ast = vec![AstNode::style_rule("&>*", vec![AstNode::decl("margin", "0")])];
        let out = to_css(&ast, "c", &SerializeOptions::minified());
        assert_eq!(out.css, ".c>*{margin:0}");
    }

    #[test]
    fn test_nested_rules_flatten() {
        let ast = vec![AstNode::rule(
            "&:hover",
            vec![
                AstNode::decl("color", "red"),
                AstNode::rule("& span", vec![AstNode::decl("color", "blue")]),
            ],
        )];
        let out = to_css(&ast, "d", &SerializeOptions::minified());
        assert_eq!(out.css, ".d:hover{color:red}.d:hover span{color:blue}");
    }

    #[test]
    fn test_global_nodes() {
        let ast = vec![
            AstNode::at_rule(
                "keyframes",
                "spin",
                vec![AstNode::rule("to", vec![AstNode::decl("transform", "rotate(360deg)")])],
            ),
            AstNode::rule("&", vec![AstNode::decl("animation", "spin 1s linear infinite")]),
        ];
        let out = to_css(&ast, "animate-spin", &SerializeOptions::minified());
        assert_eq!(out.css, ".animate-spin{animation:spin 1s linear infinite}");
        assert_eq!(
            out.root_css.as_deref(),
            Some("@keyframes spin{to{transform:rotate(360deg)}}")
        );
        assert_eq!(out.root_css_list.map(|l| l.len()), Some(1));
    }

    #[test]
    fn test_global_rule() {
        let ast = vec![AstNode::rule("*", vec![AstNode::decl("--tw-ring", "0")])];
        let out = to_css(&ast, "ring", &SerializeOptions::minified());
        assert_eq!(out.css, "");
        assert!(out.css_list.is_empty());
        assert_eq!(out.root_css.as_deref(), Some("*{--tw-ring:0}"));
    }
}
