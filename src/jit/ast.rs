//! CSS AST and declaration paths
//!
//! Trees are plain owned values: no arena, no back-references. A generated AST
//! for one class is a `Vec<AstNode>` forest whose selectors still carry the `&`
//! anchor; the serializer substitutes the class selector at output time.

use serde::{Deserialize, Serialize};

/// A CSS AST node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AstNode {
    /// `prop: value`
    Declaration {
        /// Property name
        prop: String,
        /// Property value
        value: String,
    },
    /// A normal rule whose selector may contain `&`
    Rule {
        /// Selector template
        selector: String,
        /// Children
        nodes: Vec<AstNode>,
        /// Where the rule came from (class string), if known
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source: Option<String>,
    },
    /// `@name params { ... }`
    AtRule {
        /// At-rule name without the `@`
        name: String,
        /// Prelude
        params: String,
        /// Children
        nodes: Vec<AstNode>,
        /// Where the at-rule came from (class string), if known
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source: Option<String>,
    },
    /// An arbitrary, non-normalized selector that is never merged into a
    /// compound selector (e.g. `&>*` from a `[&>*]` modifier)
    StyleRule {
        /// Literal selector
        selector: String,
        /// Children
        nodes: Vec<AstNode>,
    },
}

impl AstNode {
    /// Create a declaration
    pub fn decl(prop: impl Into<String>, value: impl Into<String>) -> Self {
        AstNode::Declaration {
            prop: prop.into(),
            value: value.into(),
        }
    }

    /// Create a rule
    pub fn rule(selector: impl Into<String>, nodes: Vec<AstNode>) -> Self {
        AstNode::Rule {
            selector: selector.into(),
            nodes,
            source: None,
        }
    }

    /// Create an at-rule
    pub fn at_rule(name: impl Into<String>, params: impl Into<String>, nodes: Vec<AstNode>) -> Self {
        AstNode::AtRule {
            name: name.into(),
            params: params.into(),
            nodes,
            source: None,
        }
    }

    /// Create a style rule
    pub fn style_rule(selector: impl Into<String>, nodes: Vec<AstNode>) -> Self {
        AstNode::StyleRule {
            selector: selector.into(),
            nodes,
        }
    }

    /// Check whether this is a declaration
    #[inline]
    pub fn is_declaration(&self) -> bool {
        matches!(self, AstNode::Declaration { .. })
    }

    /// Children of a container node (empty for declarations)
    pub fn children(&self) -> &[AstNode] {
        match self {
            AstNode::Declaration { .. } => &[],
            AstNode::Rule { nodes, .. }
            | AstNode::AtRule { nodes, .. }
            | AstNode::StyleRule { nodes, .. } => nodes,
        }
    }

    /// Mutable children of a container node (`None` for declarations)
    pub fn children_mut(&mut self) -> Option<&mut Vec<AstNode>> {
        match self {
            AstNode::Declaration { .. } => None,
            AstNode::Rule { nodes, .. }
            | AstNode::AtRule { nodes, .. }
            | AstNode::StyleRule { nodes, .. } => Some(nodes),
        }
    }

    /// Whether two container nodes open the same scope
    ///
    /// Same variant, same `name`+`params` for at-rules, same `selector` for
    /// rules and style rules. `source` is ignored. Declarations never share a
    /// scope.
    pub fn same_scope(&self, other: &AstNode) -> bool {
        match (self, other) {
            (AstNode::Rule { selector: a, .. }, AstNode::Rule { selector: b, .. }) => a == b,
            (AstNode::StyleRule { selector: a, .. }, AstNode::StyleRule { selector: b, .. }) => {
                a == b
            }
            (
                AstNode::AtRule {
                    name: an,
                    params: ap,
                    ..
                },
                AstNode::AtRule {
                    name: bn,
                    params: bp,
                    ..
                },
            ) => an == bn && ap == bp,
            _ => false,
        }
    }

    /// Nesting depth: 0 for a declaration, 1 + deepest child otherwise
    pub fn depth(&self) -> usize {
        match self {
            AstNode::Declaration { .. } => 0,
            _ => 1 + self.children().iter().map(AstNode::depth).max().unwrap_or(0),
        }
    }

    /// Attach a source class string to this node and all nested rules
    pub fn set_source(&mut self, class: &str) {
        match self {
            AstNode::Rule { source, nodes, .. } | AstNode::AtRule { source, nodes, .. } => {
                *source = Some(class.to_string());
                nodes.iter_mut().for_each(|n| n.set_source(class));
            }
            AstNode::StyleRule { nodes, .. } => nodes.iter_mut().for_each(|n| n.set_source(class)),
            AstNode::Declaration { .. } => {}
        }
    }
}

/// One element of a declaration path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PathSegment {
    /// A rule fragment carrying a selector template with `&`
    Rule {
        /// Selector template
        selector: String,
    },
    /// A media/supports/container fragment
    AtRule {
        /// At-rule name without the `@`
        name: String,
        /// Prelude
        params: String,
    },
    /// An arbitrary selector fragment kept as its own nesting level
    StyleRule {
        /// Literal selector
        selector: String,
    },
    /// A terminal declaration
    Decl {
        /// Property name
        prop: String,
        /// Property value
        value: String,
    },
}

impl PathSegment {
    /// Rule segment
    pub fn rule(selector: impl Into<String>) -> Self {
        PathSegment::Rule {
            selector: selector.into(),
        }
    }

    /// At-rule segment
    pub fn at_rule(name: impl Into<String>, params: impl Into<String>) -> Self {
        PathSegment::AtRule {
            name: name.into(),
            params: params.into(),
        }
    }

    /// Style-rule segment
    pub fn style_rule(selector: impl Into<String>) -> Self {
        PathSegment::StyleRule {
            selector: selector.into(),
        }
    }

    /// Declaration segment
    pub fn decl(prop: impl Into<String>, value: impl Into<String>) -> Self {
        PathSegment::Decl {
            prop: prop.into(),
            value: value.into(),
        }
    }

    /// Whether this segment opens a scope (everything but `Decl`)
    #[inline]
    pub fn is_scope(&self) -> bool {
        !matches!(self, PathSegment::Decl { .. })
    }
}

/// The scope chain plus terminal declarations for one utility under its
/// active modifier stack
pub type DeclPath = Vec<PathSegment>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_scope() {
        let a = AstNode::at_rule("media", "(min-width: 640px)", vec![]);
        let b = AstNode::at_rule("media", "(min-width: 640px)", vec![AstNode::decl("a", "b")]);
        let c = AstNode::at_rule("media", "(min-width: 768px)", vec![]);
        assert!(a.same_scope(&b));
        assert!(!a.same_scope(&c));

        let r = AstNode::rule("&:hover", vec![]);
        let s = AstNode::style_rule("&:hover", vec![]);
        assert!(!r.same_scope(&s));
        assert!(!AstNode::decl("a", "b").same_scope(&AstNode::decl("a", "b")));
    }

    #[test]
    fn test_depth() {
        let tree = AstNode::at_rule(
            "media",
            "x",
            vec![AstNode::rule("&", vec![AstNode::decl("color", "red")])],
        );
        assert_eq!(tree.depth(), 2);
        assert_eq!(AstNode::decl("a", "b").depth(), 0);
    }

    #[test]
    fn test_serde_shape() {
        let node = AstNode::rule("&", vec![AstNode::decl("color", "red")]);
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "rule");
        assert_eq!(json["nodes"][0]["type"], "declaration");
        assert!(json.get("source").is_none());
    }

    #[test]
    fn test_set_source() {
        let mut node = AstNode::at_rule("media", "x", vec![AstNode::rule("&", vec![])]);
        node.set_source("sm:p-4");
        match &node {
            AstNode::AtRule { source, nodes, .. } => {
                assert_eq!(source.as_deref(), Some("sm:p-4"));
                assert!(matches!(&nodes[0], AstNode::Rule { source: Some(s), .. } if s == "sm:p-4"));
            }
            _ => unreachable!(),
        }
    }
}
