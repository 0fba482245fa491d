//! AST composition
//!
//! Two operations turn per-utility declaration paths into a compact forest:
//!
//! - [`decl_path_to_ast`] folds one flat path into a nested tree, merging
//!   adjacent anchor-bearing rule selectors into a single compound selector.
//! - [`merge_ast_tree_list`] merges many such trees, sharing every scope they
//!   have in common.
//!
//! ```text
//! [@media sm] [&:hover] color:red         @media sm {
//! [@media sm] [&:focus] background:#fff     &:hover { color: red }
//!                                   ==>     &:focus { background: #fff }
//!                                         }
//! ```

use super::{
    ast::{AstNode, PathSegment},
    selector,
};

enum Scope {
    Rule(String),
    AtRule(String, String),
    StyleRule(String),
}

impl Scope {
    fn wrap(self, nodes: Vec<AstNode>) -> AstNode {
        match self {
            Scope::Rule(selector) => AstNode::rule(selector, nodes),
            Scope::AtRule(name, params) => AstNode::at_rule(name, params, nodes),
            Scope::StyleRule(selector) => AstNode::style_rule(selector, nodes),
        }
    }
}

/// Fold a declaration path into a nested AST, innermost segment last
///
/// - Adjacent `Rule` segments whose templates both contain `&` are composed
///   into one selector (`.group:hover &` + `&:hover` -> `.group:hover &:hover`).
/// - `AtRule` and `StyleRule` segments always open their own nesting level.
/// - Declarations, wherever they appear, become siblings under the innermost
///   scope in encounter order.
/// - A path without scope segments gets an implicit `Rule { selector: "&" }`.
///
/// A path without declarations produces nothing.
pub fn decl_path_to_ast(path: &[PathSegment]) -> Vec<AstNode> {
    let mut scopes: Vec<Scope> = Vec::new();
    let mut decls: Vec<AstNode> = Vec::new();

    for segment in path {
        match segment {
            PathSegment::Rule { selector } => {
                if let Some(Scope::Rule(prev)) = scopes.last_mut() {
                    if let Some(merged) = selector::compose(prev, selector) {
                        *prev = merged;
                        continue;
                    }
                }
                scopes.push(Scope::Rule(selector.clone()));
            }
            PathSegment::AtRule { name, params } => {
                scopes.push(Scope::AtRule(name.clone(), params.clone()));
            }
            PathSegment::StyleRule { selector } => {
                scopes.push(Scope::StyleRule(selector.clone()));
            }
            PathSegment::Decl { prop, value } => {
                decls.push(AstNode::decl(prop.clone(), value.clone()));
            }
        }
    }

    if decls.is_empty() {
        return Vec::new();
    }
    if scopes.is_empty() {
        scopes.push(Scope::Rule("&".to_string()));
    }

    let mut nodes = decls;
    while let Some(scope) = scopes.pop() {
        nodes = vec![scope.wrap(nodes)];
    }
    nodes
}

/// Merge independently produced ASTs into one forest
///
/// Two container nodes at the same depth merge when they open the same scope
/// (see [`AstNode::same_scope`]); their children are merged recursively and
/// declarations are concatenated. Anything else becomes a sibling. Input order
/// is preserved: a merged scope stays where it first appeared, new siblings are
/// appended.
pub fn merge_ast_tree_list(trees: &[Vec<AstNode>]) -> Vec<AstNode> {
    let mut forest = Vec::new();
    for tree in trees {
        for node in tree {
            merge_into(&mut forest, node.clone());
        }
    }
    forest
}

/// Merge one node into an existing forest
pub fn merge_into(forest: &mut Vec<AstNode>, node: AstNode) {
    if node.is_declaration() {
        forest.push(node);
        return;
    }

    match forest.iter_mut().find(|existing| existing.same_scope(&node)) {
        Some(existing) => {
            let children = into_children(node);
            if let Some(target) = existing.children_mut() {
                for child in children {
                    merge_into(target, child);
                }
            }
        }
        None => forest.push(node),
    }
}

fn into_children(node: AstNode) -> Vec<AstNode> {
    match node {
        AstNode::Declaration { .. } => Vec::new(),
        AstNode::Rule { nodes, .. }
        | AstNode::AtRule { nodes, .. }
        | AstNode::StyleRule { nodes, .. } => nodes,
    }
}
