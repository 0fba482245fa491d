//! Registry-driven AST generation
//!
//! Turns one [`ParseResult`] into an AST:
//!
//! 1. the utility's handler produces declarations
//! 2. each modifier, in source order, wraps the declaration path in a scope
//!    (the first modifier ends up outermost)
//! 3. the path is folded with [`decl_path_to_ast`]
//!
//! An empty result means "no CSS for this class". Errors are reserved for
//! rules that break their contract.

use super::{
    ast::{AstNode, DeclPath, PathSegment},
    compose::decl_path_to_ast,
    error::CompileError,
    parser::ParseResult,
    registry::{Context, Registry},
};

/// Build the AST for a parse result
pub fn generate_ast(
    registry: &Registry,
    ctx: &Context,
    parsed: &ParseResult,
) -> Result<Vec<AstNode>, CompileError> {
    let Some(utility) = parsed.utility.as_ref() else {
        return Ok(Vec::new());
    };
    let Some(rule) = registry.find_utility(&utility.prefix) else {
        log_debug!("no utility registered for prefix '{}'", utility.prefix);
        return Ok(Vec::new());
    };

    let decls = rule.handle(utility, ctx)?;
    if decls.is_empty() {
        return Ok(Vec::new());
    }

    let mut path = DeclPath::with_capacity(parsed.modifiers.len() + decls.len());
    for modifier in &parsed.modifiers {
        let Some(m) = registry.find_modifier(&modifier.kind, ctx) else {
            log_debug!("unknown modifier '{}'", modifier.kind);
            return Ok(Vec::new());
        };
        if !m.transform(modifier, &mut path, ctx)? {
            return Ok(Vec::new());
        }
    }

    for decl in decls {
        match decl {
            AstNode::Declaration { prop, value } => {
                let value = if utility.important {
                    format!("{} !important", value)
                } else {
                    value
                };
                path.push(PathSegment::Decl { prop, value });
            }
            _ => {
                return Err(CompileError::invalid_rule(
                    rule.name(),
                    "handler returned a non-declaration node",
                ))
            }
        }
    }

    Ok(decl_path_to_ast(&path))
}
