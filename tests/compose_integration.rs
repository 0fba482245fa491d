//! Integration tests for AST composition, merging and serialization
//!
//! These tests cover:
//! - Folding declaration paths into nested ASTs
//! - Selector composition around the `&` anchor
//! - Merging many class ASTs into one forest
//! - Serializing merged and per-class ASTs

use classjit::jit::selector::{compose, resolve, Selector};
use classjit::jit::serialize::{serialize_node, to_css, SerializeOptions};
use classjit::prelude::*;
use classjit::{decl_path_to_ast, merge_ast_tree_list};

// ============================================================================
// decl_path_to_ast
// ============================================================================

#[test]
fn test_group_hover_chain_collapses() {
    let path = vec![
        PathSegment::rule("group:hover &"),
        PathSegment::rule("&:hover"),
        PathSegment::rule("&:focus"),
        PathSegment::decl("color", "red"),
    ];
    assert_eq!(
        decl_path_to_ast(&path),
        vec![AstNode::rule(
            "group:hover &:hover:focus",
            vec![AstNode::decl("color", "red")]
        )]
    );
}

#[test]
fn test_depth_matches_unmergeable_scopes() {
    let path = vec![
        PathSegment::at_rule("media", "(min-width: 640px)"),
        PathSegment::rule("&:hover"),
        PathSegment::style_rule("&>*"),
        PathSegment::at_rule("supports", "(display: grid)"),
        PathSegment::decl("display", "grid"),
    ];
    let ast = decl_path_to_ast(&path);
    assert_eq!(ast.len(), 1);
    assert_eq!(ast[0].depth(), 4);
}

#[test]
fn test_declarations_in_encounter_order() {
    let path = vec![
        PathSegment::decl("a", "1"),
        PathSegment::rule("&:hover"),
        PathSegment::decl("b", "2"),
        PathSegment::decl("c", "3"),
    ];
    let ast = decl_path_to_ast(&path);
    assert_eq!(
        ast[0].children(),
        [
            AstNode::decl("a", "1"),
            AstNode::decl("b", "2"),
            AstNode::decl("c", "3")
        ]
    );
}

// ============================================================================
// Selector algebra
// ============================================================================

#[test]
fn test_compose_lists() {
    assert_eq!(
        compose("&:hover, &:focus", "&::before").as_deref(),
        Some("&:hover::before, &:focus::before")
    );
}

#[test]
fn test_compose_requires_anchor_on_both_sides() {
    assert!(compose("span", "&:hover").is_none());
    assert!(compose("&:hover", "span").is_none());
}

#[test]
fn test_resolve_sibling_combinators() {
    assert_eq!(resolve(".a", "& ~ &"), ".a ~ .a");
    assert_eq!(resolve(".a", ".peer:checked ~ &"), ".peer:checked ~ .a");
}

#[test]
fn test_resolve_complex_parent_uses_is() {
    assert_eq!(resolve(".x .y", "li&"), "li:is(.x .y)");
}

#[test]
fn test_selector_display_round_trip() {
    let s = Selector::parse(".a  >  .b ~ .c").unwrap();
    assert_eq!(s.to_string(), ".a > .b ~ .c");
    assert_eq!(s.parts().len(), 3);
}

#[test]
fn test_invalid_selector() {
    assert!(matches!(
        Selector::parse("&[data-x"),
        Err(CompileError::InvalidSelector { .. })
    ));
}

// ============================================================================
// merge_ast_tree_list
// ============================================================================

fn media(children: Vec<AstNode>) -> AstNode {
    AstNode::at_rule("media", "(min-width:640px)", children)
}

#[test]
fn test_shared_media_becomes_one_block() {
    let a = vec![media(vec![AstNode::rule(
        "&:hover",
        vec![AstNode::decl("color", "#f00")],
    )])];
    let b = vec![media(vec![AstNode::rule(
        "&:focus",
        vec![AstNode::decl("background", "#fff")],
    )])];

    let merged = merge_ast_tree_list(&[a, b]);
    assert_eq!(
        merged,
        vec![media(vec![
            AstNode::rule("&:hover", vec![AstNode::decl("color", "#f00")]),
            AstNode::rule("&:focus", vec![AstNode::decl("background", "#fff")]),
        ])]
    );
}

#[test]
fn test_divergent_chains_stay_siblings() {
    let a = decl_path_to_ast(&[
        PathSegment::at_rule("media", "(min-width:640px)"),
        PathSegment::decl("color", "red"),
    ]);
    let b = decl_path_to_ast(&[
        PathSegment::at_rule("supports", "(display:grid)"),
        PathSegment::decl("display", "grid"),
    ]);
    let merged = merge_ast_tree_list(&[a, b]);
    assert_eq!(merged.len(), 2);
}

#[test]
fn test_merge_preserves_first_seen_declaration_order() {
    let trees: Vec<Vec<AstNode>> = ["a", "b", "c", "d"]
        .iter()
        .map(|p| decl_path_to_ast(&[PathSegment::decl(*p, "1")]))
        .collect();
    let merged = merge_ast_tree_list(&trees);
    let props: Vec<_> = merged[0]
        .children()
        .iter()
        .map(|n| match n {
            AstNode::Declaration { prop, .. } => prop.as_str(),
            _ => "",
        })
        .collect();
    assert_eq!(props, ["a", "b", "c", "d"]);
}

// ============================================================================
// Serialization
// ============================================================================

#[test]
fn test_merged_forest_serializes_once_per_scope() {
    let mut compiler = Compiler::new();
    compiler.use_plugin(&BasicPreset);

    let trees = vec![
        compiler.generate("sm:hover:text-red").unwrap(),
        compiler.generate("sm:focus:text-red").unwrap(),
    ];
    let merged = merge_ast_tree_list(&trees);
    assert_eq!(merged.len(), 1);

    let css = serialize_node(&merged[0], Some(".card"), &SerializeOptions::minified());
    assert_eq!(
        css,
        "@media (min-width: 640px){.card:hover{color:#ef4444}.card:focus{color:#ef4444}}"
    );
}

#[test]
fn test_css_list_per_top_level_node() {
    let ast = vec![
        AstNode::rule("&", vec![AstNode::decl("a", "1")]),
        AstNode::at_rule("media", "print", vec![AstNode::decl("b", "2")]),
    ];
    let out = to_css(&ast, "x", &SerializeOptions::minified());
    assert_eq!(out.css_list, [".x{a:1}", "@media print{.x{b:2}}"]);
    assert_eq!(out.css, ".x{a:1}@media print{.x{b:2}}");
}
