//! Integration tests for tokenizing and parsing class names
//!
//! These tests cover:
//! - Bracket/paren-aware tokenizing
//! - Modifier-first and utility-first parsing
//! - Arbitrary values, custom properties, negatives, opacity, important
//! - Parse-result memoization and invalidation

use classjit::jit::tokenize;
use classjit::prelude::*;

fn compiler() -> Compiler {
    let mut compiler = Compiler::new();
    compiler.use_plugin(&BasicPreset);
    compiler
}

// ============================================================================
// Tokenizer
// ============================================================================

#[test]
fn test_tokenize_preserves_bracketed_colon() {
    let tokens = tokenize("hover:bg-[color:var(--foo)]");
    let values: Vec<_> = tokens.iter().map(|t| t.value).collect();
    assert_eq!(values, ["hover", "bg-[color:var(--foo)]"]);
    assert_eq!(tokens[1].start, 6);
    assert_eq!(tokens[1].end, 27);
}

#[test]
fn test_tokenize_drops_empty_runs() {
    assert!(tokenize("").is_empty());
    assert!(tokenize(":::").is_empty());
    let values: Vec<_> = tokenize(":sm::p-4:").iter().map(|t| t.value).collect();
    assert_eq!(values, ["sm", "p-4"]);
}

#[test]
fn test_tokenize_unbalanced_terminates() {
    let tokens = tokenize("a[b:c");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].value, "a[b:c");
}

// ============================================================================
// Parser
// ============================================================================

#[test]
fn test_modifier_first_arbitrary() {
    let mut compiler = compiler();
    let result = compiler.parse("group-hover:sm:bg-[red]");

    assert_eq!(
        result.modifiers,
        vec![ParsedModifier::named("group-hover"), ParsedModifier::named("sm")]
    );
    let u = result.utility.unwrap();
    assert_eq!(u.prefix, "bg");
    assert_eq!(u.value, "red");
    assert!(u.arbitrary);
    assert!(!u.custom_property);
    assert!(!u.negative);
    assert_eq!(u.opacity, "");
    assert_eq!(u.category, "color");
}

#[test]
fn test_custom_property() {
    let mut compiler = compiler();
    let u = compiler.parse("bg-(--my-bg)").utility.unwrap();
    assert_eq!(u.prefix, "bg");
    assert_eq!(u.value, "--my-bg");
    assert!(u.custom_property);
    assert!(!u.arbitrary);
}

#[test]
fn test_custom_property_with_opacity() {
    let mut compiler = compiler();
    let u = compiler.parse("bg-(--my-bg)/40").utility.unwrap();
    assert_eq!(u.value, "--my-bg");
    assert_eq!(u.opacity, "40");
}

#[test]
fn test_utility_first_matches_modifier_first() {
    let mut compiler = compiler();
    let a = compiler.parse("hover:p-4");
    let b = compiler.parse("p-4:hover");
    assert_eq!(a, b);
}

#[test]
fn test_utility_first_keeps_modifier_order() {
    let mut compiler = compiler();
    let result = compiler.parse("p-4:hover:md");
    let kinds: Vec<_> = result.modifiers.iter().map(|m| m.kind.as_str()).collect();
    assert_eq!(kinds, ["hover", "md"]);
}

#[test]
fn test_longest_prefix_wins() {
    let mut compiler = compiler();
    assert_eq!(compiler.parse("px-2").utility.unwrap().prefix, "px");
    assert_eq!(compiler.parse("p-2").utility.unwrap().prefix, "p");
}

#[test]
fn test_negative_and_important() {
    let mut compiler = compiler();
    let u = compiler.parse("!-mt-[3px]").utility.unwrap();
    assert_eq!(u.prefix, "mt");
    assert_eq!(u.value, "3px");
    assert!(u.negative);
    assert!(u.arbitrary);
    assert!(u.important);
}

#[test]
fn test_negative_modifier() {
    let mut compiler = compiler();
    let result = compiler.parse("-hover:p-1");
    assert!(result.modifiers[0].negative);
    assert_eq!(result.modifiers[0].kind, "hover");
}

#[test]
fn test_arbitrary_modifier() {
    let mut compiler = compiler();
    let result = compiler.parse("[&>*]:p-1");
    assert!(result.modifiers[0].arbitrary);
    assert_eq!(result.modifiers[0].kind, "[&>*]");
}

#[test]
fn test_unknown_input_is_not_an_error() {
    let mut compiler = compiler();
    let u = compiler.parse("whatever-this-is").utility.unwrap();
    assert_eq!(u.prefix, "whatever");
    assert_eq!(u.value, "this-is");
    assert!(compiler.generate("whatever-this-is").unwrap().is_empty());
    assert!(compiler.parse("").utility.is_none());
}

#[test]
fn test_modifier_precedence_on_ties() {
    let mut compiler = Compiler::new();
    compiler.register_utility(Utility::new("peer", |u, _| {
        Ok(vec![AstNode::decl("x", u.value.clone())])
    }));
    compiler.register_modifier(Modifier::selector("peer-focus", ".peer:focus ~ &"));

    // `peer-focus` looks like a utility but a modifier claims it
    let result = compiler.parse("peer-focus:peer-1");
    assert_eq!(result.modifiers[0].kind, "peer-focus");
    assert_eq!(result.utility.unwrap().value, "1");
}

// ============================================================================
// Memoization
// ============================================================================

#[test]
fn test_second_parse_is_served_from_cache() {
    let mut compiler = compiler();
    let first = compiler.parse("sm:hover:bg-red");
    let misses = compiler.caches().parse.stats().misses;
    let second = compiler.parse("sm:hover:bg-red");

    assert_eq!(first, second);
    assert_eq!(compiler.caches().parse.stats().misses, misses);
    assert_eq!(compiler.caches().parse.stats().hits, 1);
}

#[test]
fn test_important_is_part_of_the_cache_key() {
    let mut compiler = compiler();
    assert!(!compiler.parse("p-1").utility.unwrap().important);
    assert!(compiler.parse("!p-1").utility.unwrap().important);
    assert_eq!(compiler.caches().parse.len(), 2);
}

#[test]
fn test_registration_invalidates_parse_cache() {
    let mut compiler = Compiler::new();
    compiler.register_modifier(Modifier::selector("hover", "&:hover"));

    // Nothing registered yet: the fallback split applies
    let before = compiler.parse("gap-x-2").utility.unwrap();
    assert_eq!(before.prefix, "gap");

    compiler.register_utility(Utility::new("gap-x", |u, _| {
        Ok(vec![AstNode::decl("column-gap", u.value.clone())])
    }));
    let after = compiler.parse("gap-x-2").utility.unwrap();
    assert_eq!(after.prefix, "gap-x");
    assert_eq!(after.value, "2");
}
