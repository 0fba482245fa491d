//! Bidirectional class-name parser
//!
//! Decomposes a raw class string into a chain of modifiers and at most one
//! utility. Both directions are accepted without an explicit marker:
//!
//! ```text
//! sm:hover:bg-red      modifier-first: all but the last token are modifiers
//! bg-red:hover:sm      utility-first:  the first token is a utility
//! ```
//!
//! The direction is decided by classifying the *first* token: it is a utility
//! iff some registered utility matches it and no modifier does. The
//! classification is memoized per token, and whole parse results are memoized
//! per raw string (including a leading `!`).
//!
//! # Utility Forms
//!
//! | Token | prefix | value | flags |
//! |---|---|---|---|
//! | `bg-[red]/50` | `bg` | `red` | arbitrary, opacity `50` |
//! | `bg-(--my-bg)` | `bg` | `--my-bg` | customProperty |
//! | `-mt-4` | `mt` | `4` | negative |
//! | `underline` | `underline` | `` | |
//! | `foo-bar` (unregistered) | `foo` | `bar` | |

use serde::{Deserialize, Serialize};

use super::{
    cache::CacheSet,
    registry::{Context, Registry},
    tokenizer::tokenize,
};

/// A parsed modifier (variant)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParsedModifier {
    /// Modifier name with any leading `-` stripped; a bracketed literal
    /// (`[&>*]`) when `arbitrary`
    #[serde(rename = "type")]
    pub kind: String,
    /// Leading `-` was present
    pub negative: bool,
    /// `kind` is a fully bracketed literal
    pub arbitrary: bool,
}

impl ParsedModifier {
    /// Create a plain modifier
    pub fn named(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Bracket interior of an arbitrary modifier (`[&>*]` -> `&>*`)
    pub fn literal(&self) -> Option<&str> {
        if self.arbitrary {
            self.kind.strip_prefix('[')?.strip_suffix(']')
        } else {
            None
        }
    }

    /// Bracketed argument after `name-` (`supports-[display:grid]` with
    /// `supports` -> `display:grid`)
    pub fn argument(&self, name: &str) -> Option<&str> {
        self.kind
            .strip_prefix(name)?
            .strip_prefix("-[")?
            .strip_suffix(']')
    }
}

/// A parsed utility
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedUtility {
    /// Utility name (`bg`, `pt`)
    pub prefix: String,
    /// Raw value (`red-500`, bracket interior, custom property name)
    pub value: String,
    /// Value came from `-[...]`
    pub arbitrary: bool,
    /// Value came from `-(...)`
    pub custom_property: bool,
    /// Leading `-` was present
    pub negative: bool,
    /// Text after `/` following the closing bracket; empty when absent
    pub opacity: String,
    /// Category copied from the registration
    pub category: String,
    /// Priority copied from the registration
    pub priority: i32,
    /// Class was prefixed with `!`
    pub important: bool,
}

impl ParsedUtility {
    /// The value as it should appear in CSS
    ///
    /// Custom properties become `var(--name)`; arbitrary values have `_`
    /// replaced by a space (`\_` keeps a literal underscore).
    pub fn resolved_value(&self) -> String {
        if self.custom_property {
            format!("var({})", self.value)
        } else if self.arbitrary {
            decode_underscores(&self.value)
        } else {
            self.value.clone()
        }
    }

    /// Check whether an opacity suffix was given
    #[inline]
    pub fn has_opacity(&self) -> bool {
        !self.opacity.is_empty()
    }
}

/// Modifiers plus at most one utility
///
/// `utility: None` means "no recognizable utility": a valid outcome, not an
/// error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParseResult {
    /// Modifiers in source order
    pub modifiers: Vec<ParsedModifier>,
    /// The utility, if any
    pub utility: Option<ParsedUtility>,
}

/// A parser view over a registry, a context and the caches
///
/// Borrowing rather than owning lets the [`Compiler`](super::compiler::Compiler)
/// hand out a parser without cloning its registry.
pub struct ClassParser<'a> {
    registry: &'a Registry,
    ctx: &'a Context,
    caches: &'a mut CacheSet,
}

impl<'a> ClassParser<'a> {
    /// Create a parser
    pub fn new(registry: &'a Registry, ctx: &'a Context, caches: &'a mut CacheSet) -> Self {
        Self {
            registry,
            ctx,
            caches,
        }
    }

    /// Parse a raw class string, serving repeated strings from the cache
    pub fn parse(&mut self, raw: &str) -> ParseResult {
        if let Some(hit) = self.caches.parse.get(raw) {
            return hit.clone();
        }

        let (important, body) = match raw.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };

        let tokens = tokenize(body);
        let mut result = match tokens.as_slice() {
            [] => ParseResult::default(),
            [only] => ParseResult {
                modifiers: Vec::new(),
                utility: self.parse_utility(only.value),
            },
            [first, rest @ ..] if self.is_utility_prefix(first.value) => ParseResult {
                modifiers: rest.iter().map(|t| parse_modifier(t.value)).collect(),
                utility: self.parse_utility(first.value),
            },
            [init @ .., last] => ParseResult {
                modifiers: init.iter().map(|t| parse_modifier(t.value)).collect(),
                utility: self.parse_utility(last.value),
            },
        };

        if important {
            if let Some(utility) = result.utility.as_mut() {
                utility.important = true;
            }
        }

        self.caches.parse.insert(raw.to_string(), result.clone());
        result
    }

    /// Is `token` a utility (and not a modifier)? Memoized per token.
    pub fn is_utility_prefix(&mut self, token: &str) -> bool {
        if let Some(&hit) = self.caches.utility.get(token) {
            return hit;
        }
        let is_utility = self.registry.is_utility_token(token, self.ctx);
        self.caches.utility.insert(token.to_string(), is_utility);
        is_utility
    }

    /// Parse a single utility token
    pub fn parse_utility(&self, token: &str) -> Option<ParsedUtility> {
        let (negative, bare) = match token.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, token),
        };
        if bare.is_empty() || bare.starts_with('[') || bare.starts_with('(') {
            return None;
        }

        if let Some(idx) = bare.find("-[") {
            let (value, opacity) = split_bracketed(&bare[idx + 1..], b'[', b']');
            return Some(self.with_registration(ParsedUtility {
                prefix: bare[..idx].to_string(),
                value: value.to_string(),
                arbitrary: true,
                negative,
                opacity: opacity.to_string(),
                ..ParsedUtility::default()
            }));
        }

        if let Some(idx) = bare.find("-(") {
            let (value, opacity) = split_bracketed(&bare[idx + 1..], b'(', b')');
            return Some(self.with_registration(ParsedUtility {
                prefix: bare[..idx].to_string(),
                value: value.to_string(),
                custom_property: true,
                negative,
                opacity: opacity.to_string(),
                ..ParsedUtility::default()
            }));
        }

        if let Some((rule, value)) = self.registry.longest_utility(bare) {
            return Some(ParsedUtility {
                prefix: rule.name().to_string(),
                value: value.to_string(),
                negative,
                category: rule.category().to_string(),
                priority: rule.priority(),
                ..ParsedUtility::default()
            });
        }

        // Unregistered: permissive split, rejected later by generation
        let (prefix, value) = bare.split_once('-').unwrap_or((bare, ""));
        Some(ParsedUtility {
            prefix: prefix.to_string(),
            value: value.to_string(),
            negative,
            ..ParsedUtility::default()
        })
    }

    fn with_registration(&self, mut utility: ParsedUtility) -> ParsedUtility {
        if let Some(rule) = self.registry.find_utility(&utility.prefix) {
            utility.category = rule.category().to_string();
            utility.priority = rule.priority();
        }
        utility
    }
}

/// Parse a single modifier token
pub fn parse_modifier(token: &str) -> ParsedModifier {
    let (negative, bare) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    let arbitrary = bare.len() >= 2 && bare.starts_with('[') && bare.ends_with(']');
    ParsedModifier {
        kind: bare.to_string(),
        negative,
        arbitrary,
    }
}

/// Split `[interior]/opacity` (or the paren form) starting at the opener
///
/// Without a matching closer the whole remainder after the opener is the
/// value.
fn split_bracketed(s: &str, open: u8, close: u8) -> (&str, &str) {
    let bytes = s.as_bytes();
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate() {
        if b == open {
            depth += 1;
        } else if b == close {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                let value = &s[1..i];
                let opacity = s[i + 1..].strip_prefix('/').unwrap_or("");
                return (value, opacity);
            }
        }
    }
    (&s[1..], "")
}

fn decode_underscores(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'_') => {
                out.push('_');
                chars.next();
            }
            '_' => out.push(' '),
            _ => out.push(c),
        }
    }
    out
}
