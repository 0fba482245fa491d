//! Structured selector algebra around the `&` anchor
//!
//! Selector templates are parsed into a list of `(combinator, compound)` parts
//! rather than spliced as raw strings. Composition follows CSS nesting: in
//! `compose(outer, inner)` every `&` of `inner` stands for the whole of `outer`.
//!
//! ```text
//! outer: ".group:hover &"      parts: [.group:hover] ␣ [&]
//! inner: "&:hover"             parts: [&:hover]
//! result: ".group:hover &:hover"
//! ```
//!
//! When a compound *starts* with its only `&`, the outer selector is spliced in
//! structurally: the outer's leading parts are kept and the inner compound's
//! suffix (`:hover`, `[open]`, `.x`) attaches to the outer's last compound. Any
//! other placement (`div&`, `&.a&`, `:not(&)`) substitutes the outer selector
//! textually, wrapping it in `:is(...)` when it is complex. Selector lists are
//! composed as a cartesian product, outer-major.

use std::fmt;

use super::error::CompileError;

/// A combinator between two compounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Whitespace
    Descendant,
    /// `>`
    Child,
    /// `+`
    NextSibling,
    /// `~`
    SubsequentSibling,
}

impl Combinator {
    fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'>' => Some(Combinator::Child),
            b'+' => Some(Combinator::NextSibling),
            b'~' => Some(Combinator::SubsequentSibling),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Combinator::Descendant => " ",
            Combinator::Child => " > ",
            Combinator::NextSibling => " + ",
            Combinator::SubsequentSibling => " ~ ",
        }
    }
}

/// A compound selector: a run of simple selectors with no combinator inside
/// (e.g. `a.btn:hover`, `&[open]`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compound(pub String);

impl Compound {
    /// Number of top-level-or-nested `&` anchors (escaped `\&` excluded)
    pub fn anchor_count(&self) -> usize {
        anchor_positions(&self.0).len()
    }

    /// Check whether the compound contains an anchor
    #[inline]
    pub fn has_anchor(&self) -> bool {
        self.anchor_count() > 0
    }

    /// The text after a leading, sole anchor (`&:hover` -> `:hover`)
    fn anchor_suffix(&self) -> Option<&str> {
        let positions = anchor_positions(&self.0);
        if positions == [0] {
            Some(&self.0[1..])
        } else {
            None
        }
    }
}

/// One part of a complex selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Combinator preceding the compound; `None` for the first part unless the
    /// selector is relative (`> li`)
    pub combinator: Option<Combinator>,
    /// The compound
    pub compound: Compound,
}

/// A complex selector (no top-level commas)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    parts: Vec<Part>,
}

impl Selector {
    /// Parse a complex selector
    ///
    /// Brackets, parentheses, quoted strings and backslash escapes are opaque.
    /// Top-level commas are rejected; use [`parse_list`] for selector lists.
    pub fn parse(input: &str) -> Result<Self, CompileError> {
        let invalid = |reason: &str| CompileError::InvalidSelector {
            selector: input.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim();
        let bytes = trimmed.as_bytes();
        let mut parts: Vec<Part> = Vec::new();
        let mut current = String::new();
        let mut current_combinator: Option<Combinator> = None;
        let mut pending: Option<Combinator> = None;
        let mut depth: isize = 0;
        let mut quote: Option<u8> = None;
        let mut i = 0;

        while i < bytes.len() {
            let b = bytes[i];
            let top_level = depth == 0 && quote.is_none();

            if top_level && b == b',' {
                return Err(invalid("unexpected top-level comma"));
            }

            if top_level && (b.is_ascii_whitespace() || Combinator::from_byte(b).is_some()) {
                if !current.is_empty() {
                    parts.push(Part {
                        combinator: current_combinator.take(),
                        compound: Compound(std::mem::take(&mut current)),
                    });
                }
                match Combinator::from_byte(b) {
                    Some(c) => pending = Some(c),
                    None if !parts.is_empty() => {
                        pending.get_or_insert(Combinator::Descendant);
                    }
                    None => {}
                }
                i += 1;
                continue;
            }

            if current.is_empty() {
                current_combinator = pending.take();
            }

            let len = match b {
                b'\\' => escape_len(trimmed, i),
                _ => trimmed[i..].chars().next().map_or(1, char::len_utf8),
            };
            match (quote, b) {
                (Some(q), _) if b == q => quote = None,
                (Some(_), _) => {}
                (None, b'"' | b'\'') => quote = Some(b),
                (None, b'[' | b'(') => depth += 1,
                (None, b']' | b')') => depth -= 1,
                _ => {}
            }
            current.push_str(&trimmed[i..i + len]);
            i += len;
        }

        if depth != 0 {
            return Err(invalid("unbalanced brackets or parentheses"));
        }
        if quote.is_some() {
            return Err(invalid("unterminated string"));
        }
        if current.is_empty() {
            return Err(invalid("selector ends without a compound"));
        }

        parts.push(Part {
            combinator: current_combinator,
            compound: Compound(current),
        });

        Ok(Selector { parts })
    }

    /// Parts in order
    #[inline]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Check whether any compound contains `&`
    pub fn has_anchor(&self) -> bool {
        self.parts.iter().any(|p| p.compound.has_anchor())
    }

    /// Check whether this is a single compound with no combinators
    pub fn is_compound(&self) -> bool {
        self.parts.len() == 1 && self.parts[0].combinator.is_none()
    }

    /// Replace every `&` in `self` with `outer`
    ///
    /// A selector without an anchor is returned as a descendant of `outer`.
    pub fn substitute(&self, outer: &Selector) -> Selector {
        if !self.has_anchor() {
            let mut parts = outer.parts.clone();
            let mut rest = self.parts.clone();
            if let Some(first) = rest.first_mut() {
                first.combinator.get_or_insert(Combinator::Descendant);
            }
            parts.append(&mut rest);
            return Selector { parts };
        }

        let mut parts: Vec<Part> = Vec::with_capacity(self.parts.len() + outer.parts.len());

        for part in &self.parts {
            if !part.compound.has_anchor() {
                parts.push(part.clone());
                continue;
            }

            match part.compound.anchor_suffix() {
                Some(suffix) => {
                    let mut spliced = outer.parts.clone();
                    if let Some(first) = spliced.first_mut() {
                        first.combinator = part.combinator.or(first.combinator);
                    }
                    if let Some(last) = spliced.last_mut() {
                        last.compound.0.push_str(suffix);
                    }
                    parts.extend(spliced);
                }
                None => {
                    let replacement = if outer.is_compound() {
                        outer.parts[0].compound.0.clone()
                    } else {
                        format!(":is({})", outer)
                    };
                    parts.push(Part {
                        combinator: part.combinator,
                        compound: Compound(replace_anchors(&part.compound.0, &replacement)),
                    });
                }
            }
        }

        Selector { parts }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            match (i, part.combinator) {
                (0, Some(c)) => write!(f, "{} ", c.as_str().trim())?,
                (_, Some(c)) => f.write_str(c.as_str())?,
                (_, None) if i > 0 => f.write_str(" ")?,
                _ => {}
            }
            f.write_str(&part.compound.0)?;
        }
        Ok(())
    }
}

/// Split a selector list on top-level commas and parse each member
pub fn parse_list(input: &str) -> Result<Vec<Selector>, CompileError> {
    split_top_level_commas(input)
        .into_iter()
        .map(|s| Selector::parse(s.trim()))
        .collect()
}

/// Compose two selector templates that both contain `&`
///
/// Returns `None` when either side lacks an anchor or fails to parse, in which
/// case the caller keeps the two scopes as separate nesting levels.
///
/// # Example
///
/// ```
/// use classjit::jit::selector::compose;
///
/// let s = compose(".group:hover &", "&:hover").unwrap();
/// let s = compose(&s, "&:focus").unwrap();
/// assert_eq!(s, ".group:hover &:hover:focus");
/// ```
pub fn compose(outer: &str, inner: &str) -> Option<String> {
    if !contains_anchor(outer) || !contains_anchor(inner) {
        return None;
    }
    let outer = parse_list(outer).ok()?;
    let inner = parse_list(inner).ok()?;
    Some(join_product(&outer, &inner))
}

/// Resolve a nested template against an already-resolved parent selector
///
/// Templates without `&` become descendants of the parent. Unparseable input
/// falls back to textual anchor replacement.
pub fn resolve(parent: &str, template: &str) -> String {
    match (parse_list(parent), parse_list(template)) {
        (Ok(outer), Ok(inner)) => join_product(&outer, &inner),
        _ => resolve_verbatim(parent, template),
    }
}

/// Resolve a literal template without normalizing it
///
/// Each `&` is replaced with the parent text (wrapped in `:is(...)` when the
/// parent is complex or a list); everything else is kept byte for byte.
pub fn resolve_verbatim(parent: &str, template: &str) -> String {
    if !contains_anchor(template) {
        return format!("{} {}", parent, template);
    }
    let simple = matches!(Selector::parse(parent), Ok(ref s) if s.is_compound());
    let replacement = if simple {
        parent.to_string()
    } else {
        format!(":is({})", parent)
    };
    replace_anchors(template, &replacement)
}

/// Check whether a template contains an unescaped `&`
pub fn contains_anchor(template: &str) -> bool {
    !anchor_positions(template).is_empty()
}

fn join_product(outer: &[Selector], inner: &[Selector]) -> String {
    let mut out = Vec::with_capacity(outer.len() * inner.len());
    for o in outer {
        for i in inner {
            out.push(i.substitute(o).to_string());
        }
    }
    out.join(", ")
}

/// Byte length of the escape starting at `i` (`\\:`, `\\31 `, ...)
fn escape_len(s: &str, i: usize) -> usize {
    let rest = &s[i + 1..];
    let hex = rest
        .bytes()
        .take(6)
        .take_while(|b| b.is_ascii_hexdigit())
        .count();
    if hex > 0 {
        // A single whitespace terminates a hex escape and belongs to it
        let trailing = rest[hex..].starts_with(' ') as usize;
        return 1 + hex + trailing;
    }
    1 + rest.chars().next().map_or(0, char::len_utf8)
}

fn anchor_positions(s: &str) -> Vec<usize> {
    let bytes = s.as_bytes();
    let mut positions = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'&' => {
                positions.push(i);
                i += 1;
            }
            _ => i += 1,
        }
    }
    positions
}

fn replace_anchors(s: &str, replacement: &str) -> String {
    let positions = anchor_positions(s);
    let mut out = String::with_capacity(s.len() + positions.len() * replacement.len());
    let mut last = 0;
    for pos in positions {
        out.push_str(&s[last..pos]);
        out.push_str(replacement);
        last = pos + 1;
    }
    out.push_str(&s[last..]);
    out
}

fn split_top_level_commas(input: &str) -> Vec<&str> {
    let bytes = input.as_bytes();
    let mut out = Vec::new();
    let mut depth: isize = 0;
    let mut quote: Option<u8> = None;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 1;
            } else if b == q {
                quote = None;
            }
        } else {
            match b {
                b'\\' => i += 1,
                b'"' | b'\'' => quote = Some(b),
                b'[' | b'(' => depth += 1,
                b']' | b')' => depth -= 1,
                b',' if depth == 0 => {
                    out.push(&input[start..i]);
                    start = i + 1;
                }
                _ => {}
            }
        }
        i += 1;
    }
    out.push(&input[start.min(input.len())..]);
    out
}
