//! Value patterns for utility handlers
//!
//! Handlers often need to classify a raw utility value (`1.5`,
//! `12px`, `50%`). Patterns are compiled once per thread and reused.

use std::cell::RefCell;

use hashbrown::HashMap;
use regex::Regex;

/// Unitless number (`4`, `0.5`, `.25`)
pub const NUMBER: &str = r"^(?:\d+(?:\.\d+)?|\.\d+)$";

/// Number followed by a CSS length unit or `%`
pub const LENGTH: &str =
    r"^(?:\d+(?:\.\d+)?|\.\d+)(?:px|r?em|ch|ex|vh|vw|vmin|vmax|dvh|svh|lvh|cm|mm|in|pt|pc|%)$";

/// Fraction (`1/2`, `2/3`)
pub const FRACTION: &str = r"^\d+/\d+$";

thread_local! {
    static PATTERNS: RefCell<HashMap<&'static str, Regex>> = RefCell::new(HashMap::new());
}

/// Test `text` against a pattern, compiling it on first use
///
/// An invalid pattern never matches.
pub fn is_match(pattern: &'static str, text: &str) -> bool {
    PATTERNS.with(|cache| {
        if let Some(re) = cache.borrow().get(pattern) {
            return re.is_match(text);
        }
        match Regex::new(pattern) {
            Ok(re) => {
                let hit = re.is_match(text);
                cache.borrow_mut().insert(pattern, re);
                hit
            }
            Err(_) => false,
        }
    })
}

/// `4`, `0.5`
#[inline]
pub fn is_number(value: &str) -> bool {
    is_match(NUMBER, value)
}

/// `12px`, `1.5rem`, `50%`
#[inline]
pub fn is_length(value: &str) -> bool {
    is_match(LENGTH, value)
}

/// `1/2`
#[inline]
pub fn is_fraction(value: &str) -> bool {
    is_match(FRACTION, value)
}
