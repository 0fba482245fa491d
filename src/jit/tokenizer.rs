//! Class-string tokenizer
//!
//! Splits a class string on `:` while treating `[...]` and `(...)` as opaque
//! spans, so `hover:bg-[color:var(--foo)]` yields two tokens rather than four.
//!
//! Empty runs between separators are dropped: leading, trailing and doubled
//! colons collapse instead of producing empty tokens. Unbalanced brackets are
//! tolerated; the depth counters may go negative or stay positive and the scan
//! still terminates.

use memchr::{memchr, memchr3, memchr_iter};

/// A maximal run of characters between bracket/paren-balanced `:` delimiters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// The token text
    pub value: &'a str,
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl<'a> Token<'a> {
    #[inline]
    fn new(input: &'a str, start: usize, end: usize) -> Self {
        Self {
            value: &input[start..end],
            start,
            end,
        }
    }

    /// Length of the token in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Tokens are never empty; provided for clippy's `len_without_is_empty`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Tokenize a class string
///
/// # Example
///
/// ```
/// use classjit::jit::tokenize;
///
/// let tokens = tokenize("hover:bg-[color:var(--foo)]");
/// let values: Vec<&str> = tokens.iter().map(|t| t.value).collect();
/// assert_eq!(values, ["hover", "bg-[color:var(--foo)]"]);
/// ```
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let bytes = input.as_bytes();

    // No brackets or parens of either kind: every colon is a separator
    if memchr3(b'[', b'(', b']', bytes).is_none() && memchr(b')', bytes).is_none() {
        return split_plain(input);
    }

    let mut tokens = Vec::new();
    let mut square: isize = 0;
    let mut round: isize = 0;
    let mut start = 0;

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'[' => square += 1,
            b']' => square -= 1,
            b'(' => round += 1,
            b')' => round -= 1,
            b':' if square == 0 && round == 0 => {
                if i > start {
                    tokens.push(Token::new(input, start, i));
                }
                start = i + 1;
            }
            _ => {}
        }
    }

    if start < bytes.len() {
        tokens.push(Token::new(input, start, bytes.len()));
    }

    tokens
}

fn split_plain(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = 0;

    for i in memchr_iter(b':', input.as_bytes()) {
        if i > start {
            tokens.push(Token::new(input, start, i));
        }
        start = i + 1;
    }

    if start < input.len() {
        tokens.push(Token::new(input, start, input.len()));
    }

    tokens
}
