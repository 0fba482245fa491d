//! Error types for the JIT core
//!
//! Unknown input is never an error: an unrecognized class simply produces no
//! CSS. [`CompileError`] covers contract violations by registry entries,
//! malformed selector templates and bad configuration.

use std::fmt;

/// Errors raised while compiling a class
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// A registry entry broke its contract (e.g. a handler produced a scope
    /// node where only declarations are allowed)
    InvalidRule {
        /// Name of the offending utility or modifier
        rule: String,
        /// What went wrong
        reason: String,
    },

    /// A selector template could not be parsed
    InvalidSelector {
        /// The selector text
        selector: String,
        /// What went wrong
        reason: String,
    },

    /// Configuration could not be loaded
    InvalidConfig {
        /// What went wrong
        reason: String,
    },
}

impl CompileError {
    /// Create an [`CompileError::InvalidRule`]
    pub fn invalid_rule(rule: impl Into<String>, reason: impl Into<String>) -> Self {
        CompileError::InvalidRule {
            rule: rule.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::InvalidRule { rule, reason } => {
                write!(f, "Invalid rule '{}': {}", rule, reason)
            }
            CompileError::InvalidSelector { selector, reason } => {
                write!(f, "Invalid selector '{}': {}", selector, reason)
            }
            CompileError::InvalidConfig { reason } => {
                write!(f, "Invalid config: {}", reason)
            }
        }
    }
}

impl std::error::Error for CompileError {}

impl From<serde_json::Error> for CompileError {
    fn from(e: serde_json::Error) -> Self {
        CompileError::InvalidConfig {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let e = CompileError::invalid_rule("bg", "handler returned a rule");
        assert_eq!(e.to_string(), "Invalid rule 'bg': handler returned a rule");

        let e = CompileError::InvalidSelector {
            selector: "&[".to_string(),
            reason: "unbalanced".to_string(),
        };
        assert!(e.to_string().contains("&["));
    }

    #[test]
    fn test_from_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e: CompileError = err.into();
        assert!(matches!(e, CompileError::InvalidConfig { .. }));
    }
}
