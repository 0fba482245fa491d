//! Plugins
//!
//! A plugin is a named bundle of utilities and modifiers. Installing one via
//! [`Compiler::use_plugin`](super::compiler::Compiler::use_plugin) registers
//! its rules and invalidates every cache.
//!
//! # Example
//!
//! ```
//! use classjit::jit::{AstNode, Compiler, Modifier, Plugin, Registry, Utility};
//!
//! struct Opacity;
//!
//! impl Plugin for Opacity {
//!     fn name(&self) -> &str {
//!         "opacity"
//!     }
//!
//!     fn register(&self, registry: &mut Registry) {
//!         registry.add_utility(Utility::new("opacity", |u, _| {
//!             Ok(vec![AstNode::decl("opacity", format!("{}%", u.value))])
//!         }));
//!         registry.add_modifier(Modifier::selector("disabled", "&:disabled"));
//!     }
//! }
//!
//! let mut compiler = Compiler::new();
//! compiler.use_plugin(&Opacity);
//! assert_eq!(compiler.plugins()[0].name, "opacity");
//! assert!(compiler.generate("disabled:opacity-50").is_ok());
//! ```

use serde::Serialize;

use super::registry::Registry;

/// A bundle of registry rules
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`.
pub trait Plugin: Send + Sync {
    /// Unique plugin name
    fn name(&self) -> &str;

    /// Plugin version
    fn version(&self) -> &str {
        "0.0.0"
    }

    /// Short description
    fn description(&self) -> &str {
        ""
    }

    /// Register utilities and modifiers
    fn register(&self, registry: &mut Registry);
}

/// Metadata of an installed plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginInfo {
    /// Plugin name
    pub name: String,
    /// Plugin version
    pub version: String,
    /// Plugin description
    pub description: String,
    /// Registry version right after the plugin was installed
    pub registry_version: u64,
}

impl PluginInfo {
    pub(crate) fn of(plugin: &dyn Plugin, registry_version: u64) -> Self {
        Self {
            name: plugin.name().to_string(),
            version: plugin.version().to_string(),
            description: plugin.description().to_string(),
            registry_version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jit::registry::Modifier;

    struct Focus;

    impl Plugin for Focus {
        fn name(&self) -> &str {
            "focus"
        }

        fn version(&self) -> &str {
            "1.2.0"
        }

        fn register(&self, registry: &mut Registry) {
            registry.add_modifier(Modifier::selector("focus", "&:focus"));
        }
    }

    #[test]
    fn test_register() {
        let mut registry = Registry::new();
        Focus.register(&mut registry);
        assert_eq!(registry.modifiers().len(), 1);
    }

    #[test]
    fn test_info() {
        let info = PluginInfo::of(&Focus, 3);
        assert_eq!(info.name, "focus");
        assert_eq!(info.version, "1.2.0");
        assert_eq!(info.description, "");
        assert_eq!(info.registry_version, 3);
    }
}
