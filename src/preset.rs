//! A small reference catalogue
//!
//! [`BasicPreset`] is a plugin with enough utilities and modifiers to drive the
//! compiler end to end. It is not a full design system; real catalogues are
//! expected to ship as their own plugins.
//!
//! | Utility | Properties |
//! |---|---|
//! | `bg-*` | `background-color` |
//! | `text-*` | `color` |
//! | `p`, `px`, `py`, `pt`, `pr`, `pb`, `pl` | padding |
//! | `m`, `mx`, `my`, `mt`, `mr`, `mb`, `ml` | margin (negatives allowed) |
//! | `w-*` | `width` |
//! | `underline`, `flex`, `block`, `hidden` | fixed declarations |
//!
//! Modifiers: `hover`, `focus`, `active`, `group-hover`, `dark`, `sm`, `md`,
//! `lg`, `xl`, `supports-[...]` and arbitrary selectors (`[&>*]`).
//!
//! # Theme
//!
//! Values are looked up in the theme before the built-in fallbacks:
//!
//! ```json
//! {
//!   "colors": { "brand": "#0af", "gray": { "500": "#6b7280" } },
//!   "spacing": { "gutter": "18px" },
//!   "screens": { "sm": "600px" }
//! }
//! ```
//!
//! # Example
//!
//! ```
//! use classjit::jit::{Compiler, IncrementalProcessor};
//! use classjit::preset::BasicPreset;
//!
//! let mut compiler = Compiler::new();
//! compiler.use_plugin(&BasicPreset);
//!
//! let mut processor = IncrementalProcessor::new(compiler);
//! let out = processor.process_class("sm:hover:bg-[#f00]/50").unwrap();
//! assert!(out.css.starts_with("@media (min-width: 640px)"));
//! assert!(out.css.contains("color-mix(in oklab, #f00 50%, transparent)"));
//! ```

use crate::jit::{
    patterns, AstNode, CompileError, Context, DeclPath, Modifier, ParsedModifier, ParsedUtility,
    PathSegment, Plugin, Registry, Utility,
};

/// Category of colour utilities
pub const CATEGORY_COLOR: &str = "color";
/// Category of spacing utilities
pub const CATEGORY_SPACING: &str = "spacing";
/// Category of sizing utilities
pub const CATEGORY_SIZING: &str = "sizing";
/// Category of layout and typography keywords
pub const CATEGORY_STATIC: &str = "static";

const SCREENS: &[(&str, &str)] = &[
    ("sm", "640px"),
    ("md", "768px"),
    ("lg", "1024px"),
    ("xl", "1280px"),
];

const NAMED_COLORS: &[(&str, &str)] = &[
    ("transparent", "transparent"),
    ("current", "currentColor"),
    ("inherit", "inherit"),
    ("black", "#000"),
    ("white", "#fff"),
    ("red", "#ef4444"),
    ("green", "#22c55e"),
    ("blue", "#3b82f6"),
    ("yellow", "#eab308"),
    ("gray", "#6b7280"),
];

const PADDING: &[(&str, &[&str])] = &[
    ("p", &["padding"]),
    ("px", &["padding-inline"]),
    ("py", &["padding-block"]),
    ("pt", &["padding-top"]),
    ("pr", &["padding-right"]),
    ("pb", &["padding-bottom"]),
    ("pl", &["padding-left"]),
];

const MARGIN: &[(&str, &[&str])] = &[
    ("m", &["margin"]),
    ("mx", &["margin-inline"]),
    ("my", &["margin-block"]),
    ("mt", &["margin-top"]),
    ("mr", &["margin-right"]),
    ("mb", &["margin-bottom"]),
    ("ml", &["margin-left"]),
];

/// The reference catalogue
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicPreset;

impl Plugin for BasicPreset {
    fn name(&self) -> &str {
        "basic"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn description(&self) -> &str {
        "colours, spacing, sizing and common variants"
    }

    fn register(&self, registry: &mut Registry) {
        register_utilities(registry);
        register_modifiers(registry);
    }
}

fn register_utilities(registry: &mut Registry) {
    registry.add_utility(color_utility("bg", "background-color").with_priority(10));
    registry.add_utility(color_utility("text", "color").with_priority(10));

    for &(name, props) in PADDING {
        registry.add_utility(spacing_utility(name, props, false));
    }
    for &(name, props) in MARGIN {
        registry.add_utility(spacing_utility(name, props, true));
    }

    registry.add_utility(
        Utility::new("w", |u, ctx| {
            Ok(width_value(u, ctx)
                .map(|v| vec![AstNode::decl("width", v)])
                .unwrap_or_default())
        })
        .with_category(CATEGORY_SIZING),
    );

    let fixed: &[(&str, &[(&str, &str)])] = &[
        ("underline", &[("text-decoration-line", "underline")]),
        ("flex", &[("display", "flex")]),
        ("block", &[("display", "block")]),
        ("hidden", &[("display", "none")]),
    ];
    for &(name, decls) in fixed {
        registry.add_utility(Utility::fixed(name, decls).with_category(CATEGORY_STATIC));
    }
}

fn register_modifiers(registry: &mut Registry) {
    registry.add_modifier(Modifier::selector("hover", "&:hover"));
    registry.add_modifier(Modifier::selector("focus", "&:focus"));
    registry.add_modifier(Modifier::selector("active", "&:active"));
    registry.add_modifier(Modifier::selector("group-hover", ".group:hover &"));
    registry.add_modifier(Modifier::selector("dark", ".dark &"));

    for &(name, default) in SCREENS {
        registry.add_modifier(Modifier::new(name, move |m, path, ctx| {
            if m.negative {
                return Ok(false);
            }
            let width = ctx.lookup_str(&["screens", name]).unwrap_or(default);
            path.push(PathSegment::at_rule(
                "media",
                format!("(min-width: {})", width),
            ));
            Ok(true)
        }));
    }

    registry.add_modifier(
        Modifier::new("supports", supports)
            .with_matcher(|name, _| name.starts_with("supports-[") && name.ends_with(']')),
    );
    registry.add_modifier(
        Modifier::new("[", arbitrary_selector)
            .with_matcher(|name, _| name.len() > 2 && name.starts_with('[') && name.ends_with(']')),
    );
}

// ============================================================================
// Utilities
// ============================================================================

fn color_utility(name: &'static str, prop: &'static str) -> Utility {
    Utility::new(name, move |u, ctx| {
        if u.negative {
            return Ok(Vec::new());
        }
        let (value, opacity) = split_opacity(u);
        let Some(color) = color_value(u, value, ctx) else {
            return Ok(Vec::new());
        };
        let value = if !opacity.is_empty() {
            match opacity_percent(opacity) {
                Some(pct) => format!("color-mix(in oklab, {} {}, transparent)", color, pct),
                None => return Ok(Vec::new()),
            }
        } else {
            color
        };
        Ok(vec![AstNode::decl(prop, value)])
    })
    .with_category(CATEGORY_COLOR)
}

fn spacing_utility(name: &'static str, props: &'static [&'static str], allow_negative: bool) -> Utility {
    Utility::new(name, move |u, ctx| {
        if u.negative && !allow_negative {
            return Ok(Vec::new());
        }
        let Some(value) = spacing_value(u, ctx) else {
            return Ok(Vec::new());
        };
        let value = if u.negative { negate(&value) } else { value };
        Ok(props.iter().map(|p| AstNode::decl(*p, value.clone())).collect())
    })
    .with_category(CATEGORY_SPACING)
}

/// Value and opacity; named values carry their opacity inline (`black/25`)
fn split_opacity(u: &ParsedUtility) -> (&str, &str) {
    if u.arbitrary || u.custom_property {
        (u.value.as_str(), u.opacity.as_str())
    } else {
        u.value.split_once('/').unwrap_or((u.value.as_str(), ""))
    }
}

/// Colour for a utility value: arbitrary, custom property, theme, built-in
fn color_value(u: &ParsedUtility, value: &str, ctx: &Context) -> Option<String> {
    if u.arbitrary || u.custom_property {
        return Some(u.resolved_value());
    }
    if value.is_empty() {
        return None;
    }
    if let Some(c) = ctx.lookup_str(&["colors", value]) {
        return Some(c.to_string());
    }
    if let Some((base, shade)) = value.rsplit_once('-') {
        if let Some(c) = ctx.lookup_str(&["colors", base, shade]) {
            return Some(c.to_string());
        }
    }
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == value)
        .map(|(_, c)| c.to_string())
}

/// `50` -> `50%`, `[0.5]` -> `50%`, `[37%]` -> `37%`
fn opacity_percent(opacity: &str) -> Option<String> {
    if patterns::is_number(opacity) {
        return Some(format!("{}%", opacity));
    }
    let inner = opacity.strip_prefix('[')?.strip_suffix(']')?;
    if inner.ends_with('%') && patterns::is_number(&inner[..inner.len() - 1]) {
        return Some(inner.to_string());
    }
    if patterns::is_number(inner) {
        let pct = inner.parse::<f64>().ok()? * 100.0;
        return Some(format!("{}%", trim_float(pct)));
    }
    None
}

fn spacing_value(u: &ParsedUtility, ctx: &Context) -> Option<String> {
    if u.arbitrary || u.custom_property {
        return Some(u.resolved_value());
    }
    if let Some(v) = ctx.lookup_str(&["spacing", u.value.as_str()]) {
        return Some(v.to_string());
    }
    match u.value.as_str() {
        "" => None,
        "0" => Some("0".to_string()),
        "px" => Some("1px".to_string()),
        "auto" => Some("auto".to_string()),
        v if patterns::is_number(v) => Some(format!("calc(var(--spacing) * {})", v)),
        _ => None,
    }
}

fn width_value(u: &ParsedUtility, ctx: &Context) -> Option<String> {
    if u.negative {
        return None;
    }
    match u.value.as_str() {
        "full" => Some("100%".to_string()),
        "screen" => Some("100vw".to_string()),
        v if patterns::is_fraction(v) && !u.arbitrary => Some(format!("calc({} * 100%)", v)),
        _ => spacing_value(u, ctx).filter(|v| v != "auto" || u.value == "auto"),
    }
}

fn negate(value: &str) -> String {
    if value == "0" {
        value.to_string()
    } else if patterns::is_length(value) {
        format!("-{}", value)
    } else {
        format!("calc({} * -1)", value)
    }
}

fn trim_float(v: f64) -> String {
    let s = format!("{:.4}", v);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

// ============================================================================
// Modifiers
// ============================================================================

fn supports(
    modifier: &ParsedModifier,
    path: &mut DeclPath,
    _ctx: &Context,
) -> Result<bool, CompileError> {
    if modifier.negative {
        return Ok(false);
    }
    let Some(arg) = modifier.argument("supports") else {
        return Ok(false);
    };
    let query = arg.replace('_', " ");
    if query.is_empty() {
        return Ok(false);
    }
    let params = if query.starts_with('(') || query.starts_with("not ") {
        query
    } else {
        format!("({})", query)
    };
    path.push(PathSegment::at_rule("supports", params));
    Ok(true)
}

fn arbitrary_selector(
    modifier: &ParsedModifier,
    path: &mut DeclPath,
    _ctx: &Context,
) -> Result<bool, CompileError> {
    if modifier.negative {
        return Ok(false);
    }
    let Some(literal) = modifier.literal() else {
        return Ok(false);
    };
    let selector = literal.replace('_', " ");
    if !crate::jit::selector::contains_anchor(&selector) {
        return Ok(false);
    }
    path.push(PathSegment::style_rule(selector));
    Ok(true)
}
