// src/transform/css/utilities.rs

//! Utility-class generation.
//!
//! `@tailwind base`, `@tailwind components` and `@tailwind utilities` are
//! replaced by generated rules; `@apply` inside a rule expands to the
//! declarations of the named utilities. Which utilities exist is controlled
//! by the theme's `core_plugins` switches and `font_family` map.

use std::collections::HashMap;

use super::CssError;
use super::ast::{AtRule, Declaration, Node, Rule, Stylesheet, split_top_level};
use crate::config::{DarkMode, Theme};

/// Responsive breakpoints, smallest first.
pub const SCREENS: &[(&str, &str)] = &[
    ("sm", "640px"),
    ("md", "768px"),
    ("lg", "1024px"),
    ("xl", "1280px"),
    ("2xl", "1536px"),
];

const SPACING: &[(&str, &str)] = &[
    ("0", "0px"),
    ("px", "1px"),
    ("0.5", "0.125rem"),
    ("1", "0.25rem"),
    ("1.5", "0.375rem"),
    ("2", "0.5rem"),
    ("2.5", "0.625rem"),
    ("3", "0.75rem"),
    ("3.5", "0.875rem"),
    ("4", "1rem"),
    ("5", "1.25rem"),
    ("6", "1.5rem"),
    ("7", "1.75rem"),
    ("8", "2rem"),
    ("9", "2.25rem"),
    ("10", "2.5rem"),
    ("11", "2.75rem"),
    ("12", "3rem"),
    ("14", "3.5rem"),
    ("16", "4rem"),
    ("20", "5rem"),
    ("24", "6rem"),
    ("28", "7rem"),
    ("32", "8rem"),
    ("36", "9rem"),
    ("40", "10rem"),
    ("44", "11rem"),
    ("48", "12rem"),
    ("52", "13rem"),
    ("56", "14rem"),
    ("60", "15rem"),
    ("64", "16rem"),
    ("72", "18rem"),
    ("80", "20rem"),
    ("96", "24rem"),
];

const FRACTIONS: &[(&str, &str)] = &[
    ("1/2", "50%"),
    ("1/3", "33.333333%"),
    ("2/3", "66.666667%"),
    ("1/4", "25%"),
    ("2/4", "50%"),
    ("3/4", "75%"),
    ("1/5", "20%"),
    ("2/5", "40%"),
    ("3/5", "60%"),
    ("4/5", "80%"),
    ("1/6", "16.666667%"),
    ("5/6", "83.333333%"),
];

type Shades = &'static [(&'static str, &'static str)];

const PALETTE: &[(&str, Shades)] = &[
    (
        "gray",
        &[
            ("50", "#f9fafb"),
            ("100", "#f3f4f6"),
            ("200", "#e5e7eb"),
            ("300", "#d1d5db"),
            ("400", "#9ca3af"),
            ("500", "#6b7280"),
            ("600", "#4b5563"),
            ("700", "#374151"),
            ("800", "#1f2937"),
            ("900", "#111827"),
        ],
    ),
    (
        "red",
        &[
            ("50", "#fef2f2"),
            ("100", "#fee2e2"),
            ("200", "#fecaca"),
            ("300", "#fca5a5"),
            ("400", "#f87171"),
            ("500", "#ef4444"),
            ("600", "#dc2626"),
            ("700", "#b91c1c"),
            ("800", "#991b1b"),
            ("900", "#7f1d1d"),
        ],
    ),
    (
        "yellow",
        &[
            ("50", "#fffbeb"),
            ("100", "#fef3c7"),
            ("200", "#fde68a"),
            ("300", "#fcd34d"),
            ("400", "#fbbf24"),
            ("500", "#f59e0b"),
            ("600", "#d97706"),
            ("700", "#b45309"),
            ("800", "#92400e"),
            ("900", "#78350f"),
        ],
    ),
    (
        "green",
        &[
            ("50", "#ecfdf5"),
            ("100", "#d1fae5"),
            ("200", "#a7f3d0"),
            ("300", "#6ee7b7"),
            ("400", "#34d399"),
            ("500", "#10b981"),
            ("600", "#059669"),
            ("700", "#047857"),
            ("800", "#065f46"),
            ("900", "#064e3b"),
        ],
    ),
    (
        "blue",
        &[
            ("50", "#eff6ff"),
            ("100", "#dbeafe"),
            ("200", "#bfdbfe"),
            ("300", "#93c5fd"),
            ("400", "#60a5fa"),
            ("500", "#3b82f6"),
            ("600", "#2563eb"),
            ("700", "#1d4ed8"),
            ("800", "#1e40af"),
            ("900", "#1e3a8a"),
        ],
    ),
    (
        "indigo",
        &[
            ("50", "#eef2ff"),
            ("100", "#e0e7ff"),
            ("200", "#c7d2fe"),
            ("300", "#a5b4fc"),
            ("400", "#818cf8"),
            ("500", "#6366f1"),
            ("600", "#4f46e5"),
            ("700", "#4338ca"),
            ("800", "#3730a3"),
            ("900", "#312e81"),
        ],
    ),
    (
        "purple",
        &[
            ("50", "#f5f3ff"),
            ("100", "#ede9fe"),
            ("200", "#ddd6fe"),
            ("300", "#c4b5fd"),
            ("400", "#a78bfa"),
            ("500", "#8b5cf6"),
            ("600", "#7c3aed"),
            ("700", "#6d28d9"),
            ("800", "#5b21b6"),
            ("900", "#4c1d95"),
        ],
    ),
    (
        "pink",
        &[
            ("50", "#fdf2f8"),
            ("100", "#fce7f3"),
            ("200", "#fbcfe8"),
            ("300", "#f9a8d4"),
            ("400", "#f472b6"),
            ("500", "#ec4899"),
            ("600", "#db2777"),
            ("700", "#be185d"),
            ("800", "#9d174d"),
            ("900", "#831843"),
        ],
    ),
];

/// One generated class and its declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utility {
    /// Unescaped class name, e.g. `w-1/2`.
    pub name: String,
    pub decls: Vec<(String, String)>,
    /// Colour utilities also get `hover:`, `focus:` and `dark:` variants.
    pub colour: bool,
}

impl Utility {
    fn new(name: impl Into<String>, decls: &[(&str, &str)]) -> Self {
        Self {
            name: name.into(),
            decls: decls
                .iter()
                .map(|(p, v)| (p.to_string(), v.to_string()))
                .collect(),
            colour: false,
        }
    }

    /// The same value for several properties.
    fn same(name: impl Into<String>, props: &[&str], value: &str) -> Self {
        let decls: Vec<(&str, &str)> = props.iter().map(|p| (*p, value)).collect();
        Self::new(name, &decls)
    }

    fn colour(mut self) -> Self {
        self.colour = true;
        self
    }
}

/// Every utility available for one theme.
#[derive(Debug, Clone)]
pub struct Catalog {
    utilities: Vec<Utility>,
    index: HashMap<String, usize>,
    dark: DarkMode,
    preflight: bool,
    container: bool,
    sans: String,
}

impl Catalog {
    pub fn new(theme: &Theme) -> Self {
        let utilities = build(theme);
        let index = utilities
            .iter()
            .enumerate()
            .map(|(i, u)| (u.name.clone(), i))
            .collect();
        let sans = theme
            .font_families()
            .get("sans")
            .map(|f| f.join(", "))
            .unwrap_or_else(|| "sans-serif".to_string());
        Self {
            utilities,
            index,
            dark: theme.dark_mode,
            preflight: theme.plugin_enabled("preflight"),
            container: theme.plugin_enabled("container"),
            sans,
        }
    }

    pub fn len(&self) -> usize {
        self.utilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utilities.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Utility> {
        self.index.get(name).map(|&i| &self.utilities[i])
    }

    /// `@tailwind base`: a small element reset.
    pub fn base(&self) -> Vec<Node> {
        if !self.preflight {
            return Vec::new();
        }
        vec![
            rule_of(
                "*, ::before, ::after",
                &[
                    ("box-sizing", "border-box"),
                    ("border-width", "0"),
                    ("border-style", "solid"),
                    ("border-color", "#e5e7eb"),
                ],
            ),
            rule_of(
                "html",
                &[
                    ("line-height", "1.5"),
                    ("-webkit-text-size-adjust", "100%"),
                    ("tab-size", "4"),
                    ("font-family", self.sans.as_str()),
                ],
            ),
            rule_of(
                "body",
                &[
                    ("margin", "0"),
                    ("font-family", "inherit"),
                    ("line-height", "inherit"),
                ],
            ),
            rule_of(
                "h1, h2, h3, h4, h5, h6",
                &[("font-size", "inherit"), ("font-weight", "inherit")],
            ),
            rule_of(
                "blockquote, dl, dd, h1, h2, h3, h4, h5, h6, hr, figure, p, pre",
                &[("margin", "0")],
            ),
            rule_of(
                "ol, ul",
                &[("list-style", "none"), ("margin", "0"), ("padding", "0")],
            ),
            rule_of("a", &[("color", "inherit"), ("text-decoration", "inherit")]),
            rule_of(
                "img, svg, video, canvas, audio, iframe, embed, object",
                &[("display", "block"), ("vertical-align", "middle")],
            ),
            rule_of("img, video", &[("max-width", "100%"), ("height", "auto")]),
            rule_of(
                "button, input, optgroup, select, textarea",
                &[
                    ("font-family", "inherit"),
                    ("font-size", "100%"),
                    ("line-height", "inherit"),
                    ("color", "inherit"),
                    ("margin", "0"),
                    ("padding", "0"),
                ],
            ),
            rule_of(
                "button, [type='button'], [type='reset'], [type='submit']",
                &[
                    ("-webkit-appearance", "button"),
                    ("background-color", "transparent"),
                    ("background-image", "none"),
                ],
            ),
            rule_of("button, [role=\"button\"]", &[("cursor", "pointer")]),
            rule_of("table", &[("border-collapse", "collapse")]),
        ]
    }

    /// `@tailwind components`: the responsive `.container`.
    pub fn components(&self) -> Vec<Node> {
        if !self.container {
            return Vec::new();
        }
        let mut nodes = vec![rule_of(".container", &[("width", "100%")])];
        for &(_, width) in SCREENS {
            nodes.push(Node::AtRule(AtRule::block(
                "media",
                format!("(min-width: {width})"),
                vec![rule_of(".container", &[("max-width", width)])],
            )));
        }
        nodes
    }

    /// `@tailwind utilities`: every utility plus its variants.
    pub fn utilities(&self) -> Vec<Node> {
        let mut nodes = self.variant_set("");

        match self.dark {
            DarkMode::Disabled => {}
            DarkMode::Media => {
                let children = self
                    .colours()
                    .map(|u| class_rule(&format!("dark:{}", u.name), "", "", &u.decls))
                    .collect();
                nodes.push(Node::AtRule(AtRule::block(
                    "media",
                    "(prefers-color-scheme: dark)",
                    children,
                )));
            }
            DarkMode::Class => {
                nodes.extend(
                    self.colours()
                        .map(|u| class_rule(&format!("dark:{}", u.name), ".dark ", "", &u.decls)),
                );
            }
        }

        for (screen, width) in SCREENS {
            nodes.push(Node::AtRule(AtRule::block(
                "media",
                format!("(min-width: {width})"),
                self.variant_set(&format!("{screen}:")),
            )));
        }
        nodes
    }

    fn colours(&self) -> impl Iterator<Item = &Utility> {
        self.utilities.iter().filter(|u| u.colour)
    }

    /// Plain utilities followed by hover and focus variants, with every class
    /// name prefixed by `prefix`.
    fn variant_set(&self, prefix: &str) -> Vec<Node> {
        let mut nodes: Vec<Node> = self
            .utilities
            .iter()
            .map(|u| class_rule(&format!("{prefix}{}", u.name), "", "", &u.decls))
            .collect();
        for state in ["hover", "focus"] {
            nodes.extend(self.colours().map(|u| {
                class_rule(
                    &format!("{prefix}{state}:{}", u.name),
                    "",
                    &format!(":{state}"),
                    &u.decls,
                )
            }));
        }
        nodes
    }
}

/// Escape a class name for use in a selector.
pub fn escape_class(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if i == 0 && c.is_ascii_digit() {
            out.push_str(&format!("\\3{c} "));
        } else if c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() {
            out.push(c);
        } else {
            out.push('\\');
            out.push(c);
        }
    }
    out
}

fn class_rule(name: &str, ancestor: &str, pseudo: &str, decls: &[(String, String)]) -> Node {
    Node::Rule(Rule::new(
        format!("{ancestor}.{}{pseudo}", escape_class(name)),
        decls.iter().map(|(p, v)| Node::decl(p, v)).collect(),
    ))
}

fn rule_of(selector: &str, decls: &[(&str, &str)]) -> Node {
    Node::Rule(Rule::new(
        selector,
        decls.iter().map(|(p, v)| Node::decl(p, v)).collect(),
    ))
}

/// Replace `@tailwind` directives and expand `@apply`.
pub fn expand(sheet: Stylesheet, theme: &Theme) -> Result<Stylesheet, CssError> {
    let catalog = Catalog::new(theme);
    let mut siblings = Vec::new();
    let mut nodes = expand_nodes(sheet.nodes, &catalog, None, &mut siblings)?;
    nodes.extend(siblings);
    Ok(Stylesheet::new(nodes))
}

/// Rules produced by a variant `@apply` (`hover:`, `md:`, ...) cannot live
/// inside the rule that asked for them; they collect in `siblings` and are
/// emitted right after it.
fn expand_nodes(
    nodes: Vec<Node>,
    catalog: &Catalog,
    selector: Option<&str>,
    siblings: &mut Vec<Node>,
) -> Result<Vec<Node>, CssError> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::AtRule(at) if at.name == "tailwind" && at.nodes.is_none() => {
                match at.params.trim() {
                    "base" => out.extend(catalog.base()),
                    "components" => out.extend(catalog.components()),
                    "utilities" => out.extend(catalog.utilities()),
                    _ => {}
                }
            }
            Node::AtRule(at) if at.name == "apply" => {
                let applied = apply(&at.params, selector.unwrap_or(":root"), catalog)?;
                out.extend(applied.decls);
                siblings.extend(applied.variants);
            }
            Node::AtRule(AtRule {
                name,
                params: _,
                nodes: Some(children),
            }) if matches!(name.as_str(), "layer" | "responsive" | "variants") => {
                out.extend(expand_nodes(children, catalog, selector, siblings)?);
            }
            Node::AtRule(AtRule {
                name,
                params,
                nodes: Some(children),
            }) => {
                let mut inner = Vec::new();
                let mut children = expand_nodes(children, catalog, selector, &mut inner)?;
                children.extend(inner);
                out.push(Node::AtRule(AtRule {
                    name,
                    params,
                    nodes: Some(children),
                }));
            }
            Node::Rule(rule) => {
                let mut inner = Vec::new();
                let children = expand_nodes(rule.nodes, catalog, Some(&rule.selector), &mut inner)?;
                out.push(Node::Rule(Rule::new(rule.selector, children)));
                out.extend(inner);
            }
            other => out.push(other),
        }
    }
    Ok(out)
}

/// Prefixes peeled off an `@apply` class such as `md:dark:hover:bg-blue-700`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Variant {
    screen: Option<&'static str>,
    dark: bool,
    state: Option<&'static str>,
}

impl Variant {
    fn is_plain(self) -> bool {
        self == Self::default()
    }

    /// Split `class` into its variant and the bare utility name. `None` when
    /// a prefix is unknown or repeated.
    fn split(class: &str) -> Option<(Self, &str)> {
        let mut variant = Self::default();
        let mut rest = class;
        while let Some((prefix, tail)) = rest.split_once(':') {
            if let Some(&(_, width)) = SCREENS.iter().find(|(name, _)| *name == prefix) {
                if variant.screen.is_some() || variant.dark || variant.state.is_some() {
                    return None;
                }
                variant.screen = Some(width);
            } else if prefix == "dark" {
                if variant.dark || variant.state.is_some() {
                    return None;
                }
                variant.dark = true;
            } else if let Some(state) = ["hover", "focus"].into_iter().find(|s| *s == prefix) {
                if variant.state.is_some() {
                    return None;
                }
                variant.state = Some(state);
            } else {
                return None;
            }
            rest = tail;
        }
        Some((variant, rest))
    }

    fn selector(self, selector: &str, dark: DarkMode) -> String {
        let ancestor = if self.dark && dark == DarkMode::Class {
            ".dark "
        } else {
            ""
        };
        let pseudo = self.state.map(|s| format!(":{s}")).unwrap_or_default();
        split_top_level(selector, ',')
            .iter()
            .map(|part| format!("{ancestor}{part}{pseudo}"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Wrap the variant rule in the media queries it needs.
    fn wrap(self, rule: Node, dark: DarkMode) -> Node {
        let mut node = rule;
        if self.dark && dark == DarkMode::Media {
            node = Node::AtRule(AtRule::block(
                "media",
                "(prefers-color-scheme: dark)",
                vec![node],
            ));
        }
        if let Some(width) = self.screen {
            node = Node::AtRule(AtRule::block(
                "media",
                format!("(min-width: {width})"),
                vec![node],
            ));
        }
        node
    }
}

struct Applied {
    decls: Vec<Node>,
    variants: Vec<Node>,
}

fn apply(params: &str, selector: &str, catalog: &Catalog) -> Result<Applied, CssError> {
    let mut important = false;
    // Variants in order of first appearance, each with its declarations.
    let mut groups: Vec<(Variant, Vec<Declaration>)> = vec![(Variant::default(), Vec::new())];
    for class in params.split_whitespace() {
        if class == "!important" {
            important = true;
            continue;
        }
        let unknown = || CssError::UnknownUtility {
            class: class.to_string(),
            selector: selector.to_string(),
        };
        let (variant, name) = Variant::split(class).ok_or_else(unknown)?;
        let utility = catalog.get(name).ok_or_else(unknown)?;
        // Only colour utilities carry state and dark variants.
        if (variant.state.is_some() || variant.dark) && !utility.colour {
            return Err(unknown());
        }
        if variant.dark && catalog.dark == DarkMode::Disabled {
            return Err(unknown());
        }

        let decls = utility.decls.iter().map(|(p, v)| Declaration::new(p, v));
        match groups.iter_mut().find(|(v, _)| *v == variant) {
            Some((_, group)) => group.extend(decls),
            None => groups.push((variant, decls.collect())),
        }
    }

    let as_nodes = |decls: Vec<Declaration>| -> Vec<Node> {
        decls
            .into_iter()
            .map(|mut d| {
                d.important = important;
                Node::Declaration(d)
            })
            .collect()
    };

    let mut applied = Applied {
        decls: Vec::new(),
        variants: Vec::new(),
    };
    for (variant, decls) in groups {
        if variant.is_plain() {
            applied.decls = as_nodes(decls);
        } else {
            let rule = Node::Rule(Rule::new(
                variant.selector(selector, catalog.dark),
                as_nodes(decls),
            ));
            applied.variants.push(variant.wrap(rule, catalog.dark));
        }
    }
    Ok(applied)
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

struct Builder<'t> {
    theme: &'t Theme,
    out: Vec<Utility>,
}

impl Builder<'_> {
    fn plugin(&mut self, name: &str, f: impl FnOnce(&mut Vec<Utility>)) {
        if self.theme.plugin_enabled(name) {
            f(&mut self.out);
        }
    }
}

fn simple(out: &mut Vec<Utility>, property: &str, items: &[(&str, &str)]) {
    for (class, value) in items {
        out.push(Utility::new(*class, &[(property, *value)]));
    }
}

fn palette() -> Vec<(String, &'static str)> {
    let mut colours = vec![
        ("transparent".to_string(), "transparent"),
        ("current".to_string(), "currentColor"),
        ("black".to_string(), "#000"),
        ("white".to_string(), "#fff"),
    ];
    for (family, shades) in PALETTE {
        for (shade, hex) in *shades {
            colours.push((format!("{family}-{shade}"), *hex));
        }
    }
    colours
}

fn build(theme: &Theme) -> Vec<Utility> {
    let mut b = Builder {
        theme,
        out: Vec::new(),
    };

    b.plugin("pointerEvents", |out| {
        simple(
            out,
            "pointer-events",
            &[
                ("pointer-events-none", "none"),
                ("pointer-events-auto", "auto"),
            ],
        );
    });

    b.plugin("visibility", |out| {
        simple(
            out,
            "visibility",
            &[("visible", "visible"), ("invisible", "hidden")],
        );
    });

    b.plugin("position", |out| {
        for v in ["static", "fixed", "absolute", "relative", "sticky"] {
            out.push(Utility::new(v, &[("position", v)]));
        }
    });

    b.plugin("inset", |out| {
        let extra: &[(&str, &str)] = &[("auto", "auto"), ("full", "100%"), ("1/2", "50%")];
        for &(k, v) in SPACING.iter().chain(extra) {
            out.push(Utility::same(
                format!("inset-{k}"),
                &["top", "right", "bottom", "left"],
                v,
            ));
            out.push(Utility::same(format!("inset-x-{k}"), &["left", "right"], v));
            out.push(Utility::same(format!("inset-y-{k}"), &["top", "bottom"], v));
            for side in ["top", "right", "bottom", "left"] {
                out.push(Utility::new(format!("{side}-{k}"), &[(side, v)]));
            }
        }
    });

    b.plugin("zIndex", |out| {
        for z in ["0", "10", "20", "30", "40", "50", "auto"] {
            out.push(Utility::new(format!("z-{z}"), &[("z-index", z)]));
        }
    });

    b.plugin("order", |out| {
        for n in 1..=12 {
            let v = n.to_string();
            out.push(Utility::new(format!("order-{n}"), &[("order", &v)]));
        }
        simple(
            out,
            "order",
            &[
                ("order-first", "-9999"),
                ("order-last", "9999"),
                ("order-none", "0"),
            ],
        );
    });

    b.plugin("gridTemplateColumns", |out| {
        for n in 1..=12 {
            let v = format!("repeat({n}, minmax(0, 1fr))");
            out.push(Utility::new(
                format!("grid-cols-{n}"),
                &[("grid-template-columns", &v)],
            ));
        }
        out.push(Utility::new(
            "grid-cols-none",
            &[("grid-template-columns", "none")],
        ));
    });

    b.plugin("gridColumn", |out| {
        out.push(Utility::new("col-auto", &[("grid-column", "auto")]));
        for n in 1..=12 {
            let v = format!("span {n} / span {n}");
            out.push(Utility::new(
                format!("col-span-{n}"),
                &[("grid-column", &v)],
            ));
        }
        out.push(Utility::new("col-span-full", &[("grid-column", "1 / -1")]));
    });

    b.plugin("gridTemplateRows", |out| {
        for n in 1..=6 {
            let v = format!("repeat({n}, minmax(0, 1fr))");
            out.push(Utility::new(
                format!("grid-rows-{n}"),
                &[("grid-template-rows", &v)],
            ));
        }
    });

    b.plugin("gridRow", |out| {
        for n in 1..=6 {
            let v = format!("span {n} / span {n}");
            out.push(Utility::new(format!("row-span-{n}"), &[("grid-row", &v)]));
        }
        out.push(Utility::new("row-span-full", &[("grid-row", "1 / -1")]));
    });

    b.plugin("margin", |out| {
        let sides: &[(&str, &[&str])] = &[
            ("m", &["margin"]),
            ("mx", &["margin-left", "margin-right"]),
            ("my", &["margin-top", "margin-bottom"]),
            ("mt", &["margin-top"]),
            ("mr", &["margin-right"]),
            ("mb", &["margin-bottom"]),
            ("ml", &["margin-left"]),
        ];
        for (prefix, props) in sides {
            for (k, v) in SPACING.iter().chain(&[("auto", "auto")]) {
                out.push(Utility::same(format!("{prefix}-{k}"), props, v));
            }
            for (k, v) in SPACING.iter().filter(|(k, _)| *k != "0") {
                let neg = format!("-{v}");
                out.push(Utility::same(format!("-{prefix}-{k}"), props, &neg));
            }
        }
    });

    b.plugin("boxSizing", |out| {
        simple(
            out,
            "box-sizing",
            &[("box-border", "border-box"), ("box-content", "content-box")],
        );
    });

    b.plugin("display", |out| {
        simple(
            out,
            "display",
            &[
                ("block", "block"),
                ("inline-block", "inline-block"),
                ("inline", "inline"),
                ("flex", "flex"),
                ("inline-flex", "inline-flex"),
                ("table", "table"),
                ("table-row", "table-row"),
                ("table-cell", "table-cell"),
                ("grid", "grid"),
                ("inline-grid", "inline-grid"),
                ("contents", "contents"),
                ("hidden", "none"),
            ],
        );
    });

    b.plugin("height", |out| {
        let extra: &[(&str, &str)] = &[("auto", "auto"), ("full", "100%"), ("screen", "100vh")];
        for &(k, v) in SPACING.iter().chain(extra) {
            out.push(Utility::new(format!("h-{k}"), &[("height", v)]));
        }
    });

    b.plugin("minHeight", |out| {
        simple(
            out,
            "min-height",
            &[
                ("min-h-0", "0px"),
                ("min-h-full", "100%"),
                ("min-h-screen", "100vh"),
            ],
        );
    });

    b.plugin("width", |out| {
        let extra: &[(&str, &str)] = &[
            ("auto", "auto"),
            ("full", "100%"),
            ("screen", "100vw"),
            ("min", "min-content"),
            ("max", "max-content"),
        ];
        for &(k, v) in SPACING.iter().chain(FRACTIONS).chain(extra) {
            out.push(Utility::new(format!("w-{k}"), &[("width", v)]));
        }
    });

    b.plugin("minWidth", |out| {
        simple(
            out,
            "min-width",
            &[("min-w-0", "0px"), ("min-w-full", "100%")],
        );
    });

    b.plugin("maxWidth", |out| {
        simple(
            out,
            "max-width",
            &[
                ("max-w-none", "none"),
                ("max-w-xs", "20rem"),
                ("max-w-sm", "24rem"),
                ("max-w-md", "28rem"),
                ("max-w-lg", "32rem"),
                ("max-w-xl", "36rem"),
                ("max-w-2xl", "42rem"),
                ("max-w-3xl", "48rem"),
                ("max-w-4xl", "56rem"),
                ("max-w-5xl", "64rem"),
                ("max-w-6xl", "72rem"),
                ("max-w-7xl", "80rem"),
                ("max-w-full", "100%"),
                ("max-w-prose", "65ch"),
            ],
        );
    });

    b.plugin("flex", |out| {
        simple(
            out,
            "flex",
            &[
                ("flex-1", "1 1 0%"),
                ("flex-auto", "1 1 auto"),
                ("flex-initial", "0 1 auto"),
                ("flex-none", "none"),
            ],
        );
    });

    b.plugin("flexShrink", |out| {
        simple(
            out,
            "flex-shrink",
            &[("flex-shrink-0", "0"), ("flex-shrink", "1")],
        );
    });

    b.plugin("flexGrow", |out| {
        simple(
            out,
            "flex-grow",
            &[("flex-grow-0", "0"), ("flex-grow", "1")],
        );
    });

    b.plugin("cursor", |out| {
        for c in [
            "auto",
            "default",
            "pointer",
            "wait",
            "text",
            "move",
            "not-allowed",
        ] {
            out.push(Utility::new(format!("cursor-{c}"), &[("cursor", c)]));
        }
    });

    b.plugin("userSelect", |out| {
        for s in ["none", "text", "all", "auto"] {
            out.push(Utility::new(format!("select-{s}"), &[("user-select", s)]));
        }
    });

    b.plugin("appearance", |out| {
        out.push(Utility::new("appearance-none", &[("appearance", "none")]));
    });

    b.plugin("listStyleType", |out| {
        simple(
            out,
            "list-style-type",
            &[
                ("list-none", "none"),
                ("list-disc", "disc"),
                ("list-decimal", "decimal"),
            ],
        );
    });

    b.plugin("flexDirection", |out| {
        simple(
            out,
            "flex-direction",
            &[
                ("flex-row", "row"),
                ("flex-row-reverse", "row-reverse"),
                ("flex-col", "column"),
                ("flex-col-reverse", "column-reverse"),
            ],
        );
    });

    b.plugin("flexWrap", |out| {
        simple(
            out,
            "flex-wrap",
            &[
                ("flex-wrap", "wrap"),
                ("flex-wrap-reverse", "wrap-reverse"),
                ("flex-nowrap", "nowrap"),
            ],
        );
    });

    b.plugin("alignContent", |out| {
        simple(
            out,
            "align-content",
            &[
                ("content-center", "center"),
                ("content-start", "flex-start"),
                ("content-end", "flex-end"),
                ("content-between", "space-between"),
                ("content-around", "space-around"),
            ],
        );
    });

    b.plugin("alignItems", |out| {
        simple(
            out,
            "align-items",
            &[
                ("items-start", "flex-start"),
                ("items-end", "flex-end"),
                ("items-center", "center"),
                ("items-baseline", "baseline"),
                ("items-stretch", "stretch"),
            ],
        );
    });

    b.plugin("justifyContent", |out| {
        simple(
            out,
            "justify-content",
            &[
                ("justify-start", "flex-start"),
                ("justify-end", "flex-end"),
                ("justify-center", "center"),
                ("justify-between", "space-between"),
                ("justify-around", "space-around"),
                ("justify-evenly", "space-evenly"),
            ],
        );
    });

    b.plugin("gap", |out| {
        for &(k, v) in SPACING {
            out.push(Utility::new(format!("gap-{k}"), &[("gap", v)]));
            out.push(Utility::new(format!("gap-x-{k}"), &[("column-gap", v)]));
            out.push(Utility::new(format!("gap-y-{k}"), &[("row-gap", v)]));
        }
    });

    b.plugin("alignSelf", |out| {
        simple(
            out,
            "align-self",
            &[
                ("self-auto", "auto"),
                ("self-start", "flex-start"),
                ("self-end", "flex-end"),
                ("self-center", "center"),
                ("self-stretch", "stretch"),
            ],
        );
    });

    b.plugin("overflow", |out| {
        for v in ["auto", "hidden", "visible", "scroll"] {
            out.push(Utility::new(format!("overflow-{v}"), &[("overflow", v)]));
            out.push(Utility::new(
                format!("overflow-x-{v}"),
                &[("overflow-x", v)],
            ));
            out.push(Utility::new(
                format!("overflow-y-{v}"),
                &[("overflow-y", v)],
            ));
        }
    });

    b.plugin("textOverflow", |out| {
        out.push(Utility::new(
            "truncate",
            &[
                ("overflow", "hidden"),
                ("text-overflow", "ellipsis"),
                ("white-space", "nowrap"),
            ],
        ));
    });

    b.plugin("whitespace", |out| {
        for v in ["normal", "nowrap", "pre", "pre-line", "pre-wrap"] {
            out.push(Utility::new(
                format!("whitespace-{v}"),
                &[("white-space", v)],
            ));
        }
    });

    b.plugin("wordBreak", |out| {
        out.push(Utility::new(
            "break-normal",
            &[("overflow-wrap", "normal"), ("word-break", "normal")],
        ));
        out.push(Utility::new(
            "break-words",
            &[("overflow-wrap", "break-word")],
        ));
        out.push(Utility::new("break-all", &[("word-break", "break-all")]));
    });

    b.plugin("borderRadius", |out| {
        simple(
            out,
            "border-radius",
            &[
                ("rounded-none", "0px"),
                ("rounded-sm", "0.125rem"),
                ("rounded", "0.25rem"),
                ("rounded-md", "0.375rem"),
                ("rounded-lg", "0.5rem"),
                ("rounded-xl", "0.75rem"),
                ("rounded-2xl", "1rem"),
                ("rounded-3xl", "1.5rem"),
                ("rounded-full", "9999px"),
            ],
        );
    });

    b.plugin("borderWidth", |out| {
        for (suffix, width) in [
            ("-0", "0px"),
            ("-2", "2px"),
            ("-4", "4px"),
            ("-8", "8px"),
            ("", "1px"),
        ] {
            out.push(Utility::new(
                format!("border{suffix}"),
                &[("border-width", width)],
            ));
            for (side, prop) in [
                ("t", "border-top-width"),
                ("r", "border-right-width"),
                ("b", "border-bottom-width"),
                ("l", "border-left-width"),
            ] {
                out.push(Utility::new(
                    format!("border-{side}{suffix}"),
                    &[(prop, width)],
                ));
            }
        }
    });

    b.plugin("borderStyle", |out| {
        for v in ["solid", "dashed", "dotted", "double", "none"] {
            out.push(Utility::new(format!("border-{v}"), &[("border-style", v)]));
        }
    });

    b.plugin("borderColor", |out| {
        for (name, hex) in palette() {
            out.push(Utility::new(format!("border-{name}"), &[("border-color", hex)]).colour());
        }
    });

    b.plugin("backgroundColor", |out| {
        for (name, hex) in palette() {
            out.push(Utility::new(format!("bg-{name}"), &[("background-color", hex)]).colour());
        }
    });

    b.plugin("objectFit", |out| {
        for v in ["contain", "cover", "fill", "none", "scale-down"] {
            out.push(Utility::new(format!("object-{v}"), &[("object-fit", v)]));
        }
    });

    b.plugin("padding", |out| {
        let sides: &[(&str, &[&str])] = &[
            ("p", &["padding"]),
            ("px", &["padding-left", "padding-right"]),
            ("py", &["padding-top", "padding-bottom"]),
            ("pt", &["padding-top"]),
            ("pr", &["padding-right"]),
            ("pb", &["padding-bottom"]),
            ("pl", &["padding-left"]),
        ];
        for (prefix, props) in sides {
            for &(k, v) in SPACING {
                out.push(Utility::same(format!("{prefix}-{k}"), props, v));
            }
        }
    });

    b.plugin("textAlign", |out| {
        for v in ["left", "center", "right", "justify"] {
            out.push(Utility::new(format!("text-{v}"), &[("text-align", v)]));
        }
    });

    b.plugin("fontFamily", |out| {
        for (key, stack) in theme.font_families() {
            let value = stack.join(", ");
            out.push(Utility::new(
                format!("font-{key}"),
                &[("font-family", &value)],
            ));
        }
    });

    b.plugin("fontSize", |out| {
        let sizes: &[(&str, &str, &str)] = &[
            ("xs", "0.75rem", "1rem"),
            ("sm", "0.875rem", "1.25rem"),
            ("base", "1rem", "1.5rem"),
            ("lg", "1.125rem", "1.75rem"),
            ("xl", "1.25rem", "1.75rem"),
            ("2xl", "1.5rem", "2rem"),
            ("3xl", "1.875rem", "2.25rem"),
            ("4xl", "2.25rem", "2.5rem"),
            ("5xl", "3rem", "1"),
            ("6xl", "3.75rem", "1"),
            ("7xl", "4.5rem", "1"),
            ("8xl", "6rem", "1"),
            ("9xl", "8rem", "1"),
        ];
        for &(k, size, line) in sizes {
            out.push(Utility::new(
                format!("text-{k}"),
                &[("font-size", size), ("line-height", line)],
            ));
        }
    });

    b.plugin("fontWeight", |out| {
        let weights = [
            ("thin", "100"),
            ("extralight", "200"),
            ("light", "300"),
            ("normal", "400"),
            ("medium", "500"),
            ("semibold", "600"),
            ("bold", "700"),
            ("extrabold", "800"),
            ("black", "900"),
        ];
        for (k, w) in weights {
            out.push(Utility::new(format!("font-{k}"), &[("font-weight", w)]));
        }
    });

    b.plugin("textTransform", |out| {
        simple(
            out,
            "text-transform",
            &[
                ("uppercase", "uppercase"),
                ("lowercase", "lowercase"),
                ("capitalize", "capitalize"),
                ("normal-case", "none"),
            ],
        );
    });

    b.plugin("fontStyle", |out| {
        simple(
            out,
            "font-style",
            &[("italic", "italic"), ("not-italic", "normal")],
        );
    });

    b.plugin("lineHeight", |out| {
        simple(
            out,
            "line-height",
            &[
                ("leading-3", ".75rem"),
                ("leading-4", "1rem"),
                ("leading-5", "1.25rem"),
                ("leading-6", "1.5rem"),
                ("leading-7", "1.75rem"),
                ("leading-8", "2rem"),
                ("leading-9", "2.25rem"),
                ("leading-10", "2.5rem"),
                ("leading-none", "1"),
                ("leading-tight", "1.25"),
                ("leading-snug", "1.375"),
                ("leading-normal", "1.5"),
                ("leading-relaxed", "1.625"),
                ("leading-loose", "2"),
            ],
        );
    });

    b.plugin("letterSpacing", |out| {
        simple(
            out,
            "letter-spacing",
            &[
                ("tracking-tighter", "-0.05em"),
                ("tracking-tight", "-0.025em"),
                ("tracking-normal", "0em"),
                ("tracking-wide", "0.025em"),
                ("tracking-wider", "0.05em"),
                ("tracking-widest", "0.1em"),
            ],
        );
    });

    b.plugin("textColor", |out| {
        for (name, hex) in palette() {
            out.push(Utility::new(format!("text-{name}"), &[("color", hex)]).colour());
        }
    });

    b.plugin("textDecoration", |out| {
        simple(
            out,
            "text-decoration",
            &[
                ("underline", "underline"),
                ("line-through", "line-through"),
                ("no-underline", "none"),
            ],
        );
    });

    b.plugin("fontSmoothing", |out| {
        out.push(Utility::new(
            "antialiased",
            &[
                ("-webkit-font-smoothing", "antialiased"),
                ("-moz-osx-font-smoothing", "grayscale"),
            ],
        ));
        out.push(Utility::new(
            "subpixel-antialiased",
            &[
                ("-webkit-font-smoothing", "auto"),
                ("-moz-osx-font-smoothing", "auto"),
            ],
        ));
    });

    b.plugin("opacity", |out| {
        for n in [0, 5, 10, 20, 25, 30, 40, 50, 60, 70, 75, 80, 90, 95, 100] {
            let v = match n {
                0 => "0".to_string(),
                100 => "1".to_string(),
                n => format!("{}", f64::from(n) / 100.0),
            };
            out.push(Utility::new(format!("opacity-{n}"), &[("opacity", &v)]));
        }
    });

    b.plugin("boxShadow", |out| {
        simple(
            out,
            "box-shadow",
            &[
                ("shadow-sm", "0 1px 2px 0 rgba(0, 0, 0, 0.05)"),
                (
                    "shadow",
                    "0 1px 3px 0 rgba(0, 0, 0, 0.1), 0 1px 2px 0 rgba(0, 0, 0, 0.06)",
                ),
                (
                    "shadow-md",
                    "0 4px 6px -1px rgba(0, 0, 0, 0.1), 0 2px 4px -1px rgba(0, 0, 0, 0.06)",
                ),
                (
                    "shadow-lg",
                    "0 10px 15px -3px rgba(0, 0, 0, 0.1), 0 4px 6px -2px rgba(0, 0, 0, 0.05)",
                ),
                (
                    "shadow-xl",
                    "0 20px 25px -5px rgba(0, 0, 0, 0.1), 0 10px 10px -5px rgba(0, 0, 0, 0.04)",
                ),
                ("shadow-2xl", "0 25px 50px -12px rgba(0, 0, 0, 0.25)"),
                ("shadow-inner", "inset 0 2px 4px 0 rgba(0, 0, 0, 0.06)"),
                ("shadow-none", "0 0 #0000"),
            ],
        );
    });

    b.plugin("outline", |out| {
        out.push(Utility::new(
            "outline-none",
            &[
                ("outline", "2px solid transparent"),
                ("outline-offset", "2px"),
            ],
        ));
    });

    b.plugin("transitionProperty", |out| {
        let timing = ("transition-timing-function", "cubic-bezier(0.4, 0, 0.2, 1)");
        let duration = ("transition-duration", "150ms");
        for (class, props) in [
            (
                "transition",
                "background-color, border-color, color, fill, stroke, opacity, box-shadow, transform",
            ),
            ("transition-all", "all"),
            ("transition-colors", "background-color, border-color, color, fill, stroke"),
            ("transition-opacity", "opacity"),
            ("transition-shadow", "box-shadow"),
            ("transition-transform", "transform"),
        ] {
            out.push(Utility::new(class, &[("transition-property", props), timing, duration]));
        }
        out.push(Utility::new("transition-none", &[("transition-property", "none")]));
    });

    b.plugin("transitionDuration", |out| {
        for ms in ["75", "100", "150", "200", "300", "500", "700", "1000"] {
            let v = format!("{ms}ms");
            out.push(Utility::new(
                format!("duration-{ms}"),
                &[("transition-duration", &v)],
            ));
        }
    });

    b.plugin("transitionTimingFunction", |out| {
        simple(
            out,
            "transition-timing-function",
            &[
                ("ease-linear", "linear"),
                ("ease-in", "cubic-bezier(0.4, 0, 1, 1)"),
                ("ease-out", "cubic-bezier(0, 0, 0.2, 1)"),
                ("ease-in-out", "cubic-bezier(0.4, 0, 0.2, 1)"),
            ],
        );
    });

    b.out
}
