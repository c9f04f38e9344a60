//! # TTML style property table
//!
//! Every `tts:*` property the pipeline understands, with the CSS properties it turns into,
//! the elements it applies to, its default, the values it accepts and the function that
//! converts a TTML value into CSS.

use std::sync::LazyLock;

use captions_core::{EdgeStyle, ResolvedStyle, StyleOptions};
use regex::Regex;

use crate::values::{color::hex_to_rgba, first_length, parse_color, parse_lengths};

pub const TAG_BODY: &str = "body";
pub const TAG_DIV: &str = "div";
pub const TAG_P: &str = "p";
pub const TAG_REGION: &str = "region";
pub const TAG_SPAN: &str = "span";

const ALL_CONTENT_TAGS: &[&str] = &[TAG_BODY, TAG_DIV, TAG_P, TAG_REGION, TAG_SPAN];
const TEXT_TAGS: &[&str] = &[TAG_SPAN, TAG_P];
const BLOCK_TAGS: &[&str] = &[TAG_REGION, TAG_DIV, TAG_P, TAG_BODY];
const REGION_ONLY: &[&str] = &[TAG_REGION];

pub const DEFAULT_FONT_FAMILY: &str = "\"Andale Mono\", \"Lucida Console\", monospace";

/// Used as the outline color when neither the value nor the cascade provide one.
const FALLBACK_OUTLINE_COLOR: &str = "rgba(255,255,255,1)";

/// Properties applied on the paragraph itself instead of being left to generic inheritance.
pub const PARAGRAPH_SPECIFIC_STYLES: &[&str] = &[
    "textAlign",
    "lineHeight",
    "origin",
    "extent",
    "textOutline",
    "color",
    "fontFamily",
    "fontSize",
    "fontStyle",
    "fontWeight",
    "textDecoration",
    "wrapOption",
];

/// Properties passed from an element to its descendants when they do not set them.
pub const INHERITED_STYLES: &[&str] = &[
    "color",
    "direction",
    "fontFamily",
    "fontSize",
    "fontStyle",
    "fontWeight",
    "lineHeight",
    "textAlign",
    "textDecoration",
    "textOutline",
    "visibility",
    "wrapOption",
];

/// Paragraph-specific properties that position the box. Captions cannot be positioned
/// themselves, these stay on the region wrapper.
pub const LAYOUT_STYLES: &[&str] = &["origin", "extent"];

/// Context a transform may read besides the raw value.
#[derive(Debug, Clone, Copy)]
pub struct TransformContext<'a> {
    pub options: &'a StyleOptions,
    /// Height of the caption area, for cell units.
    pub cell_height: f64,
}

/// The result of converting one TTML value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformedValue {
    /// A value for the first CSS property of the entry.
    Single(String),
    /// One value per CSS property of the entry, in order.
    Expanded(Vec<String>),
}

impl TransformedValue {
    fn single(value: impl Into<String>) -> Option<Self> {
        Some(Self::Single(value.into()))
    }
}

/// Converts a validated TTML value. `partial` holds the declarations resolved so far for
/// the element. Returning `None` asks for the property default.
pub type StyleTransform =
    fn(value: &str, partial: &ResolvedStyle, ctx: &TransformContext<'_>) -> Option<TransformedValue>;

/// Static description of one TTML style property.
#[derive(Debug, Clone, Copy)]
pub struct StylePropertySpec {
    /// TTML attribute name without prefix, e.g. `backgroundColor`.
    pub name: &'static str,
    /// CSS properties this expands to.
    pub css: &'static [&'static str],
    /// Elements the property applies to.
    pub tags: &'static [&'static str],
    /// Default, one entry per CSS property when it has several.
    pub default: &'static [&'static str],
    /// Legal TTML values, if the property has a closed set.
    pub values: Option<&'static [&'static str]>,
    pub transform: Option<StyleTransform>,
}

impl StylePropertySpec {
    #[must_use]
    pub fn applies_to(&self, tag: &str) -> bool {
        self.tags.contains(&tag)
    }

    /// Only meaningful on `<region>`; split out of style classes into `<id>-region`.
    #[must_use]
    pub fn is_region_only(&self) -> bool {
        self.tags == REGION_ONLY
    }

    #[must_use]
    pub fn is_inherited(&self) -> bool {
        INHERITED_STYLES.contains(&self.name)
    }

    #[must_use]
    pub fn is_legal(&self, value: &str) -> bool {
        let Some(legal) = self.values else {
            return true;
        };
        let mut tokens = value
            .split([',', ' ', '\t', '\n'])
            .filter(|t| !t.is_empty())
            .peekable();
        tokens.peek().is_some() && tokens.all(|t| legal.contains(&t))
    }

    fn default_value(&self) -> Option<TransformedValue> {
        match self.default {
            [] => None,
            [single] => TransformedValue::single(*single),
            many => Some(TransformedValue::Expanded(
                many.iter().map(ToString::to_string).collect(),
            )),
        }
    }

    /// Validates and converts a raw TTML value into CSS declarations.
    ///
    /// An illegal value is replaced by the default before the transform runs. When the
    /// transform cannot make sense of the value the default is used instead.
    #[must_use]
    pub fn compute(
        &self,
        raw: &str,
        partial: &ResolvedStyle,
        ctx: &TransformContext<'_>,
    ) -> Vec<(&'static str, String)> {
        let raw = raw.trim();
        let value = if self.is_legal(raw) {
            raw
        } else if let [default] = self.default {
            default
        } else {
            return self.default_value().map(|v| self.expand(v)).unwrap_or_default();
        };

        let transformed = match self.transform {
            Some(transform) => transform(value, partial, ctx)
                .or_else(|| match self.default {
                    [default] if *default != value => transform(default, partial, ctx),
                    _ => None,
                })
                .or_else(|| self.default_value()),
            None => TransformedValue::single(value),
        };
        transformed.map(|v| self.expand(v)).unwrap_or_default()
    }

    fn expand(&self, value: TransformedValue) -> Vec<(&'static str, String)> {
        match value {
            TransformedValue::Single(v) => self.css.first().map(|css| vec![(*css, v)]).unwrap_or_default(),
            TransformedValue::Expanded(values) => self.css.iter().copied().zip(values).collect(),
        }
    }
}

pub static STYLE_SCHEMA: &[StylePropertySpec] = &[
    StylePropertySpec {
        name: "backgroundColor",
        css: &["background-color"],
        tags: ALL_CONTENT_TAGS,
        default: &[],
        values: None,
        transform: Some(background_color),
    },
    StylePropertySpec {
        name: "color",
        css: &["color"],
        tags: TEXT_TAGS,
        default: &[],
        values: None,
        transform: Some(color),
    },
    StylePropertySpec {
        name: "direction",
        css: &["direction"],
        tags: TEXT_TAGS,
        default: &["ltr"],
        values: Some(&["ltr", "rtl"]),
        transform: None,
    },
    StylePropertySpec {
        name: "display",
        css: &["display"],
        tags: ALL_CONTENT_TAGS,
        default: &["inline-block"],
        values: Some(&["auto", "none"]),
        transform: Some(display),
    },
    StylePropertySpec {
        name: "displayAlign",
        css: &["vertical-align"],
        tags: REGION_ONLY,
        default: &["before"],
        values: Some(&["before", "center", "after"]),
        transform: Some(display_align),
    },
    StylePropertySpec {
        name: "extent",
        css: &["width", "height"],
        tags: BLOCK_TAGS,
        default: &["auto", "auto"],
        values: None,
        transform: Some(extent),
    },
    StylePropertySpec {
        name: "fontFamily",
        css: &["font-family", "font-variant"],
        tags: TEXT_TAGS,
        default: &[],
        values: None,
        transform: Some(font_family),
    },
    StylePropertySpec {
        name: "fontSize",
        css: &["font-size"],
        tags: TEXT_TAGS,
        default: &["1c"],
        values: None,
        transform: Some(font_size),
    },
    StylePropertySpec {
        name: "fontStyle",
        css: &["font-style"],
        tags: TEXT_TAGS,
        default: &["normal"],
        values: Some(&["normal", "italic", "oblique"]),
        transform: None,
    },
    StylePropertySpec {
        name: "fontWeight",
        css: &["font-weight"],
        tags: TEXT_TAGS,
        default: &["normal"],
        values: Some(&["normal", "bold"]),
        transform: None,
    },
    StylePropertySpec {
        name: "lineHeight",
        css: &["line-height"],
        tags: &[TAG_P],
        default: &["normal"],
        values: None,
        transform: Some(line_height),
    },
    StylePropertySpec {
        name: "opacity",
        css: &["opacity"],
        tags: REGION_ONLY,
        default: &["1.0"],
        values: None,
        transform: Some(opacity),
    },
    StylePropertySpec {
        name: "origin",
        css: &["top", "right", "bottom", "left"],
        tags: BLOCK_TAGS,
        default: &["auto", "auto", "auto", "auto"],
        values: None,
        transform: Some(origin),
    },
    StylePropertySpec {
        name: "overflow",
        css: &["overflow"],
        tags: REGION_ONLY,
        default: &["hidden"],
        values: Some(&["visible", "hidden"]),
        transform: None,
    },
    StylePropertySpec {
        name: "padding",
        css: &["padding"],
        tags: REGION_ONLY,
        default: &["0px"],
        values: None,
        transform: Some(padding),
    },
    StylePropertySpec {
        name: "textAlign",
        css: &["text-align"],
        tags: &[TAG_P],
        default: &["start"],
        values: Some(&["left", "center", "right", "start", "end"]),
        transform: Some(text_align),
    },
    StylePropertySpec {
        name: "textDecoration",
        css: &["text-decoration"],
        tags: TEXT_TAGS,
        default: &["none"],
        values: Some(&[
            "none",
            "underline",
            "noUnderline",
            "lineThrough",
            "noLineThrough",
            "overline",
            "noOverline",
        ]),
        transform: Some(text_decoration),
    },
    StylePropertySpec {
        name: "textOutline",
        css: &["text-shadow"],
        tags: TEXT_TAGS,
        default: &["none"],
        values: None,
        transform: Some(text_outline),
    },
    StylePropertySpec {
        name: "unicodeBidi",
        css: &["unicode-bidi"],
        tags: TEXT_TAGS,
        default: &["normal"],
        values: Some(&["normal", "embed", "bidiOverride"]),
        transform: Some(unicode_bidi),
    },
    StylePropertySpec {
        name: "visibility",
        css: &["visibility"],
        tags: ALL_CONTENT_TAGS,
        default: &["visible"],
        values: Some(&["visible", "hidden"]),
        transform: None,
    },
    StylePropertySpec {
        name: "wrapOption",
        css: &["white-space"],
        tags: TEXT_TAGS,
        default: &["wrap"],
        values: Some(&["wrap", "noWrap"]),
        transform: Some(wrap_option),
    },
    StylePropertySpec {
        name: "writingMode",
        css: &["writing-mode"],
        tags: REGION_ONLY,
        default: &["lrtb"],
        values: Some(&["lrtb", "rltb", "tbrl", "tblr", "lr", "rl", "tb"]),
        transform: Some(writing_mode),
    },
    StylePropertySpec {
        name: "zIndex",
        css: &["z-index"],
        tags: REGION_ONLY,
        default: &["auto"],
        values: None,
        transform: None,
    },
];

/// Finds the table entry of a TTML property by its unprefixed name.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static StylePropertySpec> {
    STYLE_SCHEMA.iter().find(|prop| prop.name == name)
}

/// Specs applicable to `tag`, in table order.
pub fn properties_for(tag: &str) -> impl Iterator<Item = &'static StylePropertySpec> + '_ {
    STYLE_SCHEMA.iter().filter(move |prop| prop.applies_to(tag))
}

pub fn inherited_properties() -> impl Iterator<Item = &'static StylePropertySpec> {
    INHERITED_STYLES.iter().filter_map(|name| lookup(name))
}

/// CSS properties produced by inherited TTML properties.
static INHERITED_CSS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    inherited_properties()
        .flat_map(|prop| prop.css.iter().copied())
        .collect()
});

/// CSS properties that belong on the caption text rather than on its region wrapper.
static TEXT_CSS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PARAGRAPH_SPECIFIC_STYLES
        .iter()
        .filter(|name| !LAYOUT_STYLES.contains(name))
        .filter_map(|name| lookup(name))
        .flat_map(|prop| prop.css.iter().copied())
        .collect()
});

#[must_use]
pub fn is_inherited_css(property: &str) -> bool {
    INHERITED_CSS.contains(&property)
}

#[must_use]
pub fn is_text_css(property: &str) -> bool {
    TEXT_CSS.contains(&property)
}

// --- transforms ---

fn background_color(
    value: &str,
    _: &ResolvedStyle,
    ctx: &TransformContext<'_>,
) -> Option<TransformedValue> {
    let options = ctx.options;
    let color = if options.set && options.show_background {
        options.background_color.as_deref().unwrap_or(value)
    } else {
        value
    };
    TransformedValue::single(parse_color(color, options.active(options.background_opacity)).value)
}

fn color(value: &str, _: &ResolvedStyle, ctx: &TransformContext<'_>) -> Option<TransformedValue> {
    let options = ctx.options;
    let color = options.active(options.text_color.as_deref()).unwrap_or(value);
    TransformedValue::single(parse_color(color, options.active(options.text_opacity)).value)
}

fn generic_font_family(name: &str) -> Option<&'static str> {
    let family = match name {
        "default" => DEFAULT_FONT_FAMILY,
        "monospace" => "monospace",
        "sansSerif" => "sans-serif",
        "serif" => "serif",
        "monospaceSansSerif" => "\"Andale Mono\", \"Lucida Console\", monospace",
        "monospaceSerif" => "\"Courier New\", monospace",
        "proportionalSansSerif" => "sans-serif",
        "proportionalSerif" => "serif",
        "casual" => "\"Comic Sans MS\", Impact, fantasy",
        "script" => "\"Monotype Corsiva\", cursive",
        "smallcaps" => "\"Andale Mono\", \"Lucida Console\", monospace, sans-serif",
        _ => return None,
    };
    Some(family)
}

fn font_family(
    value: &str,
    _: &ResolvedStyle,
    ctx: &TransformContext<'_>,
) -> Option<TransformedValue> {
    let names: Vec<&str> = value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect();
    let last_is_generic = names
        .last()
        .is_some_and(|name| generic_font_family(name).is_some());

    let mut families: Vec<&str> = names
        .iter()
        .map(|name| generic_font_family(name).unwrap_or(name))
        .collect();
    if !last_is_generic {
        families.push(DEFAULT_FONT_FAMILY);
    }

    let options = ctx.options;
    let preferred = options
        .active(options.font_family.as_deref())
        .or_else(|| options.active(options.font_name.as_deref()));
    if let Some(preferred) = preferred {
        families.insert(0, generic_font_family(preferred).unwrap_or(preferred));
    }

    let fonts = families.join(",");
    let small_caps = [&options.font_family, &options.font_name]
        .into_iter()
        .any(|option| options.active(option.as_deref()) == Some("smallcaps"));
    if small_caps {
        return Some(TransformedValue::Expanded(vec![
            fonts,
            "small-caps".to_string(),
        ]));
    }
    TransformedValue::single(fonts)
}

fn font_size(value: &str, _: &ResolvedStyle, ctx: &TransformContext<'_>) -> Option<TransformedValue> {
    let options = ctx.options;
    let value = options.active(options.font_size.as_deref()).unwrap_or(value);
    // `<length> <length>?`, only the first one is used
    first_length(value, ctx.cell_height).map(TransformedValue::Single)
}

fn text_align(value: &str, _: &ResolvedStyle, ctx: &TransformContext<'_>) -> Option<TransformedValue> {
    let options = ctx.options;
    TransformedValue::single(options.active(options.text_align.as_deref()).unwrap_or(value))
}

/// TTML decorations are inherited and can be switched off again with the `no*` values.
/// CSS decorations cannot be removed on descendants, so any negative value turns every
/// decoration off.
fn text_decoration(value: &str, _: &ResolvedStyle, _: &TransformContext<'_>) -> Option<TransformedValue> {
    let mut decorations = Vec::new();
    for token in value.split([',', ' ']).map(str::trim).filter(|t| !t.is_empty()) {
        match token {
            "none" | "noUnderline" | "noLineThrough" | "noOverline" => {
                return TransformedValue::single("none");
            }
            "lineThrough" => decorations.push("line-through"),
            other => decorations.push(other),
        }
    }
    if decorations.is_empty() {
        return TransformedValue::single("none");
    }
    TransformedValue::single(decorations.join(" "))
}

fn edge_style_shadow(edge: EdgeStyle, opacity: f64) -> String {
    let light = hex_to_rgba("CCC", Some(opacity)).value;
    let dark = hex_to_rgba("222", Some(opacity)).value;
    match edge {
        EdgeStyle::None => "none".to_string(),
        EdgeStyle::DropShadow => {
            format!("2px 2px 3px {dark}, 2px 2px 4px {dark}, 2px 2px 5px {dark}")
        }
        EdgeStyle::Raised => format!("1px 1px {dark}, 2px 2px {dark}, 3px 3px {dark}"),
        EdgeStyle::Depressed => {
            format!("1px 1px {light}, 0 1px {light}, -1px -1px {dark}, 0 -1px {dark}")
        }
        EdgeStyle::Uniform => {
            format!("0 0 4px {dark}, 0 0 4px {dark}, 0 0 4px {dark}, 0 0 4px {dark}")
        }
    }
}

/// `none | <color>? <length> <length>?`
///
/// The first length is the outline thickness, the second the blur radius. CSS has no
/// outline with blur, so the outline is approximated by stacking text shadows of
/// decreasing size.
fn text_outline(
    value: &str,
    partial: &ResolvedStyle,
    ctx: &TransformContext<'_>,
) -> Option<TransformedValue> {
    let options = ctx.options;
    if let Some(edge) = options.active(options.edge_style) {
        let opacity = options.text_opacity.unwrap_or(1.0);
        return TransformedValue::single(edge_style_shadow(edge, opacity));
    }
    if value == "none" {
        return TransformedValue::single("none");
    }

    let starts_with_number = value.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | '.'));
    let (color, rest) = if starts_with_number {
        let inherited = partial.get("color").unwrap_or(FALLBACK_OUTLINE_COLOR);
        (inherited.to_string(), value)
    } else {
        let parsed = parse_color(value, None);
        let rest = value.get(parsed.original_len..).unwrap_or_default().trim();
        (parsed.value, rest)
    };

    let lengths = parse_lengths(rest, ctx.cell_height);
    if lengths.is_empty() || lengths.len() > 2 {
        return TransformedValue::single("none");
    }
    let thickness = &lengths[0];
    let blur = lengths.get(1).map_or("2px", String::as_str);
    if !thickness.ends_with("px") || !blur.ends_with("px") {
        return TransformedValue::single("none");
    }

    let thickness = thickness
        .trim_end_matches("px")
        .parse::<f64>()
        .map(f64::trunc)
        .unwrap_or(0.0);
    if thickness < 1.0 {
        return TransformedValue::single("none");
    }
    let mut shadows = Vec::new();
    let mut size = thickness;
    while size >= 1.0 {
        shadows.push(format!("0px 0px {size}px {color}"));
        size -= 1.0;
    }
    TransformedValue::single(shadows.join(","))
}

static OPACITY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0*\.\d*|1|0)$").expect("failed to compile OPACITY_REGEX"));

fn opacity(value: &str, _: &ResolvedStyle, ctx: &TransformContext<'_>) -> Option<TransformedValue> {
    let options = ctx.options;
    if let Some(opacity) = options.active(options.opacity) {
        return TransformedValue::single(format!("{}", opacity.clamp(0.0, 1.0)));
    }
    if OPACITY_REGEX.is_match(value) {
        TransformedValue::single(value)
    } else {
        TransformedValue::single("1")
    }
}

fn padding(value: &str, _: &ResolvedStyle, ctx: &TransformContext<'_>) -> Option<TransformedValue> {
    let lengths = parse_lengths(value, ctx.cell_height);
    if lengths.is_empty() || lengths.len() > 4 {
        return None;
    }
    TransformedValue::single(lengths.join(" "))
}

fn two_lengths(value: &str, ctx: &TransformContext<'_>) -> Option<(String, String)> {
    let mut lengths = value
        .split_whitespace()
        .map(|term| first_length(term, ctx.cell_height));
    let first = lengths.next()??;
    let second = lengths.next()??;
    Some((first, second))
}

/// `<x> <y>` → `top`, `right`, `bottom`, `left`.
fn origin(value: &str, _: &ResolvedStyle, ctx: &TransformContext<'_>) -> Option<TransformedValue> {
    let (x, y) = two_lengths(value, ctx)?;
    Some(TransformedValue::Expanded(vec![
        y,
        "0".to_string(),
        "auto".to_string(),
        x,
    ]))
}

/// `<width> <height>`
fn extent(value: &str, _: &ResolvedStyle, ctx: &TransformContext<'_>) -> Option<TransformedValue> {
    let (width, height) = two_lengths(value, ctx)?;
    Some(TransformedValue::Expanded(vec![width, height]))
}

fn display(value: &str, _: &ResolvedStyle, _: &TransformContext<'_>) -> Option<TransformedValue> {
    if value == "none" {
        TransformedValue::single("none")
    } else {
        TransformedValue::single("inline-block")
    }
}

fn line_height(value: &str, _: &ResolvedStyle, ctx: &TransformContext<'_>) -> Option<TransformedValue> {
    if value == "normal" {
        return TransformedValue::single("normal");
    }
    first_length(value, ctx.cell_height).map(TransformedValue::Single)
}

fn wrap_option(value: &str, _: &ResolvedStyle, _: &TransformContext<'_>) -> Option<TransformedValue> {
    match value {
        "wrap" => TransformedValue::single("normal"),
        "noWrap" => TransformedValue::single("nowrap"),
        _ => None,
    }
}

fn display_align(value: &str, _: &ResolvedStyle, _: &TransformContext<'_>) -> Option<TransformedValue> {
    match value {
        "before" => TransformedValue::single("top"),
        "center" => TransformedValue::single("middle"),
        "after" => TransformedValue::single("bottom"),
        _ => None,
    }
}

fn unicode_bidi(value: &str, _: &ResolvedStyle, _: &TransformContext<'_>) -> Option<TransformedValue> {
    match value {
        "bidiOverride" => TransformedValue::single("bidi-override"),
        other => TransformedValue::single(other),
    }
}

fn writing_mode(value: &str, _: &ResolvedStyle, _: &TransformContext<'_>) -> Option<TransformedValue> {
    match value {
        "lrtb" | "rltb" | "lr" | "rl" => TransformedValue::single("horizontal-tb"),
        "tbrl" | "tb" => TransformedValue::single("vertical-rl"),
        "tblr" => TransformedValue::single("vertical-lr"),
        _ => None,
    }
}
