//! # Stylesheet generation
//!
//! Renders the CSS a page needs to display parsed captions: a rule for the user's style
//! options, the fixed layout rules of the caption container and the default region, then
//! one rule per style class and per region of the document.

use std::fmt::Write;

use captions_core::{DEFAULT_REGION_CLASS, ParsedCaptionSet, ResolvedStyle, StyleOptions};

use crate::values::parse_color;

/// Class carrying the style options.
pub const DEFAULT_STYLE_CLASS: &str = "bc-default-style";
/// Class of the element every cue is placed in.
pub const CAPTION_CLASS: &str = "caption";

const CAPTION_RULE: &[&str] = &[
    "position:absolute",
    "bottom:10%",
    "left:2.5%",
    "width:95%",
    "margin:0 auto",
    "padding:5px",
    "box-sizing:border-box",
];

const DEFAULT_REGION_RULE: &[&str] = &[
    "width:auto",
    "height:auto",
    "top:10%",
    "right:2.5%",
    "bottom:10%",
    "left:2.5%",
    "padding:auto",
];

/// Renders the complete stylesheet for `captions`.
#[must_use]
pub fn generate_stylesheet(captions: &ParsedCaptionSet, options: &StyleOptions) -> String {
    let mut css = String::new();
    write_rule(&mut css, DEFAULT_STYLE_CLASS, option_declarations(options).as_slice());
    write_rule(&mut css, CAPTION_CLASS, CAPTION_RULE);
    write_rule(&mut css, DEFAULT_REGION_CLASS, DEFAULT_REGION_RULE);

    for (id, declarations) in &captions.style_classes {
        write_style_rule(&mut css, id, declarations);
    }
    for (id, declarations) in &captions.regions {
        write_style_rule(&mut css, id, declarations);
    }
    css
}

/// Declarations for the style options; colors are normalised like document colors.
fn option_declarations(options: &StyleOptions) -> Vec<String> {
    let mut declarations = Vec::new();
    if options.show_background
        && let Some(background) = &options.background_color
    {
        let color = parse_color(background, options.background_opacity);
        declarations.push(format!("background-color:{}", color.value));
    }
    if let Some(text) = &options.text_color {
        let color = parse_color(text, options.text_opacity);
        declarations.push(format!("color:{}", color.value));
    }
    if let Some(font_family) = options.font_family.as_ref().or(options.font_name.as_ref()) {
        declarations.push(format!("font-family:{font_family}"));
    }
    if let Some(font_size) = &options.font_size {
        declarations.push(format!("font-size:{font_size}"));
    }
    if let Some(text_align) = &options.text_align {
        declarations.push(format!("text-align:{text_align}"));
    }
    if let Some(opacity) = options.opacity {
        declarations.push(format!("opacity:{}", opacity.clamp(0.0, 1.0)));
    }
    declarations
}

fn write_style_rule(css: &mut String, selector: &str, style: &ResolvedStyle) {
    write_rule(css, selector, style.to_declarations().as_slice());
}

/// `.selector{\n  a:b;\n  c:d;\n}`. Nothing is written for an empty declaration list.
fn write_rule<S: AsRef<str>>(css: &mut String, selector: &str, declarations: &[S]) {
    if declarations.is_empty() {
        return;
    }
    if !css.is_empty() {
        css.push('\n');
    }
    let _ = write!(css, ".{selector}{{");
    for declaration in declarations {
        let _ = write!(css, "\n  {};", declaration.as_ref());
    }
    css.push_str("\n}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_format() {
        let mut css = String::new();
        write_rule(&mut css, "x", &["color:red", "opacity:1"]);
        insta::assert_snapshot!(css.replace('\n', "|"), @".x{|  color:red;|  opacity:1;|}");
    }

    #[test]
    fn test_empty_rules_are_skipped() {
        let mut css = String::new();
        write_rule::<&str>(&mut css, "nothing", &[]);
        assert!(css.is_empty());
    }

    #[test]
    fn test_stylesheet_contains_document_rules() {
        let mut captions = ParsedCaptionSet::default();
        captions.style_classes.insert(
            "s1".to_string(),
            [("color", "rgba(255,0,0,1)")].into_iter().collect(),
        );
        captions
            .style_classes
            .insert("empty".to_string(), ResolvedStyle::new());
        captions.regions.insert(
            "bottom".to_string(),
            [("top", "80%"), ("left", "10%")].into_iter().collect(),
        );

        let css = generate_stylesheet(&captions, &StyleOptions::default());
        assert!(css.starts_with(".bc-default-style{\n  background-color:rgba(0,0,0,1);\n  color:rgba(255,255,255,1);\n}"));
        assert!(css.contains(".caption{\n  position:absolute;"));
        assert!(css.contains(".bc-default-region-style{\n  width:auto;"));
        assert!(css.contains(".s1{\n  color:rgba(255,0,0,1);\n}"));
        assert!(css.contains(".bottom{\n  left:10%;\n  top:80%;\n}"));
        assert!(!css.contains(".empty"));
    }

    #[test]
    fn test_hidden_background_is_left_out() {
        let options = StyleOptions {
            show_background: false,
            text_opacity: Some(0.5),
            ..StyleOptions::default()
        };
        let declarations = option_declarations(&options);
        assert_eq!(declarations, vec!["color:rgba(255,255,255,0.5)"]);
    }
}
