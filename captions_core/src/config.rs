use std::fmt;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum_macros::EnumString;

use crate::ConvertError;

/// Height used for cell-unit conversion when the caller has not measured the caption area.
pub const DEFAULT_SURFACE_HEIGHT: f64 = 540.0;

/// Text edge treatment requested by the viewer's caption settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EdgeStyle {
    /// No outline at all.
    None,
    /// Soft shadow offset down and to the right.
    #[serde(rename = "dropshadow")]
    #[strum(serialize = "dropshadow")]
    DropShadow,
    /// Stacked hard shadows, text looks raised.
    Raised,
    /// Light on top, dark underneath, text looks pressed in.
    Depressed,
    /// Even blur on every side.
    Uniform,
}

impl fmt::Display for EdgeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::DropShadow => "dropshadow",
            Self::Raised => "raised",
            Self::Depressed => "depressed",
            Self::Uniform => "uniform",
        };
        f.write_str(name)
    }
}

/// Viewer-side caption style overrides.
///
/// Nothing here has any effect unless `set` is true; with `set` off the document's own
/// style values are used unmodified. The serialized names match the option keys used by
/// players (`show-background`, `text-color`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[serde(rename_all = "kebab-case", default)]
#[builder(setter(into), default)]
pub struct StyleOptions {
    /// Master switch for every other option.
    pub set: bool,
    /// Whether the configured background colour replaces the document's.
    pub show_background: bool,
    pub background_color: Option<String>,
    pub background_opacity: Option<f64>,
    pub text_color: Option<String>,
    pub text_opacity: Option<f64>,
    /// Font family put in front of the document's font stack.
    pub font_family: Option<String>,
    /// Alias of `font_family` used by older settings panels.
    pub font_name: Option<String>,
    pub font_size: Option<String>,
    pub text_align: Option<String>,
    pub edge_style: Option<EdgeStyle>,
    /// Region opacity, `0.0 ..= 1.0`.
    pub opacity: Option<f64>,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            set: false,
            show_background: true,
            background_color: Some("#000".to_string()),
            background_opacity: None,
            text_color: Some("#FFF".to_string()),
            text_opacity: None,
            font_family: None,
            font_name: None,
            font_size: None,
            text_align: None,
            edge_style: None,
            opacity: None,
        }
    }
}

impl StyleOptions {
    /// Loads options from a JSON object, filling unspecified keys with defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConvertError::JsonParse` when the text is not a valid options object.
    pub fn from_json_str(json: &str) -> Result<Self, ConvertError> {
        serde_json::from_str(json)
            .map_err(|e| ConvertError::json_parse(e, "style options".to_string()))
    }

    /// Returns the option value only when overrides are switched on.
    #[must_use]
    pub fn active<T>(&self, value: Option<T>) -> Option<T> {
        if self.set { value } else { None }
    }
}

/// Options for one TTML parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TtmlParsingOptions {
    /// Measured height of the caption area in pixels, used to convert cell units.
    pub surface_height: f64,
    /// Viewer style overrides applied while transforming style values.
    pub style: StyleOptions,
}

impl Default for TtmlParsingOptions {
    fn default() -> Self {
        Self {
            surface_height: DEFAULT_SURFACE_HEIGHT,
            style: StyleOptions::default(),
        }
    }
}

impl TtmlParsingOptions {
    #[must_use]
    pub fn with_height(surface_height: f64) -> Self {
        Self {
            surface_height,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_style_options_from_json() {
        let json = r##"{
            "set": true,
            "text-color": "#FF0000",
            "text-opacity": 0.5,
            "edge-style": "dropshadow"
        }"##;
        let options = StyleOptions::from_json_str(json).unwrap();
        assert!(options.set);
        assert!(options.show_background);
        assert_eq!(options.text_color.as_deref(), Some("#FF0000"));
        assert_eq!(options.text_opacity, Some(0.5));
        assert_eq!(options.edge_style, Some(EdgeStyle::DropShadow));
        assert_eq!(options.background_color.as_deref(), Some("#000"));
    }

    #[test]
    fn test_style_options_rejects_bad_json() {
        assert!(matches!(
            StyleOptions::from_json_str("{\"set\": \"yes\"}"),
            Err(ConvertError::JsonParse { .. })
        ));
    }

    #[test]
    fn test_active_requires_set() {
        let mut options = StyleOptions {
            opacity: Some(0.4),
            ..Default::default()
        };
        assert_eq!(options.active(options.opacity), None);
        options.set = true;
        assert_eq!(options.active(options.opacity), Some(0.4));
    }

    #[test]
    fn test_edge_style_from_str() {
        assert_eq!(EdgeStyle::from_str("Raised").unwrap(), EdgeStyle::Raised);
        assert_eq!(
            EdgeStyle::from_str("dropshadow").unwrap(),
            EdgeStyle::DropShadow
        );
        assert!(EdgeStyle::from_str("outline").is_err());
        assert_eq!(EdgeStyle::Uniform.to_string(), "uniform");
    }

    #[test]
    fn test_builder_keeps_defaults() {
        let options = StyleOptionsBuilder::default()
            .set(true)
            .font_size(Some("2c".to_string()))
            .build()
            .unwrap();
        assert!(options.set);
        assert_eq!(options.font_size.as_deref(), Some("2c"));
        assert!(options.show_background);
        assert_eq!(options.text_color.as_deref(), Some("#FFF"));
    }
}
