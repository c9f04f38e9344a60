//! TTML color values.
//!
//! Supported forms (<http://www.w3.org/TR/ttaf1-dfxp/#style-value-color>):
//!
//! | form        | example            |
//! |-------------|--------------------|
//! | hex         | `#000000`, `#FFF`  |
//! | hex + alpha | `#000000FF`        |
//! | rgb / rgba  | `rgb(0,0,0)`, `rgba(0,0,0,255)` |
//! | named       | `transparent`, `black`, `silver`, ... |
//!
//! Everything is normalised to a CSS `rgba(r,g,b,a)` string. Tokens that are not one of
//! these forms are returned unchanged and left for the rendering surface to interpret.

/// A converted color together with how much of the input it consumed.
///
/// The length lets callers that matched a color at the start of a composite value
/// (`tts:textOutline="red 2px 1px"`) skip to the remaining terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedColor {
    pub value: String,
    pub original_len: usize,
}

impl ParsedColor {
    fn new(value: String, original_len: usize) -> Self {
        Self {
            value,
            original_len,
        }
    }
}

const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("silver", [192, 192, 192]),
    ("gray", [128, 128, 128]),
    ("white", [255, 255, 255]),
    ("maroon", [128, 0, 0]),
    ("red", [255, 0, 0]),
    ("purple", [128, 0, 128]),
    ("fuchsia", [255, 0, 255]),
    ("magenta", [255, 0, 255]),
    ("green", [0, 128, 0]),
    ("lime", [0, 255, 0]),
    ("olive", [128, 128, 0]),
    ("yellow", [255, 255, 0]),
    ("navy", [0, 0, 128]),
    ("blue", [0, 0, 255]),
    ("teal", [0, 128, 128]),
    ("aqua", [0, 255, 255]),
    ("cyan", [0, 255, 255]),
];

/// Converts a TTML color value to CSS.
///
/// `alpha_override` replaces whatever alpha the value carries.
#[must_use]
pub fn parse_color(value: &str, alpha_override: Option<f64>) -> ParsedColor {
    let trimmed = value.trim_start();
    let leading = value.len() - trimmed.len();

    let mut parsed = if let Some(hex) = trimmed.strip_prefix('#') {
        hex_to_rgba(hex, alpha_override)
    } else if trimmed.starts_with("rgb") || trimmed.starts_with("RGB") {
        rgb_to_rgba(trimmed, alpha_override)
    } else {
        named_to_rgba(trimmed, alpha_override)
    };
    parsed.original_len += leading;
    parsed
}

/// `#RGB`, `#RRGGBB` or `#RRGGBBAA` (without the `#`).
pub(crate) fn hex_to_rgba(hex: &str, alpha_override: Option<f64>) -> ParsedColor {
    let token = first_token(hex);
    let consumed = token.len() + 1;
    if !token.is_ascii() {
        return ParsedColor::new(format!("#{token}"), consumed);
    }

    let rgb = match token.len() {
        3 => token.chars().flat_map(|c| [c, c]).collect::<String>(),
        6 | 8 => token[..6].to_string(),
        _ => return ParsedColor::new(format!("#{token}"), consumed),
    };
    let channel = |i: usize| u8::from_str_radix(&rgb[i..i + 2], 16).ok();
    let (Some(r), Some(g), Some(b)) = (channel(0), channel(2), channel(4)) else {
        return ParsedColor::new(format!("#{token}"), consumed);
    };

    let alpha = match alpha_override {
        Some(alpha) => format_number(alpha),
        None if token.len() == 8 => match u8::from_str_radix(&token[6..8], 16) {
            Ok(a) => format_hex_alpha(a),
            Err(_) => return ParsedColor::new(format!("#{token}"), consumed),
        },
        None => "1".to_string(),
    };
    ParsedColor::new(format!("rgba({r},{g},{b},{alpha})"), consumed)
}

fn rgb_to_rgba(value: &str, alpha_override: Option<f64>) -> ParsedColor {
    let (Some(open), Some(close)) = (value.find('('), value.find(')')) else {
        return passthrough(value);
    };
    if close < open {
        return passthrough(value);
    }

    let mut channels: Vec<String> = value[open + 1..close]
        .split(',')
        .map(|c| c.trim().to_string())
        .collect();
    let numeric = channels.iter().all(|c| c.parse::<f64>().is_ok());
    if !numeric || !(3..=4).contains(&channels.len()) {
        return passthrough(value);
    }

    match alpha_override {
        Some(alpha) => {
            channels.truncate(3);
            channels.push(format_number(alpha));
        }
        None if channels.len() == 3 => channels.push("1".to_string()),
        None => {}
    }
    ParsedColor::new(format!("rgba({})", channels.join(",")), close + 1)
}

fn named_to_rgba(value: &str, alpha_override: Option<f64>) -> ParsedColor {
    let token = first_token(value);
    let lowered = token.to_ascii_lowercase();

    if lowered == "transparent" {
        let alpha = alpha_override.map_or_else(|| "0".to_string(), format_number);
        return ParsedColor::new(format!("rgba(0,0,0,{alpha})"), token.len());
    }
    match NAMED_COLORS.iter().find(|(name, _)| *name == lowered) {
        Some((_, [r, g, b])) => {
            let alpha = alpha_override.map_or_else(|| "1".to_string(), format_number);
            ParsedColor::new(format!("rgba({r},{g},{b},{alpha})"), token.len())
        }
        None => passthrough(token),
    }
}

fn passthrough(value: &str) -> ParsedColor {
    let token = first_token(value);
    ParsedColor::new(token.to_string(), token.len())
}

fn first_token(value: &str) -> &str {
    value.split_whitespace().next().unwrap_or_default()
}

/// Alpha byte → `0 ..= 1` rounded to two decimals, written the short CSS way (`.5`).
fn format_hex_alpha(alpha: u8) -> String {
    let rounded = (f64::from(alpha) / 255.0 * 100.0).round() / 100.0;
    if rounded <= 0.0 {
        return "0".to_string();
    }
    if rounded >= 1.0 {
        return "1".to_string();
    }
    let text = format!("{rounded:.2}");
    text.trim_end_matches('0')
        .trim_start_matches('0')
        .to_string()
}

fn format_number(value: f64) -> String {
    format!("{value}")
}
