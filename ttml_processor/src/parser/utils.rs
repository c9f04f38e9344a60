//! Attribute extraction and text helpers for the parser.

use captions_core::ConvertError;
use quick_xml::{Reader, events::BytesStart};
use tracing::warn;

use super::constants::{
    ATTR_BEGIN, ATTR_DUR, ATTR_END, ATTR_ID, ATTR_REGION, ATTR_STYLE, ATTR_XML_ID, ATTR_XML_LANG,
    ATTR_XML_SPACE,
};

/// The attributes of one element the walker cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct ElementAttributes {
    pub(super) id: Option<String>,
    pub(super) style_refs: Vec<String>,
    pub(super) region: Option<String>,
    pub(super) begin: Option<String>,
    pub(super) end: Option<String>,
    pub(super) dur: Option<String>,
    pub(super) lang: Option<String>,
    pub(super) space: Option<String>,
    /// Attributes in the styling namespace, unprefixed name → raw value.
    pub(super) styling: Vec<(String, String)>,
}

/// Reads all attributes of `e` in one pass.
///
/// `styling_prefixes` are the prefixes bound to the TTML styling namespace in this document.
pub(super) fn read_element_attributes(
    e: &BytesStart,
    reader: &Reader<&[u8]>,
    styling_prefixes: &[String],
) -> Result<ElementAttributes, ConvertError> {
    let mut attrs = ElementAttributes::default();
    for attr in e.attributes() {
        let attr = attr?;
        let key = attr.key.as_ref();
        let value = attr.decode_and_unescape_value(reader.decoder())?.into_owned();
        match key {
            ATTR_XML_ID => attrs.id = Some(value),
            ATTR_ID => {
                attrs.id.get_or_insert(value);
            }
            ATTR_STYLE => {
                attrs.style_refs = value.split_whitespace().map(str::to_owned).collect();
            }
            ATTR_REGION => attrs.region = Some(value.trim().to_owned()),
            ATTR_BEGIN => attrs.begin = Some(value),
            ATTR_END => attrs.end = Some(value),
            ATTR_DUR => attrs.dur = Some(value),
            ATTR_XML_LANG => attrs.lang = Some(value.trim().to_owned()),
            ATTR_XML_SPACE => attrs.space = Some(value.trim().to_owned()),
            _ => {
                if let Some((prefix, local)) = split_qualified_name(key)
                    && styling_prefixes.iter().any(|p| p.as_bytes() == prefix)
                {
                    attrs
                        .styling
                        .push((String::from_utf8_lossy(local).into_owned(), value));
                }
            }
        }
    }
    Ok(attrs)
}

/// `prefix:local` → `(prefix, local)`.
pub(super) fn split_qualified_name(name: &[u8]) -> Option<(&[u8], &[u8])> {
    let colon = name.iter().position(|&b| b == b':')?;
    Some((&name[..colon], &name[colon + 1..]))
}

/// Records a recoverable problem in the output and the log.
pub(super) fn push_warning(warnings: &mut Vec<String>, message: String) {
    warn!("[TTML Parser] {message}");
    warnings.push(message);
}

/// Appends `input` to `output`, collapsing every run of whitespace into one space.
///
/// A run at the very start of `input` is dropped when `output` already ends in a space.
pub(super) fn collapse_whitespace_into(input: &str, output: &mut String) {
    let mut in_space = output.ends_with(' ');
    for c in input.chars() {
        if c.is_whitespace() {
            if !in_space {
                output.push(' ');
                in_space = true;
            }
        } else {
            output.push(c);
            in_space = false;
        }
    }
}

/// Decodes the name of an entity reference (`amp`, `#233`, `#x1F600`).
pub(super) fn decode_entity(name: &str) -> Option<char> {
    if let Some(number) = name.strip_prefix('#') {
        let (radix, digits) = number
            .strip_prefix(['x', 'X'])
            .map_or((10, number), |hex| (16, hex));
        return u32::from_str_radix(digits, radix)
            .ok()
            .and_then(char::from_u32)
            .filter(|&c| is_xml_char(c));
    }
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => None,
    }
}

/// The `Char` production of XML 1.0.
const fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..)
}
