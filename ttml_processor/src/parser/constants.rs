//! Tags and attributes the parser reacts to. Tags are matched on their local name.

pub(super) const TAG_TT: &[u8] = b"tt";
pub(super) const TAG_HEAD: &[u8] = b"head";
pub(super) const TAG_STYLING: &[u8] = b"styling";
pub(super) const TAG_STYLE: &[u8] = b"style";
pub(super) const TAG_LAYOUT: &[u8] = b"layout";
pub(super) const TAG_REGION: &[u8] = b"region";
pub(super) const TAG_BODY: &[u8] = b"body";
pub(super) const TAG_DIV: &[u8] = b"div";
pub(super) const TAG_P: &[u8] = b"p";
pub(super) const TAG_SPAN: &[u8] = b"span";
pub(super) const TAG_BR: &[u8] = b"br";
pub(super) const TAG_SCRIPT: &[u8] = b"script";

pub(super) const ATTR_XML_ID: &[u8] = b"xml:id";
pub(super) const ATTR_ID: &[u8] = b"id";
pub(super) const ATTR_STYLE: &[u8] = b"style";
pub(super) const ATTR_REGION: &[u8] = b"region";
pub(super) const ATTR_BEGIN: &[u8] = b"begin";
pub(super) const ATTR_END: &[u8] = b"end";
pub(super) const ATTR_DUR: &[u8] = b"dur";
pub(super) const ATTR_XML_LANG: &[u8] = b"xml:lang";
pub(super) const ATTR_XML_SPACE: &[u8] = b"xml:space";
pub(super) const ATTR_XMLNS: &[u8] = b"xmlns";
pub(super) const XMLNS_PREFIX: &[u8] = b"xmlns:";

pub(super) const SPACE_PRESERVE: &str = "preserve";
pub(super) const SPACE_DEFAULT: &str = "default";

pub(super) const TTML_NAMESPACE: &str = "http://www.w3.org/ns/ttml";
pub(super) const STYLING_NAMESPACE_SUFFIX: &str = "#styling";
pub(super) const DEFAULT_STYLING_PREFIX: &str = "tts";
