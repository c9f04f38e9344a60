use std::io;

use quick_xml::{
    Error as QuickXmlErrorMain, encoding::EncodingError,
    events::attributes::AttrError as QuickXmlAttrError,
};
use thiserror::Error;

/// Errors that can abort a caption document parse.
///
/// Only structural problems are fatal. Bad timing, illegal style values and dangling
/// references are recovered from locally and surface as warnings instead.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The document is not well-formed XML, reported by `quick-xml`.
    #[error("XML parse error: {0}")]
    Xml(#[from] QuickXmlErrorMain),
    /// A malformed attribute, reported by `quick-xml`.
    #[error("XML attribute error: {0}")]
    Attribute(#[from] QuickXmlAttrError),
    /// Text could not be decoded.
    #[error("text encoding error: {0}")]
    Encoding(#[from] EncodingError),
    /// The XML is well-formed but is not a TTML document we can walk
    /// (no `<tt>` root, elements left open at end of input).
    #[error("malformed TTML document: {0}")]
    Structure(String),
    /// Reading a document or an options file failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// JSON options could not be parsed.
    #[error("failed to parse JSON {context}: {source}")]
    JsonParse {
        /// Underlying `serde_json` error
        #[source]
        source: serde_json::Error,
        /// Where the JSON came from.
        context: String,
    },
}

impl ConvertError {
    /// Creates a `JsonParse` error with context.
    #[must_use]
    pub fn json_parse(source: serde_json::Error, context: String) -> Self {
        Self::JsonParse { source, context }
    }

    #[must_use]
    pub fn structure(message: impl Into<String>) -> Self {
        Self::Structure(message.into())
    }
}
