//! Parsers for TTML attribute values: time expressions, colors and lengths.
//!
//! All of them are total: malformed input never panics or errors, it yields `None`, an empty
//! list or the unchanged token, and the caller picks the fallback.

pub mod color;
pub mod length;
pub mod time;

pub use color::{ParsedColor, parse_color};
pub use length::{first_length, parse_lengths};
pub use time::parse_time_expression;
