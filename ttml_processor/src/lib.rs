//! # TTML Processor: a streaming TTML / DFXP caption parser
//!
//! Turns a TTML document into per-language timelines of styled caption cues. The TTML
//! style cascade (inheritance, referenced style classes, regions and inline `tts:*`
//! attributes) is resolved into CSS declarations, so a renderer only has to place each
//! cue and apply the declarations it carries.
//!
//! The main entry points:
//! - [`parse_ttml`]: parses a document into a [`ParsedCaptionSet`].
//! - [`active_cues`]: the cues of a timeline showing at a given time.
//! - [`generate_stylesheet`]: the CSS rules for the style classes and regions of a document.
//!
//! ## Example
//!
//! ```rust
//! use ttml_processor::{parse_ttml, active_cues};
//! use captions_core::TtmlParsingOptions;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ttml_content = r#"
//!     <tt xmlns="http://www.w3.org/ns/ttml" xmlns:tts="http://www.w3.org/ns/ttml#styling">
//!       <head>
//!         <styling>
//!           <style xml:id="yellow" tts:color="yellow"/>
//!         </styling>
//!       </head>
//!       <body>
//!         <div>
//!           <p begin="00:00:01.000" end="00:00:03.000" style="yellow">Hello</p>
//!           <p begin="2s" dur="2s">world</p>
//!         </div>
//!       </body>
//!     </tt>
//!     "#;
//!
//!     let captions = parse_ttml(ttml_content, &TtmlParsingOptions::default())?;
//!     let timeline = captions.timeline("Default").expect("no default timeline");
//!     assert_eq!(timeline.len(), 2);
//!
//!     let showing = active_cues(timeline, 2.5);
//!     assert_eq!(showing.len(), 2);
//!     // most recently started first
//!     assert_eq!(showing[0].text(), "world");
//!     assert_eq!(
//!         showing[1].resolved_style.get("color"),
//!         Some("rgba(255,255,0,1)")
//!     );
//!
//!     Ok(())
//! }
//! ```

pub mod generator;
pub mod parser;
pub mod style;
pub mod values;

pub use captions_core::{CueTimeline, ParsedCaptionSet, active_cues};
pub use generator::generate_stylesheet;
pub use parser::parse_ttml;

use std::{fs, path::Path};

use captions_core::{ConvertError, TtmlParsingOptions};

/// Parses `content` for a caption area `surface_height` pixels high, without style overrides.
///
/// # Errors
///
/// See [`parse_ttml`].
pub fn parse(content: &str, surface_height: f64) -> Result<ParsedCaptionSet, ConvertError> {
    parse_ttml(content, &TtmlParsingOptions::with_height(surface_height))
}

/// Reads and parses the TTML document at `path`.
///
/// # Errors
///
/// `ConvertError::Io` when the file cannot be read, otherwise see [`parse_ttml`].
pub fn parse_ttml_file(
    path: impl AsRef<Path>,
    options: &TtmlParsingOptions,
) -> Result<ParsedCaptionSet, ConvertError> {
    let content = fs::read_to_string(path)?;
    parse_ttml(&content, options)
}
