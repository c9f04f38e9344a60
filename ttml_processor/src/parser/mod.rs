//! # TTML / DFXP parser
//!
//! A single streaming pass over the document. `<head>` fills the style registry and the
//! region table, `<body>` is walked with a stack of open elements and every timed `<p>`
//! becomes a [`Cue`](captions_core::Cue) in the timeline of its language.

mod body;
mod constants;
mod handlers;
mod head;
mod state;
mod utils;

use captions_core::{ConvertError, ParsedCaptionSet, TtmlParsingOptions};
use quick_xml::{Reader, events::Event};
use tracing::{debug, error};

use self::state::TtmlParserState;
use crate::style::StyleCascade;

/// Parses a TTML document into per-language cue timelines.
///
/// # Arguments
///
/// * `content` - The TTML document.
/// * `options` - Height of the caption area (for cell units) and user style overrides.
///
/// # Errors
///
/// * `ConvertError::Xml` - The input is not well-formed XML.
/// * `ConvertError::Structure` - There is no `<tt>` root, or elements are still open at
///   the end of the input.
///
/// Problems that only affect part of the document (an untimed paragraph, a reference to
/// an unknown region) do not fail the parse; they are reported in
/// [`ParsedCaptionSet::warnings`].
pub fn parse_ttml(
    content: &str,
    options: &TtmlParsingOptions,
) -> Result<ParsedCaptionSet, ConvertError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(false);
    reader.config_mut().expand_empty_elements = true;

    let cascade = StyleCascade::new(&options.style, options.surface_height);
    let mut state = TtmlParserState::default();
    let mut captions = ParsedCaptionSet::default();
    let mut buf = Vec::new();

    loop {
        let event = match reader.read_event_into(&mut buf) {
            Ok(event) => event,
            Err(e) => {
                error!(
                    "TTML parse error at position {}: {}",
                    reader.error_position(),
                    e
                );
                return Err(ConvertError::Xml(e));
            }
        };

        if event == Event::Eof {
            break;
        }

        if handlers::skip_script(&event, &mut state) {
            buf.clear();
            continue;
        }
        handlers::track_depth(&event, &mut state);

        if state.in_head {
            head::handle_head_event(&event, &mut state, &reader, &cascade, &mut captions)?;
        } else if state.body_state.in_body {
            body::handle_body_event(&event, &mut state, &reader, &cascade, &mut captions)?;
        } else {
            handlers::handle_global_event(&event, &mut state, &reader, &cascade, &mut captions)?;
        }

        buf.clear();
    }

    if !state.seen_root {
        return Err(ConvertError::structure("no <tt> root element found"));
    }
    if state.depth > 0 || state.script_depth > 0 {
        return Err(ConvertError::structure(format!(
            "{} element(s) still open at the end of the document",
            state.depth + state.script_depth
        )));
    }

    captions.style_classes = state.registry.rules();
    captions.regions = state
        .regions
        .into_iter()
        .map(|(id, style)| (id, style.declarations))
        .collect();

    debug!(
        "[TTML Parser] Parsed {} cue(s) in {} language(s), {} warning(s)",
        captions.total_cues(),
        captions.languages.len(),
        captions.warnings.len()
    );
    Ok(captions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use captions_core::{ContentNode, DEFAULT_LANGUAGE};

    fn parse(content: &str) -> ParsedCaptionSet {
        parse_ttml(content, &TtmlParsingOptions::default()).unwrap()
    }

    #[test]
    fn test_minimal_document() {
        let captions = parse(
            r#"<tt xmlns="http://www.w3.org/ns/ttml"><body><div>
                <p begin="00:00:01.000" end="00:00:02.500">Hello</p>
            </div></body></tt>"#,
        );
        let cues = captions.timeline(DEFAULT_LANGUAGE).unwrap();
        assert_eq!(cues.len(), 1);
        let cue = &cues.as_slice()[0];
        assert!((cue.begin - 1.0).abs() < 1e-9);
        assert!((cue.end - 2.5).abs() < 1e-9);
        assert_eq!(cue.text(), "Hello");
        assert!(captions.warnings.is_empty());
    }

    #[test]
    fn test_dur_and_offset_times() {
        let captions = parse(
            r#"<tt xmlns="http://www.w3.org/ns/ttml"><body>
                <p begin="2s" dur="500ms">a</p>
                <p begin="60f" end="3s">b</p>
            </body></tt>"#,
        );
        let cues = captions.timeline(DEFAULT_LANGUAGE).unwrap().as_slice();
        assert!((cues[0].begin - 2.0).abs() < 1e-9);
        assert!((cues[0].end - 2.5).abs() < 1e-9);
        assert_eq!(cues[1].text(), "b");
    }

    #[test]
    fn test_untimed_paragraphs_are_skipped() {
        let captions = parse(
            r#"<tt xmlns="http://www.w3.org/ns/ttml"><body>
                <p>no timing</p>
                <p begin="1s">no end</p>
                <p begin="5s" end="4s">backwards</p>
                <p begin="soon" end="4s">garbage</p>
                <p begin="1s" end="2s">kept</p>
            </body></tt>"#,
        );
        assert_eq!(captions.total_cues(), 1);
        assert_eq!(captions.warnings.len(), 4);
    }

    #[test]
    fn test_spans_line_breaks_and_entities() {
        let captions = parse(
            r#"<tt xmlns="http://www.w3.org/ns/ttml" xmlns:tts="http://www.w3.org/ns/ttml#styling"><body>
                <p begin="0s" end="1s">
                    Tom &amp; <span tts:fontStyle="italic">Jerry</span><br/>
                    second line
                </p>
            </body></tt>"#,
        );
        let cue = &captions.timeline(DEFAULT_LANGUAGE).unwrap().as_slice()[0];
        assert_eq!(cue.text(), "Tom & Jerry\nsecond line");
        match &cue.content.nodes[1] {
            ContentNode::Span { style, children } => {
                assert_eq!(style.get("font-style"), Some("italic"));
                assert_eq!(children.len(), 1);
            }
            other => panic!("expected span, got {other:?}"),
        }
    }

    #[test]
    fn test_preserved_whitespace() {
        let captions = parse(
            r#"<tt xmlns="http://www.w3.org/ns/ttml"><body>
                <p begin="0s" end="1s" xml:space="preserve">  two  spaces </p>
            </body></tt>"#,
        );
        let cue = &captions.timeline(DEFAULT_LANGUAGE).unwrap().as_slice()[0];
        assert_eq!(cue.text(), "  two  spaces ");
    }

    #[test]
    fn test_script_is_skipped() {
        let captions = parse(
            r#"<tt xmlns="http://www.w3.org/ns/ttml"><body>
                <p begin="0s" end="1s">safe<script><p begin="0s" end="1s">evil</p></script></p>
            </body></tt>"#,
        );
        assert_eq!(captions.total_cues(), 1);
        let cue = &captions.timeline(DEFAULT_LANGUAGE).unwrap().as_slice()[0];
        assert_eq!(cue.text(), "safe");
    }

    #[test]
    fn test_structural_errors() {
        let options = TtmlParsingOptions::default();
        assert!(matches!(
            parse_ttml("<html><body/></html>", &options),
            Err(ConvertError::Structure(_))
        ));
        assert!(matches!(
            parse_ttml(r#"<tt><body><p begin="0s" end="1s">x</div></body></tt>"#, &options),
            Err(ConvertError::Xml(_))
        ));
    }
}
