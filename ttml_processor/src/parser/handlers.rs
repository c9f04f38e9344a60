//! Top level dispatch: the `<tt>` root, entering `<head>` and `<body>`, skipped subtrees.

use captions_core::{ConvertError, ParsedCaptionSet};
use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use tracing::debug;

use super::{
    body,
    constants::{
        ATTR_XMLNS, DEFAULT_STYLING_PREFIX, SPACE_PRESERVE, STYLING_NAMESPACE_SUFFIX, TAG_BODY,
        TAG_HEAD, TAG_SCRIPT, TAG_TT, XMLNS_PREFIX,
    },
    state::{DocumentNamespace, TtmlParserState},
    utils::{push_warning, read_element_attributes},
};
use crate::style::StyleCascade;

/// Consumes events inside a `<script>` subtree. Returns `true` when the event was dropped.
pub(super) fn skip_script(event: &Event<'_>, state: &mut TtmlParserState) -> bool {
    if state.script_depth > 0 {
        match event {
            Event::Start(_) => state.script_depth += 1,
            Event::End(_) => state.script_depth -= 1,
            _ => {}
        }
        return true;
    }
    if let Event::Start(e) = event
        && e.local_name().as_ref() == TAG_SCRIPT
    {
        debug!("[TTML Parser] Skipping <script> element");
        state.script_depth = 1;
        return true;
    }
    false
}

/// Keeps count of open elements for the end-of-document check.
pub(super) fn track_depth(event: &Event<'_>, state: &mut TtmlParserState) {
    match event {
        Event::Start(_) => state.depth += 1,
        Event::End(_) => state.depth = state.depth.saturating_sub(1),
        _ => {}
    }
}

/// Handles events outside of `<head>` and `<body>`.
pub(super) fn handle_global_event(
    event: &Event<'_>,
    state: &mut TtmlParserState,
    reader: &Reader<&[u8]>,
    cascade: &StyleCascade<'_>,
    captions: &mut ParsedCaptionSet,
) -> Result<(), ConvertError> {
    if let Event::Start(e) = event {
        match e.local_name().as_ref() {
            TAG_TT if !state.seen_root => process_tt_start(e, state, reader, captions)?,
            TAG_HEAD if state.seen_root => state.in_head = true,
            TAG_BODY if state.seen_root => body::open_body(e, state, reader, cascade)?,
            _ => {}
        }
    }
    Ok(())
}

/// Reads the namespaces, language and whitespace mode declared on `<tt>`.
fn process_tt_start(
    e: &BytesStart,
    state: &mut TtmlParserState,
    reader: &Reader<&[u8]>,
    captions: &mut ParsedCaptionSet,
) -> Result<(), ConvertError> {
    state.seen_root = true;

    let mut namespace = DocumentNamespace::default();
    let mut bindings: Vec<(String, String)> = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = attr.key.as_ref();
        let value = attr.decode_and_unescape_value(reader.decoder())?;
        if key == ATTR_XMLNS {
            namespace.document = value.trim().to_string();
        } else if let Some(prefix) = key.strip_prefix(XMLNS_PREFIX) {
            bindings.push((
                String::from_utf8_lossy(prefix).into_owned(),
                value.trim().to_string(),
            ));
        }
    }

    namespace.styling = bindings
        .iter()
        .find(|(prefix, _)| prefix == DEFAULT_STYLING_PREFIX)
        .map_or_else(
            || format!("{}{STYLING_NAMESPACE_SUFFIX}", namespace.document),
            |(_, uri)| uri.clone(),
        );
    let prefixes: Vec<String> = bindings
        .into_iter()
        .filter(|(_, uri)| *uri == namespace.styling)
        .map(|(prefix, _)| prefix)
        .collect();
    if !prefixes.is_empty() {
        namespace.styling_prefixes = prefixes;
    }

    if !namespace.document.contains("ttml") && !namespace.document.contains("ttaf1") {
        push_warning(
            &mut captions.warnings,
            format!(
                "Document namespace '{}' is not a TTML namespace",
                namespace.document
            ),
        );
    }
    debug!(
        "[TTML Parser] Document namespace '{}', styling namespace '{}' bound to {:?}",
        namespace.document, namespace.styling, namespace.styling_prefixes
    );

    let attrs = read_element_attributes(e, reader, &namespace.styling_prefixes)?;
    state.root_language = attrs.lang.filter(|lang| !lang.is_empty());
    state.root_preserve_space = attrs.space.as_deref() == Some(SPACE_PRESERVE);
    captions.document_language.clone_from(&state.root_language);
    state.namespace = namespace;
    Ok(())
}
