//! `<body>`: the content walk that turns paragraphs into cues.

use captions_core::{ConvertError, Cue, CueContent, ParsedCaptionSet, ResolvedStyle};
use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use tracing::trace;

use super::{
    constants::{SPACE_DEFAULT, SPACE_PRESERVE, TAG_BR, TAG_DIV, TAG_P, TAG_SPAN},
    state::{ElementFrame, FrameKind, ParagraphBuilder, TtmlParserState},
    utils::{ElementAttributes, decode_entity, push_warning, read_element_attributes},
};
use crate::{
    style::{NodeStyle, StyleCascade, StyledElement, schema},
    values::parse_time_expression,
};

const BR_ELEMENT: &str = "br";

/// Handles the `<body>` start tag.
pub(super) fn open_body(
    e: &BytesStart,
    state: &mut TtmlParserState,
    reader: &Reader<&[u8]>,
    cascade: &StyleCascade<'_>,
) -> Result<(), ConvertError> {
    let attrs = read_element_attributes(e, reader, &state.namespace.styling_prefixes)?;
    state.body_state.in_body = true;
    open_frame(FrameKind::Body, schema::TAG_BODY, &attrs, state, cascade, None);
    Ok(())
}

/// Handles every event between `<body>` and `</body>`.
pub(super) fn handle_body_event(
    event: &Event<'_>,
    state: &mut TtmlParserState,
    reader: &Reader<&[u8]>,
    cascade: &StyleCascade<'_>,
    captions: &mut ParsedCaptionSet,
) -> Result<(), ConvertError> {
    match event {
        Event::Start(e) => process_start(e, state, reader, cascade, captions)?,
        Event::End(_) => process_end(state, captions),
        Event::Text(e) if accepts_text(state) => {
            let text = e.xml_content()?;
            append_text(state, &text);
        }
        Event::CData(e) if accepts_text(state) => {
            let text = e.decode()?;
            append_text(state, &text);
        }
        Event::GeneralRef(e) if accepts_text(state) => {
            let name = e.decode()?;
            match decode_entity(&name) {
                Some(c) => append_text(state, c.encode_utf8(&mut [0; 4])),
                None => push_warning(
                    &mut captions.warnings,
                    format!("Ignored unknown entity '&{name};'"),
                ),
            }
        }
        _ => {}
    }
    Ok(())
}

fn process_start(
    e: &BytesStart,
    state: &mut TtmlParserState,
    reader: &Reader<&[u8]>,
    cascade: &StyleCascade<'_>,
    captions: &mut ParsedCaptionSet,
) -> Result<(), ConvertError> {
    let attrs = read_element_attributes(e, reader, &state.namespace.styling_prefixes)?;
    let in_paragraph = state.body_state.paragraph.is_some();

    match e.local_name().as_ref() {
        TAG_DIV if !in_paragraph => {
            open_frame(FrameKind::Div, schema::TAG_DIV, &attrs, state, cascade, None);
        }
        TAG_P if !in_paragraph => open_paragraph(attrs, state, reader, cascade, captions),
        TAG_SPAN if in_paragraph => {
            let style = open_frame(FrameKind::Span, schema::TAG_SPAN, &attrs, state, cascade, None);
            if let Some(paragraph) = state.body_state.paragraph.as_mut() {
                paragraph.open_span(style.declarations);
            }
        }
        TAG_BR if in_paragraph => {
            let preserve = state.preserve_space();
            open_frame(FrameKind::LineBreak, BR_ELEMENT, &attrs, state, cascade, None);
            if let Some(paragraph) = state.body_state.paragraph.as_mut() {
                paragraph.push_line_break(preserve);
            }
        }
        other => {
            let tag = String::from_utf8_lossy(other).into_owned();
            trace!("[TTML Parser] Ignoring content of <{tag}>");
            open_frame(FrameKind::Other, &tag, &attrs, state, cascade, None);
        }
    }
    Ok(())
}

fn open_paragraph(
    attrs: ElementAttributes,
    state: &mut TtmlParserState,
    reader: &Reader<&[u8]>,
    cascade: &StyleCascade<'_>,
    captions: &mut ParsedCaptionSet,
) {
    let region_id = attrs
        .region
        .clone()
        .or_else(|| state.body_state.inherited_region().map(str::to_owned));
    let region = match region_id {
        Some(id) if state.regions.contains_key(&id) => Some(id),
        Some(id) => {
            push_warning(
                &mut captions.warnings,
                format!("Paragraph references unknown region '{id}'"),
            );
            None
        }
        None => None,
    };
    // the region acts as the outermost ancestor of the paragraph
    let region_style = region
        .as_ref()
        .and_then(|id| state.regions.get(id))
        .map(|style| style.inheritable.clone());

    let style = open_frame(
        FrameKind::Paragraph,
        schema::TAG_P,
        &attrs,
        state,
        cascade,
        region_style.as_ref(),
    );

    let mut paragraph = ParagraphBuilder::new(state.current_language(), state.preserve_space());
    paragraph.timing = match paragraph_timing(&attrs) {
        Ok(timing) => Some(timing),
        Err(reason) => {
            push_warning(
                &mut captions.warnings,
                format!(
                    "Skipped paragraph at position {}: {reason}",
                    reader.buffer_position()
                ),
            );
            None
        }
    };
    paragraph.id = attrs.id;
    paragraph.region = region;
    paragraph.style = style.declarations;
    state.body_state.paragraph = Some(paragraph);
}

/// `begin` plus `end` or `dur`, in seconds.
fn paragraph_timing(attrs: &ElementAttributes) -> Result<(f64, f64), String> {
    let begin_raw = attrs.begin.as_deref().ok_or("no begin time")?;
    let begin = parse_time_expression(begin_raw)
        .ok_or_else(|| format!("invalid begin time '{begin_raw}'"))?;

    let end = if let Some(end_raw) = attrs.end.as_deref() {
        parse_time_expression(end_raw).ok_or_else(|| format!("invalid end time '{end_raw}'"))?
    } else if let Some(dur_raw) = attrs.dur.as_deref() {
        begin
            + parse_time_expression(dur_raw)
                .ok_or_else(|| format!("invalid duration '{dur_raw}'"))?
    } else {
        return Err("no end time or duration".to_string());
    };

    if end <= begin {
        return Err(format!("ends at {end}s, not after its begin {begin}s"));
    }
    Ok((begin, end))
}

/// Resolves the style of a new element and pushes its frame.
fn open_frame(
    kind: FrameKind,
    tag: &str,
    attrs: &ElementAttributes,
    state: &mut TtmlParserState,
    cascade: &StyleCascade<'_>,
    region_style: Option<&ResolvedStyle>,
) -> NodeStyle {
    let style = {
        let mut ancestors = state.body_state.ancestor_styles();
        ancestors.extend(region_style);
        let node = StyledElement::new(tag, &attrs.styling, &attrs.style_refs);
        cascade.resolve(&node, &ancestors, &state.registry)
    };
    let lang = attrs
        .lang
        .clone()
        .or_else(|| state.current_language().map(str::to_owned));
    let preserve_space = match attrs.space.as_deref() {
        Some(SPACE_PRESERVE) => true,
        Some(SPACE_DEFAULT) => false,
        _ => state.preserve_space(),
    };

    state.body_state.frames.push(ElementFrame {
        kind,
        style: style.clone(),
        region: attrs.region.clone(),
        lang,
        preserve_space,
    });
    style
}

fn process_end(state: &mut TtmlParserState, captions: &mut ParsedCaptionSet) {
    let Some(frame) = state.body_state.frames.pop() else {
        return;
    };
    match frame.kind {
        FrameKind::Body => state.body_state.in_body = false,
        FrameKind::Span => {
            if let Some(paragraph) = state.body_state.paragraph.as_mut() {
                paragraph.close_span();
            }
        }
        FrameKind::Paragraph => finish_paragraph(state, captions),
        FrameKind::Div | FrameKind::LineBreak | FrameKind::Other => {}
    }
}

fn finish_paragraph(state: &mut TtmlParserState, captions: &mut ParsedCaptionSet) {
    let Some(mut paragraph) = state.body_state.paragraph.take() else {
        return;
    };
    let Some((begin, end)) = paragraph.timing else {
        return;
    };

    let nodes = paragraph.finish_content();
    let (text_style, wrapper_style) = paragraph.style.partition(schema::is_text_css);
    let cue = Cue {
        begin,
        end,
        region: paragraph.region.take(),
        id: paragraph.id.take(),
        content: CueContent {
            style: text_style,
            nodes,
        },
        resolved_style: paragraph.style,
        wrapper_style,
    };
    trace!(
        "[TTML Parser] Cue {begin}s-{end}s ({}): {:?}",
        paragraph.language,
        cue.text()
    );
    captions.add_cue(&paragraph.language, cue);
}

/// Text is kept only directly inside a paragraph or one of its spans.
fn accepts_text(state: &TtmlParserState) -> bool {
    state.body_state.paragraph.is_some()
        && matches!(
            state.body_state.frames.last().map(|frame| frame.kind),
            Some(FrameKind::Paragraph | FrameKind::Span)
        )
}

fn append_text(state: &mut TtmlParserState, text: &str) {
    let preserve = state.preserve_space();
    if let Some(paragraph) = state.body_state.paragraph.as_mut() {
        paragraph.push_text(text, preserve, &mut state.text_buffer);
    }
}
