//! `<head>`: style definitions and regions.

use captions_core::{ConvertError, ParsedCaptionSet};
use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use tracing::trace;

use super::{
    constants::{TAG_HEAD, TAG_LAYOUT, TAG_REGION, TAG_STYLE, TAG_STYLING},
    state::{RegionBuilder, TtmlParserState},
    utils::{push_warning, read_element_attributes},
};
use crate::style::{StyleCascade, StyledElement, schema};

const STYLE_ELEMENT: &str = "style";

pub(super) fn handle_head_event(
    event: &Event<'_>,
    state: &mut TtmlParserState,
    reader: &Reader<&[u8]>,
    cascade: &StyleCascade<'_>,
    captions: &mut ParsedCaptionSet,
) -> Result<(), ConvertError> {
    match event {
        Event::Start(e) => match e.local_name().as_ref() {
            TAG_STYLING => state.head_state.in_styling = true,
            TAG_LAYOUT => state.head_state.in_layout = true,
            TAG_STYLE => process_style_start(e, state, reader, cascade, captions)?,
            TAG_REGION if state.head_state.in_layout => {
                let attributes =
                    read_element_attributes(e, reader, &state.namespace.styling_prefixes)?;
                state.head_state.current_region = Some(RegionBuilder {
                    attributes,
                    inline_styles: Vec::new(),
                });
            }
            _ => {}
        },
        Event::End(e) => match e.local_name().as_ref() {
            TAG_HEAD => state.in_head = false,
            TAG_STYLING => state.head_state.in_styling = false,
            TAG_LAYOUT => state.head_state.in_layout = false,
            TAG_REGION => finish_region(state, cascade, captions),
            _ => {}
        },
        _ => {}
    }
    Ok(())
}

/// A `<style>` either defines a class in `<styling>` or styles the enclosing `<region>`.
fn process_style_start(
    e: &BytesStart,
    state: &mut TtmlParserState,
    reader: &Reader<&[u8]>,
    cascade: &StyleCascade<'_>,
    captions: &mut ParsedCaptionSet,
) -> Result<(), ConvertError> {
    let attrs = read_element_attributes(e, reader, &state.namespace.styling_prefixes)?;
    let node = StyledElement::new(STYLE_ELEMENT, &attrs.styling, &attrs.style_refs);

    if let Some(region) = state.head_state.current_region.as_mut() {
        let id = attrs.id.as_deref().unwrap_or_default();
        region
            .inline_styles
            .push(cascade.resolve_definition(id, &node, &state.registry));
        return Ok(());
    }
    if !state.head_state.in_styling {
        return Ok(());
    }

    let Some(id) = attrs.id.as_deref() else {
        push_warning(
            &mut captions.warnings,
            "Ignored <style> without xml:id".to_string(),
        );
        return Ok(());
    };
    let class = cascade.resolve_definition(id, &node, &state.registry);
    trace!(
        "[TTML Parser] Style '{id}': {} declarations, {} region declarations",
        class.declarations.len(),
        class.region_declarations.len()
    );
    state.registry.register(class);
    Ok(())
}

fn finish_region(
    state: &mut TtmlParserState,
    cascade: &StyleCascade<'_>,
    captions: &mut ParsedCaptionSet,
) {
    let Some(builder) = state.head_state.current_region.take() else {
        return;
    };
    let Some(id) = builder.attributes.id.clone() else {
        push_warning(
            &mut captions.warnings,
            "Ignored <region> without xml:id".to_string(),
        );
        return;
    };

    let node = StyledElement::new(
        schema::TAG_REGION,
        &builder.attributes.styling,
        &builder.attributes.style_refs,
    );
    let style = cascade.resolve_region(&node, &builder.inline_styles, &state.registry);
    trace!(
        "[TTML Parser] Region '{id}': {}",
        style.declarations.to_inline_css()
    );
    state.regions.insert(id, style);
}
