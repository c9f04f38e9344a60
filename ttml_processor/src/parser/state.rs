//! Parser state: what is open, what has been collected so far.

use std::collections::HashMap;

use captions_core::{ContentNode, DEFAULT_LANGUAGE, ResolvedStyle, StyleClass};

use super::{
    constants::{DEFAULT_STYLING_PREFIX, STYLING_NAMESPACE_SUFFIX, TTML_NAMESPACE},
    utils::{ElementAttributes, collapse_whitespace_into},
};
use crate::style::{NodeStyle, StyleRegistry};

/// Namespaces declared on the `<tt>` root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct DocumentNamespace {
    pub(super) document: String,
    pub(super) styling: String,
    /// Prefixes bound to `styling`.
    pub(super) styling_prefixes: Vec<String>,
}

impl Default for DocumentNamespace {
    fn default() -> Self {
        Self {
            document: TTML_NAMESPACE.to_string(),
            styling: format!("{TTML_NAMESPACE}{STYLING_NAMESPACE_SUFFIX}"),
            styling_prefixes: vec![DEFAULT_STYLING_PREFIX.to_string()],
        }
    }
}

/// Top level parser state.
#[derive(Debug, Default)]
pub(super) struct TtmlParserState {
    pub(super) namespace: DocumentNamespace,
    pub(super) seen_root: bool,
    /// Open elements outside of skipped subtrees.
    pub(super) depth: usize,
    /// Nesting inside a `<script>` subtree; everything in it is dropped.
    pub(super) script_depth: usize,
    /// `xml:lang` of `<tt>`.
    pub(super) root_language: Option<String>,
    pub(super) root_preserve_space: bool,
    pub(super) registry: StyleRegistry,
    pub(super) regions: HashMap<String, NodeStyle>,
    pub(super) in_head: bool,
    pub(super) head_state: HeadParseState,
    pub(super) body_state: BodyParseState,
    /// Reused buffer for whitespace collapsing.
    pub(super) text_buffer: String,
}

impl TtmlParserState {
    /// Language of the innermost open body element.
    pub(super) fn current_language(&self) -> Option<&str> {
        self.body_state
            .frames
            .last()
            .and_then(|frame| frame.lang.as_deref())
            .or(self.root_language.as_deref())
    }

    pub(super) fn preserve_space(&self) -> bool {
        self.body_state
            .frames
            .last()
            .map_or(self.root_preserve_space, |frame| frame.preserve_space)
    }
}

/// State inside `<head>`.
#[derive(Debug, Default)]
pub(super) struct HeadParseState {
    pub(super) in_styling: bool,
    pub(super) in_layout: bool,
    pub(super) current_region: Option<RegionBuilder>,
}

/// A `<region>` whose end tag has not been seen yet.
#[derive(Debug, Default)]
pub(super) struct RegionBuilder {
    pub(super) attributes: ElementAttributes,
    /// Anonymous `<style>` children.
    pub(super) inline_styles: Vec<StyleClass>,
}

/// State inside `<body>`.
#[derive(Debug, Default)]
pub(super) struct BodyParseState {
    pub(super) in_body: bool,
    /// Open elements from `<body>` down, innermost last.
    pub(super) frames: Vec<ElementFrame>,
    pub(super) paragraph: Option<ParagraphBuilder>,
}

impl BodyParseState {
    /// Inheritable styles of the open elements, innermost first.
    pub(super) fn ancestor_styles(&self) -> Vec<&ResolvedStyle> {
        self.frames
            .iter()
            .rev()
            .map(|frame| &frame.style.inheritable)
            .collect()
    }

    /// The nearest `region` attribute on the open elements.
    pub(super) fn inherited_region(&self) -> Option<&str> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.region.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum FrameKind {
    Body,
    Div,
    Paragraph,
    Span,
    LineBreak,
    /// Anything else (`metadata`, `set`, unknown elements); its text is ignored.
    Other,
}

/// One open element below `<body>`.
#[derive(Debug, Clone)]
pub(super) struct ElementFrame {
    pub(super) kind: FrameKind,
    pub(super) style: NodeStyle,
    pub(super) region: Option<String>,
    pub(super) lang: Option<String>,
    pub(super) preserve_space: bool,
}

/// The `<p>` being collected.
#[derive(Debug)]
pub(super) struct ParagraphBuilder {
    /// `None` when the paragraph cannot be timed and will be dropped.
    pub(super) timing: Option<(f64, f64)>,
    pub(super) id: Option<String>,
    pub(super) region: Option<String>,
    pub(super) language: String,
    pub(super) style: ResolvedStyle,
    pub(super) preserve_space: bool,
    /// The paragraph root first, then one entry per open `<span>`.
    pub(super) content: Vec<ContentBuilder>,
    /// Whether the last thing emitted, in any span, was a space or a line break.
    at_space: bool,
}

impl ParagraphBuilder {
    pub(super) fn new(language: Option<&str>, preserve_space: bool) -> Self {
        Self {
            timing: None,
            id: None,
            region: None,
            language: language
                .filter(|lang| !lang.is_empty())
                .unwrap_or(DEFAULT_LANGUAGE)
                .to_string(),
            style: ResolvedStyle::new(),
            preserve_space,
            content: vec![ContentBuilder::default()],
            at_space: true,
        }
    }

    /// Adds text to the innermost open element, merging with a preceding text node.
    ///
    /// Unless `preserve` is set, whitespace runs collapse to one space, also across span
    /// boundaries, and text directly after a line break loses its leading whitespace.
    pub(super) fn push_text(&mut self, text: &str, preserve: bool, buffer: &mut String) {
        buffer.clear();
        if preserve {
            buffer.push_str(text);
        } else {
            // a seeded space makes the collapse swallow leading whitespace
            if self.at_space {
                buffer.push(' ');
            }
            collapse_whitespace_into(text, buffer);
            if self.at_space {
                buffer.remove(0);
            }
        }
        if buffer.is_empty() {
            return;
        }
        self.at_space = buffer.ends_with(char::is_whitespace);

        let Some(content) = self.content.last_mut() else {
            return;
        };
        if let Some(ContentNode::Text { text: last }) = content.nodes.last_mut() {
            last.push_str(buffer);
        } else {
            content.nodes.push(ContentNode::Text {
                text: buffer.clone(),
            });
        }
    }

    /// Adds a line break, dropping the whitespace in front of it unless `preserve` is set.
    pub(super) fn push_line_break(&mut self, preserve: bool) {
        if !preserve {
            for content in self.content.iter_mut().rev() {
                if trim_trailing(&mut content.nodes) {
                    break;
                }
            }
        }
        self.at_space = true;
        if let Some(content) = self.content.last_mut() {
            content.nodes.push(ContentNode::LineBreak);
        }
    }

    pub(super) fn open_span(&mut self, style: ResolvedStyle) {
        self.content.push(ContentBuilder {
            style,
            nodes: Vec::new(),
        });
    }

    pub(super) fn close_span(&mut self) {
        if self.content.len() < 2 {
            return;
        }
        if let Some(span) = self.content.pop()
            && let Some(parent) = self.content.last_mut()
        {
            parent.nodes.push(ContentNode::Span {
                style: span.style,
                children: span.nodes,
            });
        }
    }

    /// Closes any span left open and returns the content tree, edges trimmed unless
    /// whitespace is preserved.
    pub(super) fn finish_content(&mut self) -> Vec<ContentNode> {
        while self.content.len() > 1 {
            self.close_span();
        }
        let mut nodes = self
            .content
            .pop()
            .map(|root| root.nodes)
            .unwrap_or_default();
        if !self.preserve_space {
            trim_leading(&mut nodes);
            trim_trailing(&mut nodes);
        }
        nodes
    }
}

/// Children collected for the paragraph or one of its spans.
#[derive(Debug, Default)]
pub(super) struct ContentBuilder {
    pub(super) style: ResolvedStyle,
    pub(super) nodes: Vec<ContentNode>,
}

/// Drops leading whitespace of the content. Returns `true` once visible content is reached.
fn trim_leading(nodes: &mut Vec<ContentNode>) -> bool {
    let mut i = 0;
    while i < nodes.len() {
        match &mut nodes[i] {
            ContentNode::Text { text } => {
                let trimmed = text.trim_start();
                if trimmed.is_empty() {
                    nodes.remove(i);
                    continue;
                }
                *text = trimmed.to_string();
                return true;
            }
            ContentNode::Span { children, .. } => {
                if trim_leading(children) {
                    return true;
                }
                i += 1;
            }
            ContentNode::LineBreak => return true,
        }
    }
    false
}

fn trim_trailing(nodes: &mut Vec<ContentNode>) -> bool {
    let mut i = nodes.len();
    while i > 0 {
        i -= 1;
        match &mut nodes[i] {
            ContentNode::Text { text } => {
                let trimmed_len = text.trim_end().len();
                if trimmed_len == 0 {
                    nodes.remove(i);
                    continue;
                }
                text.truncate(trimmed_len);
                return true;
            }
            ContentNode::Span { children, .. } => {
                if trim_trailing(children) {
                    return true;
                }
            }
            ContentNode::LineBreak => return true,
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> ContentNode {
        ContentNode::Text {
            text: value.to_string(),
        }
    }

    fn texts(paragraph: &ParagraphBuilder) -> Vec<ContentNode> {
        paragraph.content[0].nodes.clone()
    }

    #[test]
    fn test_text_merges_and_collapses() {
        let mut buffer = String::new();
        let mut paragraph = ParagraphBuilder::new(None, false);
        paragraph.push_text("  Hello \n ", false, &mut buffer);
        paragraph.push_text("  world", false, &mut buffer);
        assert_eq!(texts(&paragraph), vec![text("Hello world")]);
    }

    #[test]
    fn test_line_break_trims_adjacent_whitespace() {
        let mut buffer = String::new();
        let mut paragraph = ParagraphBuilder::new(None, false);
        paragraph.push_text("one  ", false, &mut buffer);
        paragraph.push_line_break(false);
        paragraph.push_text("\n    two", false, &mut buffer);
        assert_eq!(
            texts(&paragraph),
            vec![text("one"), ContentNode::LineBreak, text("two")]
        );
    }

    #[test]
    fn test_preserved_text_is_untouched() {
        let mut buffer = String::new();
        let mut paragraph = ParagraphBuilder::new(None, true);
        paragraph.push_text("  a  b ", true, &mut buffer);
        paragraph.push_line_break(true);
        paragraph.push_text(" c", true, &mut buffer);
        assert_eq!(
            texts(&paragraph),
            vec![text("  a  b "), ContentNode::LineBreak, text(" c")]
        );
    }

    #[test]
    fn test_whitespace_collapses_across_spans() {
        let mut buffer = String::new();
        let mut paragraph = ParagraphBuilder::new(None, false);
        paragraph.push_text("Hello ", false, &mut buffer);
        paragraph.open_span(ResolvedStyle::new());
        paragraph.push_text(" world", false, &mut buffer);
        paragraph.close_span();
        assert_eq!(
            paragraph.finish_content(),
            vec![
                text("Hello "),
                ContentNode::Span {
                    style: ResolvedStyle::new(),
                    children: vec![text("world")],
                },
            ]
        );
    }

    #[test]
    fn test_line_break_in_span_and_text_after_it() {
        let mut buffer = String::new();
        let mut paragraph = ParagraphBuilder::new(None, false);
        paragraph.push_text("a ", false, &mut buffer);
        paragraph.open_span(ResolvedStyle::new());
        paragraph.push_line_break(false);
        paragraph.close_span();
        paragraph.push_text("\n   c", false, &mut buffer);
        assert_eq!(
            paragraph.finish_content(),
            vec![
                text("a"),
                ContentNode::Span {
                    style: ResolvedStyle::new(),
                    children: vec![ContentNode::LineBreak],
                },
                text("c"),
            ]
        );
    }

    #[test]
    fn test_finish_content_trims_edges_through_spans() {
        let mut buffer = String::new();
        let mut paragraph = ParagraphBuilder::new(None, false);
        paragraph.open_span(ResolvedStyle::new());
        paragraph.push_text("  styled ", false, &mut buffer);
        paragraph.close_span();
        paragraph.push_text(" tail  ", false, &mut buffer);

        let nodes = paragraph.finish_content();
        assert_eq!(
            nodes,
            vec![
                ContentNode::Span {
                    style: ResolvedStyle::new(),
                    children: vec![text("styled ")],
                },
                text("tail"),
            ]
        );
        assert_eq!(paragraph.language, DEFAULT_LANGUAGE);
    }
}
