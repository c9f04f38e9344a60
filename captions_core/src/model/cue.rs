use serde::{Deserialize, Serialize};

use super::style::ResolvedStyle;

/// One node of a cue's renderable content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentNode {
    Text { text: String },
    /// A `<span>` with its own resolved style.
    Span {
        style: ResolvedStyle,
        children: Vec<ContentNode>,
    },
    LineBreak,
}

impl ContentNode {
    fn push_plain_text(&self, out: &mut String) {
        match self {
            Self::Text { text } => out.push_str(text),
            Self::Span { children, .. } => {
                for child in children {
                    child.push_plain_text(out);
                }
            }
            Self::LineBreak => out.push('\n'),
        }
    }
}

/// The part of a cue that the renderer draws: paragraph-level text declarations and the
/// content tree below the paragraph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CueContent {
    pub style: ResolvedStyle,
    pub nodes: Vec<ContentNode>,
}

impl CueContent {
    /// The text of the cue without any styling, line breaks as `\n`.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            node.push_plain_text(&mut out);
        }
        out
    }
}

/// One timed, styled caption paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cue {
    /// Start time in seconds.
    pub begin: f64,
    /// End time in seconds, always after `begin`.
    pub end: f64,
    /// Region the cue is flowed into, `None` for the default region.
    pub region: Option<String>,
    /// `xml:id` of the source paragraph.
    pub id: Option<String>,
    pub content: CueContent,
    /// The complete cascade result for the paragraph.
    pub resolved_style: ResolvedStyle,
    /// Declarations for the wrapper the cue is placed in: position, size and everything
    /// that is not a paragraph text property.
    pub wrapper_style: ResolvedStyle,
}

impl Cue {
    /// Whether the cue is showing at `time`: `begin <= time < end`.
    #[must_use]
    pub fn is_active_at(&self, time: f64) -> bool {
        self.begin <= time && time < self.end
    }

    #[must_use]
    pub fn duration(&self) -> f64 {
        self.end - self.begin
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.content.plain_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_walks_spans_and_breaks() {
        let content = CueContent {
            style: ResolvedStyle::new(),
            nodes: vec![
                ContentNode::Text {
                    text: "Hello ".to_string(),
                },
                ContentNode::Span {
                    style: ResolvedStyle::new(),
                    children: vec![ContentNode::Text {
                        text: "world".to_string(),
                    }],
                },
                ContentNode::LineBreak,
                ContentNode::Text {
                    text: "again".to_string(),
                },
            ],
        };
        assert_eq!(content.plain_text(), "Hello world\nagain");
    }

    #[test]
    fn test_active_window_is_half_open() {
        let cue = Cue {
            begin: 1.0,
            end: 3.0,
            region: None,
            id: None,
            content: CueContent::default(),
            resolved_style: ResolvedStyle::new(),
            wrapper_style: ResolvedStyle::new(),
        };
        assert!(cue.is_active_at(1.0));
        assert!(cue.is_active_at(2.999));
        assert!(!cue.is_active_at(3.0));
        assert!(!cue.is_active_at(0.5));
        assert!((cue.duration() - 2.0).abs() < f64::EPSILON);
    }
}
