use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::{cue::Cue, style::ResolvedStyle, timeline::CueTimeline};

/// Language key used for content without any `xml:lang`.
pub const DEFAULT_LANGUAGE: &str = "Default";

/// Class name of the wrapper used for cues without a region.
pub const DEFAULT_REGION_CLASS: &str = "bc-default-region-style";

/// The result of parsing one caption document.
///
/// Built in a single pass and never mutated afterwards; loading new captions produces a new
/// set that replaces this one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedCaptionSet {
    /// One timeline per language code.
    pub timelines: HashMap<String, CueTimeline>,
    /// Language codes in the order they were first seen.
    pub languages: Vec<String>,
    /// Region id → region declarations.
    pub regions: BTreeMap<String, ResolvedStyle>,
    /// Style class id → declarations, including the `<id>-region` entries.
    pub style_classes: BTreeMap<String, ResolvedStyle>,
    /// `xml:lang` of the `<tt>` root.
    pub document_language: Option<String>,
    /// Recoverable problems found while parsing (skipped paragraphs, dangling references...).
    pub warnings: Vec<String>,
}

impl ParsedCaptionSet {
    #[must_use]
    pub fn timeline(&self, language: &str) -> Option<&CueTimeline> {
        self.timelines.get(language)
    }

    /// Inserts a cue into the timeline of `language`, creating the timeline on first use.
    pub fn add_cue(&mut self, language: &str, cue: Cue) -> usize {
        if !self.timelines.contains_key(language) {
            self.languages.push(language.to_string());
        }
        self.timelines
            .entry(language.to_string())
            .or_default()
            .add(cue)
    }

    /// Cues of `language` active at `time`, most recently started first.
    #[must_use]
    pub fn active_cues(&self, language: &str, time: f64) -> Vec<&Cue> {
        self.timeline(language)
            .map(|timeline| timeline.active_cues(time))
            .unwrap_or_default()
    }

    /// The language a display should start with: `Default` when present, then `en`,
    /// then whatever was seen first.
    #[must_use]
    pub fn preferred_language(&self) -> Option<&str> {
        [DEFAULT_LANGUAGE, "en"]
            .into_iter()
            .find(|lang| self.timelines.contains_key(*lang))
            .or_else(|| self.languages.first().map(String::as_str))
    }

    #[must_use]
    pub fn total_cues(&self) -> usize {
        self.timelines.values().map(CueTimeline::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_cues() == 0
    }
}

/// Human readable name for a language code; unknown codes are returned as they are.
#[must_use]
pub fn language_display_name(code: &str) -> &str {
    match code {
        "en" => "English",
        "fr" => "French",
        "de" => "German",
        "it" => "Italian",
        "ja" => "Japanese",
        "ko" => "Korean",
        "es" => "Spanish",
        "th" => "Thai",
        "" => DEFAULT_LANGUAGE,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CueContent;

    fn cue(begin: f64, end: f64) -> Cue {
        Cue {
            begin,
            end,
            region: None,
            id: None,
            content: CueContent::default(),
            resolved_style: ResolvedStyle::new(),
            wrapper_style: ResolvedStyle::new(),
        }
    }

    #[test]
    fn test_timelines_are_created_lazily_in_discovery_order() {
        let mut set = ParsedCaptionSet::default();
        assert!(set.is_empty());
        set.add_cue("fr", cue(1.0, 2.0));
        set.add_cue(DEFAULT_LANGUAGE, cue(0.0, 1.0));
        set.add_cue("fr", cue(0.5, 2.0));

        assert_eq!(set.languages, vec!["fr".to_string(), "Default".to_string()]);
        assert_eq!(set.timeline("fr").map(CueTimeline::len), Some(2));
        assert_eq!(set.total_cues(), 3);
        assert_eq!(set.active_cues("fr", 1.5).len(), 2);
        assert!(set.active_cues("de", 1.5).is_empty());
    }

    #[test]
    fn test_preferred_language() {
        let mut set = ParsedCaptionSet::default();
        assert_eq!(set.preferred_language(), None);
        set.add_cue("ja", cue(0.0, 1.0));
        assert_eq!(set.preferred_language(), Some("ja"));
        set.add_cue("en", cue(0.0, 1.0));
        assert_eq!(set.preferred_language(), Some("en"));
        set.add_cue(DEFAULT_LANGUAGE, cue(0.0, 1.0));
        assert_eq!(set.preferred_language(), Some(DEFAULT_LANGUAGE));
    }

    #[test]
    fn test_language_display_name() {
        assert_eq!(language_display_name("fr"), "French");
        assert_eq!(language_display_name("pt-BR"), "pt-BR");
        assert_eq!(language_display_name(""), "Default");
    }
}
