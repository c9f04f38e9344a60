//! Drives a rendering surface from playback time updates.
//!
//! The display keeps track of which cues of the selected language are on screen and only
//! tells the surface about changes: cues that stopped being active are detached, cues that
//! became active are attached.

use std::{collections::BTreeSet, sync::Arc};

use tracing::debug;

use crate::model::{Cue, ParsedCaptionSet};

/// Something that can show and hide cue content.
pub trait RenderSurface {
    /// Shows the cue stored at `index` of the active timeline.
    fn attach(&mut self, index: usize, cue: &Cue);
    /// Hides a cue previously attached under `index`.
    fn detach(&mut self, index: usize, cue: &Cue);
}

#[derive(Debug, Clone)]
pub struct CaptionDisplay {
    captions: Arc<ParsedCaptionSet>,
    language: Option<String>,
    visible: BTreeSet<usize>,
    enabled: bool,
}

impl CaptionDisplay {
    /// Creates a disabled display showing the preferred language of `captions`.
    #[must_use]
    pub fn new(captions: Arc<ParsedCaptionSet>) -> Self {
        let language = captions.preferred_language().map(str::to_string);
        Self {
            captions,
            language,
            visible: BTreeSet::new(),
            enabled: false,
        }
    }

    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Indices of the cues currently attached, ascending.
    #[must_use]
    pub fn visible_indices(&self) -> Vec<usize> {
        self.visible.iter().copied().collect()
    }

    pub const fn enable(&mut self) {
        self.enabled = true;
    }

    /// Stops reacting to time updates and removes everything from the surface.
    pub fn disable(&mut self, surface: &mut impl RenderSurface) {
        self.enabled = false;
        self.clear(surface);
    }

    /// Switches language. Cues of the previous language are removed right away.
    pub fn set_language(&mut self, language: &str, surface: &mut impl RenderSurface) {
        self.clear(surface);
        debug!("Caption language switched to '{language}'");
        self.language = Some(language.to_string());
    }

    /// Replaces the caption set wholesale, e.g. after loading a new document.
    pub fn replace_captions(
        &mut self,
        captions: Arc<ParsedCaptionSet>,
        surface: &mut impl RenderSurface,
    ) {
        self.clear(surface);
        let keeps_language = self
            .language
            .as_deref()
            .is_some_and(|lang| captions.timeline(lang).is_some());
        if !keeps_language {
            self.language = captions.preferred_language().map(str::to_string);
        }
        self.captions = captions;
    }

    /// Brings the surface in line with the cues active at `time`.
    pub fn update(&mut self, time: f64, surface: &mut impl RenderSurface) {
        if !self.enabled {
            return;
        }
        let Some(timeline) = self
            .language
            .as_deref()
            .and_then(|lang| self.captions.timeline(lang))
        else {
            return;
        };

        let stale: Vec<usize> = self
            .visible
            .iter()
            .copied()
            .filter(|&index| timeline.get(index).is_none_or(|cue| !cue.is_active_at(time)))
            .collect();
        for index in stale {
            self.visible.remove(&index);
            if let Some(cue) = timeline.get(index) {
                surface.detach(index, cue);
            }
        }

        for index in timeline.active_indices(time) {
            if self.visible.insert(index)
                && let Some(cue) = timeline.get(index)
            {
                surface.attach(index, cue);
            }
        }
    }

    fn clear(&mut self, surface: &mut impl RenderSurface) {
        let timeline = self
            .language
            .as_deref()
            .and_then(|lang| self.captions.timeline(lang));
        for index in std::mem::take(&mut self.visible) {
            if let Some(cue) = timeline.and_then(|t| t.get(index)) {
                surface.detach(index, cue);
            }
        }
    }
}
