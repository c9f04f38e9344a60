//! Ordered cue storage with binary-search insertion and lookup.

use serde::{Deserialize, Serialize};

use super::cue::Cue;

/// Cues of one language, kept sorted by `begin`.
///
/// Cues with the same `begin` stay in insertion order. Deserializing goes through [`add`],
/// so an unsorted list is put in order on the way in.
///
/// [`add`]: CueTimeline::add
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Cue>", into = "Vec<Cue>")]
pub struct CueTimeline {
    cues: Vec<Cue>,
}

impl CueTimeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a cue after every cue starting at or before it and returns its index.
    pub fn add(&mut self, cue: Cue) -> usize {
        let index = self.cues.partition_point(|existing| existing.begin <= cue.begin);
        self.cues.insert(index, cue);
        index
    }

    /// Index of the first cue with `begin >= time`, or `len()` when there is none.
    #[must_use]
    pub fn lower_bound(&self, time: f64) -> usize {
        self.cues.partition_point(|existing| existing.begin < time)
    }

    /// Index one past the last cue with `begin <= time`.
    #[must_use]
    pub fn upper_bound(&self, time: f64) -> usize {
        self.cues.partition_point(|existing| existing.begin <= time)
    }

    /// Indices of the cues active at `time`, most recently started first.
    #[must_use]
    pub fn active_indices(&self, time: f64) -> Vec<usize> {
        (0..self.upper_bound(time))
            .rev()
            .filter(|&index| self.cues[index].end > time)
            .collect()
    }

    /// Cues active at `time`, most recently started first.
    #[must_use]
    pub fn active_cues(&self, time: f64) -> Vec<&Cue> {
        self.active_indices(time)
            .into_iter()
            .map(|index| &self.cues[index])
            .collect()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Cue> {
        self.cues.get(index)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Cue] {
        &self.cues
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cue> {
        self.cues.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }
}

impl From<Vec<Cue>> for CueTimeline {
    fn from(cues: Vec<Cue>) -> Self {
        let mut timeline = Self::new();
        for cue in cues {
            timeline.add(cue);
        }
        timeline
    }
}

impl From<CueTimeline> for Vec<Cue> {
    fn from(timeline: CueTimeline) -> Self {
        timeline.cues
    }
}

impl<'a> IntoIterator for &'a CueTimeline {
    type Item = &'a Cue;
    type IntoIter = std::slice::Iter<'a, Cue>;

    fn into_iter(self) -> Self::IntoIter {
        self.cues.iter()
    }
}

/// All cues of `timeline` with `begin <= time < end`, most recently started first.
#[must_use]
pub fn active_cues(timeline: &CueTimeline, time: f64) -> Vec<&Cue> {
    timeline.active_cues(time)
}
