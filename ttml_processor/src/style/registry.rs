//! Style classes collected from `<head>` while one document is parsed.

use std::collections::{BTreeMap, HashMap};

use captions_core::{ResolvedStyle, StyleClass};
use tracing::trace;

const REGION_SUFFIX: &str = "-region";

/// Style classes known to the current parse, keyed by `xml:id`.
///
/// A class registered as `X` is also reachable as `X-region`, which yields its
/// region-only declarations.
#[derive(Debug, Default, Clone)]
pub struct StyleRegistry {
    classes: HashMap<String, StyleClass>,
}

impl StyleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a class. A later definition with the same id replaces the earlier one.
    pub fn register(&mut self, class: StyleClass) {
        if self.classes.contains_key(&class.id) {
            trace!("[StyleRegistry] Style '{}' redefined, keeping the last definition", class.id);
        }
        self.classes.insert(class.id.clone(), class);
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&StyleClass> {
        self.classes.get(id)
    }

    /// Declarations registered under `id`, including the derived `X-region` entries.
    #[must_use]
    pub fn lookup(&self, id: &str) -> Option<&ResolvedStyle> {
        if let Some(class) = self.classes.get(id) {
            return Some(&class.declarations);
        }
        let base = id.strip_suffix(REGION_SUFFIX)?;
        self.classes
            .get(base)
            .map(|class| &class.region_declarations)
            .filter(|declarations| !declarations.is_empty())
    }

    /// Every non-empty entry as a rule, `X-region` entries included.
    #[must_use]
    pub fn rules(&self) -> BTreeMap<String, ResolvedStyle> {
        let mut rules = BTreeMap::new();
        for class in self.classes.values() {
            if !class.declarations.is_empty() {
                rules.insert(class.id.clone(), class.declarations.clone());
            }
            if !class.region_declarations.is_empty() {
                rules
                    .entry(class.region_id())
                    .or_insert_with(|| class.region_declarations.clone());
            }
        }
        rules
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
