use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A flat set of rendering-surface (CSS) declarations, property name → value.
///
/// Every write replaces the previous value of the same property, so merges have to be
/// issued from the lowest to the highest priority source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedStyle {
    declarations: BTreeMap<String, String>,
}

impl ResolvedStyle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.declarations.insert(property.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations.get(property).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, property: &str) -> bool {
        self.declarations.contains_key(property)
    }

    /// Writes every declaration of `other` over this set.
    pub fn extend(&mut self, other: &Self) {
        for (property, value) in &other.declarations {
            self.declarations.insert(property.clone(), value.clone());
        }
    }

    /// Copies the declarations of `other` that this set does not have yet.
    pub fn fill_missing(&mut self, other: &Self) {
        for (property, value) in &other.declarations {
            self.declarations
                .entry(property.clone())
                .or_insert_with(|| value.clone());
        }
    }

    /// Splits the set in two: declarations whose property satisfies `predicate`, and the rest.
    #[must_use]
    pub fn partition<F>(&self, predicate: F) -> (Self, Self)
    where
        F: Fn(&str) -> bool,
    {
        let mut matching = Self::new();
        let mut rest = Self::new();
        for (property, value) in &self.declarations {
            if predicate(property) {
                matching.set(property.clone(), value.clone());
            } else {
                rest.set(property.clone(), value.clone());
            }
        }
        (matching, rest)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations
            .iter()
            .map(|(property, value)| (property.as_str(), value.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Declarations as `property:value` strings, in property order.
    #[must_use]
    pub fn to_declarations(&self) -> Vec<String> {
        self.iter()
            .map(|(property, value)| format!("{property}:{value}"))
            .collect()
    }

    /// Renders the set for a `style="..."` attribute.
    #[must_use]
    pub fn to_inline_css(&self) -> String {
        self.to_declarations().join(";")
    }
}

impl<K, V> FromIterator<(K, V)> for ResolvedStyle
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut style = Self::new();
        for (property, value) in iter {
            style.set(property, value);
        }
        style
    }
}

/// A named `<style>` definition from the document head.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleClass {
    pub id: String,
    /// Declarations applicable to content elements.
    pub declarations: ResolvedStyle,
    /// Declarations that only make sense on a region (`opacity`, `padding`, ...).
    pub region_declarations: ResolvedStyle,
}

impl StyleClass {
    /// Id under which the region-only declarations are registered.
    #[must_use]
    pub fn region_id(&self) -> String {
        format!("{}-region", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_overwrites_and_fill_missing_does_not() {
        let mut base: ResolvedStyle = [("color", "red"), ("font-size", "12px")]
            .into_iter()
            .collect();
        let other: ResolvedStyle = [("color", "blue"), ("font-style", "italic")]
            .into_iter()
            .collect();

        let mut filled = base.clone();
        filled.fill_missing(&other);
        assert_eq!(filled.get("color"), Some("red"));
        assert_eq!(filled.get("font-style"), Some("italic"));

        base.extend(&other);
        assert_eq!(base.get("color"), Some("blue"));
        assert_eq!(base.len(), 3);
    }

    #[test]
    fn test_partition_and_inline_css() {
        let style: ResolvedStyle = [("top", "10%"), ("color", "red"), ("left", "5%")]
            .into_iter()
            .collect();
        let (layout, rest) = style.partition(|p| p == "top" || p == "left");
        assert_eq!(layout.to_inline_css(), "left:5%;top:10%");
        assert_eq!(rest.to_declarations(), vec!["color:red".to_string()]);
    }
}
