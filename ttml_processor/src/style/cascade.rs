//! # Style resolution
//!
//! Resolves the CSS declarations of one element from, lowest priority first:
//!
//! 1. inheritable properties of the nearest ancestor that sets them,
//! 2. the style classes the element references, in reference order,
//! 3. the element's own `tts:*` attributes that apply to its tag.
//!
//! Own attributes are transformed with the declarations merged so far, so a
//! `tts:textOutline` without a color picks up the color of the same element.

use captions_core::{ResolvedStyle, StyleClass, StyleOptions};
use tracing::trace;

use super::registry::StyleRegistry;
use super::schema::{
    self, STYLE_SCHEMA, StylePropertySpec, TAG_REGION, TransformContext, inherited_properties,
};

/// The parts of an element the cascade looks at.
#[derive(Debug, Clone, Copy)]
pub struct StyledElement<'a> {
    /// Local name, `p`, `span`, `region`, ...
    pub tag: &'a str,
    /// `tts:*` attributes as (unprefixed name, raw value), in document order.
    pub styling: &'a [(String, String)],
    /// Ids from the `style` attribute, in order.
    pub style_refs: &'a [String],
}

impl<'a> StyledElement<'a> {
    #[must_use]
    pub const fn new(
        tag: &'a str,
        styling: &'a [(String, String)],
        style_refs: &'a [String],
    ) -> Self {
        Self {
            tag,
            styling,
            style_refs,
        }
    }

    /// Value of a `tts:*` attribute. The last occurrence wins.
    #[must_use]
    pub fn styling_value(&self, name: &str) -> Option<&'a str> {
        self.styling
            .iter()
            .rev()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Resolved style of one element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeStyle {
    /// Everything that applies to the element itself.
    pub declarations: ResolvedStyle,
    /// What the element hands down to its descendants.
    ///
    /// Besides the inherited subset of `declarations` this holds inherited properties set
    /// on the element although they do not apply to its tag, e.g. `tts:color` on a `<div>`.
    pub inheritable: ResolvedStyle,
}

pub struct StyleCascade<'a> {
    context: TransformContext<'a>,
}

impl<'a> StyleCascade<'a> {
    #[must_use]
    pub const fn new(options: &'a StyleOptions, cell_height: f64) -> Self {
        Self {
            context: TransformContext {
                options,
                cell_height,
            },
        }
    }

    #[must_use]
    pub const fn context(&self) -> &TransformContext<'a> {
        &self.context
    }

    /// Resolves a content element (`body`, `div`, `p`, `span`).
    ///
    /// `ancestors` are the inheritable sets of the enclosing elements, nearest first. For a
    /// paragraph the region it is displayed in comes last.
    #[must_use]
    pub fn resolve(
        &self,
        node: &StyledElement<'_>,
        ancestors: &[&ResolvedStyle],
        registry: &StyleRegistry,
    ) -> NodeStyle {
        let layers: Vec<&ResolvedStyle> = node
            .style_refs
            .iter()
            .filter_map(|id| lookup_class(registry, id))
            .collect();
        self.cascade(node, ancestors, &layers)
    }

    /// Resolves a `<region>` definition.
    ///
    /// A referenced class `X` contributes both `X` and `X-region`. Anonymous `<style>`
    /// children of the region apply after the referenced classes.
    #[must_use]
    pub fn resolve_region(
        &self,
        node: &StyledElement<'_>,
        inline_styles: &[StyleClass],
        registry: &StyleRegistry,
    ) -> NodeStyle {
        let mut layers = Vec::new();
        for id in node.style_refs {
            if let Some(class) = lookup_class(registry, id) {
                layers.push(class);
            }
            if let Some(region_only) = registry.lookup(&format!("{id}-region")) {
                layers.push(region_only);
            }
        }
        for inline in inline_styles {
            layers.push(&inline.declarations);
            layers.push(&inline.region_declarations);
        }
        let node = StyledElement { tag: TAG_REGION, ..*node };
        self.cascade(&node, &[], &layers)
    }

    /// Resolves a `<style>` definition from `<styling>`.
    ///
    /// Chained references are merged first. Every known property is taken regardless of the
    /// element it will later be applied to; region-only properties are split off.
    #[must_use]
    pub fn resolve_definition(
        &self,
        id: &str,
        node: &StyledElement<'_>,
        registry: &StyleRegistry,
    ) -> StyleClass {
        let mut declarations = ResolvedStyle::new();
        let mut region_declarations = ResolvedStyle::new();
        for reference in node.style_refs {
            if reference == id {
                continue;
            }
            match registry.get(reference) {
                Some(parent) => {
                    declarations.extend(&parent.declarations);
                    region_declarations.extend(&parent.region_declarations);
                }
                None => trace!("[StyleCascade] Style '{id}' references unknown style '{reference}'"),
            }
        }

        for prop in STYLE_SCHEMA {
            let Some(raw) = node.styling_value(prop.name) else {
                continue;
            };
            let computed = prop.compute(raw, &declarations, &self.context);
            let target = if prop.is_region_only() {
                &mut region_declarations
            } else {
                &mut declarations
            };
            for (property, value) in computed {
                target.set(property, value);
            }
        }

        StyleClass {
            id: id.to_string(),
            declarations,
            region_declarations,
        }
    }

    fn cascade(
        &self,
        node: &StyledElement<'_>,
        ancestors: &[&ResolvedStyle],
        class_layers: &[&ResolvedStyle],
    ) -> NodeStyle {
        let mut merged = ResolvedStyle::new();

        // nearest ancestor first, so the first one to supply a property wins
        for ancestor in ancestors {
            let (inherited, _) = ancestor.partition(schema::is_inherited_css);
            merged.fill_missing(&inherited);
        }

        for layer in class_layers {
            merged.extend(layer);
        }

        for prop in schema::properties_for(node.tag) {
            self.apply_own(prop, node, &mut merged);
        }

        let (mut inheritable, _) = merged.partition(schema::is_inherited_css);
        for prop in inherited_properties().filter(|prop| !prop.applies_to(node.tag)) {
            if let Some(raw) = node.styling_value(prop.name) {
                for (property, value) in prop.compute(raw, &merged, &self.context) {
                    inheritable.set(property, value);
                }
            }
        }

        NodeStyle {
            declarations: merged,
            inheritable,
        }
    }

    fn apply_own(
        &self,
        prop: &StylePropertySpec,
        node: &StyledElement<'_>,
        merged: &mut ResolvedStyle,
    ) {
        let Some(raw) = node.styling_value(prop.name) else {
            return;
        };
        for (property, value) in prop.compute(raw, merged, &self.context) {
            merged.set(property, value);
        }
    }
}

fn lookup_class<'r>(registry: &'r StyleRegistry, id: &str) -> Option<&'r ResolvedStyle> {
    let found = registry.lookup(id);
    if found.is_none() {
        trace!("[StyleCascade] Unknown style reference '{id}', ignored");
    }
    found
}
