//! TTML styling: the property table, the style classes of a document and the cascade that
//! turns both into CSS declarations.

pub mod cascade;
pub mod registry;
pub mod schema;

pub use cascade::{NodeStyle, StyleCascade, StyledElement};
pub use registry::StyleRegistry;
pub use schema::{STYLE_SCHEMA, StylePropertySpec, TransformContext, TransformedValue};
