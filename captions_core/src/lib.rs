pub mod config;
pub mod display;
pub mod error;
pub mod model;

pub use config::*;
pub use display::{CaptionDisplay, RenderSurface};
pub use error::*;
pub use model::*;
