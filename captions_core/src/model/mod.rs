pub mod caption_set;
pub mod cue;
pub mod style;
pub mod timeline;

pub use caption_set::*;
pub use cue::*;
pub use style::*;
pub use timeline::*;
