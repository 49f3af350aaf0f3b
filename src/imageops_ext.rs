mod content_bounds;
pub mod compose;
pub mod convert_color;

pub use content_bounds::{content_bounds, extract_corners};
