//! Segments sprite sheets drawn on a near-uniform background into individual poses.
//!
//! The pipeline for one sheet:
//!
//! 1. [`background::estimate_background`] averages the four corners.
//! 2. [`mask::build_foreground_mask`] thresholds in HSV around that color and cleans
//!    the result morphologically.
//! 3. [`regions::find_sprite_regions`] turns the mask into left-to-right boxes, splitting
//!    a single fused region and dropping watermarks.
//! 4. [`extract::extract_sprite`] pads, crops, removes stray blobs and builds RGBA.
//!
//! [`process`] runs all of it. File handling lives in [`image_processor`] and
//! [`progress_tracker`].

pub mod background;
pub mod blob;
pub mod config;
pub mod errors;
pub mod extract;
pub mod geometry;
pub mod image_processor;
pub mod imageops_ext;
pub mod mask;
pub mod pipeline;
pub mod progress_tracker;
pub mod regions;
pub mod traits;

pub mod mocks;

pub use config::ExtractConfig;
pub use errors::{Result, SpriteError};
pub use geometry::BoundingBox;
pub use image_processor::{ImageProcessor, PngDirectorySink};
pub use pipeline::{detect, process, Sprite, SpriteSheet};
pub use traits::*;
