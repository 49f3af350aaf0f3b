use clap::Parser;
use std::path::PathBuf;

use crate::errors::{Result, SpriteError};
use crate::mask::DEFAULT_TOLERANCE;

/// Whether background removal is on when `--remove-bg` is not given.
pub const DEFAULT_REMOVE_BACKGROUND: bool = false;
pub const DEFAULT_PADDING: u32 = 10;
pub const DEFAULT_MIN_AREA: u32 = 1000;

/// Settings for one extraction run. Resolved once from the command line and passed down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractConfig {
    /// Pixels added on every side of a detected box before cropping.
    pub padding: u32,
    /// Smallest accepted region area in pixels.
    pub min_area: u32,
    /// Use the cleaned mask as alpha instead of keeping sprites opaque.
    pub remove_background: bool,
    /// Half-width of the saturation and value windows used to match the background.
    pub tolerance: u8,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractConfig {
    pub const fn new() -> Self {
        Self {
            padding: DEFAULT_PADDING,
            min_area: DEFAULT_MIN_AREA,
            remove_background: DEFAULT_REMOVE_BACKGROUND,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub const fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    pub const fn with_min_area(mut self, min_area: u32) -> Self {
        self.min_area = min_area;
        self
    }

    pub const fn with_remove_background(mut self, remove_background: bool) -> Self {
        self.remove_background = remove_background;
        self
    }

    pub const fn with_tolerance(mut self, tolerance: u8) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Extract individual poses from sprite sheets with a solid background.
#[derive(Parser, Clone, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Sprite sheet to process, or a directory searched recursively for sheets
    #[arg(default_value = "input")]
    pub input: PathBuf,

    /// Directory receiving one subdirectory of poses per sheet
    #[arg(short, long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Padding around sprites in pixels
    #[arg(short, long, default_value_t = DEFAULT_PADDING)]
    pub padding: u32,

    /// Minimum sprite area in pixels
    #[arg(short, long, default_value_t = DEFAULT_MIN_AREA)]
    pub min_area: u32,

    /// Saturation/value tolerance when matching the background color
    #[arg(short, long, default_value_t = DEFAULT_TOLERANCE)]
    pub tolerance: u8,

    /// Remove the background (make it transparent)
    #[arg(long)]
    pub remove_bg: bool,

    /// Worker threads for batch runs; defaults to the available parallelism
    #[arg(short, long)]
    pub num_threads: Option<usize>,
}

impl Cli {
    /// Rejects option combinations clap cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.num_threads == Some(0) {
            return Err(SpriteError::Configuration {
                message: "thread count must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn extract_config(&self) -> ExtractConfig {
        ExtractConfig::new()
            .with_padding(self.padding)
            .with_min_area(self.min_area)
            .with_tolerance(self.tolerance)
            .with_remove_background(self.remove_bg || DEFAULT_REMOVE_BACKGROUND)
    }
}
