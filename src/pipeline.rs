//! Per-sheet orchestration: mask, detect, extract.

use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};
use tracing::debug;

use crate::config::ExtractConfig;
use crate::errors::Result;
use crate::extract::extract_sprite;
use crate::geometry::BoundingBox;
use crate::mask::build_foreground_mask;
use crate::regions::find_sprite_regions;

/// One extracted pose.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    /// Position in left-to-right detection order, starting at 0.
    pub index: usize,
    /// Detected box before padding.
    pub bbox: BoundingBox,
    pub image: RgbaImage,
}

/// A sheet after mask construction and region detection, ready for extraction.
#[derive(Debug)]
pub struct SpriteSheet<'a> {
    image: &'a RgbImage,
    mask: GrayImage,
    regions: Vec<BoundingBox>,
}

impl<'a> SpriteSheet<'a> {
    pub fn analyze(image: &'a RgbImage, config: &ExtractConfig) -> Self {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Self {
                image,
                mask: GrayImage::new(width, height),
                regions: Vec::new(),
            };
        }

        let mask = build_foreground_mask(image, config.tolerance);
        let mut regions = find_sprite_regions(&mask, config.min_area);
        regions.retain(|bbox| bbox.fits_within(width, height));
        debug!(regions = regions.len(), width, height, "analyzed sheet");

        Self {
            image,
            mask,
            regions,
        }
    }

    pub fn mask(&self) -> &GrayImage {
        &self.mask
    }

    pub fn regions(&self) -> &[BoundingBox] {
        &self.regions
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn into_regions(self) -> Vec<BoundingBox> {
        self.regions
    }

    /// Crops every detected region, in detection order.
    pub fn extract(&self, config: &ExtractConfig) -> Result<Vec<Sprite>> {
        self.regions
            .iter()
            .enumerate()
            .map(|(index, &bbox)| {
                let image = extract_sprite(
                    self.image,
                    &self.mask,
                    bbox,
                    config.padding,
                    config.remove_background,
                )?;
                Ok(Sprite { index, bbox, image })
            })
            .collect()
    }
}

/// Drops any alpha channel, keeping color as stored.
pub fn strip_alpha(image: &DynamicImage) -> RgbImage {
    image.to_rgb8()
}

/// Detected sprite boxes for `image`, left to right.
pub fn detect(image: &RgbImage, config: &ExtractConfig) -> Vec<BoundingBox> {
    SpriteSheet::analyze(image, config).into_regions()
}

/// Runs the whole pipeline on one sheet. An empty result means no sprites were found.
pub fn process(image: &RgbImage, config: &ExtractConfig) -> Result<Vec<Sprite>> {
    SpriteSheet::analyze(image, config).extract(config)
}
