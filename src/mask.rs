//! Foreground mask construction.
//!
//! Background pixels are matched in HSV space against the color sampled from the sheet
//! corners, then the background is grown slightly so neighbouring sprites separate, and
//! the inverted result is cleaned with a closing followed by an opening.
//!
//! The 3x3 elliptical structuring element is the 4-neighbour cross, so repeated
//! applications are expressed as L1 (diamond) radii.

use image::{imageops, GrayImage, Luma, Rgb, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::morphology;
use tracing::debug;

use crate::background::estimate_background;
use crate::imageops_ext::convert_color::{ConvertColor, Hsv, HUE_MAX};

/// Half-width of the hue acceptance window.
pub const HUE_TOLERANCE: u8 = 8;

/// Default half-width of the saturation and value acceptance windows.
pub const DEFAULT_TOLERANCE: u8 = 30;

pub const FOREGROUND: Luma<u8> = Luma([255]);
pub const BACKGROUND: Luma<u8> = Luma([0]);

/// Two cross dilations of the background.
const SEPARATION_RADIUS: u8 = 2;
const CLEANUP_RADIUS: u8 = 1;

/// Inclusive HSV range treated as background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HsvWindow {
    pub lower: Hsv,
    pub upper: Hsv,
}

impl HsvWindow {
    /// Window centred on `center`.
    ///
    /// Hue is clamped to `0..=HUE_MAX` instead of wrapping around the circle, so a
    /// background hue near either end only matches on one side.
    pub fn around(center: Hsv, tolerance: u8) -> Self {
        let hue_upper = (u16::from(center.h) + u16::from(HUE_TOLERANCE)).min(u16::from(HUE_MAX));
        Self {
            lower: Hsv::new(
                center.h.saturating_sub(HUE_TOLERANCE),
                center.s.saturating_sub(tolerance),
                center.v.saturating_sub(tolerance),
            ),
            upper: Hsv::new(
                hue_upper as u8,
                center.s.saturating_add(tolerance),
                center.v.saturating_add(tolerance),
            ),
        }
    }

    pub fn contains(&self, hsv: Hsv) -> bool {
        (self.lower.h..=self.upper.h).contains(&hsv.h)
            && (self.lower.s..=self.upper.s).contains(&hsv.s)
            && (self.lower.v..=self.upper.v).contains(&hsv.v)
    }
}

/// Raw background mask. Inverted polarity: 255 marks pixels inside the window around
/// `background`.
pub fn background_mask(image: &RgbImage, background: Rgb<u8>, tolerance: u8) -> GrayImage {
    let window = HsvWindow::around(background.to_hsv(), tolerance);
    let hsv = image.to_hsv();

    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgb([h, s, v]) = *hsv.get_pixel(x, y);
        Luma([if window.contains(Hsv::new(h, s, v)) { 255 } else { 0 }])
    })
}

/// Builds the sprite mask for a sheet: 255 for sprite pixels, 0 for background.
///
/// The output always has the dimensions of `image`.
pub fn build_foreground_mask(image: &RgbImage, tolerance: u8) -> GrayImage {
    let background = estimate_background(image);
    debug!(?background, tolerance, "estimated sheet background");

    foreground_mask(image, background, tolerance)
}

/// Sprite mask against a known background color.
pub fn foreground_mask(image: &RgbImage, background: Rgb<u8>, tolerance: u8) -> GrayImage {
    let raw = background_mask(image, background, tolerance);
    let mut foreground = morphology::dilate(&raw, Norm::L1, SEPARATION_RADIUS);
    imageops::invert(&mut foreground);

    let foreground = morphology::close(&foreground, Norm::L1, CLEANUP_RADIUS);
    morphology::open(&foreground, Norm::L1, CLEANUP_RADIUS)
}
