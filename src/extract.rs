use image::{GenericImageView, GrayImage, RgbImage, RgbaImage};

use crate::blob::{remove_small_blobs, DEFAULT_MIN_BLOB_RATIO};
use crate::errors::{Result, SpriteError};
use crate::geometry::BoundingBox;
use crate::imageops_ext::compose;

/// Crops one sprite out of the sheet.
///
/// `bbox` is grown by `padding` on every side (clipped to the sheet), the mask crop is
/// cleaned of small fragments, and the color crop becomes RGBA. With `remove_background`
/// the cleaned mask is the alpha channel, otherwise the sprite is fully opaque.
pub fn extract_sprite(
    image: &RgbImage,
    mask: &GrayImage,
    bbox: BoundingBox,
    padding: u32,
    remove_background: bool,
) -> Result<RgbaImage> {
    if image.dimensions() != mask.dimensions() {
        return Err(SpriteError::DimensionMismatch {
            expected: image.dimensions(),
            actual: mask.dimensions(),
        });
    }

    let crop = bbox.padded(padding, image.dimensions());
    let color = image.view(crop.x, crop.y, crop.width, crop.height).to_image();
    let coverage = mask.view(crop.x, crop.y, crop.width, crop.height).to_image();

    let coverage = remove_small_blobs(&coverage, DEFAULT_MIN_BLOB_RATIO);
    compose::apply(&color, &coverage, remove_background)
}
