use image::{GenericImageView, ImageBuffer, Luma, Pixel, Primitive, Rgb, Rgba};
use num_traits::{AsPrimitive, Bounded};

use crate::errors::{Result, SpriteError};

/// Builds an RGBA raster from a color image and a same-sized mask.
///
/// With `use_mask_alpha` the mask, rescaled to the output channel range, becomes the
/// alpha channel. Otherwise every pixel is fully opaque and the mask only has to match
/// in size. Color channels are copied untouched in both cases. Channels are integral;
/// rescaled alpha is rounded to the nearest value.
pub fn apply<I, M, SI, SM>(
    image: &I,
    mask: &M,
    use_mask_alpha: bool,
) -> Result<ImageBuffer<Rgba<SI>, Vec<SI>>>
where
    I: GenericImageView<Pixel = Rgb<SI>>,
    M: GenericImageView<Pixel = Luma<SM>>,
    Rgba<SI>: Pixel<Subpixel = SI>,
    SI: Primitive + 'static + AsPrimitive<f32>,
    SM: Primitive + 'static + AsPrimitive<f32>,
    f32: AsPrimitive<SI>,
{
    if image.dimensions() != mask.dimensions() {
        return Err(SpriteError::DimensionMismatch {
            expected: image.dimensions(),
            actual: mask.dimensions(),
        });
    }

    let sm_max: f32 = <SM as Bounded>::max_value().as_();
    let opaque: SI = <SI as Bounded>::max_value();
    let si_max: f32 = opaque.as_();

    let processed_pixels = image
        .pixels()
        .zip(mask.pixels())
        .flat_map(|((_, _, Rgb([red, green, blue])), (_, _, Luma([coverage])))| {
            let alpha = if use_mask_alpha {
                (coverage.as_() / sm_max * si_max).round().as_()
            } else {
                opaque
            };
            [red, green, blue, alpha]
        })
        .collect::<Vec<SI>>();

    let (width, height) = image.dimensions();
    ImageBuffer::from_raw(width, height, processed_pixels).ok_or(
        SpriteError::DimensionMismatch {
            expected: (width, height),
            actual: mask.dimensions(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, RgbImage};

    fn checker_mask(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            Luma([if (x + y) % 2 == 0 { 255 } else { 0 }])
        })
    }

    #[test]
    fn test_mask_becomes_alpha() -> Result<()> {
        let image = RgbImage::from_pixel(4, 4, Rgb([10, 20, 30]));
        let mask = checker_mask(4, 4);

        let rgba = apply(&image, &mask, true)?;
        for (x, y, pixel) in rgba.enumerate_pixels() {
            assert_eq!(pixel.0[..3], [10, 20, 30]);
            assert_eq!(pixel.0[3], mask.get_pixel(x, y).0[0]);
        }
        Ok(())
    }

    #[test]
    fn test_intermediate_mask_values_survive() -> Result<()> {
        let image = RgbImage::from_pixel(1, 1, Rgb([0, 0, 0]));
        let mask = GrayImage::from_pixel(1, 1, Luma([128]));

        let rgba = apply(&image, &mask, true)?;
        assert_eq!(rgba.get_pixel(0, 0).0[3], 128);
        Ok(())
    }

    #[test]
    fn test_wide_mask_is_rescaled() -> Result<()> {
        let image = RgbImage::from_pixel(2, 1, Rgb([0, 0, 0]));
        let mask: ImageBuffer<Luma<u16>, Vec<u16>> =
            ImageBuffer::from_raw(2, 1, vec![65535, 0]).unwrap();

        let rgba = apply(&image, &mask, true)?;
        assert_eq!(rgba.get_pixel(0, 0).0[3], 255);
        assert_eq!(rgba.get_pixel(1, 0).0[3], 0);
        Ok(())
    }

    #[test]
    fn test_opaque_ignores_mask() -> Result<()> {
        let image = RgbImage::from_pixel(3, 2, Rgb([1, 2, 3]));
        let mask = checker_mask(3, 2);

        let rgba = apply(&image, &mask, false)?;
        assert!(rgba.pixels().all(|p| p.0 == [1, 2, 3, 255]));
        Ok(())
    }

    #[test]
    fn test_dimension_mismatch() {
        let image = RgbImage::new(4, 4);
        let mask = GrayImage::new(3, 4);

        let err = apply(&image, &mask, true).unwrap_err();
        assert!(matches!(
            err,
            SpriteError::DimensionMismatch {
                expected: (4, 4),
                actual: (3, 4)
            }
        ));
    }
}
