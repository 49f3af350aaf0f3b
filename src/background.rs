use image::{Rgb, RgbImage};

use crate::imageops_ext::extract_corners;

/// Infers the sheet background from the mean of its four corner pixels.
///
/// Each channel is the integer-truncated average. An image without pixels yields black.
pub fn estimate_background(image: &RgbImage) -> Rgb<u8> {
    let Some(corners) = extract_corners(image) else {
        return Rgb([0, 0, 0]);
    };

    let mut sums = [0u32; 3];
    for Rgb(channels) in corners {
        for (sum, channel) in sums.iter_mut().zip(channels) {
            *sum += u32::from(channel);
        }
    }

    Rgb(sums.map(|sum| (sum / corners.len() as u32) as u8))
}
