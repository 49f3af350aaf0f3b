use image::{GenericImageView, Luma, Primitive};

/// Samples the four corner pixels in the order top-left, top-right, bottom-left, bottom-right.
///
/// Returns `None` for an image with no pixels.
pub fn extract_corners<I>(image: &I) -> Option<[I::Pixel; 4]>
where
    I: GenericImageView,
{
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return None;
    }

    let right = width - 1;
    let bottom = height - 1;
    Some([
        image.get_pixel(0, 0),
        image.get_pixel(right, 0),
        image.get_pixel(0, bottom),
        image.get_pixel(right, bottom),
    ])
}

/// Tight `[x, y, width, height]` around every non-zero pixel, or `None` if there is none.
pub fn content_bounds<I, S>(image: &I) -> Option<[u32; 4]>
where
    I: GenericImageView<Pixel = Luma<S>>,
    S: Primitive,
{
    let (width, height) = image.dimensions();
    let mut bounds = [width, height, 0, 0]; // [x1, y1, x2, y2]
    let mut found = false;

    for (x, y, Luma([value])) in image.pixels() {
        if value > S::zero() {
            update_bounds(&mut bounds, x, y);
            found = true;
        }
    }

    found.then(|| {
        [
            bounds[0],
            bounds[1],
            bounds[2] - bounds[0] + 1,
            bounds[3] - bounds[1] + 1,
        ]
    })
}

fn update_bounds(bounds: &mut [u32; 4], x: u32, y: u32) {
    bounds[0] = bounds[0].min(x);
    bounds[1] = bounds[1].min(y);
    bounds[2] = bounds[2].max(x);
    bounds[3] = bounds[3].max(y);
}
