//! 8-bit RGB to HSV conversion.
//!
//! Hue is stored halved so that the full circle fits a byte: `0..=179`.
//! Saturation and value span `0..=255`.

use image::{ImageBuffer, Rgb};

/// Largest representable hue. The hue circle wraps back to `0` after this.
pub const HUE_MAX: u8 = 179;

const HUE_PERIOD: i32 = HUE_MAX as i32 + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub const fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }
}

pub trait ConvertColor {
    type Output;
    fn to_hsv(&self) -> Self::Output;
}

impl ConvertColor for Rgb<u8> {
    type Output = Hsv;

    fn to_hsv(&self) -> Hsv {
        let Rgb([r, g, b]) = *self;
        let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));

        let v = r.max(g).max(b);
        let diff = v - r.min(g).min(b);

        let s = if v == 0 {
            0
        } else {
            round_half_up(255.0 * f64::from(diff) / f64::from(v))
        };

        let h = if diff == 0 {
            0
        } else {
            // Ties resolve red, then green, then blue.
            let (base, numerator) = if v == r {
                (0, g - b)
            } else if v == g {
                (60, b - r)
            } else {
                (120, r - g)
            };
            let h = base + round_half_up(30.0 * f64::from(numerator) / f64::from(diff));
            h.rem_euclid(HUE_PERIOD)
        };

        Hsv::new(h as u8, s as u8, v as u8)
    }
}

/// Converts a whole image, packing `(h, s, v)` into the three channels of each pixel.
impl ConvertColor for ImageBuffer<Rgb<u8>, Vec<u8>> {
    type Output = ImageBuffer<Rgb<u8>, Vec<u8>>;

    fn to_hsv(&self) -> Self::Output {
        let mut hsv = self.clone();
        for pixel in hsv.pixels_mut() {
            let Hsv { h, s, v } = pixel.to_hsv();
            *pixel = Rgb([h, s, v]);
        }
        hsv
    }
}

fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}
