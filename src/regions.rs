//! Sprite region detection.
//!
//! External contours of the foreground mask give candidate boxes. A lone box that is
//! much wider than tall is assumed to be several sprites fused by the mask cleanup and
//! is split at low-coverage column runs. Finally, boxes that are tiny relative to the
//! largest one are dropped as watermarks or artifacts.

use image::{imageops, GenericImageView, GrayImage};
use imageproc::contours::{find_contours, BorderType, Contour};
use imageproc::point::Point;
use tracing::debug;

use crate::geometry::BoundingBox;
use crate::imageops_ext::content_bounds;

/// A single detected box wider than this (width / height) is split.
pub const SPLIT_ASPECT_RATIO: f64 = 1.5;

/// Boxes smaller than this fraction of the largest box are treated as watermarks.
pub const WATERMARK_AREA_RATIO: f64 = 0.15;

/// Columns with less than this share of foreground count as gap columns.
const GAP_COVERAGE: f64 = 0.05;

/// A gap run must be wider than this many columns to split on.
const MIN_GAP_WIDTH: usize = 5;

/// Detects sprite boxes in `mask`, ordered left to right.
///
/// Contours whose enclosed area is below `min_area` are ignored. An empty result means
/// no sprites were found and is not an error.
pub fn find_sprite_regions(mask: &GrayImage, min_area: u32) -> Vec<BoundingBox> {
    let mut boxes: Vec<BoundingBox> = external_contours(mask)
        .into_iter()
        .filter(|contour| contour_area(&contour.points) >= f64::from(min_area))
        .filter_map(|contour| bounding_rect(&contour.points))
        .collect();

    boxes.sort_by_key(|bbox| bbox.x);
    debug!(count = boxes.len(), "external contours above minimum area");

    if let &[single] = boxes.as_slice() {
        if single.aspect_ratio() > SPLIT_ASPECT_RATIO {
            boxes = split_wide_region(mask, single, min_area);
            debug!(count = boxes.len(), region = %single, "split wide region");
        }
    }

    filter_watermarks(boxes)
}

/// Outermost borders of the foreground, in mask coordinates.
///
/// The mask is traced inside a one-pixel zero frame. Without it, foreground touching the
/// left edge is reported as a parentless hole and every later border becomes its child.
fn external_contours(mask: &GrayImage) -> Vec<Contour<u32>> {
    let mut framed = GrayImage::new(mask.width() + 2, mask.height() + 2);
    imageops::replace(&mut framed, mask, 1, 1);

    find_contours::<u32>(&framed)
        .into_iter()
        .filter(|contour| contour.border_type == BorderType::Outer && contour.parent.is_none())
        .map(|mut contour| {
            for point in &mut contour.points {
                point.x -= 1;
                point.y -= 1;
            }
            contour
        })
        .collect()
}

/// Drops boxes whose area is under [`WATERMARK_AREA_RATIO`] of the largest box.
///
/// Lists with fewer than two boxes pass through. If nothing would survive, the input is
/// returned unchanged.
pub fn filter_watermarks(boxes: Vec<BoundingBox>) -> Vec<BoundingBox> {
    if boxes.len() <= 1 {
        return boxes;
    }

    let Some(max_area) = boxes.iter().map(BoundingBox::area).max() else {
        return boxes;
    };
    let threshold = max_area as f64 * WATERMARK_AREA_RATIO;

    let filtered: Vec<BoundingBox> = boxes
        .iter()
        .copied()
        .filter(|bbox| bbox.area() as f64 >= threshold)
        .collect();

    if filtered.is_empty() {
        boxes
    } else {
        filtered
    }
}

/// Splits a wide region at vertical gaps in its mask coverage.
///
/// Each slice between gap midpoints is shrunk to the foreground it actually contains.
/// Slices below `min_area` are dropped. Never returns an empty list: without a usable gap,
/// or if every slice is dropped, the original box comes back.
pub fn split_wide_region(mask: &GrayImage, bbox: BoundingBox, min_area: u32) -> Vec<BoundingBox> {
    if bbox.is_empty() || !bbox.fits_within(mask.width(), mask.height()) {
        return vec![bbox];
    }

    let region = mask.view(bbox.x, bbox.y, bbox.width, bbox.height).to_image();
    let projection = vertical_projection(&region);

    let threshold = f64::from(bbox.height) * 255.0 * GAP_COVERAGE;
    let is_gap: Vec<bool> = projection
        .iter()
        .map(|&sum| (sum as f64) < threshold)
        .collect();

    let gaps = find_gaps(&is_gap);
    if gaps.is_empty() {
        return vec![bbox];
    }

    let mut split_points = Vec::with_capacity(gaps.len() + 2);
    split_points.push(0);
    split_points.extend(gaps.iter().map(|&(start, end)| ((start + end) / 2) as u32));
    split_points.push(bbox.width);

    let boxes: Vec<BoundingBox> = split_points
        .windows(2)
        .filter(|window| window[1] > window[0])
        .filter_map(|window| {
            let (x1, x2) = (window[0], window[1]);
            let slice = region.view(x1, 0, x2 - x1, bbox.height).to_image();
            let [cx, cy, cw, ch] = content_bounds(&slice)?;
            Some(BoundingBox::new(bbox.x + x1 + cx, bbox.y + cy, cw, ch))
        })
        .filter(|slice| slice.area() >= u64::from(min_area))
        .collect();

    if boxes.is_empty() {
        vec![bbox]
    } else {
        boxes
    }
}

/// Per-column sum of mask values.
fn vertical_projection(region: &GrayImage) -> Vec<u64> {
    let mut projection = vec![0u64; region.width() as usize];
    for (x, _, pixel) in region.enumerate_pixels() {
        projection[x as usize] += u64::from(pixel.0[0]);
    }
    projection
}

/// Runs of gap columns as `(first, one_past_last)`.
///
/// A run only counts once a non-gap column closes it, so a run reaching the right edge
/// is never returned.
fn find_gaps(is_gap: &[bool]) -> Vec<(usize, usize)> {
    let mut gaps = Vec::new();
    let mut start = None;

    for (column, &gap) in is_gap.iter().enumerate() {
        match (gap, start) {
            (true, None) => start = Some(column),
            (false, Some(first)) => {
                if column - first > MIN_GAP_WIDTH {
                    gaps.push((first, column));
                }
                start = None;
            }
            _ => {}
        }
    }

    gaps
}

/// Shoelace area of a closed contour through pixel centres.
fn contour_area(points: &[Point<u32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let twice_area: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| {
            i64::from(a.x) * i64::from(b.y) - i64::from(b.x) * i64::from(a.y)
        })
        .sum();

    twice_area.unsigned_abs() as f64 / 2.0
}

fn bounding_rect(points: &[Point<u32>]) -> Option<BoundingBox> {
    let min_x = points.iter().map(|p| p.x).min()?;
    let max_x = points.iter().map(|p| p.x).max()?;
    let min_y = points.iter().map(|p| p.y).min()?;
    let max_y = points.iter().map(|p| p.y).max()?;

    Some(BoundingBox::new(
        min_x,
        min_y,
        max_x - min_x + 1,
        max_y - min_y + 1,
    ))
}
