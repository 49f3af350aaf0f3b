use image::{GrayImage, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};

/// Components smaller than this fraction of the largest one are removed.
pub const DEFAULT_MIN_BLOB_RATIO: f64 = 0.02;

/// Removes small disconnected fragments from a cropped mask.
///
/// Foreground is split into 8-connected components. With at most one component the mask
/// is returned as is. Otherwise every component smaller than `min_ratio` times the largest
/// component's area is cleared; the others are kept independently of each other.
pub fn remove_small_blobs(mask: &GrayImage, min_ratio: f64) -> GrayImage {
    let labels = connected_components(mask, Connectivity::Eight, Luma([0u8]));

    let mut areas: Vec<u64> = Vec::new();
    for Luma([label]) in labels.pixels() {
        if *label == 0 {
            continue;
        }
        let index = (*label - 1) as usize;
        if index >= areas.len() {
            areas.resize(index + 1, 0);
        }
        areas[index] += 1;
    }

    let component_count = areas.iter().filter(|&&area| area > 0).count();
    if component_count <= 1 {
        return mask.clone();
    }

    let max_area = areas.iter().copied().max().unwrap_or(0);
    let threshold = max_area as f64 * min_ratio;

    let mut cleaned = mask.clone();
    for (pixel, Luma([label])) in cleaned.pixels_mut().zip(labels.pixels()) {
        if *label != 0 && (areas[(*label - 1) as usize] as f64) < threshold {
            *pixel = Luma([0]);
        }
    }
    cleaned
}
