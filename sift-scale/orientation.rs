use rayon::prelude::*;
use sift_core::{Keypoint, Pyramid};

pub const ORIENTATION_BINS: usize = 36;
const BIN_WIDTH_DEGREES: f32 = 360.0 / ORIENTATION_BINS as f32;
/// Bins at or above this fraction of the maximum spawn a keypoint
const PEAK_RATIO: f32 = 0.8;

/// Gaussian-weighted gradient-orientation histogram around a keypoint.
///
/// Samples the square of radius `round(3 * sigma)` in the keypoint's
/// Gaussian image, skipping non-interior pixels. Returns `None` when the
/// image is missing or the histogram is empty.
pub fn orientation_histogram(gaussian: &Pyramid, kp: &Keypoint) -> Option<[f32; ORIENTATION_BINS]> {
    let img = gaussian.image(kp.octave, kp.layer)?;
    let (lx, ly) = kp.local_position();
    let (cx, cy) = (lx.round() as isize, ly.round() as isize);
    let radius = (3.0 * kp.sigma).round() as isize;
    let weight_factor = -0.5 / (kp.sigma * kp.sigma);

    let mut hist = [0f32; ORIENTATION_BINS];
    for dy in -radius..=radius {
        let yy = cy + dy;
        for dx in -radius..=radius {
            let xx = cx + dx;
            if !img.is_interior(xx, yy) {
                continue;
            }
            let (magnitude, direction) = img.gradient(xx as usize, yy as usize);
            let weight = (weight_factor * (dx * dx + dy * dy) as f32).exp();
            let bin = (direction / BIN_WIDTH_DEGREES).floor() as usize % ORIENTATION_BINS;
            hist[bin] += weight * magnitude;
        }
    }

    let max = hist.iter().copied().fold(0f32, f32::max);
    if max > 0.0 {
        Some(hist)
    } else {
        None
    }
}

/// Orientations (radians) of every bin reaching 80% of the histogram maximum
pub fn dominant_orientations(hist: &[f32; ORIENTATION_BINS]) -> Vec<f32> {
    let max = hist.iter().copied().fold(0f32, f32::max);
    hist.iter()
        .enumerate()
        .filter(|&(_, &v)| v >= PEAK_RATIO * max)
        .map(|(bin, _)| ((bin as f32 * BIN_WIDTH_DEGREES) % 360.0).to_radians())
        .collect()
}

/// Replace each keypoint by one copy per dominant orientation.
///
/// Keypoints without gradient energy are dropped. Input order is kept.
pub fn assign_orientations(keypoints: &[Keypoint], gaussian: &Pyramid) -> Vec<Keypoint> {
    keypoints
        .par_iter()
        .flat_map_iter(|kp| {
            let orientations = orientation_histogram(gaussian, kp)
                .map(|hist| dominant_orientations(&hist))
                .unwrap_or_default();
            orientations.into_iter().map(move |orientation| Keypoint { orientation, ..*kp })
        })
        .collect()
}
