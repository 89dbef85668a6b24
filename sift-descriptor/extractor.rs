use log::debug;
use rayon::prelude::*;
use sift_core::{
    Descriptor, Image, Keypoint, Pyramid, DESCRIPTOR_LEN, DESCRIPTOR_ORIENTATION_BINS,
    DESCRIPTOR_SPATIAL_BINS,
};

/// Window side in units of keypoint sigma
const WINDOW_SIGMAS: f32 = 8.0;
/// Keeps the spatial bin width positive for tiny windows
const BIN_EPSILON: f32 = 1e-5;
/// Descriptors at or below this norm are dropped
const NORM_EPSILON: f32 = 1e-6;
/// Per-component cap applied between the two normalizations
const CLIP_VALUE: f32 = 0.2;
const ORIENTATION_BIN_DEGREES: f32 = 360.0 / DESCRIPTOR_ORIENTATION_BINS as f32;

/// Raw 4x4x8 gradient histogram for one keypoint, then normalized.
///
/// The window is scanned in keypoint-aligned offsets `(dx, dy)`; each offset
/// is rotated by the keypoint orientation and added to the keypoint position
/// to find the sample pixel. The rotated offset also picks the spatial cell.
/// Samples off the interior or outside the 4x4 grid are skipped.
pub fn compute_descriptor(img: &Image, kp: &Keypoint) -> Option<Descriptor> {
    let (sin_o, cos_o) = kp.orientation.sin_cos();
    let orientation_deg = kp.orientation.to_degrees();
    let (base_x, base_y) = kp.local_position();

    let window = (WINDOW_SIGMAS * kp.sigma).round() as isize;
    let half_width = window / 2;
    let half = half_width as f32;
    let bin_width = half / 2.0 + BIN_EPSILON;
    let weight_denom = 2.0 * (0.5 * window as f32).powi(2);
    let spatial_bins = DESCRIPTOR_SPATIAL_BINS as f32;

    let mut hist = [0f32; DESCRIPTOR_LEN];
    for dy in -half_width..half_width {
        for dx in -half_width..half_width {
            let (fx, fy) = (dx as f32, dy as f32);
            let rx = cos_o * fx - sin_o * fy;
            let ry = sin_o * fx + cos_o * fy;

            let sx = (base_x + rx).round() as isize;
            let sy = (base_y + ry).round() as isize;
            if !img.is_interior(sx, sy) {
                continue;
            }

            let cell_x = ((rx + half) / bin_width).floor();
            let cell_y = ((ry + half) / bin_width).floor();
            if !(0.0..spatial_bins).contains(&cell_x) || !(0.0..spatial_bins).contains(&cell_y) {
                continue;
            }

            let (magnitude, direction) = img.gradient(sx as usize, sy as usize);
            let relative = (direction - orientation_deg).rem_euclid(360.0);
            let orientation_bin =
                (relative / ORIENTATION_BIN_DEGREES).floor() as usize % DESCRIPTOR_ORIENTATION_BINS;
            let weight = (-(fx * fx + fy * fy) / weight_denom).exp();

            let cell = cell_y as usize * DESCRIPTOR_SPATIAL_BINS + cell_x as usize;
            hist[cell * DESCRIPTOR_ORIENTATION_BINS + orientation_bin] += weight * magnitude;
        }
    }

    normalize_descriptor(hist)
}

fn l2_norm(v: &Descriptor) -> f32 {
    v.iter().map(|c| c * c).sum::<f32>().sqrt()
}

/// Normalize, clip to `[0, 0.2]`, renormalize. `None` for near-zero input.
pub fn normalize_descriptor(mut v: Descriptor) -> Option<Descriptor> {
    let norm = l2_norm(&v);
    if !norm.is_finite() || norm <= NORM_EPSILON {
        return None;
    }
    v.iter_mut().for_each(|c| *c = (*c / norm).clamp(0.0, CLIP_VALUE));

    let clipped = l2_norm(&v);
    if clipped <= NORM_EPSILON {
        return None;
    }
    v.iter_mut().for_each(|c| *c /= clipped);
    Some(v)
}

/// Builds descriptors for oriented keypoints from their Gaussian images
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptorExtractor;

impl DescriptorExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Surviving keypoints and their descriptors, paired by index.
    ///
    /// Keypoints whose image is missing or whose descriptor is degenerate
    /// are dropped. Input order is kept.
    pub fn compute(&self, gaussian: &Pyramid, keypoints: &[Keypoint]) -> (Vec<Keypoint>, Vec<Descriptor>) {
        let (kept, descriptors): (Vec<Keypoint>, Vec<Descriptor>) = keypoints
            .par_iter()
            .filter_map(|kp| {
                let img = gaussian.image(kp.octave, kp.layer)?;
                compute_descriptor(img, kp).map(|d| (*kp, d))
            })
            .unzip();
        debug!("{} of {} keypoints described", kept.len(), keypoints.len());
        (kept, descriptors)
    }
}
