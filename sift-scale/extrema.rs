use log::trace;
use rayon::prelude::*;
use sift_core::{Image, Keypoint, Pyramid, SiftConfig};

/// Strict 3x3x3 extremum test across three adjacent DoG layers.
///
/// Positive centers must exceed all 26 neighbors, negative centers must be
/// below all of them. Any tie rejects.
pub fn is_strict_extremum(prev: &Image, curr: &Image, next: &Image, x: usize, y: usize) -> bool {
    let value = curr.get(x, y);
    if value == 0.0 {
        return false;
    }
    let is_max = value > 0.0;
    for (layer_idx, layer) in [prev, curr, next].into_iter().enumerate() {
        for yy in y - 1..=y + 1 {
            for xx in x - 1..=x + 1 {
                if layer_idx == 1 && xx == x && yy == y {
                    continue;
                }
                let other = layer.get(xx, yy);
                if (is_max && other >= value) || (!is_max && other <= value) {
                    return false;
                }
            }
        }
    }
    true
}

/// Principal-curvature test on the local Hessian of a DoG layer.
///
/// Fires when the determinant is not positive or when
/// `trace^2 / det >= (T + 1)^2 / T`.
pub fn is_edge_response(img: &Image, x: usize, y: usize, edge_threshold: f32) -> bool {
    let center = img.get(x, y);
    let dxx = img.get(x + 1, y) + img.get(x - 1, y) - 2.0 * center;
    let dyy = img.get(x, y + 1) + img.get(x, y - 1) - 2.0 * center;
    let dxy = img.get(x + 1, y + 1) + img.get(x - 1, y - 1)
        - img.get(x - 1, y + 1)
        - img.get(x + 1, y - 1);
    let trace = dxx + dyy;
    let det = dxx * dyy - dxy * dxy;
    if det <= 0.0 {
        return true;
    }
    let limit = (edge_threshold + 1.0) * (edge_threshold + 1.0) / edge_threshold;
    trace * trace / det >= limit
}

/// Effective blur of a keypoint found at `(octave, layer)`
pub fn keypoint_sigma(cfg: &SiftConfig, octave: usize, layer: usize) -> f32 {
    cfg.base_sigma
        * (1usize << octave) as f32
        * 2f32.powf(layer as f32 / cfg.scales_per_octave as f32)
}

/// Scan every interior DoG layer of every octave for scale-space extrema.
///
/// Keypoints carry original-image coordinates and orientation 0. Output is
/// ordered by octave, layer, row, then column.
pub fn find_scale_space_extrema(dog: &Pyramid, cfg: &SiftConfig) -> Vec<Keypoint> {
    let threshold = cfg.contrast_threshold / cfg.scales_per_octave as f32;
    let mut keypoints = Vec::new();

    for (octave, layers) in dog.octaves.iter().enumerate() {
        let images = &layers.images;
        if images.len() < 3 {
            continue;
        }
        let (w, h) = images[0].dimensions();
        if w < 3 || h < 3 {
            continue;
        }
        let scale = 1usize << octave;

        for layer in 1..images.len() - 1 {
            let (prev, curr, next) = (&images[layer - 1], &images[layer], &images[layer + 1]);
            let sigma = keypoint_sigma(cfg, octave, layer);

            let found: Vec<Keypoint> = (1..h - 1)
                .into_par_iter()
                .flat_map_iter(|y| {
                    (1..w - 1).filter_map(move |x| {
                        if curr.get(x, y).abs() < threshold {
                            return None;
                        }
                        if !is_strict_extremum(prev, curr, next, x, y) {
                            return None;
                        }
                        if is_edge_response(curr, x, y, cfg.edge_threshold) {
                            return None;
                        }
                        Some(Keypoint {
                            x: x * scale,
                            y: y * scale,
                            octave,
                            layer,
                            sigma,
                            orientation: 0.0,
                        })
                    })
                })
                .collect();

            trace!("octave {} layer {}: {} extrema", octave, layer, found.len());
            keypoints.extend(found);
        }
    }

    keypoints
}
