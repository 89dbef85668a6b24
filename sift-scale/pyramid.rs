use log::{debug, trace};
use sift_core::{Image, Octave, Pyramid, SiftConfig};

use crate::blur::gaussian_blur;
use crate::error::ScaleSpaceResult;

/// Octaves stop once a downsample would leave this many pixels or fewer
pub const MIN_OCTAVE_SIZE: usize = 16;

/// Floor under squared incremental sigma so the square root stays positive
const SIGMA_SQ_EPSILON: f32 = 1e-6;

/// Incremental blur applied to reach image `i` (1..S+3) from image `i - 1`.
///
/// Cumulative blur relative to image 0 is `sigma0 * k^i` with `k = 2^(1/S)`.
pub fn incremental_sigmas(cfg: &SiftConfig) -> Vec<f32> {
    let k = cfg.scale_step();
    let mut previous = cfg.base_sigma;
    (1..cfg.images_per_octave())
        .map(|i| {
            let total = cfg.base_sigma * k.powi(i as i32);
            let diff = (total * total - previous * previous).max(SIGMA_SQ_EPSILON).sqrt();
            previous = total;
            diff
        })
        .collect()
}

/// Build up to `octave_count` octaves of `S + 3` progressively blurred images.
///
/// The next octave starts from image `S` (third-from-last) of the current
/// one, downsampled by two.
pub fn build_gaussian_pyramid(base: &Image, cfg: &SiftConfig) -> ScaleSpaceResult<Pyramid> {
    cfg.validate()?;
    let sigmas = incremental_sigmas(cfg);
    let mut octaves = Vec::with_capacity(cfg.octave_count);
    let mut base = base.clone();

    for octave in 0..cfg.octave_count {
        let mut images = Vec::with_capacity(cfg.images_per_octave());
        images.push(base);
        for &sigma in &sigmas {
            let blurred = match images.last() {
                Some(prev) => gaussian_blur(prev, sigma)?,
                None => break,
            };
            images.push(blurred);
        }
        trace!(
            "octave {}: {}x{}, {} images",
            octave,
            images[0].width(),
            images[0].height(),
            images.len()
        );

        let next_base = if octave + 1 < cfg.octave_count {
            let seed = &images[cfg.scales_per_octave];
            let (w, h) = seed.dimensions();
            if w / 2 <= MIN_OCTAVE_SIZE || h / 2 <= MIN_OCTAVE_SIZE {
                debug!(
                    "stopping after {} octaves: {}x{} cannot be halved further",
                    octave + 1,
                    w,
                    h
                );
                None
            } else {
                Some(seed.half_size()?)
            }
        } else {
            None
        };

        octaves.push(Octave { images });
        match next_base {
            Some(next) => base = next,
            None => break,
        }
    }

    Ok(Pyramid { octaves })
}

/// `S + 2` band-pass layers per octave: `layer[i] = gaussian[i + 1] - gaussian[i]`
pub fn build_dog_pyramid(gaussian: &Pyramid) -> ScaleSpaceResult<Pyramid> {
    let octaves = gaussian
        .octaves
        .iter()
        .map(|octave| {
            let images = octave
                .images
                .windows(2)
                .map(|pair| pair[1].subtract(&pair[0]))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Octave { images })
        })
        .collect::<ScaleSpaceResult<Vec<_>>>()?;
    Ok(Pyramid { octaves })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(octave_count: usize, scales_per_octave: usize) -> SiftConfig {
        SiftConfig {
            octave_count,
            scales_per_octave,
            n_threads: 1,
            ..SiftConfig::default()
        }
    }

    fn checkerboard(width: usize, height: usize) -> Image {
        Image::from_fn(width, height, |x, y| if (x / 8 + y / 8) % 2 == 0 { 0.8 } else { 0.2 })
            .unwrap()
    }

    #[test]
    fn test_incremental_sigmas_default() {
        let sigmas = incremental_sigmas(&config(4, 3));
        let expected = [1.2262735, 1.5450078, 1.9465878, 2.452547, 3.0900156];
        assert_eq!(sigmas.len(), 5);
        for (a, b) in sigmas.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-4, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_octave_count_256() {
        let img = checkerboard(256, 256);
        let pyramid = build_gaussian_pyramid(&img, &config(4, 3)).unwrap();
        assert_eq!(pyramid.len(), 4);
        let dims: Vec<_> = pyramid.octaves.iter().filter_map(|o| o.dimensions()).collect();
        assert_eq!(dims, vec![(256, 256), (128, 128), (64, 64), (32, 32)]);
        for octave in &pyramid.octaves {
            assert_eq!(octave.len(), 6);
        }
    }

    #[test]
    fn test_early_stop_small_image() {
        // 64 -> 32 -> (16 would be too small)
        let img = checkerboard(64, 64);
        let pyramid = build_gaussian_pyramid(&img, &config(6, 3)).unwrap();
        assert_eq!(pyramid.len(), 2);
    }

    #[test]
    fn test_tiny_image_single_octave() {
        let img = checkerboard(10, 10);
        let pyramid = build_gaussian_pyramid(&img, &config(4, 2)).unwrap();
        assert_eq!(pyramid.len(), 1);
        assert_eq!(pyramid.octaves[0].len(), 5);
    }

    #[test]
    fn test_first_image_is_base() {
        let img = checkerboard(40, 40);
        let pyramid = build_gaussian_pyramid(&img, &config(1, 3)).unwrap();
        assert_eq!(pyramid.image(0, 0), Some(&img));
    }

    #[test]
    fn test_next_octave_seeded_from_third_from_last() {
        let img = checkerboard(80, 80);
        let cfg = config(2, 3);
        let pyramid = build_gaussian_pyramid(&img, &cfg).unwrap();
        let seed = pyramid.image(0, 3).unwrap().half_size().unwrap();
        assert_eq!(pyramid.image(1, 0), Some(&seed));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let img = checkerboard(40, 40);
        let cfg = SiftConfig { base_sigma: -1.0, ..config(2, 3) };
        assert!(build_gaussian_pyramid(&img, &cfg).is_err());
    }

    #[test]
    fn test_dog_layers() {
        let img = checkerboard(64, 48);
        let gaussian = build_gaussian_pyramid(&img, &config(2, 3)).unwrap();
        let dog = build_dog_pyramid(&gaussian).unwrap();
        assert_eq!(dog.len(), gaussian.len());
        for (g, d) in gaussian.octaves.iter().zip(dog.octaves.iter()) {
            assert_eq!(d.len(), 5);
            let expected = g.images[2].subtract(&g.images[1]).unwrap();
            assert_eq!(d.images[1], expected);
        }
    }

    #[test]
    fn test_dog_of_flat_image_is_zero() {
        let img = Image::filled(32, 32, 0.5).unwrap();
        let gaussian = build_gaussian_pyramid(&img, &config(1, 3)).unwrap();
        let dog = build_dog_pyramid(&gaussian).unwrap();
        for layer in &dog.octaves[0].images {
            assert!(layer.as_slice().iter().all(|v| v.abs() < 1e-5));
        }
    }
}
