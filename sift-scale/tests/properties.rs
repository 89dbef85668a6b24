use proptest::prelude::*;
use sift_core::{Image, SiftConfig};
use sift_scale::{build_gaussian_pyramid, gaussian_blur, ScaleSpaceDetector, MIN_OCTAVE_SIZE};

fn test_config() -> SiftConfig {
    SiftConfig {
        n_threads: 1,
        ..SiftConfig::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn flat_images_have_no_keypoints(
        width in 1usize..80,
        height in 1usize..80,
        value in 0.0f32..1.0,
    ) {
        let detector = ScaleSpaceDetector::new(test_config()).unwrap();
        let img = Image::filled(width, height, value).unwrap();
        prop_assert!(detector.detect_keypoints(&img).unwrap().is_empty());
    }

    #[test]
    fn keypoints_stay_in_bounds(
        seed in 0usize..1000,
        width in 24usize..72,
        height in 24usize..72,
    ) {
        let cfg = test_config();
        let detector = ScaleSpaceDetector::new(cfg.clone()).unwrap();
        let img = Image::from_fn(width, height, |x, y| {
            (((x * 31 + y * 17 + seed) * 2654435761usize) % 1000) as f32 / 1000.0
        })
        .unwrap();
        for kp in detector.detect_keypoints(&img).unwrap() {
            prop_assert!(kp.x < width && kp.y < height);
            prop_assert!(kp.layer >= 1 && kp.layer <= cfg.scales_per_octave);
            prop_assert!(kp.orientation >= 0.0 && kp.orientation < std::f32::consts::TAU);
        }
    }

    #[test]
    fn pyramid_octaves_halve(width in 1usize..160, height in 1usize..160) {
        let cfg = SiftConfig { octave_count: 6, ..test_config() };
        let img = Image::filled(width, height, 0.25).unwrap();
        let pyramid = build_gaussian_pyramid(&img, &cfg).unwrap();
        prop_assert!(!pyramid.is_empty());
        let mut expected = (width, height);
        for octave in &pyramid.octaves {
            prop_assert_eq!(octave.len(), cfg.images_per_octave());
            prop_assert_eq!(octave.dimensions(), Some(expected));
            expected = (expected.0 / 2, expected.1 / 2);
        }
        if pyramid.len() < cfg.octave_count {
            let (w, h) = pyramid.octaves[pyramid.len() - 1].dimensions().unwrap();
            prop_assert!(w / 2 <= MIN_OCTAVE_SIZE || h / 2 <= MIN_OCTAVE_SIZE);
        }
    }

    #[test]
    fn blur_preserves_range(sigma in 0.3f32..4.0, width in 1usize..40, height in 1usize..40) {
        let img = Image::from_fn(width, height, |x, y| ((x + 2 * y) % 5) as f32 / 4.0).unwrap();
        let blurred = gaussian_blur(&img, sigma).unwrap();
        prop_assert_eq!(blurred.dimensions(), img.dimensions());
        for &v in blurred.as_slice() {
            prop_assert!(v >= -1e-5 && v <= 1.0 + 1e-5);
        }
    }
}
