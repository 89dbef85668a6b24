use log::{debug, trace};
use sift_core::{Image, Keypoint, SiftConfig};

use crate::blur::gaussian_blur;
use crate::error::ScaleSpaceResult;
use crate::extrema::find_scale_space_extrema;
use crate::orientation::assign_orientations;
use crate::pyramid::{build_dog_pyramid, build_gaussian_pyramid};
use crate::types::ScaleSpace;

/// Difference-of-Gaussians keypoint detector with orientation assignment
#[derive(Debug, Clone)]
pub struct ScaleSpaceDetector {
    cfg: SiftConfig,
}

impl ScaleSpaceDetector {
    /// Creates a new detector, rejecting invalid configurations up front
    pub fn new(cfg: SiftConfig) -> ScaleSpaceResult<Self> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    /// Pre-blur the input with the base sigma and build both pyramids
    pub fn build_scale_space(&self, img: &Image) -> ScaleSpaceResult<ScaleSpace> {
        let base = gaussian_blur(img, self.cfg.base_sigma)?;
        let gaussian = build_gaussian_pyramid(&base, &self.cfg)?;
        let dog = build_dog_pyramid(&gaussian)?;
        debug!(
            "scale space for {}x{} image: {} octaves of {} images",
            img.width(),
            img.height(),
            gaussian.len(),
            self.cfg.images_per_octave()
        );
        let space = ScaleSpace { gaussian, dog };
        for level in space.levels() {
            trace!("octave {}: {}x{} at scale {}", level.octave, level.width, level.height, level.scale);
        }
        Ok(space)
    }

    /// Extrema with orientation 0, before orientation assignment
    pub fn find_extrema(&self, space: &ScaleSpace) -> Vec<Keypoint> {
        find_scale_space_extrema(&space.dog, &self.cfg)
    }

    /// Full detection on an already built scale space
    pub fn detect_in(&self, space: &ScaleSpace) -> Vec<Keypoint> {
        let raw = self.find_extrema(space);
        let oriented = assign_orientations(&raw, &space.gaussian);
        debug!("{} extrema -> {} oriented keypoints", raw.len(), oriented.len());
        oriented
    }

    /// Detect oriented keypoints and hand back the scale space for description
    pub fn detect(&self, img: &Image) -> ScaleSpaceResult<(Vec<Keypoint>, ScaleSpace)> {
        let space = self.build_scale_space(img)?;
        let keypoints = self.detect_in(&space);
        Ok((keypoints, space))
    }

    pub fn detect_keypoints(&self, img: &Image) -> ScaleSpaceResult<Vec<Keypoint>> {
        Ok(self.detect(img)?.0)
    }

    /// Get detector configuration
    pub fn config(&self) -> &SiftConfig {
        &self.cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScaleSpaceError;
    use sift_core::ConfigError;

    fn create_test_config() -> SiftConfig {
        SiftConfig {
            n_threads: 1,
            ..SiftConfig::default()
        }
    }

    /// Dark background with one bright Gaussian blob
    fn create_blob_image(width: usize, height: usize, cx: f32, cy: f32, sigma: f32) -> Image {
        Image::from_fn(width, height, |x, y| {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            0.1 + 0.8 * (-(dx * dx + dy * dy) / (2.0 * sigma * sigma)).exp()
        })
        .unwrap()
    }

    #[test]
    fn test_valid_constructor() {
        assert!(ScaleSpaceDetector::new(create_test_config()).is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let cfg = SiftConfig { octave_count: 0, ..create_test_config() };
        let result = ScaleSpaceDetector::new(cfg);
        assert!(matches!(result, Err(ScaleSpaceError::Config(ConfigError::ZeroOctaves))));

        let cfg = SiftConfig { base_sigma: 0.0, ..create_test_config() };
        assert!(ScaleSpaceDetector::new(cfg).is_err());
    }

    #[test]
    fn test_flat_image_detection() {
        let detector = ScaleSpaceDetector::new(create_test_config()).unwrap();
        for &(w, h) in &[(1, 1), (7, 5), (64, 64), (200, 90)] {
            let img = Image::filled(w, h, 0.5).unwrap();
            let kps = detector.detect_keypoints(&img).unwrap();
            assert!(kps.is_empty(), "flat {}x{} produced keypoints", w, h);
        }
    }

    #[test]
    fn test_blob_detection() {
        let detector = ScaleSpaceDetector::new(create_test_config()).unwrap();
        let img = create_blob_image(64, 64, 32.0, 32.0, 2.8);
        let kps = detector.detect_keypoints(&img).unwrap();
        assert!(!kps.is_empty());
        let near = kps.iter().any(|kp| {
            let dx = kp.x as f32 - 32.0;
            let dy = kp.y as f32 - 32.0;
            (dx * dx + dy * dy).sqrt() <= 4.0
        });
        assert!(near, "no keypoint near the blob: {:?}", kps);
    }

    #[test]
    fn test_layers_are_interior() {
        let cfg = create_test_config();
        let detector = ScaleSpaceDetector::new(cfg.clone()).unwrap();
        let img = create_blob_image(96, 80, 40.0, 30.0, 3.0);
        let kps = detector.detect_keypoints(&img).unwrap();
        for kp in &kps {
            assert!(kp.layer > 0 && kp.layer < cfg.scales_per_octave + 1);
            assert!(kp.octave < cfg.octave_count);
            assert!((0.0..std::f32::consts::TAU).contains(&kp.orientation));
        }
    }

    #[test]
    fn test_scale_space_shape() {
        let detector = ScaleSpaceDetector::new(create_test_config()).unwrap();
        let img = create_blob_image(256, 256, 128.0, 128.0, 6.0);
        let space = detector.build_scale_space(&img).unwrap();
        assert_eq!(space.octave_count(), 4);
        let levels = space.levels();
        assert_eq!(levels[3].width, 32);
        assert_eq!(levels[3].scale, 8.0);
        for octave in &space.dog.octaves {
            assert_eq!(octave.len(), 5);
        }
    }

    #[test]
    fn test_configuration_access() {
        let cfg = create_test_config();
        let detector = ScaleSpaceDetector::new(cfg.clone()).unwrap();
        assert_eq!(detector.config(), &cfg);
    }

    #[test]
    fn test_repeated_detection_is_stable() {
        let detector = ScaleSpaceDetector::new(create_test_config()).unwrap();
        let img = create_blob_image(64, 48, 20.0, 24.0, 3.0);
        let first = detector.detect_keypoints(&img).unwrap();
        for _ in 0..5 {
            assert_eq!(detector.detect_keypoints(&img).unwrap(), first);
        }
    }
}
