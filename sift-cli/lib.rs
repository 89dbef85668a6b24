use image::{imageops::FilterType, DynamicImage, GenericImage, GrayImage, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_line_segment_mut};
use log::debug;
use sift_core::{ConfigError, Descriptor, Image, ImageError, Keypoint, Match, SiftConfig};
use sift_descriptor::{DescriptorExtractor, DescriptorMatcher, MatchError};
use sift_scale::{DetectorConfig, ScaleSpaceDetector, ScaleSpaceError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SiftError {
    #[error("scale space error: {0}")]
    ScaleSpace(#[from] ScaleSpaceError),
    #[error("matching error: {0}")]
    Match(#[from] MatchError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("image error: {0}")]
    Image(#[from] ImageError),
    #[error("image codec error: {0}")]
    Codec(#[from] image::ImageError),
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type SiftResult<T> = Result<T, SiftError>;

/// Scale-space detector, descriptor builder and ratio-test matcher in one
#[derive(Debug, Clone)]
pub struct Sift {
    detector: ScaleSpaceDetector,
    extractor: DescriptorExtractor,
    matcher: DescriptorMatcher,
}

impl Sift {
    pub fn new(cfg: SiftConfig) -> SiftResult<Self> {
        let matcher = DescriptorMatcher::new(cfg.match_ratio)?;
        let detector = ScaleSpaceDetector::new(cfg)?;
        Ok(Self {
            detector,
            extractor: DescriptorExtractor::new(),
            matcher,
        })
    }

    pub fn from_config(config: DetectorConfig) -> SiftResult<Self> {
        config.validate()?;
        Self::new(config.core)
    }

    /// Oriented keypoints and their descriptors, paired by index
    pub fn detect_and_compute(&self, img: &Image) -> SiftResult<(Vec<Keypoint>, Vec<Descriptor>)> {
        let (keypoints, space) = self.detector.detect(img)?;
        Ok(self.extractor.compute(&space.gaussian, &keypoints))
    }

    /// Ratio-test matches from `a` into `b` with the configured ratio
    pub fn match_descriptors(&self, a: &[Descriptor], b: &[Descriptor]) -> Vec<Match> {
        self.matcher.match_descriptors(a, b)
    }

    pub fn config(&self) -> &SiftConfig {
        self.detector.config()
    }
}

/// Shrink to `max_width` keeping the aspect ratio; narrower images pass through
pub fn limit_width(image: DynamicImage, max_width: u32) -> DynamicImage {
    let (w, h) = (image.width(), image.height());
    if w <= max_width {
        return image;
    }
    let new_h = ((h as u64 * max_width as u64) / w as u64).max(1) as u32;
    debug!("resizing {}x{} to {}x{}", w, h, max_width, new_h);
    image.resize_exact(max_width, new_h, FilterType::Triangle)
}

/// Side-by-side rendering of two images with lines joining matched keypoints
pub fn render_matches(
    left: &GrayImage,
    right: &GrayImage,
    keypoints_left: &[Keypoint],
    keypoints_right: &[Keypoint],
    matches: &[Match],
) -> SiftResult<RgbImage> {
    let width = left.width() + right.width();
    let height = left.height().max(right.height());
    let mut canvas = RgbImage::new(width, height);
    canvas.copy_from(&DynamicImage::ImageLuma8(left.clone()).into_rgb8(), 0, 0)?;
    canvas.copy_from(&DynamicImage::ImageLuma8(right.clone()).into_rgb8(), left.width(), 0)?;

    let offset = left.width() as f32;
    for (i, m) in matches.iter().enumerate() {
        let (Some(a), Some(b)) = (keypoints_left.get(m.index_a), keypoints_right.get(m.index_b)) else {
            continue;
        };
        let color = palette(i);
        let start = (a.x as f32, a.y as f32);
        let end = (b.x as f32 + offset, b.y as f32);
        draw_hollow_circle_mut(&mut canvas, (start.0 as i32, start.1 as i32), 3, color);
        draw_hollow_circle_mut(&mut canvas, (end.0 as i32, end.1 as i32), 3, color);
        draw_line_segment_mut(&mut canvas, start, end, color);
    }
    Ok(canvas)
}

fn palette(i: usize) -> Rgb<u8> {
    const COLORS: [[u8; 3]; 6] = [
        [255, 64, 64],
        [64, 255, 64],
        [64, 160, 255],
        [255, 220, 0],
        [255, 0, 255],
        [0, 255, 255],
    ];
    Rgb(COLORS[i % COLORS.len()])
}
