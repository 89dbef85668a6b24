mod error;
mod image;

pub use crate::error::{ConfigError, ImageError, ImageResult};
pub use crate::image::Image;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of spatial bins along each descriptor axis
pub const DESCRIPTOR_SPATIAL_BINS: usize = 4;
/// Number of orientation bins per spatial cell
pub const DESCRIPTOR_ORIENTATION_BINS: usize = 8;
/// Length of a descriptor vector
pub const DESCRIPTOR_LEN: usize =
    DESCRIPTOR_SPATIAL_BINS * DESCRIPTOR_SPATIAL_BINS * DESCRIPTOR_ORIENTATION_BINS;

/// 4x4 spatial bins x 8 orientation bins, unit L2 norm
pub type Descriptor = [f32; DESCRIPTOR_LEN];

/// Scale-space key-point ≙ DoG extremum + dominant gradient orientation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Keypoint {
    pub x: usize,         // Column in original-image pixels
    pub y: usize,         // Row in original-image pixels
    pub octave: usize,
    pub layer: usize,     // Interior DoG layer index
    pub sigma: f32,       // Effective blur scale
    pub orientation: f32, // Radians in [0, 2π)
}

impl Keypoint {
    /// Downsampling factor of the keypoint's octave
    #[inline]
    pub fn octave_scale(&self) -> usize {
        1 << self.octave
    }

    /// Position inside the keypoint's octave
    #[inline]
    pub fn local_position(&self) -> (f32, f32) {
        let s = self.octave_scale() as f32;
        (self.x as f32 / s, self.y as f32 / s)
    }
}

/// Accepted correspondence between descriptor sets A and B
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Match {
    pub index_a: usize,
    pub index_b: usize,
    pub distance: f32,
}

/// Images of one resolution level, increasing blur (Gaussian) or
/// band-pass energy (DoG)
#[derive(Debug, Clone, PartialEq)]
pub struct Octave {
    pub images: Vec<Image>,
}

impl Octave {
    /// (width, height) shared by every image of the octave
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.images.first().map(Image::dimensions)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Octaves ordered from full resolution down, each half the size of the previous
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pyramid {
    pub octaves: Vec<Octave>,
}

impl Pyramid {
    pub fn len(&self) -> usize {
        self.octaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.octaves.is_empty()
    }

    /// Image at `(octave, layer)`, if both indices are in range
    pub fn image(&self, octave: usize, layer: usize) -> Option<&Image> {
        self.octaves.get(octave)?.images.get(layer)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SiftConfig {
    pub octave_count: usize,
    pub scales_per_octave: usize,
    pub base_sigma: f32,
    pub contrast_threshold: f32,
    pub edge_threshold: f32,
    pub match_ratio: f32,
    pub n_threads: usize,
}

impl Default for SiftConfig {
    fn default() -> Self {
        Self {
            octave_count: 4,
            scales_per_octave: 3,
            base_sigma: 1.6,
            contrast_threshold: 0.04,
            edge_threshold: 10.0,
            match_ratio: 0.75,
            n_threads: num_cpus::get().max(1),
        }
    }
}

impl SiftConfig {
    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.octave_count == 0 {
            return Err(ConfigError::ZeroOctaves);
        }
        if self.scales_per_octave == 0 {
            return Err(ConfigError::ZeroScales);
        }
        if !self.base_sigma.is_finite() || self.base_sigma <= 0.0 {
            return Err(ConfigError::InvalidSigma(self.base_sigma));
        }
        if !self.contrast_threshold.is_finite() || self.contrast_threshold < 0.0 {
            return Err(ConfigError::InvalidContrastThreshold(self.contrast_threshold));
        }
        if !self.edge_threshold.is_finite() || self.edge_threshold <= 0.0 {
            return Err(ConfigError::InvalidEdgeThreshold(self.edge_threshold));
        }
        if !self.match_ratio.is_finite() || self.match_ratio <= 0.0 {
            return Err(ConfigError::InvalidMatchRatio(self.match_ratio));
        }
        if self.n_threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }
        Ok(())
    }

    /// Multiplicative blur step between adjacent scales, 2^(1/S)
    pub fn scale_step(&self) -> f32 {
        2f32.powf(1.0 / self.scales_per_octave as f32)
    }

    /// Gaussian images per octave (S + 3)
    pub fn images_per_octave(&self) -> usize {
        self.scales_per_octave + 3
    }
}

/// Initialize Rayon thread pool with the specified number of threads
pub fn init_thread_pool(n_threads: usize) -> Result<(), rayon::ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .build_global()
}
