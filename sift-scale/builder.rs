use sift_core::SiftConfig;

use crate::config::DetectorConfig;
use crate::detector::ScaleSpaceDetector;
use crate::error::ScaleSpaceResult;

/// Builder for creating a `ScaleSpaceDetector`
#[derive(Debug, Clone, Default)]
pub struct DetectorBuilder {
    config: SiftConfig,
    name: Option<String>,
    description: Option<String>,
}

impl DetectorBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of octaves to attempt
    pub fn octaves(mut self, octave_count: usize) -> Self {
        self.config.octave_count = octave_count;
        self
    }

    /// Set the number of scale intervals per octave
    pub fn scales_per_octave(mut self, scales: usize) -> Self {
        self.config.scales_per_octave = scales;
        self
    }

    /// Set the blur of the first image in each octave
    pub fn base_sigma(mut self, sigma: f32) -> Self {
        self.config.base_sigma = sigma;
        self
    }

    /// Set the DoG contrast threshold (divided by scales per octave)
    pub fn contrast_threshold(mut self, threshold: f32) -> Self {
        self.config.contrast_threshold = threshold;
        self
    }

    /// Set the principal-curvature ratio limit
    pub fn edge_threshold(mut self, threshold: f32) -> Self {
        self.config.edge_threshold = threshold;
        self
    }

    /// Set the nearest/second-nearest ratio for matching
    pub fn match_ratio(mut self, ratio: f32) -> Self {
        self.config.match_ratio = ratio;
        self
    }

    /// Set the number of threads for parallel processing
    pub fn threads(mut self, n_threads: usize) -> Self {
        self.config.n_threads = n_threads;
        self
    }

    /// Apply the sparse preset
    pub fn preset_sparse(self) -> Self {
        self.apply_preset(DetectorConfig::sparse_preset())
    }

    /// Apply the dense preset
    pub fn preset_dense(self) -> Self {
        self.apply_preset(DetectorConfig::dense_preset())
    }

    /// Apply the fine-scale preset
    pub fn preset_fine_scale(self) -> Self {
        self.apply_preset(DetectorConfig::fine_scale_preset())
    }

    fn apply_preset(mut self, preset: DetectorConfig) -> Self {
        self.config = preset.core;
        self.name = preset.name;
        self.description = preset.description;
        self
    }

    /// Build the `ScaleSpaceDetector`
    pub fn build(self) -> ScaleSpaceResult<ScaleSpaceDetector> {
        ScaleSpaceDetector::new(self.config)
    }

    /// Generate a summary of the builder's configuration
    pub fn summary(&self) -> String {
        self.clone().to_config().summary()
    }

    /// Create a builder from an existing `DetectorConfig`
    pub fn from_config(config: DetectorConfig) -> Self {
        Self {
            config: config.core,
            name: config.name,
            description: config.description,
        }
    }

    /// Convert the builder into a `DetectorConfig`
    pub fn to_config(self) -> DetectorConfig {
        let version = self.name.as_ref().map(|_| "1.0".to_string());
        DetectorConfig {
            core: self.config,
            name: self.name,
            description: self.description,
            version,
        }
    }

    pub fn core(&self) -> &SiftConfig {
        &self.config
    }
}
