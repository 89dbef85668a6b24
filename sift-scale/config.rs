use sift_core::SiftConfig;

use crate::builder::DetectorBuilder;
use crate::error::ScaleSpaceResult;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Complete detector configuration with metadata
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DetectorConfig {
    /// Pipeline parameters
    pub core: SiftConfig,
    /// Metadata
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub name: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub description: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub version: Option<String>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectorConfig {
    /// Create new configuration with default settings
    pub fn new() -> Self {
        Self {
            core: SiftConfig::default(),
            name: None,
            description: None,
            version: None,
        }
    }

    /// Fewer, stronger keypoints
    pub fn sparse_preset() -> Self {
        Self {
            core: SiftConfig {
                contrast_threshold: 0.08,
                edge_threshold: 8.0,
                match_ratio: 0.7,
                n_threads: num_cpus::get(),
                ..SiftConfig::default()
            },
            name: Some("Sparse".to_string()),
            description: Some("High contrast threshold for few, stable keypoints".to_string()),
            version: Some("1.0".to_string()),
        }
    }

    /// More keypoints from weaker responses
    pub fn dense_preset() -> Self {
        Self {
            core: SiftConfig {
                contrast_threshold: 0.02,
                edge_threshold: 12.0,
                match_ratio: 0.8,
                n_threads: num_cpus::get(),
                ..SiftConfig::default()
            },
            name: Some("Dense".to_string()),
            description: Some("Low contrast threshold for many keypoints".to_string()),
            version: Some("1.0".to_string()),
        }
    }

    /// Finer scale sampling over more octaves
    pub fn fine_scale_preset() -> Self {
        Self {
            core: SiftConfig {
                octave_count: 5,
                scales_per_octave: 4,
                n_threads: num_cpus::get(),
                ..SiftConfig::default()
            },
            name: Some("Fine Scale".to_string()),
            description: Some("Five octaves with four scales each".to_string()),
            version: Some("1.0".to_string()),
        }
    }

    /// Add metadata to configuration
    pub fn with_metadata(mut self, name: &str, description: &str) -> Self {
        self.name = Some(name.to_string());
        self.description = Some(description.to_string());
        self.version = Some("1.0".to_string());
        self
    }

    /// Convert to DetectorBuilder for further customization
    pub fn to_builder(self) -> DetectorBuilder {
        DetectorBuilder::from_config(self)
    }

    /// Generate human-readable summary
    pub fn summary(&self) -> String {
        let c = &self.core;
        format!(
            "DetectorConfig: octaves={}, scales={}, sigma={:.2}, contrast={:.3}, edge={:.1}, ratio={:.2}, threads={}",
            c.octave_count,
            c.scales_per_octave,
            c.base_sigma,
            c.contrast_threshold,
            c.edge_threshold,
            c.match_ratio,
            c.n_threads
        )
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> ScaleSpaceResult<()> {
        self.core.validate()?;
        Ok(())
    }

    /// Save configuration to JSON file
    #[cfg(feature = "serde")]
    pub fn save_json<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load configuration from JSON file
    #[cfg(feature = "serde")]
    pub fn load_json<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save configuration to TOML file
    #[cfg(feature = "serde")]
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Load configuration from TOML file
    #[cfg(feature = "serde")]
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Serialize to JSON string
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML string
    #[cfg(feature = "serde")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserialize from TOML string
    #[cfg(feature = "serde")]
    pub fn from_toml(toml_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }
}
