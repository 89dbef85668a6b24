use thiserror::Error;

/// Errors raised while constructing or combining images
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImageError {
    #[error("invalid image dimensions: {width}x{height} (must be > 0)")]
    InvalidImageSize { width: usize, height: usize },
    #[error("image data length mismatch: expected {expected_len}, got {actual_len}")]
    InvalidImageData { expected_len: usize, actual_len: usize },
    #[error("non-finite intensity at ({x}, {y})")]
    NonFiniteSample { x: usize, y: usize },
    #[error("image dimensions differ: {left:?} vs {right:?}")]
    DimensionMismatch { left: (usize, usize), right: (usize, usize) },
}

/// Caller contract violations in a [`crate::SiftConfig`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("octave count must be at least 1")]
    ZeroOctaves,
    #[error("scales per octave must be at least 1")]
    ZeroScales,
    #[error("invalid base sigma: {0} (must be finite and > 0)")]
    InvalidSigma(f32),
    #[error("invalid contrast threshold: {0} (must be finite and >= 0)")]
    InvalidContrastThreshold(f32),
    #[error("invalid edge threshold: {0} (must be finite and > 0)")]
    InvalidEdgeThreshold(f32),
    #[error("invalid match ratio: {0} (must be finite and > 0)")]
    InvalidMatchRatio(f32),
    #[error("thread count must be at least 1")]
    ZeroThreads,
}

pub type ImageResult<T> = Result<T, ImageError>;
