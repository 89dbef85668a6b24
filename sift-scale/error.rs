use sift_core::{ConfigError, ImageError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScaleSpaceError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("image error: {0}")]
    Image(#[from] ImageError),
}

pub type ScaleSpaceResult<T> = Result<T, ScaleSpaceError>;
