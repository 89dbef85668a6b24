use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    #[error("invalid match ratio: {0} (must be finite and > 0)")]
    InvalidRatio(f32),
}

pub type MatchResult<T> = Result<T, MatchError>;
