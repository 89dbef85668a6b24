//! Spatially binned gradient descriptors and brute-force ratio-test matching.

pub mod error;
pub mod extractor;
pub mod matcher;

pub use error::{MatchError, MatchResult};
pub use extractor::{compute_descriptor, normalize_descriptor, DescriptorExtractor};
pub use matcher::{euclidean_distance, DescriptorMatcher};
