//! Gaussian scale space, Difference-of-Gaussians extrema and dominant
//! orientation assignment.

pub mod blur;
pub mod builder;
pub mod config;
pub mod detector;
pub mod error;
pub mod extrema;
pub mod orientation;
pub mod pyramid;
pub mod types;

pub use blur::gaussian_blur;
pub use builder::DetectorBuilder;
pub use config::DetectorConfig;
pub use detector::ScaleSpaceDetector;
pub use error::{ScaleSpaceError, ScaleSpaceResult};
pub use extrema::find_scale_space_extrema;
pub use orientation::assign_orientations;
pub use pyramid::{build_dog_pyramid, build_gaussian_pyramid, MIN_OCTAVE_SIZE};
pub use types::{ScaleLevel, ScaleSpace};
