use sift_core::Pyramid;

/// Geometry of one pyramid octave
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleLevel {
    pub octave: usize,
    pub scale: f32,
    pub width: usize,
    pub height: usize,
}

/// Gaussian and Difference-of-Gaussians pyramids of one image.
///
/// Owned by a single detect call; the descriptor stage reads the
/// Gaussian half after keypoints have been found.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleSpace {
    pub gaussian: Pyramid,
    pub dog: Pyramid,
}

impl ScaleSpace {
    pub fn octave_count(&self) -> usize {
        self.gaussian.len()
    }

    /// Per-octave geometry, finest first
    pub fn levels(&self) -> Vec<ScaleLevel> {
        self.gaussian
            .octaves
            .iter()
            .enumerate()
            .filter_map(|(octave, o)| {
                let (width, height) = o.dimensions()?;
                Some(ScaleLevel {
                    octave,
                    scale: (1usize << octave) as f32,
                    width,
                    height,
                })
            })
            .collect()
    }
}
