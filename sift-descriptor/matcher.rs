use log::debug;
use rayon::prelude::*;
use sift_core::{Descriptor, Match};

use crate::error::{MatchError, MatchResult};

#[inline]
pub fn euclidean_distance(a: &Descriptor, b: &Descriptor) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

/// Brute-force nearest/second-nearest matcher with Lowe's ratio test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DescriptorMatcher {
    ratio: f32,
}

impl Default for DescriptorMatcher {
    fn default() -> Self {
        Self { ratio: 0.75 }
    }
}

impl DescriptorMatcher {
    pub fn new(ratio: f32) -> MatchResult<Self> {
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(MatchError::InvalidRatio(ratio));
        }
        Ok(Self { ratio })
    }

    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    /// Best candidate index, best distance and second-best distance.
    ///
    /// Ties resolve to the lowest index; the second-best is the minimum over
    /// every other candidate, so an exact tie yields `best == second`.
    fn nearest_two(query: &Descriptor, candidates: &[Descriptor]) -> Option<(usize, f32, f32)> {
        if candidates.len() < 2 {
            return None;
        }
        let mut best_idx = 0;
        let mut best = f32::INFINITY;
        let mut second = f32::INFINITY;
        for (idx, candidate) in candidates.iter().enumerate() {
            let d = euclidean_distance(query, candidate);
            if d < best {
                second = best;
                best = d;
                best_idx = idx;
            } else if d < second {
                second = d;
            }
        }
        Some((best_idx, best, second))
    }

    /// Accepted matches from `a` into `b`, in `a` order.
    ///
    /// Several queries may share the same target.
    pub fn match_descriptors(&self, a: &[Descriptor], b: &[Descriptor]) -> Vec<Match> {
        let matches: Vec<Match> = a
            .par_iter()
            .enumerate()
            .filter_map(|(index_a, query)| {
                let (index_b, best, second) = Self::nearest_two(query, b)?;
                (best < self.ratio * second).then_some(Match { index_a, index_b, distance: best })
            })
            .collect();
        debug!("{} of {} queries matched against {} candidates", matches.len(), a.len(), b.len());
        matches
    }
}
