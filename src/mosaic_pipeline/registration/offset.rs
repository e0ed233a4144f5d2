use std::collections::HashMap;
use std::ops::{Mul, Neg};

use tracing::debug;

use crate::mosaic_pipeline::common::error::{MosaicError, Result};
use crate::mosaic_pipeline::features::{Correspondence, FeatureAlgorithm, FeatureMatcher};
use crate::mosaic_pipeline::frame::Image;
use crate::mosaic_pipeline::registration::registrar::Registrar;

/// Integer translation, rows first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Displacement {
    pub row: i64,
    pub col: i64,
}

impl Displacement {
    pub fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }
}

impl Neg for Displacement {
    type Output = Displacement;

    fn neg(self) -> Displacement {
        Displacement::new(-self.row, -self.col)
    }
}

impl Mul<i64> for Displacement {
    type Output = Displacement;

    fn mul(self, factor: i64) -> Displacement {
        Displacement::new(self.row * factor, self.col * factor)
    }
}

/// Majority vote over per-match displacement vectors.
///
/// Each correspondence votes for `b - a`; the most frequent vector wins, and
/// among equally frequent vectors the one first seen wins. The winner is
/// negated so it reads as "move the second image this far from the first
/// image's anchor".
pub fn estimate_offset(correspondences: &[Correspondence]) -> Result<Displacement> {
    let mut order: Vec<Displacement> = Vec::new();
    let mut counts: HashMap<Displacement, usize> = HashMap::new();

    for m in correspondences {
        let vote = Displacement::new(m.b.row - m.a.row, m.b.col - m.a.col);
        let count = counts.entry(vote).or_insert(0);
        if *count == 0 {
            order.push(vote);
        }
        *count += 1;
    }

    let mut winner: Option<(Displacement, usize)> = None;
    for vote in order {
        let count = counts[&vote];
        if winner.is_none_or(|(_, best)| count > best) {
            winner = Some((vote, count));
        }
    }

    let (vote, count) = winner.ok_or(MosaicError::NoCorrespondence)?;
    debug!(
        row = vote.row,
        col = vote.col,
        votes = count,
        total = correspondences.len(),
        "Displacement vote"
    );
    Ok(-vote)
}

/// Feature matching followed by the displacement vote.
#[derive(Debug, Clone)]
pub struct OffsetEstimator {
    matcher: FeatureMatcher,
}

impl OffsetEstimator {
    pub fn new(algorithm: FeatureAlgorithm, ratio_threshold: f32, max_features: usize) -> Self {
        Self {
            matcher: FeatureMatcher::new(algorithm, ratio_threshold, max_features),
        }
    }

    pub fn with_matcher(matcher: FeatureMatcher) -> Self {
        Self { matcher }
    }

    pub fn matcher(&self) -> &FeatureMatcher {
        &self.matcher
    }

    pub fn estimate(&self, a: &Image, b: &Image) -> Result<Displacement> {
        let correspondences = self.matcher.match_images(a, b)?;
        estimate_offset(&correspondences)
    }
}

impl Registrar for OffsetEstimator {
    fn register(&self, previous: &Image, current: &Image) -> Result<Displacement> {
        self.estimate(previous, current)
    }
}
