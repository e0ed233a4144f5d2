use tracing::debug;

use crate::mosaic_pipeline::common::error::{MosaicError, Result};
use crate::mosaic_pipeline::features::descriptor::{BriefExtractor, PatchExtractor};
use crate::mosaic_pipeline::features::detector::{FastDetector, HarrisDetector};
use crate::mosaic_pipeline::features::types::{Correspondence, Feature, FeatureAlgorithm};
use crate::mosaic_pipeline::frame::{GrayImage, Image};

/// Lowe's ratio: best match must beat 0.75x the runner-up.
pub const DEFAULT_RATIO_THRESHOLD: f32 = 0.75;

const FAST_THRESHOLD: u8 = 20;
const BRIEF_RADIUS: usize = 12;
const BRIEF_SMOOTHING: usize = 2;
const PATCH_RADIUS: usize = 8;
const PATCH_STEP: usize = 2;
const PATCH_SMOOTHING: usize = 1;

#[derive(Debug, Clone)]
enum Pipeline {
    FastBrief(FastDetector, BriefExtractor),
    HarrisPatch(HarrisDetector, PatchExtractor),
}

/// Extracts features from two same-size images and pairs them up.
#[derive(Debug, Clone)]
pub struct FeatureMatcher {
    algorithm: FeatureAlgorithm,
    ratio_threshold: f32,
    pipeline: Pipeline,
}

impl FeatureMatcher {
    pub fn new(algorithm: FeatureAlgorithm, ratio_threshold: f32, max_features: usize) -> Self {
        let pipeline = match algorithm {
            FeatureAlgorithm::FastBrief => {
                let extractor = BriefExtractor::new(BRIEF_RADIUS, BRIEF_SMOOTHING);
                let detector = FastDetector::new(FAST_THRESHOLD, max_features, extractor.margin());
                Pipeline::FastBrief(detector, extractor)
            }
            FeatureAlgorithm::HarrisPatch => {
                let extractor = PatchExtractor::new(PATCH_RADIUS, PATCH_STEP, PATCH_SMOOTHING);
                let detector = HarrisDetector::new(max_features, extractor.margin());
                Pipeline::HarrisPatch(detector, extractor)
            }
        };
        Self {
            algorithm,
            ratio_threshold,
            pipeline,
        }
    }

    pub fn algorithm(&self) -> FeatureAlgorithm {
        self.algorithm
    }

    pub fn ratio_threshold(&self) -> f32 {
        self.ratio_threshold
    }

    pub fn extract(&self, image: &GrayImage) -> Vec<Feature> {
        match &self.pipeline {
            Pipeline::FastBrief(detector, extractor) => extractor.extract(image, &detector.detect(image)),
            Pipeline::HarrisPatch(detector, extractor) => extractor.extract(image, &detector.detect(image)),
        }
    }

    /// Correspondences from `a` to `b`. An empty result is a valid outcome
    /// (e.g. blank frames); only differing shapes are an error.
    pub fn match_images(&self, a: &Image, b: &Image) -> Result<Vec<Correspondence>> {
        if a.shape() != b.shape() {
            return Err(MosaicError::ShapeMismatch {
                expected: a.shape(),
                actual: b.shape(),
            });
        }

        let features_a = self.extract(&a.to_gray());
        let features_b = self.extract(&b.to_gray());
        let matches = knn_ratio_match(&features_a, &features_b, self.ratio_threshold);

        debug!(
            algorithm = %self.algorithm,
            features_a = features_a.len(),
            features_b = features_b.len(),
            matches = matches.len(),
            "Matched features"
        );
        Ok(matches)
    }
}

/// Brute-force 2-nearest-neighbour search from `query` into `train`, keeping
/// a match only when `best < ratio * second_best`. Queries with fewer than two
/// candidates are dropped.
pub fn knn_ratio_match(query: &[Feature], train: &[Feature], ratio: f32) -> Vec<Correspondence> {
    let mut matches = Vec::new();
    if train.len() < 2 {
        return matches;
    }

    for q in query {
        let mut best: Option<(usize, f32)> = None;
        let mut second = f32::INFINITY;

        for (idx, t) in train.iter().enumerate() {
            let d = q.descriptor.distance(&t.descriptor);
            match best {
                Some((_, best_d)) if d >= best_d => {
                    if d < second {
                        second = d;
                    }
                }
                Some((_, best_d)) => {
                    second = best_d;
                    best = Some((idx, d));
                }
                None => best = Some((idx, d)),
            }
        }

        if let Some((idx, d)) = best {
            if d.is_finite() && d < ratio * second {
                matches.push(Correspondence::new(q.keypoint.point(), train[idx].keypoint.point(), d));
            }
        }
    }
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mosaic_pipeline::features::types::{Descriptor, Keypoint, Point};

    fn feature(row: usize, col: usize, values: Vec<f32>) -> Feature {
        Feature {
            keypoint: Keypoint { row, col, response: 1.0 },
            descriptor: Descriptor::Patch(values),
        }
    }

    #[test]
    fn test_ratio_test_accepts_dominant_match() {
        let query = vec![feature(1, 1, vec![0.0, 0.0])];
        let train = vec![feature(5, 6, vec![0.1, 0.0]), feature(9, 9, vec![1.0, 1.0])];
        let matches = knn_ratio_match(&query, &train, 0.75);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].a, Point::new(1, 1));
        assert_eq!(matches[0].b, Point::new(5, 6));
    }

    #[test]
    fn test_ratio_test_rejects_ambiguous_match() {
        let query = vec![feature(1, 1, vec![0.0, 0.0])];
        let train = vec![feature(5, 6, vec![1.0, 0.0]), feature(9, 9, vec![0.0, 1.0])];
        assert!(knn_ratio_match(&query, &train, 0.75).is_empty());
    }

    #[test]
    fn test_single_candidate_is_dropped() {
        let query = vec![feature(1, 1, vec![0.0])];
        let train = vec![feature(2, 2, vec![0.0])];
        assert!(knn_ratio_match(&query, &train, 0.75).is_empty());
    }

    #[test]
    fn test_blank_images_give_no_matches() {
        let matcher = FeatureMatcher::new(FeatureAlgorithm::HarrisPatch, 0.75, 200);
        let blank = Image::filled(64, 64, [128, 128, 128]);
        assert!(matcher.match_images(&blank, &blank).unwrap().is_empty());
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let matcher = FeatureMatcher::new(FeatureAlgorithm::FastBrief, 0.75, 200);
        let result = matcher.match_images(&Image::new(10, 10), &Image::new(10, 12));
        assert!(matches!(result, Err(MosaicError::ShapeMismatch { .. })));
    }
}
