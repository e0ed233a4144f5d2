//! Descriptor extractors.

use imageproc::filter::box_filter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::mosaic_pipeline::features::types::{Descriptor, Feature, Keypoint};
use crate::mosaic_pipeline::frame::{gray_at, GrayImage};

const BRIEF_BITS: usize = 256;

/// Fixed seed so two extractors always agree on the sampling pattern.
const BRIEF_SEED: u64 = 0x5EED_B41E;

/// BRIEF: one bit per intensity comparison between two pixels of a
/// pre-smoothed patch.
#[derive(Debug, Clone)]
pub struct BriefExtractor {
    pattern: Vec<[(i64, i64); 2]>,
    radius: usize,
    smoothing: usize,
}

impl BriefExtractor {
    pub fn new(radius: usize, smoothing: usize) -> Self {
        Self::with_seed(radius, smoothing, BRIEF_SEED)
    }

    pub fn with_seed(radius: usize, smoothing: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let r = radius as i64;
        let pattern = (0..BRIEF_BITS)
            .map(|_| {
                [
                    (rng.random_range(-r..=r), rng.random_range(-r..=r)),
                    (rng.random_range(-r..=r), rng.random_range(-r..=r)),
                ]
            })
            .collect();
        Self { pattern, radius, smoothing }
    }

    /// Keypoints must be at least this far from the border.
    pub fn margin(&self) -> usize {
        self.radius + self.smoothing
    }

    pub fn extract(&self, image: &GrayImage, keypoints: &[Keypoint]) -> Vec<Feature> {
        let smoothed = smooth(image, self.smoothing);
        keypoints
            .iter()
            .map(|kp| {
                let mut bits = [0u8; 32];
                for (i, [p, q]) in self.pattern.iter().enumerate() {
                    let a = sample(&smoothed, kp, *p);
                    let b = sample(&smoothed, kp, *q);
                    if a < b {
                        bits[i / 8] |= 1 << (i % 8);
                    }
                }
                Feature {
                    keypoint: *kp,
                    descriptor: Descriptor::Binary(bits),
                }
            })
            .collect()
    }
}

/// Zero-mean, unit-norm intensity patch sampled on a regular grid.
#[derive(Debug, Clone)]
pub struct PatchExtractor {
    radius: usize,
    step: usize,
    smoothing: usize,
}

impl PatchExtractor {
    pub fn new(radius: usize, step: usize, smoothing: usize) -> Self {
        Self {
            radius,
            step: step.max(1),
            smoothing,
        }
    }

    pub fn margin(&self) -> usize {
        self.radius + self.smoothing
    }

    /// Textureless patches have no direction to normalize and are skipped.
    pub fn extract(&self, image: &GrayImage, keypoints: &[Keypoint]) -> Vec<Feature> {
        let smoothed = smooth(image, self.smoothing);
        let r = self.radius as i64;
        let offsets: Vec<i64> = (-r..=r).step_by(self.step).collect();

        keypoints
            .iter()
            .filter_map(|kp| {
                let mut values = Vec::with_capacity(offsets.len() * offsets.len());
                for &dr in &offsets {
                    for &dc in &offsets {
                        values.push(sample(&smoothed, kp, (dr, dc)) as f32);
                    }
                }
                let mean = values.iter().sum::<f32>() / values.len() as f32;
                values.iter_mut().for_each(|v| *v -= mean);
                let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt();
                if norm < 1e-3 {
                    return None;
                }
                values.iter_mut().for_each(|v| *v /= norm);
                Some(Feature {
                    keypoint: *kp,
                    descriptor: Descriptor::Patch(values),
                })
            })
            .collect()
    }
}

/// Box mean over a `(2 * radius + 1)^2` window.
fn smooth(image: &GrayImage, radius: usize) -> GrayImage {
    if radius == 0 {
        return image.clone();
    }
    box_filter(image, radius as u32, radius as u32)
}

#[inline]
fn sample(image: &GrayImage, kp: &Keypoint, (dr, dc): (i64, i64)) -> u8 {
    gray_at(image, kp.row as i64 + dr, kp.col as i64 + dc)
}
