//! Feature matching types

use std::fmt;

/// Detector/descriptor preset used for registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeatureAlgorithm {
    /// FAST-9 corners with 256-bit BRIEF descriptors (Hamming distance).
    /// Cheap, but binary descriptors confuse look-alike corners more often.
    FastBrief,
    /// Harris corners with normalized intensity patches (Euclidean distance).
    /// Slower, more discriminative.
    #[default]
    HarrisPatch,
}

impl fmt::Display for FeatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureAlgorithm::FastBrief => write!(f, "FAST+BRIEF"),
            FeatureAlgorithm::HarrisPatch => write!(f, "Harris+patch"),
        }
    }
}

/// Integer pixel coordinate, row first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub row: i64,
    pub col: i64,
}

impl Point {
    pub fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }
}

/// Detected interest point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    pub row: usize,
    pub col: usize,
    /// Detector score; larger is stronger.
    pub response: f32,
}

impl Keypoint {
    pub fn point(&self) -> Point {
        Point::new(self.row as i64, self.col as i64)
    }
}

/// Fixed-length descriptor vector.
#[derive(Debug, Clone, PartialEq)]
pub enum Descriptor {
    Binary([u8; 32]),
    Patch(Vec<f32>),
}

impl Descriptor {
    /// Hamming distance for binary descriptors, Euclidean for patches.
    /// Descriptors of different kinds are infinitely far apart.
    pub fn distance(&self, other: &Descriptor) -> f32 {
        match (self, other) {
            (Descriptor::Binary(a), Descriptor::Binary(b)) => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| (x ^ y).count_ones())
                .sum::<u32>() as f32,
            (Descriptor::Patch(a), Descriptor::Patch(b)) if a.len() == b.len() => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| (x - y) * (x - y))
                .sum::<f32>()
                .sqrt(),
            _ => f32::INFINITY,
        }
    }
}

/// Keypoint together with its descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub keypoint: Keypoint,
    pub descriptor: Descriptor,
}

/// Point in image A believed to show the same thing as a point in image B.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correspondence {
    pub a: Point,
    pub b: Point,
    pub distance: f32,
}

impl Correspondence {
    pub fn new(a: Point, b: Point, distance: f32) -> Self {
        Self { a, b, distance }
    }
}
