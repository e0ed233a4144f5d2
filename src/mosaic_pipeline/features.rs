//! Feature matching module
//!
//! Keypoint detection, descriptor extraction and k=2 nearest-neighbour
//! matching with Lowe's ratio test.

pub mod types;
mod detector;
mod descriptor;
mod matcher;

pub use types::{
    Correspondence,
    Descriptor,
    Feature,
    FeatureAlgorithm,
    Keypoint,
    Point,
};
pub use detector::{FastDetector, HarrisDetector};
pub use descriptor::{BriefExtractor, PatchExtractor};
pub use matcher::{knn_ratio_match, FeatureMatcher, DEFAULT_RATIO_THRESHOLD};
