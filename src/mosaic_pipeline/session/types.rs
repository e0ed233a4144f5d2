//! Mosaic session configuration and report types

use crate::mosaic_pipeline::common::error::{MosaicError, Result};
use crate::mosaic_pipeline::compositing::{UsedRegion, DEFAULT_TILE_SIZE};
use crate::mosaic_pipeline::features::{FeatureAlgorithm, DEFAULT_RATIO_THRESHOLD};
use crate::mosaic_pipeline::registration::{Displacement, Placement};

/// Configuration for a mosaic session
#[derive(Debug, Clone)]
pub struct MosaicConfig {
    /// Both frame dimensions are divided by this before registration
    pub downscale_factor: usize,
    /// Detector/descriptor preset used for registration
    pub algorithm: FeatureAlgorithm,
    /// Lowe ratio-test threshold
    pub ratio_threshold: f32,
    /// Maximum keypoints kept per image
    pub max_features: usize,
    /// Logical canvas extent in pixels
    pub canvas_height: usize,
    pub canvas_width: usize,
    /// Side of one lazily allocated canvas tile
    pub tile_size: usize,
    /// Stitch preview resolution
    pub preview_height: usize,
    pub preview_width: usize,
    /// Latest-frame preview resolution
    pub capture_height: usize,
    pub capture_width: usize,
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            downscale_factor: 4,
            algorithm: FeatureAlgorithm::HarrisPatch,
            ratio_threshold: DEFAULT_RATIO_THRESHOLD,
            max_features: 1000,
            canvas_height: 60_000,
            canvas_width: 60_000,
            tile_size: DEFAULT_TILE_SIZE,
            preview_height: 750,
            preview_width: 850,
            capture_height: 320,
            capture_width: 408,
        }
    }
}

impl MosaicConfig {
    pub fn builder() -> MosaicConfigBuilder {
        MosaicConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.downscale_factor == 0 {
            return Err(MosaicError::InvalidConfig("downscale factor must be at least 1".into()));
        }
        if !(self.ratio_threshold > 0.0 && self.ratio_threshold <= 1.0) {
            return Err(MosaicError::InvalidConfig(format!(
                "ratio threshold {} outside (0, 1]",
                self.ratio_threshold
            )));
        }
        if self.max_features == 0 {
            return Err(MosaicError::InvalidConfig("max features must be at least 1".into()));
        }
        if self.canvas_height == 0 || self.canvas_width == 0 || self.tile_size == 0 {
            return Err(MosaicError::InvalidConfig("canvas and tile sizes must be non-zero".into()));
        }
        if self.preview_height == 0 || self.preview_width == 0 || self.capture_height == 0 || self.capture_width == 0 {
            return Err(MosaicError::InvalidConfig("preview sizes must be non-zero".into()));
        }
        Ok(())
    }
}

/// Builder for MosaicConfig
#[derive(Default)]
pub struct MosaicConfigBuilder {
    downscale_factor: Option<usize>,
    algorithm: Option<FeatureAlgorithm>,
    ratio_threshold: Option<f32>,
    max_features: Option<usize>,
    canvas_size: Option<(usize, usize)>,
    tile_size: Option<usize>,
    preview_size: Option<(usize, usize)>,
    capture_size: Option<(usize, usize)>,
}

impl MosaicConfigBuilder {
    pub fn downscale_factor(mut self, factor: usize) -> Self {
        self.downscale_factor = Some(factor);
        self
    }

    pub fn algorithm(mut self, algorithm: FeatureAlgorithm) -> Self {
        self.algorithm = Some(algorithm);
        self
    }

    pub fn ratio_threshold(mut self, ratio: f32) -> Self {
        self.ratio_threshold = Some(ratio);
        self
    }

    pub fn max_features(mut self, max: usize) -> Self {
        self.max_features = Some(max);
        self
    }

    pub fn canvas_size(mut self, height: usize, width: usize) -> Self {
        self.canvas_size = Some((height, width));
        self
    }

    pub fn tile_size(mut self, size: usize) -> Self {
        self.tile_size = Some(size);
        self
    }

    pub fn preview_size(mut self, height: usize, width: usize) -> Self {
        self.preview_size = Some((height, width));
        self
    }

    pub fn capture_size(mut self, height: usize, width: usize) -> Self {
        self.capture_size = Some((height, width));
        self
    }

    pub fn build(self) -> MosaicConfig {
        let default = MosaicConfig::default();
        let (canvas_height, canvas_width) = self.canvas_size.unwrap_or((default.canvas_height, default.canvas_width));
        let (preview_height, preview_width) = self.preview_size.unwrap_or((default.preview_height, default.preview_width));
        let (capture_height, capture_width) = self.capture_size.unwrap_or((default.capture_height, default.capture_width));
        MosaicConfig {
            downscale_factor: self.downscale_factor.unwrap_or(default.downscale_factor),
            algorithm: self.algorithm.unwrap_or(default.algorithm),
            ratio_threshold: self.ratio_threshold.unwrap_or(default.ratio_threshold),
            max_features: self.max_features.unwrap_or(default.max_features),
            canvas_height,
            canvas_width,
            tile_size: self.tile_size.unwrap_or(default.tile_size),
            preview_height,
            preview_width,
            capture_height,
            capture_width,
        }
    }
}

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No frame yet.
    Empty,
    /// First frame placed; it defines the session origin.
    Anchored,
    /// At least one registered frame placed.
    Growing,
}

/// Outcome of one accepted frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    pub phase: SessionPhase,
    pub placement: Placement,
    /// Full-resolution displacement from the previous frame; `None` for the anchor.
    pub displacement: Option<Displacement>,
    pub used_region: UsedRegion,
}

/// Counts from one `process_available` sweep or a whole `watch` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    pub accepted: usize,
    pub dropped: usize,
    /// Polls where the source itself failed; always zero for a single sweep.
    pub source_errors: usize,
}
