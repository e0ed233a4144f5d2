use std::thread;
use std::time::Duration;

use tracing::{debug, error, info, instrument, warn};

use crate::mosaic_pipeline::{
    common::error::{MosaicError, Result},
    compositing::{composite_overlap, Canvas, EdgeDistances, UsedRegion},
    frame::{draw_rectangle, resize_area, BackgroundCorrection, Image},
    io::FrameSource,
    registration::{
        centered_placement, compute_placement, Displacement, FrameBounds, OffsetEstimator, Placement, Registrar,
    },
    session::timing::{Step, StepTimings},
    session::types::{FrameReport, MosaicConfig, ProcessSummary, SessionPhase},
};

const FOOTPRINT_COLOR: [u8; 3] = [0, 255, 0];

/// Everything known once the first frame has been placed.
#[derive(Debug, Clone)]
struct Track {
    frame_shape: (usize, usize),
    /// Previous accepted frame at working resolution.
    previous_working: Image,
    /// Latest accepted frame at full resolution, after correction.
    latest: Image,
    placement: Placement,
    last_bounds: FrameBounds,
    used_region: UsedRegion,
    growing: bool,
}

/// One mosaic under construction.
///
/// Frame insertion is all-or-nothing: every check (shape, registration,
/// canvas bounds) runs before the canvas is touched, so a failed frame leaves
/// the canvas, used region and placement exactly as they were. Not meant to
/// be shared between threads without external locking.
pub struct MosaicSession<R: Registrar = OffsetEstimator> {
    config: MosaicConfig,
    registrar: R,
    canvas: Canvas,
    correction: Option<BackgroundCorrection>,
    track: Option<Track>,
    accepted: usize,
    dropped: usize,
    last_timings: StepTimings,
}

impl MosaicSession<OffsetEstimator> {
    pub fn new(config: MosaicConfig) -> Result<Self> {
        let registrar = OffsetEstimator::new(config.algorithm, config.ratio_threshold, config.max_features);
        Self::with_registrar(registrar, config)
    }
}

impl<R: Registrar> MosaicSession<R> {
    pub fn with_registrar(registrar: R, config: MosaicConfig) -> Result<Self> {
        config.validate()?;
        let canvas = Canvas::with_tile_size(config.canvas_height, config.canvas_width, config.tile_size);
        Ok(Self {
            config,
            registrar,
            canvas,
            correction: None,
            track: None,
            accepted: 0,
            dropped: 0,
            last_timings: StepTimings::new(),
        })
    }

    pub fn config(&self) -> &MosaicConfig {
        &self.config
    }

    pub fn registrar(&self) -> &R {
        &self.registrar
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn correction(&self) -> Option<&BackgroundCorrection> {
        self.correction.as_ref()
    }

    /// Correction added to every subsequent frame before registration.
    pub fn set_correction(&mut self, correction: Option<BackgroundCorrection>) {
        self.correction = correction;
    }

    pub fn phase(&self) -> SessionPhase {
        match &self.track {
            None => SessionPhase::Empty,
            Some(track) if track.growing => SessionPhase::Growing,
            Some(_) => SessionPhase::Anchored,
        }
    }

    pub fn placement(&self) -> Option<Placement> {
        self.track.as_ref().map(|t| t.placement)
    }

    pub fn used_region(&self) -> Option<UsedRegion> {
        self.track.as_ref().map(|t| t.used_region)
    }

    /// Canvas rectangle of the latest accepted frame.
    pub fn last_bounds(&self) -> Option<FrameBounds> {
        self.track.as_ref().map(|t| t.last_bounds)
    }

    pub fn edge_distances(&self) -> Option<EdgeDistances> {
        self.used_region()
            .map(|r| r.edge_distances(self.canvas.height(), self.canvas.width()))
    }

    pub fn accepted_frames(&self) -> usize {
        self.accepted
    }

    /// Frames rejected so far. Diagnostic only: a drop leaves every other
    /// piece of session state untouched.
    pub fn dropped_frames(&self) -> usize {
        self.dropped
    }

    /// Step timings of the most recent accepted frame.
    pub fn last_timings(&self) -> &StepTimings {
        &self.last_timings
    }

    /// Back to `Empty`: canvas cleared, placement and used region forgotten.
    pub fn reset(&mut self) {
        info!(accepted = self.accepted, dropped = self.dropped, "Resetting mosaic session");
        self.canvas.clear();
        self.track = None;
        self.accepted = 0;
        self.dropped = 0;
        self.last_timings = StepTimings::new();
    }

    /// The canvas cropped to the used region.
    pub fn mosaic(&self) -> Option<Image> {
        let region = self.used_region()?;
        // The used region is the envelope of bounds-checked frames.
        self.canvas.read_region(&region.to_bounds()).ok()
    }

    /// Mosaic with the latest frame outlined, resized to the preview size.
    pub fn preview(&self) -> Option<Image> {
        let track = self.track.as_ref()?;
        let mut crop = self.mosaic()?;
        let region = track.used_region;
        let bounds = track.last_bounds;

        let scale = (crop.height() / self.config.preview_height)
            .max(crop.width() / self.config.preview_width)
            .max(1);
        draw_rectangle(
            &mut crop,
            bounds.row_start - region.north,
            bounds.col_start - region.west,
            bounds.row_end - region.north,
            bounds.col_end - region.west,
            FOOTPRINT_COLOR,
            2 * scale,
        );
        Some(resize_area(&crop, self.config.preview_height, self.config.preview_width))
    }

    /// Latest accepted frame resized to the capture preview size.
    pub fn capture_preview(&self) -> Option<Image> {
        let track = self.track.as_ref()?;
        Some(resize_area(&track.latest, self.config.capture_height, self.config.capture_width))
    }

    /// Places `frame` on the canvas.
    ///
    /// The first frame anchors the session at the canvas centre; later frames
    /// are registered against the previous accepted frame. On error the
    /// canvas, used region, placement and registration reference are left
    /// exactly as they were; only the diagnostic `dropped_frames` counter
    /// moves.
    #[instrument(skip(self, frame), fields(height = frame.height(), width = frame.width()))]
    pub fn insert_frame(&mut self, frame: &Image) -> Result<FrameReport> {
        match self.try_insert(frame) {
            Ok((report, timings)) => {
                self.accepted += 1;
                timings.log_summary();
                self.last_timings = timings;
                info!(
                    phase = ?report.phase,
                    row = report.placement.row,
                    col = report.placement.col,
                    "Frame placed"
                );
                Ok(report)
            }
            Err(e) => {
                self.dropped += 1;
                warn!(error = %e, dropped = self.dropped, "Frame dropped");
                Err(e)
            }
        }
    }

    /// Inserts every frame `source` can currently supply. Frames that fail
    /// to read, decode or register are dropped; any other source error is
    /// returned.
    pub fn process_available<S: FrameSource + ?Sized>(&mut self, source: &mut S) -> Result<ProcessSummary> {
        let mut summary = ProcessSummary::default();
        loop {
            let frame = match source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                Err(e @ (MosaicError::DecodeError(_) | MosaicError::InputReadError(_))) => {
                    warn!(error = %e, "Skipping unreadable frame");
                    self.dropped += 1;
                    summary.dropped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };
            match self.insert_frame(&frame) {
                Ok(_) => summary.accepted += 1,
                Err(_) => summary.dropped += 1,
            }
        }
        debug!(accepted = summary.accepted, dropped = summary.dropped, "Source drained");
        Ok(summary)
    }

    /// Polls `source` until `idle_polls` consecutive polls bring nothing new.
    ///
    /// A poll that fails is logged, counted in `source_errors` and treated as
    /// idle, so the mosaic built so far is never lost to a flaky source.
    pub fn watch<S: FrameSource + ?Sized>(
        &mut self,
        source: &mut S,
        poll_interval: Duration,
        idle_polls: u32,
    ) -> ProcessSummary {
        let mut total = ProcessSummary::default();
        let mut idle = 0;
        loop {
            match self.process_available(source) {
                Ok(summary) if summary.accepted + summary.dropped > 0 => {
                    idle = 0;
                    total.accepted += summary.accepted;
                    total.dropped += summary.dropped;
                    if let Some(distances) = self.edge_distances() {
                        info!(accepted = summary.accepted, dropped = summary.dropped, "{}", distances);
                    }
                }
                Ok(_) => idle += 1,
                Err(e) => {
                    error!(error = %e, "Frame source failed, will poll again");
                    total.source_errors += 1;
                    idle += 1;
                }
            }
            if idle >= idle_polls.max(1) {
                break;
            }
            thread::sleep(poll_interval);
        }
        info!(
            accepted = total.accepted,
            dropped = total.dropped,
            source_errors = total.source_errors,
            "Source idle, watch finished"
        );
        total
    }

    fn try_insert(&mut self, frame: &Image) -> Result<(FrameReport, StepTimings)> {
        let mut timings = StepTimings::new();
        let (rows, cols) = frame.shape();
        if frame.is_empty() {
            return Err(MosaicError::InvalidDimensions(rows, cols));
        }
        if let Some(track) = &self.track {
            if track.frame_shape != frame.shape() {
                return Err(MosaicError::ShapeMismatch {
                    expected: track.frame_shape,
                    actual: frame.shape(),
                });
            }
        }

        let factor = self.config.downscale_factor;
        let working_shape = (rows / factor, cols / factor);
        if working_shape.0 == 0 || working_shape.1 == 0 {
            return Err(MosaicError::InvalidDimensions(rows, cols));
        }

        let corrected = {
            let _span = tracing::info_span!("correct").entered();
            timings.time(Step::Correct, || match &self.correction {
                Some(correction) => correction.apply(frame),
                None => Ok(frame.clone()),
            })?
        };

        let working = {
            let _span = tracing::info_span!("downscale", factor).entered();
            timings.time(Step::Downscale, || resize_area(&corrected, working_shape.0, working_shape.1))
        };

        let Some(track) = &self.track else {
            let report = self.anchor(corrected, working, &mut timings)?;
            return Ok((report, timings));
        };

        let displacement = {
            let _span = tracing::info_span!("register").entered();
            let small = timings.time(Step::Register, || {
                self.registrar.register(&track.previous_working, &working)
            })?;
            small * factor as i64
        };

        let bounds = compute_placement(track.placement, displacement, rows, cols);
        self.canvas.check_bounds(&bounds)?;

        {
            let _span = tracing::info_span!("composite", row = bounds.row_start, col = bounds.col_start).entered();
            let canvas = &mut self.canvas;
            timings.time(Step::Composite, || -> Result<()> {
                let existing = canvas.read_region(&bounds)?;
                let merged = composite_overlap(&existing, &corrected)?;
                canvas.write_region(&bounds, &merged)
            })?;
        }

        let used_region = track.used_region.envelope(&bounds);
        self.track = Some(Track {
            frame_shape: (rows, cols),
            previous_working: working,
            latest: corrected,
            placement: bounds.start(),
            last_bounds: bounds,
            used_region,
            growing: true,
        });

        Ok((
            FrameReport {
                phase: SessionPhase::Growing,
                placement: bounds.start(),
                displacement: Some(displacement),
                used_region,
            },
            timings,
        ))
    }

    fn anchor(
        &mut self,
        corrected: Image,
        working: Image,
        timings: &mut StepTimings,
    ) -> Result<FrameReport> {
        let (rows, cols) = corrected.shape();
        let start = centered_placement(self.canvas.height(), self.canvas.width(), rows, cols);
        let bounds = compute_placement(start, Displacement::default(), rows, cols);
        self.canvas.check_bounds(&bounds)?;

        {
            let _span = tracing::info_span!("composite", row = bounds.row_start, col = bounds.col_start).entered();
            let canvas = &mut self.canvas;
            timings.time(Step::Composite, || canvas.write_region(&bounds, &corrected))?;
        }

        let used_region = UsedRegion::from_bounds(&bounds);
        debug!(?used_region, "Session anchored");
        self.track = Some(Track {
            frame_shape: (rows, cols),
            previous_working: working,
            latest: corrected,
            placement: start,
            last_bounds: bounds,
            used_region,
            growing: false,
        });

        Ok(FrameReport {
            phase: SessionPhase::Anchored,
            placement: start,
            displacement: None,
            used_region,
        })
    }
}
