//! Mosaic pipeline module
//!
//! Registers consecutive overlapping microscope frames against each other and
//! composites them onto one large canvas.

pub mod common;
pub mod frame;
pub mod features;
pub mod registration;
pub mod compositing;
pub mod session;
pub mod io;

pub use common::{
    MosaicError,
    Result,
};

pub use frame::{
    BackgroundCorrection,
    Image,
};

pub use features::{
    Correspondence,
    FeatureAlgorithm,
    FeatureMatcher,
};

pub use registration::{
    estimate_offset,
    compute_placement,
    Displacement,
    FrameBounds,
    OffsetEstimator,
    Placement,
    Registrar,
};

pub use compositing::{
    composite_overlap,
    Canvas,
    EdgeDistances,
    UsedRegion,
};

pub use session::{
    FrameReport,
    MosaicConfig,
    MosaicConfigBuilder,
    MosaicSession,
    ProcessSummary,
    SessionPhase,
    Step,
    StepTimings,
};

pub use io::{
    save_mosaic,
    DirectoryFrameSource,
    FrameSource,
    MosaicWriter,
    DeflateLevel,
    Predictor,
    StandardTiffWriter,
    TiffCompression,
    WriterConfig,
};
