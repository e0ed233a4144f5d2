//! Mosaic session module
//!
//! Owns the canvas and drives each frame through correction, registration,
//! placement and compositing.

pub mod types;
mod timing;
mod mosaic_session;


pub use types::{FrameReport, MosaicConfig, MosaicConfigBuilder, ProcessSummary, SessionPhase};
pub use timing::{Step, StepTimings};
pub use mosaic_session::MosaicSession;
