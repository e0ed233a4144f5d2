//! Registration module
//!
//! Turns feature correspondences into an integer translation between two
//! frames, and a translation into canvas coordinates.

mod registrar;
mod offset;
mod placement;

pub use registrar::Registrar;
pub use offset::{estimate_offset, Displacement, OffsetEstimator};
pub use placement::{centered_placement, compute_placement, FrameBounds, Placement};
