//! Compositing module
//!
//! The sparse canvas, the first-write-wins overlap merge and the
//! used-region envelope.

mod canvas;
mod overlap;
mod region;

pub use canvas::{Canvas, DEFAULT_TILE_SIZE};
pub use overlap::composite_overlap;
pub use region::{EdgeDistances, UsedRegion};
