//! Frame module
//!
//! In-memory image types plus the small pixel operations the mosaic needs:
//! area resizing, footprint annotation and additive background correction.

pub mod types;
mod resize;
mod annotate;
mod correction;

pub use types::{gray_at, GrayImage, Image, CHANNELS};
pub use resize::resize_area;
pub use annotate::draw_rectangle;
pub use correction::BackgroundCorrection;
