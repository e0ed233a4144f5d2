use crate::mosaic_pipeline::common::error::{MosaicError, Result};
use crate::mosaic_pipeline::frame::Image;

/// Merges `frame` into a canvas region without touching painted samples.
///
/// Occupancy is per channel sample: a non-zero sample in `existing` is kept,
/// a zero sample takes the frame's value. Equivalent to zeroing the frame
/// under the occupancy mask and taking the element-wise maximum.
pub fn composite_overlap(existing: &Image, frame: &Image) -> Result<Image> {
    if existing.shape() != frame.shape() {
        return Err(MosaicError::ShapeMismatch {
            expected: existing.shape(),
            actual: frame.shape(),
        });
    }

    let mut merged = existing.clone();
    for (dst, &src) in merged.data_mut().iter_mut().zip(frame.data()) {
        let masked = if *dst > 0 { 0 } else { src };
        *dst = (*dst).max(masked);
    }
    Ok(merged)
}
