use crate::mosaic_pipeline::common::error::{MosaicError, Result};
use crate::mosaic_pipeline::frame::types::Image;

/// Per-pixel additive flat-field correction.
///
/// The correction image is produced elsewhere from a reference exposure; here
/// it is only added to each frame.
#[derive(Debug, Clone)]
pub struct BackgroundCorrection {
    image: Image,
}

impl BackgroundCorrection {
    pub fn new(image: Image) -> Self {
        Self { image }
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    /// Saturating per-channel addition.
    pub fn apply(&self, frame: &Image) -> Result<Image> {
        if frame.shape() != self.image.shape() {
            return Err(MosaicError::ShapeMismatch {
                expected: self.image.shape(),
                actual: frame.shape(),
            });
        }
        let mut out = frame.clone();
        for (dst, &add) in out.data_mut().iter_mut().zip(self.image.data()) {
            *dst = dst.saturating_add(add);
        }
        Ok(out)
    }
}
