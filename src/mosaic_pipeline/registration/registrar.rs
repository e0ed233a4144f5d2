use crate::mosaic_pipeline::common::error::Result;
use crate::mosaic_pipeline::frame::Image;
use crate::mosaic_pipeline::registration::offset::Displacement;

/// Estimates how far `current` has moved relative to `previous`.
///
/// Both images are already at working resolution and share a shape; the
/// displacement is in working-resolution pixels.
pub trait Registrar {
    fn register(&self, previous: &Image, current: &Image) -> Result<Displacement>;
}
