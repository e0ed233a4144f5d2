use std::path::Path;

use tracing::debug;

use crate::mosaic_pipeline::common::error::{MosaicError, Result};
use crate::mosaic_pipeline::frame::Image;

/// Decodes any format the `image` crate was built with into RGB8.
pub fn decode_image(data: &[u8]) -> Result<Image> {
    let decoded = image::load_from_memory(data).map_err(|e| MosaicError::DecodeError(e.to_string()))?;
    let rgb = decoded.into_rgb8();
    debug!("Decoded image: {}x{}", rgb.width(), rgb.height());
    Ok(Image::from(rgb))
}

pub fn load_image<P: AsRef<Path>>(path: P) -> Result<Image> {
    let path = path.as_ref();
    let data = std::fs::read(path)
        .map_err(|e| MosaicError::InputReadError(format!("{}: {}", path.display(), e)))?;
    decode_image(&data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_round_trip_through_image_crate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let mut buffer = image::RgbImage::new(3, 2);
        buffer.put_pixel(2, 1, image::Rgb([1, 2, 3]));
        buffer.save(&path).unwrap();

        let img = load_image(&path).unwrap();
        assert_eq!(img.shape(), (2, 3));
        assert_eq!(img.pixel(1, 2), [1, 2, 3]);
    }

    #[test]
    fn test_garbage_is_decode_error() {
        assert!(matches!(decode_image(b"not an image"), Err(MosaicError::DecodeError(_))));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let result = load_image("/definitely/not/here.png");
        assert!(matches!(result, Err(MosaicError::InputReadError(_))));
    }
}
