//! Image data types

use image::{imageops, Rgb, RgbImage};

pub use image::GrayImage;

use crate::mosaic_pipeline::common::error::{MosaicError, Result};

/// Channels per pixel in every frame and in the canvas.
pub const CHANNELS: usize = 3;

/// RGB8 frame addressed as `(row, col)`.
///
/// Wraps an `image::RgbImage`; a zero channel value means "unpainted" once
/// the image is on the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image(RgbImage);

impl Image {
    /// Zero-filled image.
    pub fn new(height: usize, width: usize) -> Self {
        Self(RgbImage::new(width as u32, height as u32))
    }

    pub fn filled(height: usize, width: usize, pixel: [u8; CHANNELS]) -> Self {
        Self(RgbImage::from_pixel(width as u32, height as u32, Rgb(pixel)))
    }

    /// Wraps an interleaved buffer, rejecting lengths that disagree with the shape.
    pub fn from_raw(height: usize, width: usize, data: Vec<u8>) -> Result<Self> {
        if data.len() != height * width * CHANNELS {
            return Err(MosaicError::InvalidDimensions(height, width));
        }
        RgbImage::from_raw(width as u32, height as u32, data)
            .map(Self)
            .ok_or(MosaicError::InvalidDimensions(height, width))
    }

    pub fn height(&self) -> usize {
        self.0.height() as usize
    }

    pub fn width(&self) -> usize {
        self.0.width() as usize
    }

    pub fn channels(&self) -> usize {
        CHANNELS
    }

    /// `(height, width)`
    pub fn shape(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    pub fn is_empty(&self) -> bool {
        self.0.width() == 0 || self.0.height() == 0
    }

    pub fn as_rgb(&self) -> &RgbImage {
        &self.0
    }

    pub fn as_rgb_mut(&mut self) -> &mut RgbImage {
        &mut self.0
    }

    pub fn into_rgb(self) -> RgbImage {
        self.0
    }

    pub fn data(&self) -> &[u8] {
        self.0.as_raw()
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }

    /// Interleaved samples of one row.
    pub fn row(&self, row: usize) -> &[u8] {
        let stride = self.width() * CHANNELS;
        &self.data()[row * stride..(row + 1) * stride]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [u8] {
        let stride = self.width() * CHANNELS;
        &mut self.data_mut()[row * stride..(row + 1) * stride]
    }

    pub fn pixel(&self, row: usize, col: usize) -> [u8; CHANNELS] {
        self.0.get_pixel(col as u32, row as u32).0
    }

    pub fn set_pixel(&mut self, row: usize, col: usize, pixel: [u8; CHANNELS]) {
        self.0.put_pixel(col as u32, row as u32, Rgb(pixel));
    }

    /// Copies out the `height x width` block whose top-left corner is `(row, col)`.
    pub fn crop(&self, row: usize, col: usize, height: usize, width: usize) -> Result<Image> {
        if row + height > self.height() || col + width > self.width() {
            return Err(MosaicError::ShapeMismatch {
                expected: self.shape(),
                actual: (row + height, col + width),
            });
        }
        let view = imageops::crop_imm(&self.0, col as u32, row as u32, width as u32, height as u32);
        Ok(Self(view.to_image()))
    }

    /// Luma plane used for feature detection.
    pub fn to_gray(&self) -> GrayImage {
        imageops::grayscale(&self.0)
    }
}

impl From<RgbImage> for Image {
    fn from(image: RgbImage) -> Self {
        Self(image)
    }
}

/// Reads `(row, col)` with edge replication so kernels can run up to the border.
#[inline]
pub fn gray_at(image: &GrayImage, row: i64, col: i64) -> u8 {
    let r = row.clamp(0, image.height() as i64 - 1) as u32;
    let c = col.clamp(0, image.width() as i64 - 1) as u32;
    image.get_pixel(c, r).0[0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_from_raw_rejects_wrong_length() {
        for len in [11, 13] {
            let result = Image::from_raw(2, 2, vec![0; len]);
            assert!(matches!(result, Err(MosaicError::InvalidDimensions(2, 2))));
        }
    }

    #[test]
    fn test_row_col_addressing_matches_rgb_image() {
        let mut img = Image::new(2, 3);
        img.set_pixel(1, 2, [4, 5, 6]);
        assert_eq!(img.as_rgb().get_pixel(2, 1), &Rgb([4, 5, 6]));
        assert_eq!(&img.row(1)[6..9], &[4, 5, 6]);
    }

    #[test]
    fn test_crop_copies_block() {
        let mut img = Image::new(4, 4);
        img.set_pixel(1, 2, [10, 20, 30]);
        let crop = img.crop(1, 1, 2, 3).unwrap();
        assert_eq!(crop.shape(), (2, 3));
        assert_eq!(crop.pixel(0, 1), [10, 20, 30]);
        assert!(img.crop(3, 3, 2, 2).is_err());
    }

    #[test]
    fn test_gray_of_white_is_white() {
        let img = Image::filled(2, 2, [255, 255, 255]);
        assert!(img.to_gray().pixels().all(|p| p.0[0] == 255));
    }

    #[test]
    fn test_gray_at_replicates_edges() {
        let mut gray = GrayImage::new(3, 2);
        gray.put_pixel(2, 1, Luma([9]));
        assert_eq!(gray_at(&gray, 1, 2), 9);
        assert_eq!(gray_at(&gray, 5, 7), 9);
        assert_eq!(gray_at(&gray, -1, -1), 0);
    }
}
