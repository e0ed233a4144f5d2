use image::Rgb;
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::mosaic_pipeline::frame::types::{Image, CHANNELS};

/// Draws an axis-aligned outline `thickness` pixels wide, growing inward.
/// Rows `top..bottom`, cols `left..right` (half-open), clipped to the image.
pub fn draw_rectangle(
    image: &mut Image,
    top: i64,
    left: i64,
    bottom: i64,
    right: i64,
    color: [u8; CHANNELS],
    thickness: usize,
) {
    let canvas = image.as_rgb_mut();
    for inset in 0..thickness.max(1) as i64 {
        let (height, width) = (bottom - top - 2 * inset, right - left - 2 * inset);
        if height <= 0 || width <= 0 {
            break;
        }
        let rect = Rect::at((left + inset) as i32, (top + inset) as i32).of_size(width as u32, height as u32);
        draw_hollow_rect_mut(canvas, rect, Rgb(color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_leaves_interior() {
        let mut img = Image::new(5, 5);
        draw_rectangle(&mut img, 0, 0, 5, 5, [0, 255, 0], 1);
        assert_eq!(img.pixel(0, 2), [0, 255, 0]);
        assert_eq!(img.pixel(4, 4), [0, 255, 0]);
        assert_eq!(img.pixel(2, 2), [0, 0, 0]);
    }

    #[test]
    fn test_clips_outside_image() {
        let mut img = Image::new(3, 3);
        draw_rectangle(&mut img, -2, -2, 10, 10, [1, 2, 3], 1);
        assert_eq!(img, Image::new(3, 3));
    }

    #[test]
    fn test_thickness_grows_inward() {
        let mut img = Image::new(6, 6);
        draw_rectangle(&mut img, 0, 0, 6, 6, [7, 7, 7], 2);
        assert_eq!(img.pixel(1, 1), [7, 7, 7]);
        assert_eq!(img.pixel(4, 3), [7, 7, 7]);
        assert_eq!(img.pixel(2, 2), [0, 0, 0]);
        assert_eq!(img.pixel(3, 3), [0, 0, 0]);
    }
}
