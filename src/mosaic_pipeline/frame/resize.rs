use image::{Rgb, RgbImage};

use crate::mosaic_pipeline::frame::types::{Image, CHANNELS};

/// Resamples `image` to `height x width` by averaging the source block each
/// output pixel covers.
///
/// When the source is an exact multiple of the target, output pixel `(r, c)`
/// is the rounded mean of source rows `r * f..(r + 1) * f` and the matching
/// columns, so a crop taken on a block boundary downsamples to the same
/// pixels as the corresponding crop of the downsampled whole. Upscaling
/// degenerates to nearest-neighbour.
pub fn resize_area(image: &Image, height: usize, width: usize) -> Image {
    if image.is_empty() || height == 0 || width == 0 {
        return Image::new(height, width);
    }
    let src = image.as_rgb();
    let (src_w, src_h) = src.dimensions();
    let col_spans: Vec<(u32, u32)> = (0..width as u32).map(|c| span(c, src_w, width as u32)).collect();
    let row_spans: Vec<(u32, u32)> = (0..height as u32).map(|r| span(r, src_h, height as u32)).collect();

    let out = RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let (r0, r1) = row_spans[y as usize];
        let (c0, c1) = col_spans[x as usize];
        let mut sums = [0u32; CHANNELS];
        for sy in r0..r1 {
            for sx in c0..c1 {
                for (sum, v) in sums.iter_mut().zip(src.get_pixel(sx, sy).0) {
                    *sum += v as u32;
                }
            }
        }
        let n = (r1 - r0) * (c1 - c0);
        Rgb(sums.map(|s| ((s + n / 2) / n) as u8))
    });
    Image::from(out)
}

/// Half-open source range covered by destination index `i`.
fn span(i: u32, src: u32, dst: u32) -> (u32, u32) {
    let (i, src64, dst) = (i as u64, src as u64, dst as u64);
    let start = (i * src64 / dst).min(src64 - 1);
    let end = ((i + 1) * src64 / dst).max(start + 1).min(src64);
    (start as u32, end as u32)
}
