//! Sparse, tile-backed mosaic canvas.
//!
//! The canvas has a fixed logical extent, which is what placements are
//! checked against, but pixel storage is allocated per tile on first write.
//! Unallocated tiles read back as zeros ("unpainted").

use std::collections::HashMap;

use tracing::trace;

use crate::mosaic_pipeline::common::error::{MosaicError, Result};
use crate::mosaic_pipeline::frame::{Image, CHANNELS};
use crate::mosaic_pipeline::registration::FrameBounds;

pub const DEFAULT_TILE_SIZE: usize = 512;

#[derive(Debug, Clone)]
pub struct Canvas {
    height: usize,
    width: usize,
    tile_size: usize,
    tiles: HashMap<(usize, usize), Vec<u8>>,
}

impl Canvas {
    pub fn new(height: usize, width: usize) -> Self {
        Self::with_tile_size(height, width, DEFAULT_TILE_SIZE)
    }

    pub fn with_tile_size(height: usize, width: usize, tile_size: usize) -> Self {
        Self {
            height,
            width,
            tile_size: tile_size.max(1),
            tiles: HashMap::new(),
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn tile_size(&self) -> usize {
        self.tile_size
    }

    pub fn allocated_tiles(&self) -> usize {
        self.tiles.len()
    }

    /// Drops every tile; the canvas reads as all zeros afterwards.
    pub fn clear(&mut self) {
        self.tiles.clear();
    }

    /// Fails with `OutOfBounds` unless `bounds` lies entirely on the canvas.
    pub fn check_bounds(&self, bounds: &FrameBounds) -> Result<()> {
        let inside = bounds.row_start >= 0
            && bounds.col_start >= 0
            && bounds.row_start <= bounds.row_end
            && bounds.col_start <= bounds.col_end
            && bounds.row_end <= self.height as i64
            && bounds.col_end <= self.width as i64;
        if inside {
            Ok(())
        } else {
            Err(MosaicError::OutOfBounds {
                row_start: bounds.row_start,
                row_end: bounds.row_end,
                col_start: bounds.col_start,
                col_end: bounds.col_end,
                canvas_height: self.height,
                canvas_width: self.width,
            })
        }
    }

    pub fn read_region(&self, bounds: &FrameBounds) -> Result<Image> {
        self.check_bounds(bounds)?;
        let (h, w) = (bounds.height(), bounds.width());
        let ts = self.tile_size;
        let mut out = Image::new(h, w);

        for r in 0..h {
            let canvas_row = bounds.row_start as usize + r;
            let (tile_row, inner_row) = (canvas_row / ts, canvas_row % ts);
            let dst = out.row_mut(r);
            let mut c = 0;
            while c < w {
                let canvas_col = bounds.col_start as usize + c;
                let (tile_col, inner_col) = (canvas_col / ts, canvas_col % ts);
                let len = (ts - inner_col).min(w - c);
                if let Some(tile) = self.tiles.get(&(tile_row, tile_col)) {
                    let src = (inner_row * ts + inner_col) * CHANNELS;
                    dst[c * CHANNELS..(c + len) * CHANNELS].copy_from_slice(&tile[src..src + len * CHANNELS]);
                }
                c += len;
            }
        }
        Ok(out)
    }

    /// Overwrites `bounds` with `image`, allocating tiles as needed.
    pub fn write_region(&mut self, bounds: &FrameBounds, image: &Image) -> Result<()> {
        self.check_bounds(bounds)?;
        let (h, w) = (bounds.height(), bounds.width());
        if image.shape() != (h, w) {
            return Err(MosaicError::ShapeMismatch {
                expected: (h, w),
                actual: image.shape(),
            });
        }
        let ts = self.tile_size;

        for r in 0..h {
            let canvas_row = bounds.row_start as usize + r;
            let (tile_row, inner_row) = (canvas_row / ts, canvas_row % ts);
            let src = image.row(r);
            let mut c = 0;
            while c < w {
                let canvas_col = bounds.col_start as usize + c;
                let (tile_col, inner_col) = (canvas_col / ts, canvas_col % ts);
                let len = (ts - inner_col).min(w - c);
                let tile = self.tiles.entry((tile_row, tile_col)).or_insert_with(|| {
                    trace!(tile_row, tile_col, "Allocating canvas tile");
                    vec![0; ts * ts * CHANNELS]
                });
                let dst = (inner_row * ts + inner_col) * CHANNELS;
                tile[dst..dst + len * CHANNELS].copy_from_slice(&src[c * CHANNELS..(c + len) * CHANNELS]);
                c += len;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(row_start: i64, col_start: i64, rows: i64, cols: i64) -> FrameBounds {
        FrameBounds {
            row_start,
            row_end: row_start + rows,
            col_start,
            col_end: col_start + cols,
        }
    }

    fn patterned(h: usize, w: usize) -> Image {
        let mut img = Image::new(h, w);
        for r in 0..h {
            for c in 0..w {
                img.set_pixel(r, c, [(r + 1) as u8, (c + 1) as u8, 7]);
            }
        }
        img
    }

    #[test]
    fn test_unwritten_canvas_reads_zero() {
        let canvas = Canvas::with_tile_size(100, 100, 16);
        let region = canvas.read_region(&bounds(10, 10, 20, 20)).unwrap();
        assert_eq!(region, Image::new(20, 20));
        assert_eq!(canvas.allocated_tiles(), 0);
    }

    #[test]
    fn test_write_across_tile_seams_reads_back() {
        let mut canvas = Canvas::with_tile_size(100, 100, 8);
        let img = patterned(13, 21);
        let b = bounds(5, 3, 13, 21);
        canvas.write_region(&b, &img).unwrap();
        assert_eq!(canvas.read_region(&b).unwrap(), img);
        // rows 5..18 span tiles 0..=2, cols 3..24 span tiles 0..=2
        assert_eq!(canvas.allocated_tiles(), 9);
    }

    #[test]
    fn test_partial_read_sees_neighbouring_zeros() {
        let mut canvas = Canvas::with_tile_size(50, 50, 8);
        canvas.write_region(&bounds(10, 10, 2, 2), &Image::filled(2, 2, [1, 1, 1])).unwrap();
        let region = canvas.read_region(&bounds(9, 9, 4, 4)).unwrap();
        assert_eq!(region.pixel(0, 0), [0, 0, 0]);
        assert_eq!(region.pixel(1, 1), [1, 1, 1]);
        assert_eq!(region.pixel(3, 3), [0, 0, 0]);
    }

    #[test]
    fn test_out_of_bounds_rejected_before_write() {
        let mut canvas = Canvas::with_tile_size(20, 20, 8);
        let img = Image::filled(5, 5, [1, 1, 1]);
        for b in [bounds(-1, 0, 5, 5), bounds(0, -3, 5, 5), bounds(16, 0, 5, 5), bounds(0, 16, 5, 5)] {
            let result = canvas.write_region(&b, &img);
            assert!(matches!(result, Err(MosaicError::OutOfBounds { .. })));
        }
        assert_eq!(canvas.allocated_tiles(), 0);
        assert!(canvas.write_region(&bounds(15, 15, 5, 5), &img).is_ok());
    }

    #[test]
    fn test_write_shape_mismatch() {
        let mut canvas = Canvas::new(20, 20);
        let result = canvas.write_region(&bounds(0, 0, 4, 4), &Image::new(4, 5));
        assert!(matches!(result, Err(MosaicError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_clear_forgets_everything() {
        let mut canvas = Canvas::with_tile_size(20, 20, 8);
        canvas.write_region(&bounds(0, 0, 4, 4), &Image::filled(4, 4, [3, 3, 3])).unwrap();
        canvas.clear();
        assert_eq!(canvas.allocated_tiles(), 0);
        assert_eq!(canvas.read_region(&bounds(0, 0, 4, 4)).unwrap(), Image::new(4, 4));
    }
}
