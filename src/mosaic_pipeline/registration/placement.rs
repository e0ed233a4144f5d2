use crate::mosaic_pipeline::registration::offset::Displacement;

/// Top-left canvas coordinate of an inserted frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub row: i64,
    pub col: i64,
}

impl Placement {
    pub fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }
}

/// Half-open canvas rectangle a frame is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameBounds {
    pub row_start: i64,
    pub row_end: i64,
    pub col_start: i64,
    pub col_end: i64,
}

impl FrameBounds {
    pub fn start(&self) -> Placement {
        Placement::new(self.row_start, self.col_start)
    }

    pub fn height(&self) -> usize {
        (self.row_end - self.row_start).max(0) as usize
    }

    pub fn width(&self) -> usize {
        (self.col_end - self.col_start).max(0) as usize
    }
}

/// Where the next `rows x cols` frame goes, given the previous frame's
/// placement and the full-resolution displacement between them. May lie
/// outside the canvas; callers bounds-check.
pub fn compute_placement(previous: Placement, offset: Displacement, rows: usize, cols: usize) -> FrameBounds {
    let row_start = previous.row + offset.row;
    let col_start = previous.col + offset.col;
    FrameBounds {
        row_start,
        row_end: row_start + rows as i64,
        col_start,
        col_end: col_start + cols as i64,
    }
}

/// Placement that puts a `rows x cols` frame in the middle of the canvas.
pub fn centered_placement(canvas_height: usize, canvas_width: usize, rows: usize, cols: usize) -> Placement {
    Placement::new(
        (canvas_height / 2) as i64 - (rows / 2) as i64,
        (canvas_width / 2) as i64 - (cols / 2) as i64,
    )
}
