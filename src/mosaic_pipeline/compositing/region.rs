use crate::mosaic_pipeline::registration::FrameBounds;

/// Bounding box of everything painted so far. Half-open: rows
/// `north..south`, cols `west..east`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsedRegion {
    pub north: i64,
    pub south: i64,
    pub east: i64,
    pub west: i64,
}

impl UsedRegion {
    pub fn from_bounds(bounds: &FrameBounds) -> Self {
        Self {
            north: bounds.row_start,
            south: bounds.row_end,
            east: bounds.col_end,
            west: bounds.col_start,
        }
    }

    /// Smallest region covering both `self` and `bounds`. Never shrinks.
    pub fn envelope(&self, bounds: &FrameBounds) -> Self {
        Self {
            north: self.north.min(bounds.row_start),
            south: self.south.max(bounds.row_end),
            east: self.east.max(bounds.col_end),
            west: self.west.min(bounds.col_start),
        }
    }

    pub fn contains(&self, other: &UsedRegion) -> bool {
        self.north <= other.north && self.west <= other.west && self.south >= other.south && self.east >= other.east
    }

    pub fn height(&self) -> usize {
        (self.south - self.north).max(0) as usize
    }

    pub fn width(&self) -> usize {
        (self.east - self.west).max(0) as usize
    }

    pub fn to_bounds(&self) -> FrameBounds {
        FrameBounds {
            row_start: self.north,
            row_end: self.south,
            col_start: self.west,
            col_end: self.east,
        }
    }

    /// Remaining room between the region and each canvas edge.
    pub fn edge_distances(&self, canvas_height: usize, canvas_width: usize) -> EdgeDistances {
        EdgeDistances {
            north: self.north,
            east: canvas_width as i64 - self.east,
            south: canvas_height as i64 - self.south,
            west: self.west,
        }
    }
}

/// Pixels left before the mosaic runs off each canvas edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeDistances {
    pub north: i64,
    pub east: i64,
    pub south: i64,
    pub west: i64,
}

impl std::fmt::Display for EdgeDistances {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Distances from Edge: N: {}, E: {}, S: {}, W: {}",
            self.north, self.east, self.south, self.west
        )
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

    #[test]
    fn test_envelope_grows_outward() {
        let region = UsedRegion::from_bounds(&bounds(100, 100, 50, 50));
        let grown = region.envelope(&bounds(110, 105, 50, 50));
        assert_eq!(grown, UsedRegion { north: 100, south: 160, east: 155, west: 100 });
        assert!(grown.contains(&region));
    }

    #[test]
    fn test_envelope_of_interior_frame_is_unchanged() {
        let region = UsedRegion::from_bounds(&bounds(0, 0, 100, 100));
        assert_eq!(region.envelope(&bounds(10, 10, 20, 20)), region);
    }

    #[test]
    fn test_edge_distances() {
        let region = UsedRegion::from_bounds(&bounds(10, 20, 30, 40));
        let d = region.edge_distances(100, 200);
        assert_eq!(d, EdgeDistances { north: 10, east: 140, south: 60, west: 20 });
        assert_eq!(d.to_string(), "Distances from Edge: N: 10, E: 140, S: 60, W: 20");
    }
}
