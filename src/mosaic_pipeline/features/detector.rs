//! Corner detectors feeding the descriptor extractors.
//!
//! Both detectors finish the same way: 3x3 non-maximum suppression, a border
//! margin so every descriptor window stays inside the image, then the
//! strongest `max_features` by response. Ties are broken by raster order so
//! the output is a pure function of the pixels.

use imageproc::corners::corners_fast9;
use imageproc::gradients::{horizontal_sobel, vertical_sobel};

use crate::mosaic_pipeline::features::types::Keypoint;
use crate::mosaic_pipeline::frame::GrayImage;

/// FAST-9 segment-test corner detector.
#[derive(Debug, Clone)]
pub struct FastDetector {
    /// Intensity difference a circle pixel needs to count as brighter/darker.
    pub threshold: u8,
    pub max_features: usize,
    /// Keypoints closer than this to any border are discarded.
    pub margin: usize,
}

impl FastDetector {
    pub fn new(threshold: u8, max_features: usize, margin: usize) -> Self {
        Self {
            threshold,
            max_features,
            margin: margin.max(3),
        }
    }

    pub fn detect(&self, image: &GrayImage) -> Vec<Keypoint> {
        let (w, h) = (image.width() as usize, image.height() as usize);
        if h <= 2 * self.margin || w <= 2 * self.margin {
            return Vec::new();
        }

        let mut scores = vec![0f32; h * w];
        for corner in corners_fast9(image, self.threshold) {
            scores[corner.y as usize * w + corner.x as usize] = corner.score;
        }

        select_strongest(&scores, h, w, self.margin, self.max_features)
    }
}

/// Harris corner detector over Sobel gradients.
#[derive(Debug, Clone)]
pub struct HarrisDetector {
    /// Trace weight in `det(M) - k * trace(M)^2`.
    pub k: f32,
    /// Responses below `quality * max_response` are dropped.
    pub quality: f32,
    /// Structure-tensor window half size.
    pub window_radius: usize,
    pub max_features: usize,
    pub margin: usize,
}

impl HarrisDetector {
    pub fn new(max_features: usize, margin: usize) -> Self {
        Self {
            k: 0.04,
            quality: 0.01,
            window_radius: 2,
            max_features,
            margin: margin.max(1),
        }
    }

    /// Row-major Harris response, one value per pixel.
    pub fn corner_response(&self, image: &GrayImage) -> Vec<f32> {
        let (w, h) = (image.width() as usize, image.height() as usize);
        let gx = horizontal_sobel(image);
        let gy = vertical_sobel(image);

        let mut ixx = Vec::with_capacity(h * w);
        let mut iyy = Vec::with_capacity(h * w);
        let mut ixy = Vec::with_capacity(h * w);
        for (px, py) in gx.pixels().zip(gy.pixels()) {
            let (dx, dy) = (px.0[0] as f64, py.0[0] as f64);
            ixx.push(dx * dx);
            iyy.push(dy * dy);
            ixy.push(dx * dy);
        }

        let r = self.window_radius as i64;
        let k = self.k as f64;
        let mut response = vec![0f32; h * w];
        for row in 0..h as i64 {
            for col in 0..w as i64 {
                let (mut a, mut b, mut c) = (0f64, 0f64, 0f64);
                for dr in -r..=r {
                    for dc in -r..=r {
                        let rr = (row + dr).clamp(0, h as i64 - 1) as usize;
                        let cc = (col + dc).clamp(0, w as i64 - 1) as usize;
                        let i = rr * w + cc;
                        a += ixx[i];
                        b += iyy[i];
                        c += ixy[i];
                    }
                }
                let det = a * b - c * c;
                let trace = a + b;
                response[row as usize * w + col as usize] = (det - k * trace * trace) as f32;
            }
        }
        response
    }

    pub fn detect(&self, image: &GrayImage) -> Vec<Keypoint> {
        let (w, h) = (image.width() as usize, image.height() as usize);
        if h <= 2 * self.margin || w <= 2 * self.margin {
            return Vec::new();
        }
        let mut response = self.corner_response(image);

        let max = response.iter().copied().fold(0f32, f32::max);
        let floor = max * self.quality;
        for v in response.iter_mut() {
            if *v <= 0.0 || *v < floor {
                *v = 0.0;
            }
        }

        select_strongest(&response, h, w, self.margin, self.max_features)
    }
}

/// Non-maximum suppression plus strongest-first selection.
fn select_strongest(scores: &[f32], h: usize, w: usize, margin: usize, max: usize) -> Vec<Keypoint> {
    let mut keypoints = Vec::new();
    if h <= 2 * margin || w <= 2 * margin {
        return keypoints;
    }

    for row in margin..h - margin {
        for col in margin..w - margin {
            let s = scores[row * w + col];
            if s <= 0.0 || !is_local_max(scores, w, row, col) {
                continue;
            }
            keypoints.push(Keypoint { row, col, response: s });
        }
    }

    keypoints.sort_by(|a, b| {
        b.response
            .total_cmp(&a.response)
            .then(a.row.cmp(&b.row))
            .then(a.col.cmp(&b.col))
    });
    keypoints.truncate(max);
    keypoints
}

/// Strictly greater than later neighbours, at least equal to earlier ones,
/// so a plateau keeps exactly its first pixel in raster order.
fn is_local_max(scores: &[f32], w: usize, row: usize, col: usize) -> bool {
    let s = scores[row * w + col];
    for dr in -1i64..=1 {
        for dc in -1i64..=1 {
            if dr == 0 && dc == 0 {
                continue;
            }
            let n = scores[(row as i64 + dr) as usize * w + (col as i64 + dc) as usize];
            let earlier = dr < 0 || (dr == 0 && dc < 0);
            if n > s || (n == s && earlier) {
                return false;
            }
        }
    }
    true
}
