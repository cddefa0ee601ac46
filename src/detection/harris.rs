//! Corner strength from the local structure tensor.
//!
//! For every pixel of the search region the gradient products are summed
//! over a square window and the smaller eigenvalue of
//!
//! ```text
//! M = 1/n | ΣIx²   ΣIxIy |
//!         | ΣIxIy  ΣIy²  |
//! ```
//!
//! is used as the strength. Straight edges score zero (one eigenvalue
//! vanishes), flat regions score zero, corners score high. Normalizing by
//! the window area `n` keeps the threshold in intensity² units independent
//! of the window size.

use serde::{Deserialize, Serialize};

use crate::frame::{RawImage, Roi};

/// Parameters of the corner-strength search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarrisConfig {
    /// Side length of the structure-tensor window (odd, >= 3).
    pub window: u32,
    /// Minimum strength for a pixel to be a candidate (strictly above).
    pub threshold: f64,
}

impl Default for HarrisConfig {
    fn default() -> Self {
        Self {
            window: 5,
            threshold: 10.0,
        }
    }
}

impl HarrisConfig {
    pub fn half_window(&self) -> u32 {
        self.window / 2
    }

    /// Pixels needed between a scored pixel and the image border
    /// (window half-width plus one for the central difference).
    pub fn border(&self) -> u32 {
        self.half_window() + 1
    }
}

/// A scored candidate position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub x: u32,
    pub y: u32,
    pub score: f64,
}

/// Corner strength for every pixel of a region.
pub struct ScoreMap {
    region: Roi,
    scores: Vec<f64>,
}

impl ScoreMap {
    /// Score every pixel of `region`.
    ///
    /// The caller must keep `region` at least [`HarrisConfig::border`] pixels
    /// away from the image border.
    pub fn compute(image: &RawImage, region: Roi, half: u32) -> Self {
        let side = 2 * half + 1;
        let ex0 = region.x - half;
        let ey0 = region.y - half;
        let ew = (region.width + 2 * half) as usize;
        let eh = (region.height + 2 * half) as usize;

        let mut ixx = vec![0.0f64; ew * eh];
        let mut iyy = vec![0.0f64; ew * eh];
        let mut ixy = vec![0.0f64; ew * eh];
        for j in 0..eh {
            let y = ey0 + j as u32;
            for i in 0..ew {
                let x = ex0 + i as u32;
                let gx = (image.intensity(x + 1, y) as f64 - image.intensity(x - 1, y) as f64) * 0.5;
                let gy = (image.intensity(x, y + 1) as f64 - image.intensity(x, y - 1) as f64) * 0.5;
                let idx = j * ew + i;
                ixx[idx] = gx * gx;
                iyy[idx] = gy * gy;
                ixy[idx] = gx * gy;
            }
        }

        let n = (side * side) as f64;
        let mut scores = Vec::with_capacity(region.area() as usize);
        for ry in 0..region.height as usize {
            for rx in 0..region.width as usize {
                let (mut a, mut c, mut b) = (0.0, 0.0, 0.0);
                for dj in 0..side as usize {
                    let row = (ry + dj) * ew + rx;
                    for di in 0..side as usize {
                        a += ixx[row + di];
                        c += iyy[row + di];
                        b += ixy[row + di];
                    }
                }
                scores.push(min_eigenvalue(a / n, b / n, c / n));
            }
        }

        Self { region, scores }
    }

    /// Strength at image pixel `(x, y)`, which must lie inside the region.
    pub fn get(&self, x: u32, y: u32) -> f64 {
        let rx = (x - self.region.x) as usize;
        let ry = (y - self.region.y) as usize;
        self.scores[ry * self.region.width as usize + rx]
    }

    /// Pixels scoring strictly above `threshold` that are not beaten by any
    /// 8-neighbour inside the region.
    ///
    /// With a `mask`, only masked pixels are candidates and only masked
    /// neighbours take part in the suppression.
    pub fn local_maxima(&self, threshold: f64, mask: Option<&[bool]>) -> Vec<Candidate> {
        let w = self.region.width as i64;
        let h = self.region.height as i64;
        let allowed = |idx: usize| mask.map_or(true, |m| m[idx]);

        let mut out = Vec::new();
        for ry in 0..h {
            for rx in 0..w {
                let idx = (ry * w + rx) as usize;
                let s = self.scores[idx];
                if !(s > threshold) || !allowed(idx) {
                    continue;
                }

                let mut is_max = true;
                'nbr: for dy in -1..=1i64 {
                    for dx in -1..=1i64 {
                        let (nx, ny) = (rx + dx, ry + dy);
                        if (dx == 0 && dy == 0) || nx < 0 || ny < 0 || nx >= w || ny >= h {
                            continue;
                        }
                        let nidx = (ny * w + nx) as usize;
                        if allowed(nidx) && self.scores[nidx] > s {
                            is_max = false;
                            break 'nbr;
                        }
                    }
                }

                if is_max {
                    out.push(Candidate {
                        x: self.region.x + rx as u32,
                        y: self.region.y + ry as u32,
                        score: s,
                    });
                }
            }
        }
        out
    }
}

/// Smaller eigenvalue of the symmetric matrix `[[a, b], [b, c]]`.
#[inline]
fn min_eigenvalue(a: f64, b: f64, c: f64) -> f64 {
    let mean = 0.5 * (a + c);
    let diff = 0.5 * (a - c);
    mean - (diff * diff + b * b).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use image::{GrayImage, Luma};

    fn square_image() -> RawImage {
        // Bright square with its top-left corner at (30, 20).
        RawImage::new(
            GrayImage::from_fn(80, 60, |x, y| {
                if (30..60).contains(&x) && (20..50).contains(&y) {
                    Luma([200])
                } else {
                    Luma([50])
                }
            }),
            0,
        )
    }

    #[test]
    fn test_min_eigenvalue() {
        assert_relative_eq!(min_eigenvalue(4.0, 0.0, 1.0), 1.0);
        assert_relative_eq!(min_eigenvalue(2.0, 1.0, 2.0), 1.0);
        assert_relative_eq!(min_eigenvalue(3.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_flat_and_edge_score_zero() {
        let img = square_image();
        let map = ScoreMap::compute(&img, Roi::new(5, 5, 70, 50), 2);

        // Flat background.
        assert!(map.get(10, 10).abs() < 1e-9);
        // Middle of the left edge.
        assert!(map.get(30, 35).abs() < 1e-9);
        // Corner.
        assert!(map.get(31, 21) > 100.0);
    }

    #[test]
    fn test_local_maxima_at_corners() {
        let img = square_image();
        let map = ScoreMap::compute(&img, Roi::new(5, 5, 70, 50), 2);
        let maxima = map.local_maxima(10.0, None);

        let corners = [(30.0, 20.0), (59.0, 20.0), (30.0, 49.0), (59.0, 49.0)];
        assert!(!maxima.is_empty());
        for c in &maxima {
            let near = corners.iter().any(|(cx, cy)| {
                ((c.x as f64 - cx).powi(2) + (c.y as f64 - cy).powi(2)).sqrt() <= 3.0
            });
            assert!(near, "unexpected maximum at ({}, {})", c.x, c.y);
        }
        for (cx, cy) in corners {
            assert!(maxima.iter().any(|c| {
                ((c.x as f64 - cx).powi(2) + (c.y as f64 - cy).powi(2)).sqrt() <= 3.0
            }));
        }
    }

    #[test]
    fn test_mask_restricts_candidates() {
        let img = square_image();
        let region = Roi::new(5, 5, 70, 50);
        let map = ScoreMap::compute(&img, region, 2);
        let mask = vec![false; region.area() as usize];

        assert!(map.local_maxima(10.0, Some(&mask)).is_empty());
    }
}
