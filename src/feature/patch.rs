//! Square appearance window cropped around an image point.

use image::{GrayImage, Luma};

use crate::frame::RawImage;

/// `size × size` grayscale patch. `size` is odd so the patch has a center pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct AppearancePatch {
    pixels: GrayImage,
}

impl AppearancePatch {
    /// Zero-filled patch, as allocated by a maker before detection fills it.
    pub fn blank(size: u32) -> Self {
        Self {
            pixels: GrayImage::new(size, size),
        }
    }

    /// Crop the window centered on `(cx, cy)`. Returns `None` if any part of
    /// it falls outside the image.
    pub fn crop(image: &RawImage, cx: u32, cy: u32, size: u32) -> Option<Self> {
        let half = size / 2;
        if cx < half || cy < half {
            return None;
        }
        let x0 = cx - half;
        let y0 = cy - half;
        if x0 + size > image.width() || y0 + size > image.height() {
            return None;
        }

        let pixels = GrayImage::from_fn(size, size, |x, y| Luma([image.intensity(x0 + x, y0 + y)]));
        Some(Self { pixels })
    }

    /// Side length in pixels.
    pub fn size(&self) -> u32 {
        self.pixels.width()
    }

    pub fn pixels(&self) -> &GrayImage {
        &self.pixels
    }

    /// Zero-mean normalized cross-correlation in `[-1, 1]`.
    ///
    /// `None` when the sizes differ or either patch is uniform.
    pub fn zncc(&self, other: &AppearancePatch) -> Option<f64> {
        if self.size() != other.size() {
            return None;
        }
        let n = (self.size() * self.size()) as f64;
        let a: Vec<f64> = self.pixels.pixels().map(|p| p.0[0] as f64).collect();
        let b: Vec<f64> = other.pixels.pixels().map(|p| p.0[0] as f64).collect();
        let mean_a = a.iter().sum::<f64>() / n;
        let mean_b = b.iter().sum::<f64>() / n;

        let mut cov = 0.0;
        let mut var_a = 0.0;
        let mut var_b = 0.0;
        for (pa, pb) in a.iter().zip(&b) {
            let da = pa - mean_a;
            let db = pb - mean_b;
            cov += da * db;
            var_a += da * da;
            var_b += db * db;
        }

        let denom = (var_a * var_b).sqrt();
        if denom < 1e-12 {
            return None;
        }
        Some(cov / denom)
    }
}
