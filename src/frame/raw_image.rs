//! Raw camera frame and region-of-interest rectangles.

use image::GrayImage;

/// Axis-aligned rectangle in pixel coordinates, `[x, x + width) × [y, y + height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Roi {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Roi {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering a whole `width × height` image.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn x_end(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    pub fn y_end(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.x_end() && y >= self.y && y < self.y_end()
    }

    /// Overlap of two rectangles, `None` when they do not intersect.
    pub fn intersect(&self, other: &Roi) -> Option<Roi> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.x_end().min(other.x_end());
        let y1 = self.y_end().min(other.y_end());
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Roi::new(x0, y0, x1 - x0, y1 - y0))
    }

    /// Remove `margin` pixels from every side.
    pub fn shrink(&self, margin: u32) -> Option<Roi> {
        let twice = margin.saturating_mul(2);
        if self.width <= twice || self.height <= twice {
            return None;
        }
        Some(Roi::new(
            self.x + margin,
            self.y + margin,
            self.width - twice,
            self.height - twice,
        ))
    }
}

/// One sensor frame's pixels for the current cycle.
///
/// Owned by the sensor collaborator. Detection only ever borrows it.
#[derive(Debug, Clone)]
pub struct RawImage {
    pixels: GrayImage,
    pub timestamp_ns: u64,
}

impl RawImage {
    pub fn new(pixels: GrayImage, timestamp_ns: u64) -> Self {
        Self {
            pixels,
            timestamp_ns,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Rectangle covering the whole frame.
    pub fn bounds(&self) -> Roi {
        Roi::full(self.width(), self.height())
    }

    /// Intensity at `(x, y)`. Caller guarantees the coordinates are in bounds.
    #[inline]
    pub fn intensity(&self, x: u32, y: u32) -> u8 {
        self.pixels.get_pixel(x, y).0[0]
    }

    pub fn pixels(&self) -> &GrayImage {
        &self.pixels
    }
}
