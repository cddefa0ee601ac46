//! FAST-9 segment test.
//!
//! A pixel passes when 9 contiguous pixels on the 16-pixel Bresenham circle
//! of radius 3 are all brighter, or all darker, than the center by more
//! than the intensity threshold. Passing pixels are then ranked by the
//! structure-tensor strength, so both methods share one quality threshold.

use serde::{Deserialize, Serialize};

use crate::frame::{RawImage, Roi};

/// Radius of the segment-test circle.
pub const FAST_RADIUS: u32 = 3;

/// Circle offsets, clockwise from the top.
const CIRCLE: [(i32, i32); 16] = [
    (0, -3),
    (1, -3),
    (2, -2),
    (3, -1),
    (3, 0),
    (3, 1),
    (2, 2),
    (1, 3),
    (0, 3),
    (-1, 3),
    (-2, 2),
    (-3, 1),
    (-3, 0),
    (-3, -1),
    (-2, -2),
    (-1, -3),
];

const MIN_ARC: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FastConfig {
    /// Intensity difference between center and circle pixels.
    pub intensity_threshold: u8,
}

impl Default for FastConfig {
    fn default() -> Self {
        Self {
            intensity_threshold: 20,
        }
    }
}

/// Segment-test mask over `region` (row-major, same layout as the score map).
///
/// `region` must stay [`FAST_RADIUS`] pixels inside the image.
pub fn segment_test_mask(image: &RawImage, region: Roi, config: &FastConfig) -> Vec<bool> {
    let mut mask = Vec::with_capacity(region.area() as usize);
    for y in region.y..region.y_end() {
        for x in region.x..region.x_end() {
            mask.push(is_fast_corner(image, x, y, config.intensity_threshold));
        }
    }
    mask
}

fn is_fast_corner(image: &RawImage, x: u32, y: u32, threshold: u8) -> bool {
    let center = image.intensity(x, y) as i16;
    let t = threshold as i16;
    let ring: [i16; 16] = std::array::from_fn(|i| {
        let (dx, dy) = CIRCLE[i];
        image.intensity((x as i32 + dx) as u32, (y as i32 + dy) as u32) as i16
    });

    // Quick rejection on the four compass points: a 9-arc covers at least 2.
    let compass = [ring[0], ring[4], ring[8], ring[12]];
    let brighter = compass.iter().filter(|&&p| p > center + t).count();
    let darker = compass.iter().filter(|&&p| p < center - t).count();
    if brighter < 2 && darker < 2 {
        return false;
    }

    longest_arc(&ring, |p| p > center + t) >= MIN_ARC
        || longest_arc(&ring, |p| p < center - t) >= MIN_ARC
}

/// Longest run of ring pixels satisfying `pred`, wrapping around.
fn longest_arc(ring: &[i16; 16], pred: impl Fn(i16) -> bool) -> usize {
    let mut best = 0;
    let mut run = 0;
    for i in 0..32 {
        if pred(ring[i % 16]) {
            run += 1;
            best = best.max(run);
        } else {
            run = 0;
        }
    }
    best.min(16)
}
