//! Detected image points and the maker-allocated features they populate.

use nalgebra::Point2;

use crate::error::{FrontendError, Result};
use crate::feature::patch::AppearancePatch;

/// A point returned by the detector: position, corner strength and the
/// appearance window cropped around it.
#[derive(Debug, Clone, PartialEq)]
pub struct FeaturePoint {
    /// Pixel position (column, row).
    pub pixel: Point2<f64>,
    /// Corner strength that won the search.
    pub score: f64,
    pub patch: AppearancePatch,
}

impl FeaturePoint {
    pub fn patch_size(&self) -> u32 {
        self.patch.size()
    }
}

/// Image-point feature attached to a new landmark.
///
/// Allocated empty by a maker with that maker's patch size, then filled from
/// a [`FeaturePoint`] with [`FeatureImagePoint::assign`].
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureImagePoint {
    pub measurement: Point2<f64>,
    pub score: f64,
    appearance: AppearancePatch,
}

impl FeatureImagePoint {
    pub fn new(patch_size: u32) -> Self {
        Self {
            measurement: Point2::origin(),
            score: 0.0,
            appearance: AppearancePatch::blank(patch_size),
        }
    }

    pub fn patch_size(&self) -> u32 {
        self.appearance.size()
    }

    pub fn appearance(&self) -> &AppearancePatch {
        &self.appearance
    }

    /// Take over a detection result.
    ///
    /// A detector configured with a different window than the maker that
    /// allocated this feature is a wiring bug, reported as
    /// [`FrontendError::PatchSizeMismatch`].
    pub fn assign(&mut self, detected: FeaturePoint) -> Result<()> {
        if detected.patch_size() != self.patch_size() {
            return Err(FrontendError::PatchSizeMismatch {
                expected: self.patch_size(),
                actual: detected.patch_size(),
            });
        }
        self.measurement = detected.pixel;
        self.score = detected.score;
        self.appearance = detected.patch;
        Ok(())
    }
}
