//! Interest-point search over a raw frame.
//!
//! [`FeatureDetector::detect`] looks for the strongest corner inside an
//! optional region of interest, skips candidates too close to landmarks the
//! caller says are already mapped, and returns a [`FeaturePoint`] with an
//! appearance patch cropped around the winner.
//!
//! Outcomes:
//! - `Ok(Some(point))` - a new candidate
//! - `Ok(None)` - nothing qualified (flat image, empty ROI, all excluded)
//! - `Err(UnsupportedDetectionMethod)` - method not enabled on this detector

pub mod fast;
pub mod harris;
pub mod method;
pub mod selection;

use nalgebra::Point2;
use tracing::{debug, trace};

use crate::config::DetectorConfig;
use crate::error::{FrontendError, Result};
use crate::feature::{AppearancePatch, FeaturePoint};
use crate::frame::{RawImage, Roi};

pub use fast::{FAST_RADIUS, FastConfig};
pub use harris::{Candidate, HarrisConfig, ScoreMap};
pub use method::DetectionMethod;
pub use selection::ExclusionZone;

/// Per-call search parameters.
#[derive(Debug, Clone, Copy)]
pub struct DetectionRequest<'a> {
    /// Restrict the search to this rectangle; whole image when `None`.
    pub roi: Option<Roi>,
    /// Side of the appearance patch to crop around the winner.
    pub patch_size: u32,
    pub exclusion: ExclusionZone<'a>,
}

impl<'a> DetectionRequest<'a> {
    pub fn new(roi: Option<Roi>, patch_size: u32, exclusion: ExclusionZone<'a>) -> Self {
        Self {
            roi,
            patch_size,
            exclusion,
        }
    }
}

/// Corner detector holding the parameters of every enabled method.
///
/// Stateless between calls, so one instance can serve several sensors
/// concurrently.
#[derive(Debug, Clone)]
pub struct FeatureDetector {
    methods: Vec<DetectionMethod>,
    harris: HarrisConfig,
    fast: FastConfig,
    max_candidates: usize,
}

impl FeatureDetector {
    pub fn new(
        methods: &[DetectionMethod],
        harris: HarrisConfig,
        fast: FastConfig,
        max_candidates: usize,
    ) -> Result<Self> {
        if harris.window < 3 || harris.window % 2 == 0 {
            return Err(FrontendError::InvalidConfig(format!(
                "harris window must be odd and >= 3, got {}",
                harris.window
            )));
        }
        if !harris.threshold.is_finite() || harris.threshold < 0.0 {
            return Err(FrontendError::InvalidConfig(format!(
                "harris threshold must be finite and >= 0, got {}",
                harris.threshold
            )));
        }
        if max_candidates == 0 {
            return Err(FrontendError::InvalidConfig(
                "max_candidates must be positive".to_string(),
            ));
        }

        let mut enabled = Vec::new();
        for m in methods {
            if !enabled.contains(m) {
                enabled.push(*m);
            }
        }
        debug!(methods = ?enabled, window = harris.window, threshold = harris.threshold, "feature detector ready");

        Ok(Self {
            methods: enabled,
            harris,
            fast,
            max_candidates,
        })
    }

    /// Build from configuration; unknown method names are rejected here,
    /// at startup, rather than on the first frame.
    pub fn from_config(config: &DetectorConfig) -> Result<Self> {
        let methods = config
            .methods
            .iter()
            .map(|name| name.parse::<DetectionMethod>())
            .collect::<Result<Vec<_>>>()?;
        Self::new(&methods, config.harris, config.fast, config.max_candidates)
    }

    pub fn is_enabled(&self, method: DetectionMethod) -> bool {
        self.methods.contains(&method)
    }

    pub fn methods(&self) -> &[DetectionMethod] {
        &self.methods
    }

    /// Look for the best new point in `image`.
    pub fn detect(
        &self,
        method: DetectionMethod,
        image: &RawImage,
        request: &DetectionRequest<'_>,
    ) -> Result<Option<FeaturePoint>> {
        if !self.is_enabled(method) {
            return Err(FrontendError::UnsupportedDetectionMethod(method.to_string()));
        }

        let Some(region) = self.search_region(image, request) else {
            trace!(?request.roi, "search region empty after border margin");
            return Ok(None);
        };

        let scores = ScoreMap::compute(image, region, self.harris.half_window());
        let candidates = match method {
            DetectionMethod::Harris => scores.local_maxima(self.harris.threshold, None),
            DetectionMethod::Fast => {
                let mask = fast::segment_test_mask(image, region, &self.fast);
                scores.local_maxima(self.harris.threshold, Some(&mask))
            }
        };
        let n_candidates = candidates.len();

        let Some(best) = selection::select_best(candidates, &request.exclusion, self.max_candidates)
        else {
            trace!(%method, n_candidates, "no qualifying candidate");
            return Ok(None);
        };

        let Some(patch) = AppearancePatch::crop(image, best.x, best.y, request.patch_size) else {
            // Unreachable while the border margin covers the patch half-width.
            return Ok(None);
        };

        trace!(%method, x = best.x, y = best.y, score = best.score, n_candidates, "detected");
        Ok(Some(FeaturePoint {
            pixel: Point2::new(best.x as f64, best.y as f64),
            score: best.score,
            patch,
        }))
    }

    /// ROI clipped to the image and pulled in far enough that the scoring
    /// window, the FAST circle and the patch all stay inside the frame.
    fn search_region(&self, image: &RawImage, request: &DetectionRequest<'_>) -> Option<Roi> {
        let margin = (request.patch_size / 2)
            .max(self.harris.border())
            .max(FAST_RADIUS);
        let usable = image.bounds().shrink(margin)?;
        match request.roi {
            Some(roi) => roi.intersect(&usable),
            None => Some(usable),
        }
    }
}
