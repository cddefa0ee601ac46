//! Geometric/appearance model markers that specialize an observation maker.
//!
//! Each model names the (sensor, landmark) pair it is valid for. The
//! projection and Jacobian code lives with the estimator; here a model only
//! contributes its identity to the observations it produces.

use crate::frame::SensorTypeTag;
use crate::map::LandmarkTypeTag;

/// Compile-time description of an observation model.
pub trait ObservationModel: Send + Sync + 'static {
    const SENSOR: SensorTypeTag;
    const LANDMARK: LandmarkTypeTag;
    /// Stable name recorded on every observation built with this model.
    const NAME: &'static str;
    /// Whether the landmark depth is unobservable from a single view, so the
    /// estimator must start from bearing-only initialization.
    const BEARING_ONLY_INIT: bool;
}

/// Pinhole camera observing an anchored inverse-depth point.
#[derive(Debug, Clone, Copy, Default)]
pub struct PinholeInverseDepthModel;

impl ObservationModel for PinholeInverseDepthModel {
    const SENSOR: SensorTypeTag = SensorTypeTag::PinholeCamera;
    const LANDMARK: LandmarkTypeTag = LandmarkTypeTag::InverseDepthPoint;
    const NAME: &'static str = "pinhole_inverse_depth_point";
    const BEARING_ONLY_INIT: bool = true;
}

/// Pinhole camera observing a Euclidean point.
#[derive(Debug, Clone, Copy, Default)]
pub struct PinholeEuclideanModel;

impl ObservationModel for PinholeEuclideanModel {
    const SENSOR: SensorTypeTag = SensorTypeTag::PinholeCamera;
    const LANDMARK: LandmarkTypeTag = LandmarkTypeTag::EuclideanPoint;
    const NAME: &'static str = "pinhole_euclidean_point";
    const BEARING_ONLY_INIT: bool = false;
}
