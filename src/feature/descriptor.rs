//! Appearance descriptor anchored to the sensor pose of the first view.
//!
//! The descriptor keeps the appearance template and the sensor pose at
//! landmark creation. A matcher uses the anchor to re-predict (warp) the
//! template for the current viewpoint and compares it with the live image.
//! The descriptor itself never updates its anchor.

use nalgebra::Point2;

use crate::feature::feature_point::FeatureImagePoint;
use crate::feature::patch::AppearancePatch;
use crate::frame::SensorId;
use crate::geometry::{Pose7, SE3};
use crate::map::LandmarkId;
use crate::observation::Observation;

/// Descriptor for image-point landmarks.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptorImagePoint {
    landmark: LandmarkId,
    anchor_sensor: SensorId,
    anchor_pose: SE3,
    anchor_pixel: Point2<f64>,
    template: AppearancePatch,
    /// Model name of the observation that created the landmark.
    initial_model: &'static str,
}

impl DescriptorImagePoint {
    /// Anchor `feature` to `anchor_pose`, the sensor pose at creation time.
    pub fn new(feature: &FeatureImagePoint, anchor_pose: &SE3, initial_obs: &Observation) -> Self {
        Self {
            landmark: initial_obs.landmark.id,
            anchor_sensor: initial_obs.sensor.id,
            anchor_pose: anchor_pose.clone(),
            anchor_pixel: feature.measurement,
            template: feature.appearance().clone(),
            initial_model: initial_obs.model,
        }
    }

    pub fn landmark(&self) -> LandmarkId {
        self.landmark
    }

    pub fn anchor_sensor(&self) -> SensorId {
        self.anchor_sensor
    }

    /// Sensor pose recorded at creation, verbatim.
    pub fn anchor_pose(&self) -> &SE3 {
        &self.anchor_pose
    }

    /// Anchor pose as `[x, y, z, qw, qx, qy, qz]`.
    pub fn anchor_pose_vec7(&self) -> Pose7 {
        self.anchor_pose.to_vec7()
    }

    pub fn anchor_pixel(&self) -> Point2<f64> {
        self.anchor_pixel
    }

    pub fn template(&self) -> &AppearancePatch {
        &self.template
    }

    pub fn patch_size(&self) -> u32 {
        self.template.size()
    }

    pub fn initial_model(&self) -> &'static str {
        self.initial_model
    }

    /// Similarity of a re-predicted appearance with the stored template.
    pub fn appearance_score(&self, predicted: &AppearancePatch) -> Option<f64> {
        self.template.zncc(predicted)
    }
}
