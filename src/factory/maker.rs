//! Observation makers: one capability object per (sensor, landmark) pair.
//!
//! A maker owns only its immutable [`MakerConfig`]. The concrete
//! [`ImagePointObservationMaker`] is specialized at compile time by an
//! [`ObservationModel`] and stored behind `dyn ObservationMaker` in the
//! registry, so per-frame callers never switch on type tags.

use std::fmt;
use std::marker::PhantomData;

use crate::error::{FrontendError, Result};
use crate::feature::{DescriptorImagePoint, FeatureImagePoint};
use crate::frame::{SensorHandle, SensorTypeTag};
use crate::geometry::SE3;
use crate::map::{LandmarkHandle, LandmarkTypeTag};
use crate::observation::{Observation, ObservationModel, ObservationSetup};

/// Per-maker parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MakerConfig {
    patch_size: u32,
    dmin: f64,
    reparam_th: f64,
}

impl MakerConfig {
    /// Validated constructor.
    ///
    /// - `patch_size`: positive and odd
    /// - `dmin`: finite, >= 0
    /// - `reparam_th`: finite, > 0
    pub fn new(patch_size: u32, dmin: f64, reparam_th: f64) -> Result<Self> {
        if patch_size == 0 || patch_size % 2 == 0 {
            return Err(FrontendError::InvalidConfig(format!(
                "patch_size must be positive and odd, got {patch_size}"
            )));
        }
        if !dmin.is_finite() || dmin < 0.0 {
            return Err(FrontendError::InvalidConfig(format!(
                "dmin must be finite and >= 0, got {dmin}"
            )));
        }
        if !reparam_th.is_finite() || reparam_th <= 0.0 {
            return Err(FrontendError::InvalidConfig(format!(
                "reparam_th must be finite and > 0, got {reparam_th}"
            )));
        }
        Ok(Self {
            patch_size,
            dmin,
            reparam_th,
        })
    }

    pub fn patch_size(&self) -> u32 {
        self.patch_size
    }

    pub fn dmin(&self) -> f64 {
        self.dmin
    }

    pub fn reparam_th(&self) -> f64 {
        self.reparam_th
    }

    /// Values copied onto each observation.
    pub fn setup(&self) -> ObservationSetup {
        ObservationSetup {
            patch_size: self.patch_size,
            dmin: self.dmin,
            reparam_th: self.reparam_th,
        }
    }
}

impl Default for MakerConfig {
    fn default() -> Self {
        Self {
            patch_size: 11,
            dmin: 20.0,
            reparam_th: 0.1,
        }
    }
}

/// Builds the feature, descriptor and observation for one registered pair.
///
/// Implementations are stateless apart from their config and are shared
/// read-only across sensor threads.
pub trait ObservationMaker: Send + Sync + fmt::Debug {
    fn sensor_type(&self) -> SensorTypeTag;

    fn landmark_type(&self) -> LandmarkTypeTag;

    fn config(&self) -> &MakerConfig;

    /// Name of the observation model this maker is specialized with.
    fn model_name(&self) -> &'static str;

    /// Empty feature sized for this maker's patch.
    fn create_feature(&self, sensor: &SensorHandle, landmark: &LandmarkHandle) -> FeatureImagePoint;

    /// Anchor `feature` to `anchor_pose`.
    ///
    /// Fails with [`FrontendError::PatchSizeMismatch`] when the feature was
    /// not sized by this maker.
    fn create_descriptor(
        &self,
        sensor: &SensorHandle,
        landmark: &LandmarkHandle,
        feature: &FeatureImagePoint,
        anchor_pose: &SE3,
        initial_obs: &Observation,
    ) -> Result<DescriptorImagePoint>;

    fn create_observation(&self, sensor: &SensorHandle, landmark: &LandmarkHandle) -> Observation;
}

/// Maker for image-point features, specialized by observation model `M`.
pub struct ImagePointObservationMaker<M: ObservationModel> {
    config: MakerConfig,
    _model: PhantomData<fn() -> M>,
}

impl<M: ObservationModel> ImagePointObservationMaker<M> {
    pub fn new(config: MakerConfig) -> Self {
        Self {
            config,
            _model: PhantomData,
        }
    }
}

impl<M: ObservationModel> fmt::Debug for ImagePointObservationMaker<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePointObservationMaker")
            .field("model", &M::NAME)
            .field("config", &self.config)
            .finish()
    }
}

impl<M: ObservationModel> ObservationMaker for ImagePointObservationMaker<M> {
    fn sensor_type(&self) -> SensorTypeTag {
        M::SENSOR
    }

    fn landmark_type(&self) -> LandmarkTypeTag {
        M::LANDMARK
    }

    fn config(&self) -> &MakerConfig {
        &self.config
    }

    fn model_name(&self) -> &'static str {
        M::NAME
    }

    fn create_feature(&self, _sensor: &SensorHandle, _landmark: &LandmarkHandle) -> FeatureImagePoint {
        FeatureImagePoint::new(self.config.patch_size)
    }

    fn create_descriptor(
        &self,
        _sensor: &SensorHandle,
        _landmark: &LandmarkHandle,
        feature: &FeatureImagePoint,
        anchor_pose: &SE3,
        initial_obs: &Observation,
    ) -> Result<DescriptorImagePoint> {
        if feature.patch_size() != self.config.patch_size {
            return Err(FrontendError::PatchSizeMismatch {
                expected: self.config.patch_size,
                actual: feature.patch_size(),
            });
        }
        Ok(DescriptorImagePoint::new(feature, anchor_pose, initial_obs))
    }

    fn create_observation(&self, sensor: &SensorHandle, landmark: &LandmarkHandle) -> Observation {
        Observation::new::<M>(*sensor, *landmark, self.config.setup())
    }
}
