//! Front-end configuration, loadable from YAML.
//!
//! ```yaml
//! detector:
//!   methods: [harris, fast]
//!   harris: { window: 5, threshold: 10.0 }
//!   fast: { intensity_threshold: 20 }
//!   max_candidates: 256
//! makers:
//!   - sensor: pinhole_camera
//!     landmark: inverse_depth_point
//!     patch_size: 11
//!     dmin: 20.0
//!     reparam_th: 0.1
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::detection::{FastConfig, FeatureDetector, HarrisConfig};
use crate::error::{FrontendError, Result};
use crate::factory::{MakerConfig, ObservationFactory};
use crate::frame::SensorTypeTag;
use crate::map::LandmarkTypeTag;
use crate::observation::{PinholeEuclideanModel, PinholeInverseDepthModel};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Enabled detection methods by name.
    pub methods: Vec<String>,
    pub harris: HarrisConfig,
    pub fast: FastConfig,
    /// Ranked candidates checked against the exclusion zone per call.
    pub max_candidates: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            methods: vec!["harris".to_string(), "fast".to_string()],
            harris: HarrisConfig::default(),
            fast: FastConfig::default(),
            max_candidates: 256,
        }
    }
}

/// One registry entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MakerEntry {
    pub sensor: SensorTypeTag,
    pub landmark: LandmarkTypeTag,
    pub patch_size: u32,
    pub dmin: f64,
    pub reparam_th: f64,
}

impl Default for MakerEntry {
    fn default() -> Self {
        Self::with_defaults(SensorTypeTag::PinholeCamera, LandmarkTypeTag::InverseDepthPoint)
    }
}

impl MakerEntry {
    pub fn with_defaults(sensor: SensorTypeTag, landmark: LandmarkTypeTag) -> Self {
        let d = MakerConfig::default();
        Self {
            sensor,
            landmark,
            patch_size: d.patch_size(),
            dmin: d.dmin(),
            reparam_th: d.reparam_th(),
        }
    }

    pub fn maker_config(&self) -> Result<MakerConfig> {
        MakerConfig::new(self.patch_size, self.dmin, self.reparam_th)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontendConfig {
    pub detector: DetectorConfig,
    pub makers: Vec<MakerEntry>,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            detector: DetectorConfig::default(),
            makers: vec![
                MakerEntry::with_defaults(SensorTypeTag::PinholeCamera, LandmarkTypeTag::InverseDepthPoint),
                MakerEntry::with_defaults(SensorTypeTag::PinholeCamera, LandmarkTypeTag::EuclideanPoint),
            ],
        }
    }
}

impl FrontendConfig {
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| FrontendError::ConfigIo(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| FrontendError::ConfigParse(e.to_string()))
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| FrontendError::ConfigParse(e.to_string()))
    }

    /// Check every value without building anything.
    pub fn validate(&self) -> Result<()> {
        FeatureDetector::from_config(&self.detector)?;
        for entry in &self.makers {
            entry.maker_config()?;
        }
        Ok(())
    }

    /// Register one maker per entry and freeze the registry.
    ///
    /// Pairs without an observation model fail with
    /// [`FrontendError::UnregisteredCombination`]; a repeated pair fails with
    /// [`FrontendError::DuplicateRegistration`].
    pub fn build_factory(&self) -> Result<ObservationFactory> {
        let mut factory = ObservationFactory::new();
        for entry in &self.makers {
            let config = entry.maker_config()?;
            match (entry.sensor, entry.landmark) {
                (SensorTypeTag::PinholeCamera, LandmarkTypeTag::InverseDepthPoint) => {
                    factory.register_model::<PinholeInverseDepthModel>(config)?
                }
                (SensorTypeTag::PinholeCamera, LandmarkTypeTag::EuclideanPoint) => {
                    factory.register_model::<PinholeEuclideanModel>(config)?
                }
                (sensor, landmark) => {
                    return Err(FrontendError::UnregisteredCombination { sensor, landmark })
                }
            }
        }
        factory.freeze();
        info!(makers = factory.len(), "observation factory built from configuration");
        Ok(factory)
    }

    pub fn build_detector(&self) -> Result<FeatureDetector> {
        FeatureDetector::from_config(&self.detector)
    }
}
