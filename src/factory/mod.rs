//! Observation factory: the (sensor type, landmark type) → maker registry.
//!
//! Two-phase lifecycle. During startup the registry is owned mutably and
//! filled with [`ObservationFactory::register`]; [`ObservationFactory::freeze`]
//! then closes it. The frozen factory is wrapped in an `Arc` and shared with
//! every per-frame caller, which only ever performs lookups. Nothing on the
//! lookup path takes a lock.

pub mod maker;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{FrontendError, Result};
use crate::frame::SensorTypeTag;
use crate::map::LandmarkTypeTag;
use crate::observation::ObservationModel;

pub use maker::{ImagePointObservationMaker, MakerConfig, ObservationMaker};

type MakerKey = (SensorTypeTag, LandmarkTypeTag);

#[derive(Debug, Default)]
pub struct ObservationFactory {
    makers: HashMap<MakerKey, Arc<dyn ObservationMaker>>,
    frozen: bool,
}

impl ObservationFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `maker` to `(sensor, landmark)`.
    ///
    /// The key must be the maker's own pair, otherwise lookups for it would
    /// hand out observations for a different combination.
    pub fn register(
        &mut self,
        sensor: SensorTypeTag,
        landmark: LandmarkTypeTag,
        maker: Arc<dyn ObservationMaker>,
    ) -> Result<()> {
        if self.frozen {
            return Err(FrontendError::RegistryFrozen { sensor, landmark });
        }
        if self.makers.contains_key(&(sensor, landmark)) {
            return Err(FrontendError::DuplicateRegistration { sensor, landmark });
        }
        if maker.sensor_type() != sensor || maker.landmark_type() != landmark {
            return Err(FrontendError::MakerKeyMismatch {
                sensor,
                landmark,
                maker_sensor: maker.sensor_type(),
                maker_landmark: maker.landmark_type(),
                model: maker.model_name(),
            });
        }

        debug!(%sensor, %landmark, model = maker.model_name(), config = ?maker.config(), "observation maker registered");
        self.makers.insert((sensor, landmark), maker);
        Ok(())
    }

    /// Register an [`ImagePointObservationMaker`] for model `M` under the
    /// model's own tags.
    pub fn register_model<M: ObservationModel>(&mut self, config: MakerConfig) -> Result<()> {
        self.register(
            M::SENSOR,
            M::LANDMARK,
            Arc::new(ImagePointObservationMaker::<M>::new(config)),
        )
    }

    /// Maker for `(sensor, landmark)`.
    pub fn lookup(
        &self,
        sensor: SensorTypeTag,
        landmark: LandmarkTypeTag,
    ) -> Result<Arc<dyn ObservationMaker>> {
        self.makers
            .get(&(sensor, landmark))
            .cloned()
            .ok_or(FrontendError::UnregisteredCombination { sensor, landmark })
    }

    pub fn contains(&self, sensor: SensorTypeTag, landmark: LandmarkTypeTag) -> bool {
        self.makers.contains_key(&(sensor, landmark))
    }

    /// Close registration. Idempotent.
    pub fn freeze(&mut self) {
        if !self.frozen {
            self.frozen = true;
            info!(makers = self.makers.len(), "observation factory frozen");
        }
    }

    /// Freeze and move into a shareable handle for the per-frame pipeline.
    pub fn into_shared(mut self) -> Arc<Self> {
        self.freeze();
        Arc::new(self)
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn len(&self) -> usize {
        self.makers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.makers.is_empty()
    }

    /// Registered keys, sorted for stable output.
    pub fn keys(&self) -> Vec<(SensorTypeTag, LandmarkTypeTag)> {
        let mut keys: Vec<_> = self.makers.keys().copied().collect();
        keys.sort_by_key(|(s, l)| (s.as_str(), l.as_str()));
        keys
    }
}
