//! Minimal landmark store used as the map-insertion collaborator.
//!
//! Holds what the front end hands over and enforces the parametrization
//! lifecycle. Estimator state and covariance live elsewhere.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::feature::{DescriptorImagePoint, FeatureImagePoint};
use crate::map::parametrization::{ParametrizationState, Transition};
use crate::map::types::{LandmarkHandle, LandmarkId};
use crate::observation::Observation;
use crate::system::NewLandmarkMsg;

/// A landmark accepted into the map.
#[derive(Debug, Clone)]
pub struct MapLandmark {
    pub handle: LandmarkHandle,
    pub state: ParametrizationState,
    pub feature: FeatureImagePoint,
    pub descriptor: DescriptorImagePoint,
    pub observations: Vec<Observation>,
    /// Captured from the creating observation's setup.
    reparam_th: f64,
}

impl MapLandmark {
    pub fn reparam_th(&self) -> f64 {
        self.reparam_th
    }
}

/// All landmarks, keyed by id.
#[derive(Debug, Default)]
pub struct LandmarkMap {
    landmarks: HashMap<LandmarkId, MapLandmark>,
}

impl LandmarkMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a new landmark and activate it.
    ///
    /// Returns `false` (and drops the message) if the id is already present.
    pub fn insert(&mut self, msg: NewLandmarkMsg) -> bool {
        let id = msg.landmark.id;
        if self.landmarks.contains_key(&id) {
            debug!(landmark = %id, "duplicate landmark id, insertion skipped");
            return false;
        }

        let mut state = ParametrizationState::default();
        state.activate();

        let reparam_th = msg.observation.setup.reparam_th;
        debug!(
            landmark = %id,
            sensor = %msg.observation.sensor.id,
            model = msg.observation.model,
            "landmark inserted"
        );
        self.landmarks.insert(
            id,
            MapLandmark {
                handle: msg.landmark,
                state,
                feature: msg.feature,
                descriptor: msg.descriptor,
                observations: vec![msg.observation],
                reparam_th,
            },
        );
        true
    }

    /// Feed the estimator's depth-uncertainty ratio for one landmark.
    ///
    /// Returns the transition if this report converted it to Euclidean.
    pub fn report_uncertainty(&mut self, id: LandmarkId, ratio: f64) -> Option<Transition> {
        let lmk = self.landmarks.get_mut(&id)?;
        let transition = lmk.state.observe_uncertainty(ratio, lmk.reparam_th)?;
        info!(
            landmark = %id,
            ratio,
            reparam_th = lmk.reparam_th,
            "landmark reparametrized to euclidean"
        );
        Some(transition)
    }

    /// Mark a landmark as lost. It stays in the map in the `Pruned` state.
    pub fn prune(&mut self, id: LandmarkId) -> Option<Transition> {
        let transition = self.landmarks.get_mut(&id)?.state.prune()?;
        debug!(landmark = %id, from = ?transition.from, "landmark pruned");
        Some(transition)
    }

    /// Drop every pruned landmark, returning how many were removed.
    pub fn remove_pruned(&mut self) -> usize {
        let before = self.landmarks.len();
        self.landmarks
            .retain(|_, lmk| lmk.state != ParametrizationState::Pruned);
        before - self.landmarks.len()
    }

    pub fn get(&self, id: LandmarkId) -> Option<&MapLandmark> {
        self.landmarks.get(&id)
    }

    pub fn state(&self, id: LandmarkId) -> Option<ParametrizationState> {
        self.landmarks.get(&id).map(|lmk| lmk.state)
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MapLandmark> {
        self.landmarks.values()
    }

    /// Number of live landmarks in each parametrization state.
    pub fn count_in(&self, state: ParametrizationState) -> usize {
        self.landmarks.values().filter(|l| l.state == state).count()
    }
}
