//! State shared between the per-sensor producers and the map inserter.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::map::LandmarkMap;

use super::messages::NewLandmarkMsg;

/// Producers read the map; the single inserter writes it.
pub struct SharedState {
    /// Every structural change goes through the write lock.
    pub map: RwLock<LandmarkMap>,
}

impl SharedState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            map: RwLock::new(LandmarkMap::new()),
        })
    }

    /// Insert under the exclusive lock.
    pub fn insert(&self, msg: NewLandmarkMsg) -> bool {
        self.map.write().insert(msg)
    }

    pub fn landmark_count(&self) -> usize {
        self.map.read().len()
    }
}
