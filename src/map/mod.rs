//! Landmark identity, parametrization lifecycle and the landmark store.

pub mod landmark_map;
pub mod parametrization;
pub mod types;

pub use landmark_map::{LandmarkMap, MapLandmark};
pub use parametrization::{ParametrizationState, Transition};
pub use types::{
    LandmarkHandle, LandmarkId, LandmarkIdAllocator, LandmarkTypeTag, ProjectedLandmark,
};
