//! Messages handed from the per-sensor pipeline to the map inserter.

use crate::feature::{DescriptorImagePoint, FeatureImagePoint};
use crate::map::LandmarkHandle;
use crate::observation::Observation;

/// A fully built landmark candidate, ready for insertion.
///
/// Produced in the read-only zone; the receiver takes ownership of all
/// three parts and the sender keeps nothing.
#[derive(Debug, Clone)]
pub struct NewLandmarkMsg {
    /// Id reserved by the producer; the map keeps it.
    pub landmark: LandmarkHandle,

    /// Detected point with its appearance patch.
    pub feature: FeatureImagePoint,

    /// Appearance template anchored to the first-view sensor pose.
    pub descriptor: DescriptorImagePoint,

    /// Initial sensor–landmark binding for the estimator.
    pub observation: Observation,

    /// Timestamp of the frame the point was detected in.
    pub timestamp_ns: u64,
}
