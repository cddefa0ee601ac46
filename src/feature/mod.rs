//! Feature and descriptor data model.
//!
//! - [`FeaturePoint`] - what the detector returns (pixel, strength, patch)
//! - [`FeatureImagePoint`] - the feature a maker allocates for a new landmark
//! - [`DescriptorImagePoint`] - appearance template anchored to the first-view pose

pub mod descriptor;
pub mod feature_point;
pub mod patch;

pub use descriptor::DescriptorImagePoint;
pub use feature_point::{FeatureImagePoint, FeaturePoint};
pub use patch::AppearancePatch;
