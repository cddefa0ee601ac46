//! Geometry utilities: SE3 poses.

pub mod se3;

pub use se3::{Pose7, SE3};
