//! Per-frame orchestration: building new landmarks and handing them to the
//! map.
//!
//! [`LandmarkInitializer`] runs in the read-only zone, one call per sensor per
//! cycle. Results travel as [`NewLandmarkMsg`] to whoever owns the write side
//! of [`SharedState`].

pub mod landmark_init;
pub mod messages;
pub mod shared_state;

pub use landmark_init::LandmarkInitializer;
pub use messages::NewLandmarkMsg;
pub use shared_state::SharedState;
