pub mod config;
pub mod detection;
pub mod error;
pub mod factory;
pub mod feature;
pub mod frame;
pub mod geometry;
pub mod map;
pub mod observation;
pub mod system;

pub use error::{FrontendError, Result};
