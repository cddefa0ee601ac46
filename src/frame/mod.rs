//! Sensor-side inputs: sensor identity, raw frames and search rectangles.

pub mod raw_image;
pub mod sensor;

pub use raw_image::{RawImage, Roi};
pub use sensor::{SensorFrame, SensorHandle, SensorId, SensorTypeTag};
