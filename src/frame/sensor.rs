//! Sensor identity and per-cycle sensor snapshots.

use serde::{Deserialize, Serialize};

use crate::frame::raw_image::RawImage;
use crate::geometry::SE3;

/// Kind of sensor producing raw data. Used as half of a maker registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorTypeTag {
    /// Perspective (pinhole) camera.
    PinholeCamera,
    /// Omnidirectional / catadioptric camera.
    OmniCamera,
}

impl SensorTypeTag {
    pub const ALL: [SensorTypeTag; 2] = [SensorTypeTag::PinholeCamera, SensorTypeTag::OmniCamera];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PinholeCamera => "pinhole_camera",
            Self::OmniCamera => "omni_camera",
        }
    }
}

impl std::fmt::Display for SensorTypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unique identifier for a sensor on the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SensorId(pub u64);

impl SensorId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for SensorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// Lightweight reference to a sensor owned by the sensor collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SensorHandle {
    pub id: SensorId,
    pub tag: SensorTypeTag,
}

impl SensorHandle {
    pub fn new(id: SensorId, tag: SensorTypeTag) -> Self {
        Self { id, tag }
    }
}

/// What one sensor supplies for the current cycle: its identity, its pose
/// estimate and a borrowed view of the latest frame.
///
/// Nothing here is written back to the sensor.
#[derive(Debug, Clone, Copy)]
pub struct SensorFrame<'a> {
    pub sensor: SensorHandle,
    pub pose: &'a SE3,
    pub image: &'a RawImage,
}

impl<'a> SensorFrame<'a> {
    pub fn new(sensor: SensorHandle, pose: &'a SE3, image: &'a RawImage) -> Self {
        Self {
            sensor,
            pose,
            image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_tag_names() {
        assert_eq!(SensorTypeTag::PinholeCamera.to_string(), "pinhole_camera");
        assert_eq!(SensorTypeTag::OmniCamera.to_string(), "omni_camera");
    }

    #[test]
    fn test_sensor_tag_yaml_name_matches_display() {
        for tag in SensorTypeTag::ALL {
            let yaml = serde_yaml::to_string(&tag).unwrap();
            assert_eq!(yaml.trim(), tag.as_str());
        }
    }

    #[test]
    fn test_sensor_id_display() {
        assert_eq!(format!("{}", SensorId::new(3)), "S3");
    }
}
