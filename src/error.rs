//! Error taxonomy for the landmark-acquisition front end.
//!
//! Only configuration defects and wiring bugs are errors. Expected per-frame
//! negatives (no corner found, candidate too close to an existing landmark)
//! are ordinary `Ok(None)` values and never reach this type.

use crate::frame::SensorTypeTag;
use crate::map::LandmarkTypeTag;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FrontendError>;

/// Errors raised by the registry, the detector and the makers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FrontendError {
    /// No maker was registered for the requested pair.
    #[error("no observation maker registered for ({sensor}, {landmark})")]
    UnregisteredCombination {
        sensor: SensorTypeTag,
        landmark: LandmarkTypeTag,
    },

    /// A maker is already bound to this pair.
    #[error("an observation maker is already registered for ({sensor}, {landmark})")]
    DuplicateRegistration {
        sensor: SensorTypeTag,
        landmark: LandmarkTypeTag,
    },

    /// `register` was called after the registry was frozen.
    #[error("observation factory is frozen, cannot register ({sensor}, {landmark})")]
    RegistryFrozen {
        sensor: SensorTypeTag,
        landmark: LandmarkTypeTag,
    },

    /// A maker was offered under a key other than its own model's pair.
    #[error("maker {model} handles ({maker_sensor}, {maker_landmark}), cannot register it under ({sensor}, {landmark})")]
    MakerKeyMismatch {
        sensor: SensorTypeTag,
        landmark: LandmarkTypeTag,
        maker_sensor: SensorTypeTag,
        maker_landmark: LandmarkTypeTag,
        model: &'static str,
    },

    /// The detection method is unknown or not enabled on this detector.
    #[error("unsupported feature detection method: {0}")]
    UnsupportedDetectionMethod(String),

    /// A feature and its descriptor (or a detected patch and the feature that
    /// receives it) disagree on the appearance window size.
    #[error("patch size mismatch: expected {expected}, got {actual}")]
    PatchSizeMismatch { expected: u32, actual: u32 },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read or written.
    #[error("configuration I/O error: {0}")]
    ConfigIo(String),

    /// Configuration text could not be parsed.
    #[error("configuration parse error: {0}")]
    ConfigParse(String),
}

impl FrontendError {
    /// True when the error signals a wiring bug rather than bad configuration.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::PatchSizeMismatch { .. } | Self::MakerKeyMismatch { .. })
    }
}
