//! Interest-point detection methods.

use std::str::FromStr;

use crate::error::FrontendError;

/// Closed set of corner detectors known to this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectionMethod {
    /// Structure-tensor corner strength with local-maximum suppression.
    Harris,
    /// FAST-9 segment test, ranked by the same corner strength.
    Fast,
}

impl DetectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Harris => "harris",
            Self::Fast => "fast",
        }
    }
}

impl std::fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetectionMethod {
    type Err = FrontendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "harris" => Ok(Self::Harris),
            "fast" => Ok(Self::Fast),
            _ => Err(FrontendError::UnsupportedDetectionMethod(s.to_string())),
        }
    }
}
