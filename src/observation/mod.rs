//! Sensor–landmark observations produced by the makers.
//!
//! An [`Observation`] is the binding the estimator uses for measurement
//! updates. The front end only manufactures it; once handed to the map the
//! estimator owns and mutates it (events, counters, measurement).

pub mod model;

use nalgebra::Point2;

use crate::frame::SensorHandle;
use crate::map::LandmarkHandle;

pub use model::{ObservationModel, PinholeEuclideanModel, PinholeInverseDepthModel};

/// Values copied from the maker configuration into each observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationSetup {
    /// Appearance window side length.
    pub patch_size: u32,
    /// Minimum image distance to other landmarks for new detections.
    pub dmin: f64,
    /// Uncertainty-ratio threshold for inverse-depth to Euclidean conversion.
    pub reparam_th: f64,
}

/// What happened to an observation during the current cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObservationEvents {
    pub predicted: bool,
    pub visible: bool,
    pub measured: bool,
    pub matched: bool,
    pub updated: bool,
}

/// Running tallies used by map management to drop unreliable landmarks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObservationCounters {
    pub n_search: u32,
    pub n_match: u32,
    pub n_inlier: u32,
}

impl ObservationCounters {
    /// Fraction of searches that produced a match; 1.0 before any search so
    /// fresh observations are not penalized.
    pub fn match_ratio(&self) -> f64 {
        if self.n_search == 0 {
            1.0
        } else {
            self.n_match as f64 / self.n_search as f64
        }
    }
}

/// Binding between one sensor and one landmark.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub sensor: SensorHandle,
    pub landmark: LandmarkHandle,
    /// Name of the [`ObservationModel`] that built this observation.
    pub model: &'static str,
    pub bearing_only_init: bool,
    pub setup: ObservationSetup,
    pub events: ObservationEvents,
    pub counters: ObservationCounters,
    /// Last matched image position, if any.
    pub measurement: Option<Point2<f64>>,
}

impl Observation {
    /// Handles are taken as given. Their tags match `M` whenever the maker
    /// was obtained from the registry under the same pair.
    pub fn new<M: ObservationModel>(
        sensor: SensorHandle,
        landmark: LandmarkHandle,
        setup: ObservationSetup,
    ) -> Self {
        Self {
            sensor,
            landmark,
            model: M::NAME,
            bearing_only_init: M::BEARING_ONLY_INIT,
            setup,
            events: ObservationEvents::default(),
            counters: ObservationCounters::default(),
            measurement: None,
        }
    }

    /// Reset per-cycle events before the next frame.
    pub fn clear_events(&mut self) {
        self.events = ObservationEvents::default();
    }

    /// Record a successful match at `pixel` for this cycle.
    pub fn record_match(&mut self, pixel: Point2<f64>) {
        self.counters.n_search += 1;
        self.counters.n_match += 1;
        self.events.measured = true;
        self.events.matched = true;
        self.measurement = Some(pixel);
    }

    /// Record a search that found nothing.
    pub fn record_miss(&mut self) {
        self.counters.n_search += 1;
        self.events.measured = true;
        self.events.matched = false;
    }
}
