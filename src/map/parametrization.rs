//! Landmark parametrization lifecycle.
//!
//! ```text
//! Candidate ──activate──▶ InverseDepth ──ratio <= reparam_th──▶ Euclidean
//!     │                        │
//!     └────────prune───────────┴──prune──▶ Pruned
//! ```
//!
//! `Euclidean` and `Pruned` are terminal. The inverse-depth to Euclidean
//! conversion fires at most once and never reverts, whatever the
//! uncertainty ratio does afterwards. How the ratio itself is computed is
//! the estimator's business; only the threshold contract lives here.

/// Parametrization state carried on a landmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParametrizationState {
    /// Created by the front end, not yet accepted by the estimator.
    #[default]
    Candidate,
    /// Bearing-only / inverse-depth parametrization, depth still uncertain.
    InverseDepth,
    /// Converted to a Euclidean point. Terminal.
    Euclidean,
    /// Lost track and removed. Terminal.
    Pruned,
}

/// A state change produced by one of the transition methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: ParametrizationState,
    pub to: ParametrizationState,
}

impl ParametrizationState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Euclidean | Self::Pruned)
    }

    /// `Candidate → InverseDepth` once the landmark has been inserted.
    pub fn activate(&mut self) -> Option<Transition> {
        match self {
            Self::Candidate => Some(self.set(Self::InverseDepth)),
            _ => None,
        }
    }

    /// Feed the estimator's latest depth-uncertainty ratio.
    ///
    /// Converts `InverseDepth → Euclidean` the first time `ratio <= reparam_th`.
    /// NaN ratios never trigger the conversion.
    pub fn observe_uncertainty(&mut self, ratio: f64, reparam_th: f64) -> Option<Transition> {
        match self {
            Self::InverseDepth if ratio <= reparam_th => Some(self.set(Self::Euclidean)),
            _ => None,
        }
    }

    /// Mark the landmark as lost.
    ///
    /// Also valid from `Candidate`: a landmark the estimator never accepts
    /// has to leave the map without passing through `InverseDepth`.
    pub fn prune(&mut self) -> Option<Transition> {
        match self {
            Self::Candidate | Self::InverseDepth => Some(self.set(Self::Pruned)),
            _ => None,
        }
    }

    fn set(&mut self, to: ParametrizationState) -> Transition {
        let from = std::mem::replace(self, to);
        Transition { from, to }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_candidate() {
        assert_eq!(ParametrizationState::default(), ParametrizationState::Candidate);
    }

    #[test]
    fn test_reparametrization_is_one_way() {
        let th = 0.1;
        let mut state = ParametrizationState::Candidate;
        state.activate();

        let ratios = [0.5, 0.3, 0.12, 0.1, 0.05, 0.2, 0.9];
        let mut fired = Vec::new();
        for (i, r) in ratios.iter().enumerate() {
            if state.observe_uncertainty(*r, th).is_some() {
                fired.push(i);
            }
            if i >= 3 {
                assert_eq!(state, ParametrizationState::Euclidean);
            } else {
                assert_eq!(state, ParametrizationState::InverseDepth);
            }
        }

        // Crossing at exactly the threshold fires, and only once.
        assert_eq!(fired, vec![3]);
    }

    #[test]
    fn test_candidate_does_not_reparametrize() {
        let mut state = ParametrizationState::Candidate;
        assert!(state.observe_uncertainty(0.0, 0.1).is_none());
        assert_eq!(state, ParametrizationState::Candidate);
    }

    #[test]
    fn test_nan_ratio_is_ignored() {
        let mut state = ParametrizationState::InverseDepth;
        assert!(state.observe_uncertainty(f64::NAN, 0.1).is_none());
        assert_eq!(state, ParametrizationState::InverseDepth);
    }

    #[test]
    fn test_candidate_can_be_pruned() {
        let mut state = ParametrizationState::Candidate;
        let t = state.prune().unwrap();
        assert_eq!(t.from, ParametrizationState::Candidate);
        assert_eq!(t.to, ParametrizationState::Pruned);
        assert!(state.activate().is_none());
        assert!(state.prune().is_none());
    }

    #[test]
    fn test_terminal_states() {
        let mut euclidean = ParametrizationState::Euclidean;
        assert!(euclidean.prune().is_none());
        assert!(euclidean.activate().is_none());
        assert!(euclidean.is_terminal());

        let mut lost = ParametrizationState::InverseDepth;
        let t = lost.prune().unwrap();
        assert_eq!(t.from, ParametrizationState::InverseDepth);
        assert_eq!(t.to, ParametrizationState::Pruned);
        assert!(lost.observe_uncertainty(0.0, 0.1).is_none());
        assert!(lost.is_terminal());
    }
}
