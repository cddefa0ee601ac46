//! Candidate ranking and proximity rejection.

use nalgebra::Point2;
use tracing::trace;

use crate::detection::harris::Candidate;
use crate::map::ProjectedLandmark;

/// Neighbourhoods of existing landmarks where no new point may be created.
///
/// A candidate is rejected when its distance to any listed projection is
/// strictly less than `dmin`. A candidate exactly `dmin` away is kept.
#[derive(Debug, Clone, Copy)]
pub struct ExclusionZone<'a> {
    pub landmarks: &'a [ProjectedLandmark],
    pub dmin: f64,
}

impl<'a> ExclusionZone<'a> {
    pub fn new(landmarks: &'a [ProjectedLandmark], dmin: f64) -> Self {
        Self { landmarks, dmin }
    }

    /// No exclusions at all.
    pub fn none() -> ExclusionZone<'static> {
        ExclusionZone {
            landmarks: &[],
            dmin: 0.0,
        }
    }

    /// First landmark closer than `dmin` to `pixel`, if any.
    pub fn blocking(&self, pixel: &Point2<f64>) -> Option<&'a ProjectedLandmark> {
        let dmin_sq = self.dmin * self.dmin;
        self.landmarks
            .iter()
            .find(|lmk| (lmk.pixel - *pixel).norm_squared() < dmin_sq)
    }

    pub fn is_excluded(&self, pixel: &Point2<f64>) -> bool {
        self.blocking(pixel).is_some()
    }
}

/// Sort strongest first; ties go to the smaller row, then the smaller column,
/// so the result does not depend on scan order.
pub fn rank(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.y.cmp(&b.y))
            .then_with(|| a.x.cmp(&b.x))
    });
}

/// Best ranked candidate outside the exclusion zone, looking at no more than
/// `max_candidates` entries.
pub fn select_best(
    mut candidates: Vec<Candidate>,
    exclusion: &ExclusionZone<'_>,
    max_candidates: usize,
) -> Option<Candidate> {
    rank(&mut candidates);
    for c in candidates.into_iter().take(max_candidates) {
        let pixel = Point2::new(c.x as f64, c.y as f64);
        match exclusion.blocking(&pixel) {
            Some(lmk) => {
                trace!(
                    x = c.x,
                    y = c.y,
                    landmark = %lmk.id,
                    "candidate rejected, too close to existing landmark"
                );
            }
            None => return Some(c),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::LandmarkId;

    fn cand(x: u32, y: u32, score: f64) -> Candidate {
        Candidate { x, y, score }
    }

    #[test]
    fn test_rank_tie_break() {
        let mut c = vec![cand(5, 9, 1.0), cand(3, 9, 1.0), cand(7, 2, 1.0), cand(0, 0, 2.0)];
        rank(&mut c);
        let order: Vec<(u32, u32)> = c.iter().map(|c| (c.x, c.y)).collect();
        assert_eq!(order, vec![(0, 0), (7, 2), (3, 9), (5, 9)]);
    }

    #[test]
    fn test_dmin_is_strict() {
        let lmks = [ProjectedLandmark::new(LandmarkId(1), 100.0, 100.0)];
        let zone = ExclusionZone::new(&lmks, 20.0);

        assert!(zone.is_excluded(&Point2::new(105.0, 100.0)));
        assert!(zone.is_excluded(&Point2::new(119.9, 100.0)));
        assert!(!zone.is_excluded(&Point2::new(120.0, 100.0)));
        assert!(!zone.is_excluded(&Point2::new(130.0, 100.0)));
    }

    #[test]
    fn test_select_skips_excluded_strongest() {
        let lmks = [ProjectedLandmark::new(LandmarkId(1), 100.0, 100.0)];
        let zone = ExclusionZone::new(&lmks, 20.0);
        let candidates = vec![cand(105, 100, 500.0), cand(130, 100, 200.0), cand(300, 10, 50.0)];

        let best = select_best(candidates, &zone, 16).unwrap();
        assert_eq!((best.x, best.y), (130, 100));
    }

    #[test]
    fn test_select_none_when_all_excluded() {
        let lmks = [ProjectedLandmark::new(LandmarkId(1), 100.0, 100.0)];
        let zone = ExclusionZone::new(&lmks, 20.0);
        assert!(select_best(vec![cand(105, 100, 500.0)], &zone, 16).is_none());
    }

    #[test]
    fn test_select_respects_scan_bound() {
        let lmks = [ProjectedLandmark::new(LandmarkId(1), 100.0, 100.0)];
        let zone = ExclusionZone::new(&lmks, 20.0);
        let candidates = vec![cand(105, 100, 500.0), cand(130, 100, 200.0)];
        assert!(select_best(candidates, &zone, 1).is_none());
    }

    #[test]
    fn test_zero_dmin_never_excludes() {
        let lmks = [ProjectedLandmark::new(LandmarkId(1), 100.0, 100.0)];
        let zone = ExclusionZone::new(&lmks, 0.0);
        assert!(!zone.is_excluded(&Point2::new(100.0, 100.0)));
        assert!(!ExclusionZone::none().is_excluded(&Point2::new(0.0, 0.0)));
    }
}
