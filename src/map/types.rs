//! Landmark identity types shared by the makers, the detector and the map.

use std::sync::atomic::{AtomicU64, Ordering};

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Landmark parametrization. Used as half of a maker registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkTypeTag {
    /// Anchored inverse-depth point, for bearing-only initialization.
    InverseDepthPoint,
    /// Euclidean 3D point.
    EuclideanPoint,
}

impl LandmarkTypeTag {
    pub const ALL: [LandmarkTypeTag; 2] = [
        LandmarkTypeTag::InverseDepthPoint,
        LandmarkTypeTag::EuclideanPoint,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InverseDepthPoint => "inverse_depth_point",
            Self::EuclideanPoint => "euclidean_point",
        }
    }
}

impl std::fmt::Display for LandmarkTypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unique identifier for a landmark.
///
/// Observations and descriptors refer to landmarks by id rather than by
/// pointer, so the map stays the single owner of landmark state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LandmarkId(pub u64);

impl LandmarkId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for LandmarkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LMK{}", self.0)
    }
}

/// Id plus parametrization of a landmark, as passed to a maker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LandmarkHandle {
    pub id: LandmarkId,
    pub tag: LandmarkTypeTag,
}

impl LandmarkHandle {
    pub fn new(id: LandmarkId, tag: LandmarkTypeTag) -> Self {
        Self { id, tag }
    }
}

/// Lock-free landmark id source.
///
/// Ids can be reserved from the read-only zone (several sensors in parallel)
/// without touching the map. Ids are never reused, so a reserved id whose
/// candidate is later discarded simply leaves a gap.
#[derive(Debug)]
pub struct LandmarkIdAllocator {
    next: AtomicU64,
}

impl LandmarkIdAllocator {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    pub fn next_id(&self) -> LandmarkId {
        LandmarkId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for LandmarkIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Predicted image-space position of a landmark already in the map.
///
/// Supplied by the map/estimator collaborator for every detection call so
/// that new candidates too close to it can be rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedLandmark {
    pub id: LandmarkId,
    pub pixel: Point2<f64>,
}

impl ProjectedLandmark {
    pub fn new(id: LandmarkId, u: f64, v: f64) -> Self {
        Self {
            id,
            pixel: Point2::new(u, v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_landmark_id_display() {
        assert_eq!(format!("{}", LandmarkId::new(42)), "LMK42");
    }

    #[test]
    fn test_landmark_tag_names() {
        assert_eq!(LandmarkTypeTag::InverseDepthPoint.to_string(), "inverse_depth_point");
        let parsed: LandmarkTypeTag = serde_yaml::from_str("euclidean_point").unwrap();
        assert_eq!(parsed, LandmarkTypeTag::EuclideanPoint);
    }

    #[test]
    fn test_allocator_is_monotone() {
        let alloc = LandmarkIdAllocator::starting_at(10);
        assert_eq!(alloc.next_id(), LandmarkId(10));
        assert_eq!(alloc.next_id(), LandmarkId(11));
    }

    #[test]
    fn test_allocator_unique_across_threads() {
        let alloc = LandmarkIdAllocator::new();
        let ids: Vec<LandmarkId> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| (0..100).map(|_| alloc.next_id()).collect::<Vec<_>>()))
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });

        let unique: HashSet<_> = ids.iter().copied().collect();
        assert_eq!(unique.len(), 400);
    }
}
