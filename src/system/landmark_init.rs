//! Per-candidate landmark initialization.
//!
//! detect → lookup maker → feature → observation → descriptor, packaged as a
//! [`NewLandmarkMsg`]. Everything here reads shared, immutable inputs, so one
//! initializer can run for several sensors at once. Inserting the result is
//! the caller's job.

use tracing::{debug, trace};

use crate::detection::{DetectionMethod, DetectionRequest, ExclusionZone, FeatureDetector};
use crate::error::Result;
use crate::factory::ObservationFactory;
use crate::frame::{Roi, SensorFrame};
use crate::map::{LandmarkHandle, LandmarkIdAllocator, LandmarkTypeTag, ProjectedLandmark};

use super::messages::NewLandmarkMsg;

/// Borrowed view of the frozen factory, the detector and the id source.
#[derive(Debug, Clone, Copy)]
pub struct LandmarkInitializer<'a> {
    factory: &'a ObservationFactory,
    detector: &'a FeatureDetector,
    ids: &'a LandmarkIdAllocator,
}

impl<'a> LandmarkInitializer<'a> {
    pub fn new(
        factory: &'a ObservationFactory,
        detector: &'a FeatureDetector,
        ids: &'a LandmarkIdAllocator,
    ) -> Self {
        Self {
            factory,
            detector,
            ids,
        }
    }

    /// Try to create one new `landmark_type` landmark from `frame`.
    ///
    /// `existing` holds the predicted projections of landmarks already in the
    /// map; candidates closer than the maker's `dmin` to any of them are
    /// skipped. An id is reserved only when a candidate is found.
    pub fn initialize(
        &self,
        frame: &SensorFrame<'_>,
        landmark_type: LandmarkTypeTag,
        method: DetectionMethod,
        roi: Option<Roi>,
        existing: &[ProjectedLandmark],
    ) -> Result<Option<NewLandmarkMsg>> {
        let sensor = frame.sensor;
        let maker = self.factory.lookup(sensor.tag, landmark_type)?;
        let config = maker.config();

        let request = DetectionRequest::new(
            roi,
            config.patch_size(),
            ExclusionZone::new(existing, config.dmin()),
        );
        let Some(detected) = self.detector.detect(method, frame.image, &request)? else {
            trace!(sensor = %sensor.id, %method, "no new landmark this cycle");
            return Ok(None);
        };

        let landmark = LandmarkHandle::new(self.ids.next_id(), landmark_type);
        let mut feature = maker.create_feature(&sensor, &landmark);
        feature.assign(detected)?;
        let observation = maker.create_observation(&sensor, &landmark);
        let descriptor =
            maker.create_descriptor(&sensor, &landmark, &feature, frame.pose, &observation)?;

        debug!(
            sensor = %sensor.id,
            landmark = %landmark.id,
            u = feature.measurement.x,
            v = feature.measurement.y,
            score = feature.score,
            "new landmark candidate"
        );

        Ok(Some(NewLandmarkMsg {
            landmark,
            feature,
            descriptor,
            observation,
            timestamp_ns: frame.image.timestamp_ns,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FrontendConfig;
    use crate::detection::{FastConfig, HarrisConfig};
    use crate::error::FrontendError;
    use crate::factory::MakerConfig;
    use crate::frame::{RawImage, SensorHandle, SensorId, SensorTypeTag};
    use crate::geometry::SE3;
    use crate::map::{LandmarkId, LandmarkMap, ParametrizationState};
    use crate::observation::PinholeInverseDepthModel;
    use crate::system::SharedState;
    use approx::assert_relative_eq;
    use image::{GrayImage, Luma};
    use nalgebra::{UnitQuaternion, Vector3};
    use std::collections::HashSet;

    fn square_image(x0: u32, y0: u32, timestamp_ns: u64) -> RawImage {
        RawImage::new(
            GrayImage::from_fn(160, 120, |x, y| {
                if (x0..x0 + 12).contains(&x) && (y0..y0 + 12).contains(&y) {
                    Luma([210])
                } else {
                    Luma([40])
                }
            }),
            timestamp_ns,
        )
    }

    fn fixture() -> (ObservationFactory, FeatureDetector) {
        let mut factory = ObservationFactory::new();
        factory
            .register_model::<PinholeInverseDepthModel>(MakerConfig::new(11, 20.0, 0.1).unwrap())
            .unwrap();
        factory.freeze();
        let detector = FeatureDetector::new(
            &[DetectionMethod::Harris],
            HarrisConfig::default(),
            FastConfig::default(),
            256,
        )
        .unwrap();
        (factory, detector)
    }

    fn camera(id: u64) -> SensorHandle {
        SensorHandle::new(SensorId(id), SensorTypeTag::PinholeCamera)
    }

    #[test]
    fn test_end_to_end_candidate() {
        let (factory, detector) = fixture();
        let ids = LandmarkIdAllocator::new();
        let init = LandmarkInitializer::new(&factory, &detector, &ids);

        let pose = SE3::new(
            UnitQuaternion::from_euler_angles(0.0, 0.2, -0.1),
            Vector3::new(0.5, -1.0, 2.0),
        );
        let image = square_image(60, 50, 1_000);
        let frame = SensorFrame::new(camera(0), &pose, &image);
        let far = [ProjectedLandmark::new(LandmarkId(99), 10.0, 10.0)];

        let msg = init
            .initialize(
                &frame,
                LandmarkTypeTag::InverseDepthPoint,
                DetectionMethod::Harris,
                Some(Roi::new(40, 30, 60, 60)),
                &far,
            )
            .unwrap()
            .unwrap();

        assert_eq!(msg.landmark.id, LandmarkId(0));
        assert_eq!(msg.timestamp_ns, 1_000);
        assert_eq!(msg.feature.patch_size(), 11);
        assert_eq!(msg.descriptor.patch_size(), 11);
        assert_eq!(msg.descriptor.anchor_pose(), &pose);
        assert_eq!(msg.descriptor.anchor_pixel(), msg.feature.measurement);
        assert_eq!(msg.observation.setup.patch_size, 11);
        assert_relative_eq!(msg.observation.setup.dmin, 20.0);
        assert_relative_eq!(msg.observation.setup.reparam_th, 0.1);
        assert!(msg.observation.bearing_only_init);

        let mut map = LandmarkMap::new();
        assert!(map.insert(msg));
        assert_eq!(map.state(LandmarkId(0)), Some(ParametrizationState::InverseDepth));
    }

    #[test]
    fn test_unregistered_pair_is_error() {
        let (factory, detector) = fixture();
        let ids = LandmarkIdAllocator::new();
        let init = LandmarkInitializer::new(&factory, &detector, &ids);
        let pose = SE3::identity();
        let image = square_image(60, 50, 0);
        let frame = SensorFrame::new(camera(0), &pose, &image);

        let err = init
            .initialize(&frame, LandmarkTypeTag::EuclideanPoint, DetectionMethod::Harris, None, &[])
            .unwrap_err();
        assert_eq!(
            err,
            FrontendError::UnregisteredCombination {
                sensor: SensorTypeTag::PinholeCamera,
                landmark: LandmarkTypeTag::EuclideanPoint,
            }
        );
    }

    #[test]
    fn test_not_found_reserves_no_id() {
        let (factory, detector) = fixture();
        let ids = LandmarkIdAllocator::new();
        let init = LandmarkInitializer::new(&factory, &detector, &ids);
        let pose = SE3::identity();
        let image = square_image(60, 50, 0);
        let frame = SensorFrame::new(camera(0), &pose, &image);

        // ROI away from the square.
        let out = init
            .initialize(
                &frame,
                LandmarkTypeTag::InverseDepthPoint,
                DetectionMethod::Harris,
                Some(Roi::new(100, 10, 50, 30)),
                &[],
            )
            .unwrap();
        assert!(out.is_none());
        assert_eq!(ids.next_id(), LandmarkId(0));
    }

    #[test]
    fn test_disabled_method_is_error() {
        let (factory, detector) = fixture();
        let ids = LandmarkIdAllocator::new();
        let init = LandmarkInitializer::new(&factory, &detector, &ids);
        let pose = SE3::identity();
        let image = square_image(60, 50, 0);
        let frame = SensorFrame::new(camera(0), &pose, &image);

        assert!(matches!(
            init.initialize(&frame, LandmarkTypeTag::InverseDepthPoint, DetectionMethod::Fast, None, &[]),
            Err(FrontendError::UnsupportedDetectionMethod(_))
        ));
    }

    #[test]
    fn test_inserted_landmark_blocks_repeat_detection() {
        let (factory, detector) = fixture();
        let ids = LandmarkIdAllocator::new();
        let init = LandmarkInitializer::new(&factory, &detector, &ids);
        let shared = SharedState::new();

        let pose = SE3::identity();
        let image = RawImage::new(
            GrayImage::from_fn(160, 120, |x, y| {
                let in_a = (30..42).contains(&x) && (40..52).contains(&y);
                let in_b = (100..112).contains(&x) && (60..72).contains(&y);
                if in_a || in_b { Luma([210]) } else { Luma([40]) }
            }),
            0,
        );
        let frame = SensorFrame::new(camera(0), &pose, &image);

        let mut pixels = Vec::new();
        for _ in 0..2 {
            // Inserts from the previous round must be visible here.
            let existing: Vec<ProjectedLandmark> = shared
                .map
                .read()
                .iter()
                .map(|l| {
                    let p = l.descriptor.anchor_pixel();
                    ProjectedLandmark::new(l.handle.id, p.x, p.y)
                })
                .collect();
            let msg = init
                .initialize(
                    &frame,
                    LandmarkTypeTag::InverseDepthPoint,
                    DetectionMethod::Harris,
                    None,
                    &existing,
                )
                .unwrap()
                .unwrap();
            pixels.push(msg.feature.measurement);
            assert!(shared.insert(msg));
        }

        assert_eq!(shared.landmark_count(), 2);
        assert!((pixels[0] - pixels[1]).norm() >= 20.0);
        assert!(pixels[0].x < 50.0);
        assert!(pixels[1].x >= 90.0);
    }

    #[test]
    fn test_sensors_in_parallel() {
        let config = FrontendConfig::default();
        let factory = config.build_factory().unwrap();
        let detector = config.build_detector().unwrap();
        let ids = LandmarkIdAllocator::new();
        let init = LandmarkInitializer::new(&factory, &detector, &ids);

        let pose = SE3::identity();
        let images: Vec<RawImage> = (0..4).map(|i| square_image(30 + 20 * i, 40, i as u64)).collect();

        let msgs: Vec<NewLandmarkMsg> = std::thread::scope(|s| {
            let handles: Vec<_> = images
                .iter()
                .enumerate()
                .map(|(i, image)| {
                    let pose = &pose;
                    s.spawn(move || {
                        let frame = SensorFrame::new(camera(i as u64), pose, image);
                        init.initialize(
                            &frame,
                            LandmarkTypeTag::InverseDepthPoint,
                            DetectionMethod::Harris,
                            None,
                            &[],
                        )
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap().unwrap().unwrap())
                .collect()
        });

        let unique: HashSet<LandmarkId> = msgs.iter().map(|m| m.landmark.id).collect();
        assert_eq!(unique.len(), 4);
        for msg in &msgs {
            assert_eq!(msg.observation.sensor.id.0, msg.timestamp_ns);
        }
    }
}
