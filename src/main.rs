use std::path::Path;
use std::sync::Arc;
use std::thread;

use anyhow::{Result, anyhow};
use crossbeam_channel::{Receiver, Sender, bounded};
use image::{GrayImage, Luma};
use nalgebra::{UnitQuaternion, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use vslam_frontend::config::FrontendConfig;
use vslam_frontend::detection::DetectionMethod;
use vslam_frontend::frame::{RawImage, SensorFrame, SensorHandle, SensorId, SensorTypeTag};
use vslam_frontend::geometry::SE3;
use vslam_frontend::map::{LandmarkIdAllocator, LandmarkTypeTag, ParametrizationState, ProjectedLandmark};
use vslam_frontend::system::{LandmarkInitializer, NewLandmarkMsg, SharedState};

const NUM_CYCLES: u64 = 12;
const FRAME_PERIOD_NS: u64 = 50_000_000;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vslam_frontend=info".parse()?),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => FrontendConfig::from_yaml_file(Path::new(&path))?,
        None => FrontendConfig::default(),
    };

    // Startup: register every maker, then freeze.
    let factory = config.build_factory()?;
    let detector = config.build_detector()?;
    let ids = LandmarkIdAllocator::new();
    let method = detector
        .methods()
        .first()
        .copied()
        .ok_or_else(|| anyhow!("no detection method enabled"))?;

    let sensors = [
        (SensorHandle::new(SensorId(0), SensorTypeTag::PinholeCamera), synthetic_scene(640, 480, 1)),
        (SensorHandle::new(SensorId(1), SensorTypeTag::PinholeCamera), synthetic_scene(640, 480, 2)),
    ];
    let poses = [
        SE3::identity(),
        SE3::new(
            UnitQuaternion::from_euler_angles(0.0, 0.05, 0.0),
            Vector3::new(0.1, 0.0, 0.0),
        ),
    ];

    let shared = SharedState::new();
    let (tx, rx) = bounded::<NewLandmarkMsg>(64);
    // One ack per processed message, so a cycle can wait until its
    // landmarks are visible before the next one predicts projections.
    let (ack_tx, ack_rx) = bounded::<bool>(64);

    let inserter = {
        let shared = Arc::clone(&shared);
        thread::spawn(move || {
            let mut inserted = 0usize;
            for msg in rx {
                let accepted = shared.insert(msg);
                if accepted {
                    inserted += 1;
                }
                if ack_tx.send(accepted).is_err() {
                    break;
                }
            }
            inserted
        })
    };

    let init = LandmarkInitializer::new(&factory, &detector, &ids);
    for cycle in 0..NUM_CYCLES {
        let timestamp_ns = cycle * FRAME_PERIOD_NS;
        let queued = thread::scope(|s| {
            let handles: Vec<_> = sensors
                .iter()
                .zip(&poses)
                .map(|((sensor, pixels), pose)| {
                    let tx = tx.clone();
                    let shared = &shared;
                    s.spawn(move || {
                        let image = RawImage::new(pixels.clone(), timestamp_ns);
                        let frame = SensorFrame::new(*sensor, pose, &image);
                        let existing = predicted_projections(shared, sensor.id);
                        process_sensor(init, &frame, method, &existing, &tx)
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or(false))
                .filter(|&queued| queued)
                .count()
        });
        let accepted = wait_for_inserts(&ack_rx, queued)?;
        debug!(cycle, queued, accepted, "cycle inserted");
    }
    drop(tx);

    let inserted = inserter
        .join()
        .map_err(|_| anyhow!("landmark inserter thread panicked"))?;
    info!(inserted, landmarks = shared.landmark_count(), "acquisition finished");

    // The estimator would report a shrinking depth-uncertainty ratio as
    // parallax builds up.
    {
        let mut map = shared.map.write();
        let ids: Vec<_> = map.iter().map(|l| l.handle.id).collect();
        for step in 1..=10 {
            let ratio = 1.0 / step as f64;
            for id in &ids {
                map.report_uncertainty(*id, ratio);
            }
        }
        info!(
            total = map.len(),
            inverse_depth = map.count_in(ParametrizationState::InverseDepth),
            euclidean = map.count_in(ParametrizationState::Euclidean),
            "map summary"
        );
    }

    Ok(())
}

fn process_sensor(
    init: LandmarkInitializer<'_>,
    frame: &SensorFrame<'_>,
    method: DetectionMethod,
    existing: &[ProjectedLandmark],
    tx: &Sender<NewLandmarkMsg>,
) -> bool {
    match init.initialize(frame, LandmarkTypeTag::InverseDepthPoint, method, None, existing) {
        Ok(Some(msg)) => {
            if tx.send(msg).is_err() {
                warn!(sensor = %frame.sensor.id, "inserter gone, dropping landmark");
                return false;
            }
            true
        }
        Ok(None) => false,
        Err(e) => {
            warn!(sensor = %frame.sensor.id, error = %e, "landmark initialization failed");
            false
        }
    }
}

/// Wait until the inserter has handled `queued` messages.
fn wait_for_inserts(ack_rx: &Receiver<bool>, queued: usize) -> Result<usize> {
    let mut accepted = 0;
    for _ in 0..queued {
        if ack_rx
            .recv()
            .map_err(|_| anyhow!("landmark inserter stopped mid-cycle"))?
        {
            accepted += 1;
        }
    }
    Ok(accepted)
}

/// Static camera: a landmark is predicted where it was first seen.
fn predicted_projections(shared: &SharedState, sensor: SensorId) -> Vec<ProjectedLandmark> {
    let map = shared.map.read();
    map.iter()
        .filter(|l| l.descriptor.anchor_sensor() == sensor)
        .map(|l| {
            let p = l.descriptor.anchor_pixel();
            ProjectedLandmark::new(l.handle.id, p.x, p.y)
        })
        .collect()
}

/// Textured background with bright and dark blocks at random places.
fn synthetic_scene(width: u32, height: u32, seed: u64) -> GrayImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut img = GrayImage::from_fn(width, height, |_, _| Luma([90]));
    for pixel in img.pixels_mut() {
        pixel.0[0] = 90 + rng.gen_range(0..3u8);
    }
    for _ in 0..40 {
        let side = rng.gen_range(12..40u32);
        let x0 = rng.gen_range(0..width - side);
        let y0 = rng.gen_range(0..height - side);
        let v: u8 = if rng.gen_bool(0.5) { 200 } else { 20 };
        for y in y0..y0 + side {
            for x in x0..x0 + side {
                img.put_pixel(x, y, Luma([v]));
            }
        }
    }
    img
}
