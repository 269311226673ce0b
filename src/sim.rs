//! Deterministic simulated sensor backend. Stands in for the hardware SDK so
//! the demo binary and the tests exercise the full pipeline without a device:
//! a pinhole coordinate mapper with Kinect-like color intrinsics, a shaded
//! synthetic color stream, orbiting scripted bodies, and gesture readers that
//! answer from a phase script instead of a trained model.

use rayon::prelude::*;

use crate::sensor::{
    BODY_COUNT, BodyData, BodyFrame, BodyReader, ColorFrame, ColorReader, CoordinateMapper,
    GestureFrame, GestureSource, Poll, UNTRACKED_ID,
};
use crate::types::{CameraPoint, ColorPoint, GestureDefinition, GestureKind, JointType};

pub const COLOR_WIDTH: u32 = 1920;
pub const COLOR_HEIGHT: u32 = 1080;

// Body polls report "nothing new" on this cadence to mimic the sensor clock
// running slower than the render loop.
const BODY_EMPTY_CADENCE: u64 = 4;
const GESTURE_EMPTY_CADENCE: u64 = 5;

/// Classic pinhole projection with Kinect v2 color-camera-like intrinsics.
/// Points at or behind the lens map to the SDK's non-finite sentinel.
#[derive(Clone, Copy, Debug)]
pub struct PinholeMapper {
    pub fx: f32,
    pub fy: f32,
    pub cx: f32,
    pub cy: f32,
}

impl Default for PinholeMapper {
    fn default() -> Self {
        Self {
            fx: 1081.37,
            fy: 1081.37,
            cx: 959.5,
            cy: 539.5,
        }
    }
}

impl CoordinateMapper for PinholeMapper {
    fn map_camera_point_to_color(&self, point: CameraPoint) -> ColorPoint {
        if !(point.z.is_finite() && point.z > 0.0) {
            return ColorPoint::UNMAPPED;
        }
        ColorPoint::new(
            self.cx + self.fx * point.x / point.z,
            // Camera space Y grows upward, image space Y grows downward.
            self.cy - self.fy * point.y / point.z,
        )
    }
}

/// Synthetic color stream: a slowly scrolling shaded gradient, regenerated
/// every poll. Row-parallel fill keeps a 1920x1080 frame cheap.
pub struct SimColorReader {
    width: u32,
    height: u32,
    tick: u64,
}

impl SimColorReader {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tick: 0,
        }
    }
}

impl ColorReader for SimColorReader {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn acquire_latest(&mut self) -> Poll<ColorFrame> {
        self.tick += 1;
        let shift = (self.tick * 2 % 256) as u32;
        let (width, height) = (self.width, self.height);

        let stride = width as usize * 4;
        let mut rgba = vec![0u8; stride * height as usize];
        rgba.par_chunks_exact_mut(stride)
            .enumerate()
            .for_each(|(y, row)| {
                let g = (y as u32 * 255 / height.max(1)) as u8;
                for (x, px) in row.chunks_exact_mut(4).enumerate() {
                    let r = ((x as u32 + shift) * 255 / width.max(1)) as u8;
                    px[0] = r / 3 + 20;
                    px[1] = g / 3 + 20;
                    px[2] = 60;
                    px[3] = 255;
                }
            });

        Ok(Some(ColorFrame::new(rgba, width, height)))
    }
}

/// A scripted person occupying one body slot.
#[derive(Clone, Copy, Debug)]
pub struct SimActor {
    pub slot: usize,
    pub tracking_id: u64,
    pub phase: f32,
}

/// Scripted body stream: each actor sways side to side at ~2.5 m depth with a
/// rough humanoid joint layout around the spine base.
pub struct SimBodyReader {
    actors: Vec<SimActor>,
    tick: u64,
}

impl SimBodyReader {
    pub fn new(actors: Vec<SimActor>) -> Self {
        Self { actors, tick: 0 }
    }

    /// Two actors in slots 0 and 2, leaving the rest untracked.
    pub fn demo_scene() -> Self {
        Self::new(vec![
            SimActor {
                slot: 0,
                tracking_id: 101,
                phase: 0.0,
            },
            SimActor {
                slot: 2,
                tracking_id: 202,
                phase: 2.1,
            },
        ])
    }

    fn pose(actor: &SimActor, t: f32) -> [CameraPoint; JointType::COUNT] {
        let sway = 0.6 * (0.5 * t + actor.phase).sin();
        let bob = 0.05 * (1.3 * t + actor.phase).sin();
        let depth = 2.5 + 0.3 * (0.2 * t + actor.phase).cos();

        let mut joints = [CameraPoint::default(); JointType::COUNT];
        for joint in JointType::ALL {
            let (dx, dy) = joint_offset(joint);
            joints[joint as usize] = CameraPoint::new(sway + dx, bob + dy, depth);
        }
        joints
    }
}

impl BodyReader for SimBodyReader {
    fn acquire_latest(&mut self) -> Poll<BodyFrame> {
        self.tick += 1;
        if self.tick % BODY_EMPTY_CADENCE == 0 {
            return Ok(None);
        }

        let t = self.tick as f32 / 30.0;
        let mut bodies: [BodyData; BODY_COUNT] = Default::default();
        for actor in &self.actors {
            bodies[actor.slot] = BodyData {
                tracked: true,
                tracking_id: actor.tracking_id,
                joints: Self::pose(actor, t),
            };
        }
        Ok(Some(BodyFrame::new(bodies)))
    }
}

/// Offsets from the spine base, meters, in camera space (Y up).
fn joint_offset(joint: JointType) -> (f32, f32) {
    use JointType::*;
    match joint {
        SpineBase => (0.0, 0.0),
        SpineMid => (0.0, 0.25),
        SpineShoulder => (0.0, 0.45),
        Neck => (0.0, 0.52),
        Head => (0.0, 0.65),
        ShoulderLeft => (-0.20, 0.45),
        ElbowLeft => (-0.30, 0.20),
        WristLeft => (-0.35, -0.02),
        HandLeft => (-0.37, -0.08),
        HandTipLeft => (-0.38, -0.14),
        ThumbLeft => (-0.33, -0.10),
        ShoulderRight => (0.20, 0.45),
        ElbowRight => (0.30, 0.20),
        WristRight => (0.35, -0.02),
        HandRight => (0.37, -0.08),
        HandTipRight => (0.38, -0.14),
        ThumbRight => (0.33, -0.10),
        HipLeft => (-0.10, -0.05),
        KneeLeft => (-0.12, -0.45),
        AnkleLeft => (-0.13, -0.85),
        FootLeft => (-0.13, -0.92),
        HipRight => (0.10, -0.05),
        KneeRight => (0.12, -0.45),
        AnkleRight => (0.13, -0.85),
        FootRight => (0.13, -0.92),
    }
}

/// Scripted gesture reader for one slot. Discrete detections fire during a
/// phase window; continuous progress sweeps 0..1 and wraps.
pub struct SimGestureSource {
    slot: usize,
    gestures: Vec<GestureDefinition>,
    tracking_id: u64,
    tick: u64,
}

impl SimGestureSource {
    pub fn new(slot: usize, gestures: Vec<GestureDefinition>) -> Self {
        Self {
            slot,
            gestures,
            tracking_id: UNTRACKED_ID,
            tick: 0,
        }
    }
}

impl GestureSource for SimGestureSource {
    fn register_tracking_id(&mut self, tracking_id: u64) {
        self.tracking_id = tracking_id;
    }

    fn acquire_latest(&mut self) -> Poll<GestureFrame> {
        self.tick += 1;
        if self.tick % GESTURE_EMPTY_CADENCE == 0 {
            return Ok(None);
        }

        let mut frame = GestureFrame::new(self.tracking_id != UNTRACKED_ID);
        let phase = self.tick + 17 * self.slot as u64;
        for (index, gesture) in self.gestures.iter().enumerate() {
            match gesture.kind {
                GestureKind::Discrete => {
                    // Each gesture gets its own firing window inside a 90-tick
                    // cycle so detections do not all land on the same frame.
                    let window = (phase + 30 * index as u64) % 90;
                    let detected = window < 12;
                    let confidence = 0.6 + 0.35 * ((phase % 13) as f32 / 13.0);
                    frame = frame.with_discrete(&gesture.name, detected, confidence);
                }
                GestureKind::Continuous => {
                    let progress = (phase % 90) as f32 / 90.0;
                    frame = frame.with_continuous(&gesture.name, progress);
                }
            }
        }
        Ok(Some(frame))
    }
}

/// Wire up the whole simulated sensor for the demo scene.
pub fn build_sim(
    gestures: &[GestureDefinition],
) -> (
    SimColorReader,
    SimBodyReader,
    [SimGestureSource; BODY_COUNT],
    PinholeMapper,
) {
    let gesture_readers =
        std::array::from_fn(|slot| SimGestureSource::new(slot, gestures.to_vec()));
    (
        SimColorReader::new(COLOR_WIDTH, COLOR_HEIGHT),
        SimBodyReader::demo_scene(),
        gesture_readers,
        PinholeMapper::default(),
    )
}
