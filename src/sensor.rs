//! The frame source seam. The actual sensor SDK (skeletal inference, gesture
//! recognizers, calibration) lives behind these traits; the pipeline only
//! sequences non-blocking "latest available" polls against them.
//!
//! Every poll returns `Ok(None)` when no new data is ready. That happens
//! constantly (the sensor runs on its own clock) and is never an error.
//! `Err(SensorError)` is reserved for device-level failures.

use std::collections::HashMap;

use thiserror::Error;

use crate::types::{CameraPoint, ColorPoint, ContinuousResult, DiscreteResult, GestureDefinition, JointType};

/// Number of concurrent body tracking slots the sensor exposes.
pub const BODY_COUNT: usize = 6;

/// Tracking id the sensor reports for a slot nobody occupies.
pub const UNTRACKED_ID: u64 = 0;

#[derive(Debug, Error)]
pub enum SensorError {
    #[error("sensor device failure: {0}")]
    Device(String),
    #[error("color frame decode failed: {0}")]
    Decode(String),
    #[error("gesture {0:?} is not registered with this reader")]
    UnknownGesture(String),
    #[error("malformed sensor data: {0}")]
    MalformedData(String),
}

/// Non-blocking acquisition result: `Ok(None)` means nothing new yet.
pub type Poll<T> = Result<Option<T>, SensorError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    Rgba,
    Bgra,
}

/// One color frame, owned for the duration of a single pipeline tick.
#[derive(Debug)]
pub struct ColorFrame {
    rgba: Vec<u8>,
    width: u32,
    height: u32,
}

impl ColorFrame {
    pub fn new(rgba: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(rgba.len(), width as usize * height as usize * 4);
        Self {
            rgba,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Decode into a caller-owned buffer, converting to the requested pixel
    /// order. The destination must match the frame dimensions exactly.
    pub fn copy_converted_to(&self, dest: &mut [u8], format: PixelFormat) -> Result<(), SensorError> {
        if dest.len() != self.rgba.len() {
            return Err(SensorError::Decode(format!(
                "destination buffer is {} bytes, frame needs {}",
                dest.len(),
                self.rgba.len()
            )));
        }
        match format {
            PixelFormat::Rgba => dest.copy_from_slice(&self.rgba),
            PixelFormat::Bgra => {
                for (out, px) in dest.chunks_exact_mut(4).zip(self.rgba.chunks_exact(4)) {
                    out[0] = px[2];
                    out[1] = px[1];
                    out[2] = px[0];
                    out[3] = px[3];
                }
            }
        }
        Ok(())
    }
}

pub trait ColorReader {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn acquire_latest(&mut self) -> Poll<ColorFrame>;
}

/// Raw per-slot body data as the sensor reports it. `tracking_id` and
/// `joints` are only meaningful while `tracked` is set, but both are always
/// readable.
#[derive(Clone, Copy, Debug)]
pub struct BodyData {
    pub tracked: bool,
    pub tracking_id: u64,
    pub joints: [CameraPoint; JointType::COUNT],
}

impl Default for BodyData {
    fn default() -> Self {
        Self {
            tracked: false,
            tracking_id: UNTRACKED_ID,
            joints: [CameraPoint::default(); JointType::COUNT],
        }
    }
}

/// One body frame, owned for the duration of a single pipeline tick. Always
/// carries exactly [`BODY_COUNT`] slots regardless of how many people the
/// sensor actually sees.
#[derive(Debug)]
pub struct BodyFrame {
    bodies: [BodyData; BODY_COUNT],
}

impl BodyFrame {
    pub fn new(bodies: [BodyData; BODY_COUNT]) -> Self {
        Self { bodies }
    }

    pub fn bodies(&self) -> &[BodyData; BODY_COUNT] {
        &self.bodies
    }
}

pub trait BodyReader {
    fn acquire_latest(&mut self) -> Poll<BodyFrame>;
}

/// Gesture evaluation output for one slot and one tick. Results are queried
/// per definition the way the SDK exposes them; asking for a gesture the
/// reader was never given is a device-level error, not an empty result.
#[derive(Clone, Debug, Default)]
pub struct GestureFrame {
    tracking_id_valid: bool,
    discrete: HashMap<String, DiscreteResult>,
    continuous: HashMap<String, ContinuousResult>,
}

impl GestureFrame {
    pub fn new(tracking_id_valid: bool) -> Self {
        Self {
            tracking_id_valid,
            ..Self::default()
        }
    }

    pub fn with_discrete(mut self, name: impl Into<String>, detected: bool, confidence: f32) -> Self {
        self.discrete.insert(
            name.into(),
            DiscreteResult {
                detected,
                confidence,
            },
        );
        self
    }

    pub fn with_continuous(mut self, name: impl Into<String>, progress: f32) -> Self {
        self.continuous.insert(name.into(), ContinuousResult { progress });
        self
    }

    /// Whether the reader's registered tracking id currently refers to a
    /// tracked body. False for the untracked sentinel id.
    pub fn tracking_id_valid(&self) -> bool {
        self.tracking_id_valid
    }

    pub fn discrete_result(&self, gesture: &GestureDefinition) -> Result<DiscreteResult, SensorError> {
        self.discrete
            .get(&gesture.name)
            .copied()
            .ok_or_else(|| SensorError::UnknownGesture(gesture.name.clone()))
    }

    pub fn continuous_result(&self, gesture: &GestureDefinition) -> Result<ContinuousResult, SensorError> {
        self.continuous
            .get(&gesture.name)
            .copied()
            .ok_or_else(|| SensorError::UnknownGesture(gesture.name.clone()))
    }
}

/// One gesture reader per body slot. The registered tracking id follows the
/// slot's skeletal identity, including the untracked sentinel `0`.
pub trait GestureSource {
    fn register_tracking_id(&mut self, tracking_id: u64);
    fn acquire_latest(&mut self) -> Poll<GestureFrame>;
}

/// Camera-space to color-image-space conversion, owned by the sensor. Pure
/// and idempotent; unmappable points come back non-finite.
pub trait CoordinateMapper {
    fn map_camera_point_to_color(&self, point: CameraPoint) -> ColorPoint;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GestureKind;

    #[test]
    fn copy_converted_rgba_is_verbatim() {
        let frame = ColorFrame::new(vec![1, 2, 3, 4, 5, 6, 7, 8], 2, 1);
        let mut dest = vec![0u8; 8];
        frame.copy_converted_to(&mut dest, PixelFormat::Rgba).unwrap();
        assert_eq!(dest, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn copy_converted_bgra_swaps_channels() {
        let frame = ColorFrame::new(vec![1, 2, 3, 4], 1, 1);
        let mut dest = vec![0u8; 4];
        frame.copy_converted_to(&mut dest, PixelFormat::Bgra).unwrap();
        assert_eq!(dest, vec![3, 2, 1, 4]);
    }

    #[test]
    fn copy_converted_rejects_wrong_size() {
        let frame = ColorFrame::new(vec![0; 8], 2, 1);
        let mut dest = vec![0u8; 4];
        let err = frame.copy_converted_to(&mut dest, PixelFormat::Rgba);
        assert!(matches!(err, Err(SensorError::Decode(_))));
    }

    #[test]
    fn unknown_gesture_is_a_device_error() {
        let frame = GestureFrame::new(true).with_discrete("Punch", true, 0.9);
        let known = GestureDefinition::new("Punch", GestureKind::Discrete);
        let unknown = GestureDefinition::new("Wave", GestureKind::Discrete);
        assert!(frame.discrete_result(&known).is_ok());
        assert!(matches!(
            frame.discrete_result(&unknown),
            Err(SensorError::UnknownGesture(_))
        ));
    }

    #[test]
    fn default_body_data_is_untracked_with_zeroed_joints() {
        let body = BodyData::default();
        assert!(!body.tracked);
        assert_eq!(body.tracking_id, UNTRACKED_ID);
        assert!(body.joints.iter().all(|j| *j == CameraPoint::default()));
    }
}
