use std::time::Instant;

#[derive(Clone, Debug)]
pub struct Frame {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub timestamp: Instant,
}

impl Frame {
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            rgba: vec![0; width as usize * height as usize * 4],
            width,
            height,
            timestamp: Instant::now(),
        }
    }
}

/// 3D position in camera space, meters. Z grows away from the lens.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl CameraPoint {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// 2D position in color-image space, pixels. The coordinate mapper reports
/// unmappable points (behind the lens, lost calibration) with non-finite
/// coordinates rather than an error.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorPoint {
    pub x: f32,
    pub y: f32,
}

impl ColorPoint {
    pub const UNMAPPED: ColorPoint = ColorPoint {
        x: f32::NEG_INFINITY,
        y: f32::NEG_INFINITY,
    };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_mappable(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Kinect v2 joint set. Joint arrays are indexed by `JointType as usize`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum JointType {
    SpineBase,
    SpineMid,
    Neck,
    Head,
    ShoulderLeft,
    ElbowLeft,
    WristLeft,
    HandLeft,
    ShoulderRight,
    ElbowRight,
    WristRight,
    HandRight,
    HipLeft,
    KneeLeft,
    AnkleLeft,
    FootLeft,
    HipRight,
    KneeRight,
    AnkleRight,
    FootRight,
    SpineShoulder,
    HandTipLeft,
    ThumbLeft,
    HandTipRight,
    ThumbRight,
}

impl JointType {
    pub const COUNT: usize = 25;

    pub const ALL: [JointType; JointType::COUNT] = [
        JointType::SpineBase,
        JointType::SpineMid,
        JointType::Neck,
        JointType::Head,
        JointType::ShoulderLeft,
        JointType::ElbowLeft,
        JointType::WristLeft,
        JointType::HandLeft,
        JointType::ShoulderRight,
        JointType::ElbowRight,
        JointType::WristRight,
        JointType::HandRight,
        JointType::HipLeft,
        JointType::KneeLeft,
        JointType::AnkleLeft,
        JointType::FootLeft,
        JointType::HipRight,
        JointType::KneeRight,
        JointType::AnkleRight,
        JointType::FootRight,
        JointType::SpineShoulder,
        JointType::HandTipLeft,
        JointType::ThumbLeft,
        JointType::HandTipRight,
        JointType::ThumbRight,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureKind {
    Discrete,
    Continuous,
}

/// One pre-trained recognizer from the gesture database. Loaded once at
/// startup, shared read-only across all body slots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GestureDefinition {
    /// Name exactly as the database delivered it. The SDK hands names back in
    /// a fixed-capacity buffer, so this may carry trailing space/NUL padding.
    pub name: String,
    pub kind: GestureKind,
}

impl GestureDefinition {
    pub fn new(name: impl Into<String>, kind: GestureKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Display name with the fixed-capacity buffer padding stripped. May be
    /// empty if the name was all padding.
    pub fn trimmed_name(&self) -> &str {
        self.name.trim_end_matches([' ', '\0'])
    }
}

/// Raw discrete recognizer output. `confidence` is only meaningful when
/// `detected` is true.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiscreteResult {
    pub detected: bool,
    pub confidence: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContinuousResult {
    pub progress: f32,
}

/// Emitted gesture state. Discrete non-detections are suppressed before this
/// point, so a `Discrete` value always means "detected".
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureValue {
    Discrete { confidence: f32 },
    Continuous { progress: f32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct GestureReading {
    pub slot: usize,
    pub name: String,
    pub value: GestureValue,
}

impl GestureReading {
    pub fn display_text(&self) -> String {
        match self.value {
            GestureValue::Discrete { confidence } => format!(
                "[slot {}] {} detected ({:.0}%)",
                self.slot,
                self.name,
                confidence * 100.0
            ),
            GestureValue::Continuous { progress } => {
                format!("[slot {}] {} progress {:.2}", self.slot, self.name, progress)
            }
        }
    }
}

/// A joint mapped into color-image space. Coordinates are truncated, not
/// rounded; non-finite mappings are never in bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProjectedJoint {
    pub slot: usize,
    pub joint: JointType,
    pub x: i32,
    pub y: i32,
    pub in_bounds: bool,
}
