//! Per-frame sequencing. One `update()` per tick, driven by an external
//! fixed-rate loop, single-threaded throughout. Frame handles acquired from
//! the sensor never outlive the tick that acquired them.

use std::time::Instant;

use crate::overlay;
use crate::pipeline::{MalformedNamePolicy, Snapshot, evaluate_gestures, project_snapshot};
use crate::sensor::{
    BODY_COUNT, BodyReader, ColorReader, CoordinateMapper, GestureSource, PixelFormat, SensorError,
};
use crate::types::{Frame, GestureDefinition, GestureReading};

pub struct App<C, B, G, M> {
    color_reader: C,
    body_reader: B,
    gesture_readers: [G; BODY_COUNT],
    mapper: M,
    gestures: Vec<GestureDefinition>,
    policy: MalformedNamePolicy,
    color: Frame,
    snapshot: Snapshot,
    readings: Vec<GestureReading>,
}

impl<C, B, G, M> App<C, B, G, M>
where
    C: ColorReader,
    B: BodyReader,
    G: GestureSource,
    M: CoordinateMapper,
{
    pub fn new(
        color_reader: C,
        body_reader: B,
        gesture_readers: [G; BODY_COUNT],
        mapper: M,
        gestures: Vec<GestureDefinition>,
        policy: MalformedNamePolicy,
    ) -> Self {
        let color = Frame::blank(color_reader.width(), color_reader.height());
        Self {
            color_reader,
            body_reader,
            gesture_readers,
            mapper,
            gestures,
            policy,
            color,
            snapshot: Snapshot::default(),
            readings: Vec::new(),
        }
    }

    /// Run one tick of the pipeline: color poll/decode, body poll → snapshot
    /// rebuild + tracking id propagation, gesture evaluation. Empty polls
    /// leave the previous color image and snapshot in place so rendering
    /// shows the last known state. Device errors propagate; there is no
    /// retry or reconnect.
    pub fn update(&mut self) -> Result<(), SensorError> {
        if let Some(frame) = self.color_reader.acquire_latest()? {
            frame.copy_converted_to(&mut self.color.rgba, PixelFormat::Rgba)?;
            self.color.timestamp = Instant::now();
        }

        if let Some(frame) = self.body_reader.acquire_latest()? {
            self.snapshot
                .rebuild_from(&frame, &mut self.gesture_readers);
        }

        self.readings = evaluate_gestures(&mut self.gesture_readers, &self.gestures, self.policy)?;

        Ok(())
    }

    /// Composite the current color image with the projected joint overlay.
    pub fn render(&self) -> Frame {
        let mut frame = self.color.clone();
        let drawable = project_snapshot(&self.mapper, &self.snapshot, frame.width, frame.height);
        overlay::draw_joints(&mut frame.rgba, frame.width, frame.height, &drawable);
        frame
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Most recently decoded color image, without the overlay.
    pub fn color_image(&self) -> &Frame {
        &self.color
    }

    /// Gesture readings from the most recent tick. Transient; replaced wholesale
    /// every update.
    pub fn readings(&self) -> &[GestureReading] {
        &self.readings
    }
}
