//! Skeleton snapshot builder: turns one raw body frame into exactly
//! [`BODY_COUNT`] slot records and keeps the per-slot gesture readers'
//! tracking identity in sync with the skeletal one.

use crate::sensor::{BODY_COUNT, BodyFrame, GestureSource, UNTRACKED_ID};
use crate::types::{CameraPoint, JointType};

/// One body slot, rebuilt in place every successful body frame. Identity
/// across frames is carried by `tracking_id` only; the same slot index can be
/// a different person later.
#[derive(Clone, Copy, Debug)]
pub struct BodySlot {
    pub slot: usize,
    pub tracked: bool,
    pub tracking_id: u64,
    pub joints: [CameraPoint; JointType::COUNT],
}

impl BodySlot {
    fn untracked(slot: usize) -> Self {
        Self {
            slot,
            tracked: false,
            tracking_id: UNTRACKED_ID,
            joints: [CameraPoint::default(); JointType::COUNT],
        }
    }
}

/// The per-frame body state handed to projection and rendering. When a body
/// poll yields nothing new the previous snapshot stays as-is, so rendering
/// simply draws the stale state.
#[derive(Clone, Debug)]
pub struct Snapshot {
    slots: [BodySlot; BODY_COUNT],
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            slots: std::array::from_fn(BodySlot::untracked),
        }
    }
}

impl Snapshot {
    pub fn slots(&self) -> &[BodySlot; BODY_COUNT] {
        &self.slots
    }

    /// Rebuild every slot from `frame`. Untracked slots get zeroed joints.
    /// Each slot's tracking id is pushed to its gesture reader whether or not
    /// the body is tracked, so gesture identity never lags skeletal identity.
    pub fn rebuild_from<G: GestureSource>(
        &mut self,
        frame: &BodyFrame,
        gesture_readers: &mut [G; BODY_COUNT],
    ) {
        for (slot, body) in frame.bodies().iter().enumerate() {
            let record = &mut self.slots[slot];
            record.tracked = body.tracked;
            record.tracking_id = body.tracking_id;
            record.joints = if body.tracked {
                body.joints
            } else {
                [CameraPoint::default(); JointType::COUNT]
            };

            gesture_readers[slot].register_tracking_id(body.tracking_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::{BodyData, GestureFrame, Poll};

    struct RecordingGestureSource {
        registered: Vec<u64>,
    }

    impl RecordingGestureSource {
        fn new() -> Self {
            Self {
                registered: Vec::new(),
            }
        }
    }

    impl GestureSource for RecordingGestureSource {
        fn register_tracking_id(&mut self, tracking_id: u64) {
            self.registered.push(tracking_id);
        }

        fn acquire_latest(&mut self) -> Poll<GestureFrame> {
            Ok(None)
        }
    }

    fn tracked_body(tracking_id: u64, joint_x: f32) -> BodyData {
        BodyData {
            tracked: true,
            tracking_id,
            joints: [CameraPoint::new(joint_x, 0.5, 2.0); JointType::COUNT],
        }
    }

    fn readers() -> [RecordingGestureSource; BODY_COUNT] {
        std::array::from_fn(|_| RecordingGestureSource::new())
    }

    #[test]
    fn default_snapshot_has_one_record_per_slot() {
        let snapshot = Snapshot::default();
        assert_eq!(snapshot.slots().len(), BODY_COUNT);
        for (index, slot) in snapshot.slots().iter().enumerate() {
            assert_eq!(slot.slot, index);
            assert!(!slot.tracked);
        }
    }

    #[test]
    fn rebuild_copies_tracked_joints_and_zeroes_untracked() {
        let mut bodies: [BodyData; BODY_COUNT] = Default::default();
        bodies[2] = tracked_body(77, 1.25);

        let mut snapshot = Snapshot::default();
        snapshot.rebuild_from(&BodyFrame::new(bodies), &mut readers());

        let slots = snapshot.slots();
        assert!(slots[2].tracked);
        assert_eq!(slots[2].tracking_id, 77);
        assert_eq!(slots[2].joints[0], CameraPoint::new(1.25, 0.5, 2.0));
        for slot in slots.iter().filter(|s| s.slot != 2) {
            assert!(!slot.tracked);
            assert!(slot.joints.iter().all(|j| *j == CameraPoint::default()));
        }
    }

    #[test]
    fn rebuild_registers_ids_for_every_slot_including_untracked_zero() {
        let mut bodies: [BodyData; BODY_COUNT] = Default::default();
        bodies[0] = tracked_body(42, 0.0);

        let mut gesture_readers = readers();
        let mut snapshot = Snapshot::default();
        snapshot.rebuild_from(&BodyFrame::new(bodies), &mut gesture_readers);

        assert_eq!(gesture_readers[0].registered, vec![42]);
        for reader in &gesture_readers[1..] {
            assert_eq!(reader.registered, vec![UNTRACKED_ID]);
        }
    }

    #[test]
    fn lost_tracking_clears_stale_joints() {
        let mut bodies: [BodyData; BODY_COUNT] = Default::default();
        bodies[1] = tracked_body(9, 3.0);

        let mut gesture_readers = readers();
        let mut snapshot = Snapshot::default();
        snapshot.rebuild_from(&BodyFrame::new(bodies), &mut gesture_readers);
        assert!(snapshot.slots()[1].tracked);

        // Same slot goes untracked on the next frame.
        snapshot.rebuild_from(&BodyFrame::new(Default::default()), &mut gesture_readers);
        let slot = &snapshot.slots()[1];
        assert!(!slot.tracked);
        assert!(slot.joints.iter().all(|j| *j == CameraPoint::default()));
    }
}
