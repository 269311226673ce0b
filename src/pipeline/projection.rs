//! Projection pass: maps captured joints through the coordinate mapper into
//! color-image space. Stateless, recomputed in full every tick, never touches
//! the snapshot it reads.

use crate::pipeline::snapshot::Snapshot;
use crate::sensor::CoordinateMapper;
use crate::types::{CameraPoint, JointType, ProjectedJoint};

/// Map a single joint. Coordinates are truncated toward zero, not rounded.
/// An `as` cast would fold NaN sentinels to 0, which lands inside the image,
/// so finiteness is checked before casting.
pub fn project_joint<M: CoordinateMapper>(
    mapper: &M,
    slot: usize,
    joint: JointType,
    position: CameraPoint,
    width: u32,
    height: u32,
) -> ProjectedJoint {
    let mapped = mapper.map_camera_point_to_color(position);

    if !mapped.is_mappable() {
        return ProjectedJoint {
            slot,
            joint,
            x: i32::MIN,
            y: i32::MIN,
            in_bounds: false,
        };
    }

    let x = mapped.x as i32;
    let y = mapped.y as i32;
    let in_bounds = x >= 0 && y >= 0 && (x as u32) < width && (y as u32) < height;

    ProjectedJoint {
        slot,
        joint,
        x,
        y,
        in_bounds,
    }
}

/// Project every joint of every slot and keep the drawable ones. Untracked
/// slots are projected too; their zeroed joints sit at the camera origin,
/// which the mapper reports as unmappable, so they fall out here rather than
/// through a tracked check.
pub fn project_snapshot<M: CoordinateMapper>(
    mapper: &M,
    snapshot: &Snapshot,
    width: u32,
    height: u32,
) -> Vec<ProjectedJoint> {
    let mut drawable = Vec::new();

    for slot in snapshot.slots() {
        for joint in JointType::ALL {
            let projected = project_joint(
                mapper,
                slot.slot,
                joint,
                slot.joints[joint as usize],
                width,
                height,
            );
            if projected.in_bounds {
                drawable.push(projected);
            }
        }
    }

    drawable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColorPoint;

    /// Passes x/y through as pixels, flagging z <= 0 as unmappable.
    struct PassthroughMapper;

    impl CoordinateMapper for PassthroughMapper {
        fn map_camera_point_to_color(&self, point: CameraPoint) -> ColorPoint {
            if point.z <= 0.0 {
                ColorPoint::UNMAPPED
            } else {
                ColorPoint::new(point.x, point.y)
            }
        }
    }

    fn project(x: f32, y: f32) -> ProjectedJoint {
        project_joint(
            &PassthroughMapper,
            0,
            JointType::Head,
            CameraPoint::new(x, y, 1.0),
            1920,
            1080,
        )
    }

    #[test]
    fn coordinates_are_truncated_not_rounded() {
        let point = project(100.9, 200.7);
        assert_eq!((point.x, point.y), (100, 200));
        assert!(point.in_bounds);
    }

    #[test]
    fn width_edge_is_exclusive() {
        assert!(!project(1920.0, 540.0).in_bounds);
        assert!(project(1919.0, 540.0).in_bounds);
    }

    #[test]
    fn height_edge_is_exclusive() {
        assert!(!project(960.0, 1080.0).in_bounds);
        assert!(project(960.0, 1079.0).in_bounds);
    }

    #[test]
    fn negative_coordinates_are_excluded() {
        assert!(!project(-1.0, 540.0).in_bounds);
        assert!(!project(960.0, -1.0).in_bounds);
    }

    #[test]
    fn unmappable_sentinel_is_excluded_silently() {
        let behind = project_joint(
            &PassthroughMapper,
            0,
            JointType::Head,
            CameraPoint::new(0.5, 0.5, -1.0),
            1920,
            1080,
        );
        assert!(!behind.in_bounds);
    }

    #[test]
    fn nan_mapping_is_excluded() {
        struct NanMapper;
        impl CoordinateMapper for NanMapper {
            fn map_camera_point_to_color(&self, _point: CameraPoint) -> ColorPoint {
                ColorPoint::new(f32::NAN, f32::NAN)
            }
        }
        let point = project_joint(
            &NanMapper,
            0,
            JointType::Head,
            CameraPoint::new(0.0, 0.0, 1.0),
            1920,
            1080,
        );
        assert!(!point.in_bounds);
    }

    #[test]
    fn projection_is_idempotent() {
        let position = CameraPoint::new(123.4, 567.8, 1.0);
        let first = project_joint(&PassthroughMapper, 2, JointType::HandLeft, position, 1920, 1080);
        let second = project_joint(&PassthroughMapper, 2, JointType::HandLeft, position, 1920, 1080);
        assert_eq!(first, second);
    }

    #[test]
    fn untracked_slots_contribute_nothing() {
        let drawable = project_snapshot(&PassthroughMapper, &Snapshot::default(), 1920, 1080);
        assert!(drawable.is_empty());
    }
}
