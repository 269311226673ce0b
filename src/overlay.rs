//! Joint overlay rendering: stamps a filled circle per drawable joint into an
//! RGBA buffer. Pure buffer manipulation, no windowing involved.

use crate::sensor::BODY_COUNT;
use crate::types::ProjectedJoint;

pub const JOINT_RADIUS: i32 = 10;

// One color per body slot.
const SLOT_COLORS: [[u8; 4]; BODY_COUNT] = [
    [248, 113, 113, 255],
    [56, 189, 248, 255],
    [52, 211, 153, 255],
    [251, 191, 36, 255],
    [192, 132, 252, 255],
    [244, 114, 182, 255],
];

pub fn draw_joints(buffer: &mut [u8], width: u32, height: u32, joints: &[ProjectedJoint]) {
    for joint in joints {
        if !joint.in_bounds {
            continue;
        }
        draw_circle(
            buffer,
            width,
            height,
            (joint.x, joint.y),
            JOINT_RADIUS,
            SLOT_COLORS[joint.slot % BODY_COUNT],
        );
    }
}

fn draw_circle(
    buffer: &mut [u8],
    width: u32,
    height: u32,
    center: (i32, i32),
    radius: i32,
    color: [u8; 4],
) {
    let (cx, cy) = center;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                put_pixel_safe(buffer, width, height, cx + dx, cy + dy, color);
            }
        }
    }
}

fn put_pixel_safe(buffer: &mut [u8], width: u32, height: u32, x: i32, y: i32, color: [u8; 4]) {
    if x < 0 || y < 0 {
        return;
    }
    let (ux, uy) = (x as u32, y as u32);
    if ux >= width || uy >= height {
        return;
    }
    let idx = ((uy * width + ux) as usize) * 4;
    if idx + 3 < buffer.len() {
        buffer[idx..idx + 4].copy_from_slice(&color);
    }
}
