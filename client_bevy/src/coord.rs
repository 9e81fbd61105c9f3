use bevy::prelude::{Quat, Vec2, Vec3};
use homeworld_shared::projection::ScreenPos;

use crate::constants::{CANVAS_HEIGHT, CANVAS_WIDTH};

/// Convert design-canvas pixel coordinates (Y-down) to Bevy world coordinates (Y-up).
pub fn px_to_world(px: ScreenPos, z: f32) -> Vec3 {
    let wx = px.x - CANVAS_WIDTH * 0.5;
    let wy = (CANVAS_HEIGHT - px.y) - CANVAS_HEIGHT * 0.5;
    Vec3::new(wx, wy, z)
}

/// Convert Bevy world coordinates (Y-up) to design-canvas pixel coordinates (Y-down).
pub fn world_to_px(world_xy: Vec2) -> ScreenPos {
    ScreenPos {
        x: world_xy.x + CANVAS_WIDTH * 0.5,
        y: CANVAS_HEIGHT * 0.5 - world_xy.y,
    }
}

/// Canvas angles turn clockwise on screen; Bevy's Z rotation is counter-clockwise.
pub fn canvas_rotation(angle: f32) -> Quat {
    Quat::from_rotation_z(-angle)
}
