use serde::{Deserialize, Serialize};

/// Pixel coordinates in design-canvas space (origin top-left, Y-down).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenPos {
    pub x: f32,
    pub y: f32,
}

impl ScreenPos {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: ScreenPos) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn offset(self, dx: f32, dy: f32) -> ScreenPos {
        ScreenPos::new(self.x + dx, self.y + dy)
    }
}

/// Point on the rim for `base_angle` after the world has turned by `world_angle`.
///
/// Angle 0 is the top of the circle; positive angles run clockwise on screen.
pub fn project(base_angle: f32, world_angle: f32, center: ScreenPos, radius: f32) -> ScreenPos {
    let effective = base_angle + world_angle;
    ScreenPos {
        x: center.x + effective.sin() * radius,
        y: center.y - effective.cos() * radius,
    }
}

/// Unit outward normal at `effective_angle` in screen space.
pub fn outward_normal(effective_angle: f32) -> (f32, f32) {
    (effective_angle.sin(), -effective_angle.cos())
}

/// Shift `point` by `offset` pixels along the outward normal (positive = away from the center).
pub fn along_normal(point: ScreenPos, effective_angle: f32, offset: f32) -> ScreenPos {
    let (nx, ny) = outward_normal(effective_angle);
    point.offset(nx * offset, ny * offset)
}

/// The planet disc every surface entity is placed on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolarProjector {
    pub center: ScreenPos,
    pub radius: f32,
}

impl PolarProjector {
    pub const fn new(center: ScreenPos, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn project(&self, base_angle: f32, world_angle: f32) -> ScreenPos {
        project(base_angle, world_angle, self.center, self.radius)
    }

    /// Rim point plus a radial pixel offset.
    pub fn surface_point(&self, base_angle: f32, world_angle: f32, radial_offset: f32) -> ScreenPos {
        let rim = self.project(base_angle, world_angle);
        along_normal(rim, base_angle + world_angle, radial_offset)
    }
}
