use bevy::prelude::*;
use bevy_prototype_lyon::prelude::*;
use homeworld_shared::lighting::SkyPalette;

use crate::constants::{color_from_hex, Colors, CANVAS_HEIGHT, CANVAS_WIDTH, Z_NIGHT_OVERLAY, Z_SKY};

use super::{SimState, UpdateSet};

pub struct SkyPlugin;

#[derive(Component)]
pub(crate) struct SkyBackdrop;

/// Darkens the whole scene at night; drawn above everything but the HUD.
#[derive(Component)]
pub(crate) struct NightOverlay;

impl Plugin for SkyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_sky)
            .add_systems(Update, apply_sky.in_set(UpdateSet::Visuals));
    }
}

fn canvas_rect() -> shapes::Rectangle {
    shapes::Rectangle {
        // Oversized so a resized window never shows the clear color at the edges.
        extents: Vec2::new(CANVAS_WIDTH * 3.0, CANVAS_HEIGHT * 3.0),
        origin: shapes::RectangleOrigin::Center,
        radii: None,
    }
}

fn spawn_sky(mut commands: Commands) {
    commands.spawn((
        ShapeBuilder::with(&canvas_rect())
            .fill(color_from_hex(Colors::SPACE_BG))
            .build(),
        Transform::from_xyz(0.0, 0.0, Z_SKY),
        SkyBackdrop,
    ));

    commands.spawn((
        ShapeBuilder::with(&canvas_rect())
            .fill(color_from_hex(Colors::NIGHT_OVERLAY).with_alpha(0.0))
            .build(),
        Transform::from_xyz(0.0, 0.0, Z_NIGHT_OVERLAY),
        NightOverlay,
    ));
}

pub(crate) fn sky_fill(palette: &SkyPalette) -> Color {
    color_from_hex(palette.hex())
}

pub(crate) fn overlay_fill(palette: &SkyPalette) -> Color {
    color_from_hex(Colors::NIGHT_OVERLAY).with_alpha(palette.overlay_alpha)
}

fn apply_sky(
    state: Res<SimState>,
    mut q_sky: Query<&mut Shape, (With<SkyBackdrop>, Without<NightOverlay>)>,
    mut q_overlay: Query<&mut Shape, (With<NightOverlay>, Without<SkyBackdrop>)>,
    mut applied: Local<Option<SkyPalette>>,
) {
    let palette = state.sim.sky();
    if *applied == Some(palette) {
        return;
    }

    for mut shape in &mut q_sky {
        if let Some(fill) = shape.fill.as_mut() {
            fill.color = sky_fill(&palette);
        }
    }
    for mut shape in &mut q_overlay {
        if let Some(fill) = shape.fill.as_mut() {
            fill.color = overlay_fill(&palette);
        }
    }
    *applied = Some(palette);
}
