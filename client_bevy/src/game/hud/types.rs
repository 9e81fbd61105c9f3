use bevy::prelude::*;
use homeworld_shared::notifications::NotificationId;
use homeworld_shared::rotation::Direction;

use crate::constants::{color_from_hex, Colors};

pub(super) const CLOCK_TOP: f32 = 10.0;
pub(super) const STATUS_TOP: f32 = 30.0;
pub(super) const HEADING_TOP: f32 = 50.0;
pub(super) const ENERGY_TOP: f32 = 72.0;
pub(super) const HUD_LEFT: f32 = 12.0;

pub(super) const ENERGY_BAR_WIDTH: f32 = 120.0;
pub(super) const ENERGY_BAR_HEIGHT: f32 = 8.0;

pub(super) const MARQUEE_TOP: f32 = 110.0;
pub(super) const MARQUEE_RIGHT: f32 = 12.0;
/// Pixels per second a marquee row slides toward its slot.
pub(super) const MARQUEE_SLIDE_SPEED: f32 = 140.0;

pub(super) const HOLD_BUTTON_BOTTOM: f32 = 24.0;
pub(super) const HOLD_BUTTON_SIDE: f32 = 16.0;
pub(super) const HOLD_BUTTON_WIDTH: f32 = 96.0;
pub(super) const HOLD_BUTTON_HEIGHT: f32 = 44.0;

#[derive(Component)]
pub(super) struct HudClockText;

#[derive(Component)]
pub(super) struct HudStatusText;

#[derive(Component)]
pub(super) struct HudHeadingText;

#[derive(Component)]
pub(super) struct HudEnergyText;

#[derive(Component)]
pub(super) struct HudEnergyFill;

/// On-screen button that turns the world while held.
#[derive(Component)]
pub(super) struct HudHoldButton {
    pub(super) direction: Direction,
}

#[derive(Component)]
pub(super) struct HudMarqueeRow {
    pub(super) id: NotificationId,
    pub(super) top: f32,
}

pub(super) fn hold_button_color(pressed: bool) -> Color {
    if pressed {
        color_from_hex(Colors::BUTTON_PRESSED)
    } else {
        color_from_hex(Colors::BUTTON_IDLE).with_alpha(0.85)
    }
}

pub(super) fn marquee_color(alpha: f32) -> Color {
    color_from_hex(Colors::MARQUEE_TEXT).with_alpha(alpha)
}

/// Move `current` toward `target` by at most `max_delta`.
pub(super) fn step_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let diff = target - current;
    if diff.abs() <= max_delta {
        target
    } else {
        current + diff.signum() * max_delta
    }
}
