use std::collections::HashSet;

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use homeworld_shared::notifications::NotificationId;
use homeworld_shared::rotation::Direction;

use crate::game::input::InputState;
use crate::game::{Clock, LastFrame, SimState};

use super::types::{
    hold_button_color, marquee_color, step_towards, HudClockText, HudEnergyFill, HudEnergyText,
    HudHeadingText, HudHoldButton, HudMarqueeRow, HudStatusText, MARQUEE_RIGHT,
    MARQUEE_SLIDE_SPEED, MARQUEE_TOP,
};

type HoldButtonQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static Interaction,
        &'static HudHoldButton,
        &'static mut BackgroundColor,
    ),
    With<Button>,
>;

type StatusTextSet<'w, 's> = ParamSet<
    'w,
    's,
    (
        Query<'w, 's, &'static mut Text, With<HudClockText>>,
        Query<'w, 's, &'static mut Text, With<HudStatusText>>,
        Query<'w, 's, &'static mut Text, With<HudHeadingText>>,
        Query<'w, 's, &'static mut Text, With<HudEnergyText>>,
    ),
>;

type MarqueeRowQuery<'w, 's> = Query<
    'w,
    's,
    (
        Entity,
        &'static mut HudMarqueeRow,
        &'static mut Node,
        &'static mut TextColor,
    ),
>;

#[derive(SystemParam)]
pub(super) struct StatusTexts<'w, 's> {
    texts: StatusTextSet<'w, 's>,
}

pub(super) fn handle_hold_buttons(mut buttons: HoldButtonQuery, mut input: ResMut<InputState>) {
    let mut left = false;
    let mut right = false;

    for (interaction, button, mut background) in &mut buttons {
        let pressed = *interaction == Interaction::Pressed;
        match button.direction {
            Direction::Left => left |= pressed,
            Direction::Right => right |= pressed,
        }
        background.0 = hold_button_color(pressed);
    }

    input.left_button = left;
    input.right_button = right;
}

pub(super) fn update_status_ui(
    state: Res<SimState>,
    clock: Res<Clock>,
    last: Res<LastFrame>,
    mut queries: StatusTexts,
) {
    let sim = &state.sim;

    if let Ok(mut text) = queries.texts.p0().single_mut() {
        if last.report.clock_due || text.0.is_empty() {
            text.0 = clock.0.clock_label();
        }
    }

    if let Ok(mut text) = queries.texts.p1().single_mut() {
        if text.0 != sim.status() {
            text.0 = sim.status().to_string();
        }
    }

    if let Ok(mut text) = queries.texts.p2().single_mut() {
        text.0 = sim.heading_label();
    }

    if let Ok(mut text) = queries.texts.p3().single_mut() {
        text.0 = format!("Energy {:.0}", sim.meter().value());
    }
}

pub(super) fn update_energy_bar(
    state: Res<SimState>,
    mut q_fill: Query<&mut Node, With<HudEnergyFill>>,
) {
    let fraction = state.sim.meter().fraction().clamp(0.0, 1.0) as f32;
    if let Ok(mut node) = q_fill.single_mut() {
        node.width = Val::Percent(fraction * 100.0);
    }
}

/// Keep one text row per visible or fading notification. Rows slide toward
/// their slot and fade out once the queue lets go of them.
pub(super) fn sync_marquee(
    mut commands: Commands,
    state: Res<SimState>,
    time: Res<Time>,
    mut q_rows: MarqueeRowQuery,
) {
    let queue = state.sim.notifications();
    let now = queue.now_ms();
    let max_step = MARQUEE_SLIDE_SPEED * time.delta_secs();

    let mut seen: HashSet<NotificationId> = HashSet::new();

    for (entity, mut row, mut node, mut color) in &mut q_rows {
        if let Some(entry) = queue.entries().find(|e| e.id == row.id) {
            let target = MARQUEE_TOP + queue.slot_offset(entry.slot_index);
            row.top = step_towards(row.top, target, max_step);
            node.top = Val::Px(row.top);
            color.0 = marquee_color(1.0);
        } else if let Some(fading) = queue.fading().iter().find(|f| f.id == row.id) {
            color.0 = marquee_color(fading.alpha(now));
        } else {
            commands.entity(entity).despawn();
            continue;
        }
        seen.insert(row.id);
    }

    for entry in queue.entries() {
        if seen.contains(&entry.id) {
            continue;
        }
        let top = MARQUEE_TOP + queue.slot_offset(entry.slot_index);
        commands.spawn((
            Node {
                position_type: PositionType::Absolute,
                right: Val::Px(MARQUEE_RIGHT),
                top: Val::Px(top),
                ..default()
            },
            Text::new(entry.text.clone()),
            TextFont::from_font_size(12.0),
            TextColor(marquee_color(1.0)),
            HudMarqueeRow { id: entry.id, top },
        ));
    }
}
