use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use homeworld_shared::interaction::{EntityId, PointerTarget};
use homeworld_shared::projection::ScreenPos;
use homeworld_shared::rotation::ManualIntent;
use homeworld_shared::Simulation;

use crate::coord::world_to_px;

use super::{MainCamera, SimState, UpdateSet};

pub struct InputPlugin;

/// Per-frame input gathered for the simulation. Keys and on-screen hold
/// buttons both count as held direction.
#[derive(Resource, Default)]
pub(crate) struct InputState {
    pub(crate) left_key: bool,
    pub(crate) right_key: bool,
    pub(crate) left_button: bool,
    pub(crate) right_button: bool,
    pub(crate) hovered: Option<EntityId>,
    pub(crate) pointer_downs: Vec<PointerTarget>,
}

impl InputState {
    pub(crate) fn intent(&self) -> ManualIntent {
        ManualIntent {
            left_held: self.left_key || self.left_button,
            right_held: self.right_key || self.right_button,
        }
    }
}

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (keyboard_system, pointer_system).in_set(UpdateSet::Input),
        );
    }
}

fn keyboard_system(mut input: ResMut<InputState>, keys: Res<ButtonInput<KeyCode>>) {
    input.left_key = keys.any_pressed([KeyCode::ArrowLeft, KeyCode::KeyA]);
    input.right_key = keys.any_pressed([KeyCode::ArrowRight, KeyCode::KeyD]);
}

fn pointer_system(
    mut input: ResMut<InputState>,
    state: Res<SimState>,
    mouse: Res<ButtonInput<MouseButton>>,
    q_window: Query<&Window, With<PrimaryWindow>>,
    q_camera: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    q_ui: Query<&Interaction, With<Button>>,
) {
    // HUD buttons own the pointer while it is over them.
    if q_ui.iter().any(|i| *i != Interaction::None) {
        input.hovered = None;
        return;
    }

    let cursor = q_window
        .single()
        .ok()
        .and_then(|window| window.cursor_position())
        .and_then(|cursor| {
            let (camera, transform) = q_camera.single().ok()?;
            camera.viewport_to_world_2d(transform, cursor).ok()
        })
        .map(world_to_px);

    track_pointer(
        &mut input,
        &state.sim,
        cursor,
        mouse.just_pressed(MouseButton::Left),
    );
}

/// Resolve the pointer against the current layout: hover for labels (any
/// entity), and a queued pointer-down when pressed over something pickable.
pub(crate) fn track_pointer(
    input: &mut InputState,
    sim: &Simulation,
    cursor: Option<ScreenPos>,
    pressed: bool,
) {
    let interaction = sim.interaction();
    input.hovered = cursor.and_then(|p| interaction.hover_at(p));

    if pressed {
        if let Some(target) = cursor.and_then(|p| interaction.pick(p)) {
            input.pointer_downs.push(target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::make_test_app;

    fn bed_position(sim: &Simulation) -> ScreenPos {
        sim.interaction()
            .layout(&EntityId::new("bed"))
            .map(|l| l.sprite)
            .unwrap()
    }

    fn stepped_sim() -> Simulation {
        let mut app = make_test_app();
        app.add_systems(Update, super::super::core::step_simulation);
        app.update();
        app.world_mut()
            .remove_resource::<SimState>()
            .map(|s| s.sim)
            .unwrap()
    }

    #[test]
    fn keys_and_buttons_merge_into_intent() {
        let mut input = InputState {
            left_button: true,
            ..default()
        };
        assert_eq!(
            input.intent(),
            ManualIntent {
                left_held: true,
                right_held: false
            }
        );

        input.right_key = true;
        assert_eq!(input.intent().direction(), None);
    }

    #[test]
    fn keyboard_system_reads_arrows_and_wasd() {
        let mut app = make_test_app();
        app.init_resource::<ButtonInput<KeyCode>>();
        app.add_systems(Update, keyboard_system);

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyD);
        app.update();

        let input = app.world().resource::<InputState>();
        assert!(!input.left_key);
        assert!(input.right_key);
    }

    #[test]
    fn hovering_an_entity_sets_hovered_without_queueing() {
        let sim = stepped_sim();
        let mut input = InputState::default();

        track_pointer(&mut input, &sim, Some(bed_position(&sim)), false);

        assert_eq!(input.hovered, Some(EntityId::new("bed")));
        assert!(input.pointer_downs.is_empty());
    }

    #[test]
    fn hovering_a_decoration_sets_hovered_but_pressing_it_does_nothing() {
        let sim = stepped_sim();
        let mut input = InputState::default();
        let table = sim
            .interaction()
            .layout(&EntityId::new("table"))
            .map(|l| l.hit_center)
            .unwrap();

        track_pointer(&mut input, &sim, Some(table), true);

        assert_eq!(input.hovered, Some(EntityId::new("table")));
        assert!(input.pointer_downs.is_empty());
    }

    #[test]
    fn pressing_an_entity_queues_a_pointer_down() {
        let sim = stepped_sim();
        let mut input = InputState::default();

        track_pointer(&mut input, &sim, Some(bed_position(&sim)), true);

        assert_eq!(
            input.pointer_downs,
            vec![PointerTarget::Entity(EntityId::new("bed"))]
        );
    }

    #[test]
    fn pressing_empty_space_does_nothing() {
        let sim = stepped_sim();
        let mut input = InputState {
            hovered: Some(EntityId::new("bed")),
            ..default()
        };

        track_pointer(&mut input, &sim, Some(ScreenPos::new(5.0, 5.0)), true);
        assert_eq!(input.hovered, None);
        assert!(input.pointer_downs.is_empty());

        track_pointer(&mut input, &sim, None, true);
        assert!(input.pointer_downs.is_empty());
    }
}
