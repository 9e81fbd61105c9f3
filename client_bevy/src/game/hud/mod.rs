mod spawn;
mod systems;
mod types;

use bevy::prelude::*;

use super::UpdateSet;

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn::spawn_hud)
            .add_systems(
                Update,
                systems::handle_hold_buttons.in_set(UpdateSet::Input),
            )
            .add_systems(
                Update,
                (
                    systems::update_status_ui,
                    systems::update_energy_bar,
                    systems::sync_marquee,
                )
                    .chain()
                    .in_set(UpdateSet::Visuals),
            );
    }
}
