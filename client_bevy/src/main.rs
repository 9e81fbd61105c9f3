mod constants;
mod coord;
mod game;
mod settings;

use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};
use bevy_prototype_lyon::prelude::ShapePlugin;
use homeworld_shared::persistence::{epoch_ms, JsonFileStorage, ResourceMeter};
use homeworld_shared::Simulation;

use game::{
    ActivitiesPlugin, Clock, CorePlugin, HudPlugin, InputPlugin, Persistence, PlanetPlugin,
    SimState, SkyPlugin, SunFetchPlugin,
};
use settings::LaunchSettings;

fn main() {
    let settings = LaunchSettings::from_env();

    let config = match settings.load_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("homeworld: invalid configuration: {err}");
            std::process::exit(1);
        }
    };

    let clock = settings.time_source();
    let storage = JsonFileStorage::open(&settings.save_path);
    let meter = ResourceMeter::restore(&config.resource, &storage, epoch_ms());
    let sun_url = settings.sun_request_url(config.sun.latitude, config.sun.longitude);

    let sim = match Simulation::new(config, meter, clock.minutes_of_day()) {
        Ok(sim) => sim,
        Err(err) => {
            eprintln!("homeworld: invalid configuration: {err}");
            std::process::exit(1);
        }
    };

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Homeworld".to_string(),
                resolution: WindowResolution::new(430, 900),
                present_mode: PresentMode::AutoVsync,
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(ShapePlugin)
        .insert_resource(SimState { sim })
        .insert_resource(Clock(clock))
        .insert_resource(Persistence::new(storage))
        .add_plugins(CorePlugin)
        .add_plugins(InputPlugin)
        .add_plugins(SkyPlugin)
        .add_plugins(PlanetPlugin)
        .add_plugins(SunFetchPlugin { url: sun_url })
        .add_plugins(ActivitiesPlugin)
        .add_plugins(HudPlugin)
        .run();
}
