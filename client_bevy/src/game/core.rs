use bevy::app::AppExit;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use homeworld_shared::config::Activity;
use homeworld_shared::persistence::{epoch_ms, Storage};
use homeworld_shared::{FrameInput, FrameReport, Simulation};

use crate::constants::{color_from_hex, Colors, CANVAS_HEIGHT, CANVAS_WIDTH};

use super::input::InputState;

#[derive(SystemSet, Debug, Hash, Eq, PartialEq, Clone)]
pub(crate) enum UpdateSet {
    Input,
    Simulate,
    Visuals,
}

pub struct CorePlugin;

#[derive(Component)]
pub(crate) struct MainCamera;

#[derive(Resource)]
pub struct SimState {
    pub sim: Simulation,
}

#[derive(Resource)]
pub struct Clock(pub homeworld_shared::time_source::TimeSource);

#[derive(Resource)]
pub struct Persistence {
    storage: Box<dyn Storage + Send + Sync>,
}

impl Persistence {
    pub fn new(storage: impl Storage + Send + Sync + 'static) -> Self {
        Self {
            storage: Box::new(storage),
        }
    }

    #[cfg(test)]
    pub(crate) fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }
}

/// Report of the most recent simulation step, for systems that run after it.
#[derive(Resource, Default)]
pub(crate) struct LastFrame {
    pub(crate) report: FrameReport,
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ActivityStarted(pub(crate) Activity);

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InputState>()
            .init_resource::<LastFrame>()
            .add_message::<ActivityStarted>()
            .insert_resource(ClearColor(color_from_hex(Colors::SPACE_BG)))
            .configure_sets(
                Update,
                (UpdateSet::Input, UpdateSet::Simulate, UpdateSet::Visuals).chain(),
            )
            .add_systems(Startup, setup_camera)
            .add_systems(
                Update,
                (step_simulation, save_when_due)
                    .chain()
                    .in_set(UpdateSet::Simulate),
            )
            .add_systems(Update, fit_camera_to_canvas)
            .add_systems(Last, save_on_exit);
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((Camera2d, Msaa::Sample4, MainCamera));
}

pub(crate) fn step_simulation(
    mut state: ResMut<SimState>,
    mut input: ResMut<InputState>,
    mut last: ResMut<LastFrame>,
    mut activities: MessageWriter<ActivityStarted>,
    clock: Res<Clock>,
    time: Res<Time>,
) {
    let frame = FrameInput {
        dt_ms: time.delta_secs_f64() * 1000.0,
        now_minutes: clock.0.minutes_of_day(),
        intent: input.intent(),
        hovered: input.hovered.clone(),
        pointer_downs: std::mem::take(&mut input.pointer_downs),
    };

    let report = state.sim.step(frame);
    for activity in &report.activities {
        info!(?activity, "starting activity");
        activities.write(ActivityStarted(*activity));
    }
    last.report = report;
}

fn save_when_due(state: Res<SimState>, last: Res<LastFrame>, mut persistence: ResMut<Persistence>) {
    if last.report.save_due {
        state.sim.save(persistence.storage.as_mut(), epoch_ms());
    }
}

/// Flush the meter on the frame the app is asked to quit, so the last
/// stretch since the periodic save is not lost.
fn save_on_exit(
    mut exit: MessageReader<AppExit>,
    state: Res<SimState>,
    mut persistence: ResMut<Persistence>,
) {
    if exit.read().next().is_none() {
        return;
    }
    info!("saving before exit");
    state.sim.save(persistence.storage.as_mut(), epoch_ms());
}

fn fit_camera_to_canvas(
    q_window: Query<&Window, With<PrimaryWindow>>,
    mut q_projection: Query<&mut Projection, With<MainCamera>>,
) {
    let Ok(window) = q_window.single() else {
        return;
    };

    if window.width() <= 0.0 || window.height() <= 0.0 {
        return;
    }

    let scale_x = CANVAS_WIDTH / window.width();
    let scale_y = CANVAS_HEIGHT / window.height();
    let target_scale = scale_x.max(scale_y).max(0.0001);

    for mut projection in &mut q_projection {
        if let Projection::Orthographic(ortho) = &mut *projection {
            ortho.scale = target_scale;
        }
    }
}

#[cfg(test)]
pub(crate) fn make_test_app() -> App {
    use homeworld_shared::persistence::{MemoryStorage, ResourceMeter};
    use homeworld_shared::time_source::TimeSource;
    use homeworld_shared::WorldConfig;

    let config = WorldConfig::default();
    let meter = ResourceMeter::new(&config.resource);
    let sim = Simulation::new(config, meter, 720.0).unwrap();

    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(SimState { sim });
    app.insert_resource(Clock(TimeSource::fixed(720.0)));
    app.insert_resource(Persistence::new(MemoryStorage::default()));
    app.init_resource::<InputState>();
    app.init_resource::<LastFrame>();
    app.add_message::<ActivityStarted>();
    app
}
