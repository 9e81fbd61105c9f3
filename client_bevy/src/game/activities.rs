use bevy::prelude::*;
use homeworld_shared::config::Activity;

use super::{ActivityStarted, UpdateSet};

pub struct ActivitiesPlugin;

const OVERLAY_SECONDS: f32 = 2.5;

#[derive(Component)]
pub(crate) struct ActivityOverlay;

#[derive(Component)]
pub(crate) struct ActivityOverlayText;

/// The activity currently on screen and how long it stays there.
#[derive(Resource, Default)]
pub(crate) struct ActivityRuntime {
    pub(crate) current: Option<Activity>,
    pub(crate) seconds_left: f32,
}

impl ActivityRuntime {
    /// A newer activity replaces whatever is showing and restarts the countdown.
    pub(crate) fn begin(&mut self, activity: Activity) {
        self.current = Some(activity);
        self.seconds_left = OVERLAY_SECONDS;
    }

    pub(crate) fn tick(&mut self, dt: f32) {
        if self.current.is_none() {
            return;
        }
        self.seconds_left = (self.seconds_left - dt).max(0.0);
        if self.seconds_left <= 0.0 {
            self.current = None;
        }
    }
}

impl Plugin for ActivitiesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActivityRuntime>()
            .add_systems(Startup, spawn_overlay)
            .add_systems(
                Update,
                (run_activities, update_overlay)
                    .chain()
                    .in_set(UpdateSet::Visuals),
            );
    }
}

fn spawn_overlay(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Percent(15.0),
                top: Val::Percent(30.0),
                width: Val::Percent(70.0),
                height: Val::Px(120.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.55)),
            BorderColor::all(Color::WHITE),
            BorderRadius::all(Val::Px(8.0)),
            Visibility::Hidden,
            ActivityOverlay,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont::from_font_size(20.0),
                TextColor(Color::WHITE),
                ActivityOverlayText,
            ));
        });
}

fn run_activities(
    mut started: MessageReader<ActivityStarted>,
    mut runtime: ResMut<ActivityRuntime>,
    time: Res<Time>,
) {
    runtime.tick(time.delta_secs());
    for ActivityStarted(activity) in started.read() {
        runtime.begin(*activity);
    }
}

fn update_overlay(
    runtime: Res<ActivityRuntime>,
    mut q_overlay: Query<&mut Visibility, With<ActivityOverlay>>,
    mut q_text: Query<&mut Text, With<ActivityOverlayText>>,
) {
    if !runtime.is_changed() {
        return;
    }

    if let Ok(mut visibility) = q_overlay.single_mut() {
        *visibility = if runtime.current.is_some() {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
    }
    if let (Ok(mut text), Some(activity)) = (q_text.single_mut(), runtime.current) {
        text.0 = activity.label().to_string();
    }
}
