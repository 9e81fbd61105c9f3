//! One frame of the home scene, in a fixed order.
//!
//! 1. frame-clock timers (notification expiry, bubble hide, session cadences)
//! 2. pointer-downs, which may request a seek or press the open action button
//! 3. rotation update; manual movement closes transient UI
//! 4. arrival handling
//! 5. layout and label visibility from the new angle
//! 6. sky recompute when its cadence is due
//! 7. resource drain

use tracing::info;

use crate::angle::heading_degrees;
use crate::config::{Activity, WorldConfig};
use crate::error::ConfigError;
use crate::interaction::{Arrival, EntityId, InteractionSystem, PointerOutcome, PointerTarget};
use crate::lighting::{sky_color, SkyPalette};
use crate::notifications::NotificationQueue;
use crate::persistence::{ResourceMeter, Storage};
use crate::rotation::{ManualIntent, MotionPhase, MoveEdge, RotationController};
use crate::sun_times::{SunTimes, SunTimesStatus};
use crate::timer::Scheduler;

pub const STATUS_WANDERING: &str = "Wandering...";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SessionTimer {
    RecomputeSky,
    Save,
    RefreshClock,
}

#[derive(Clone, Debug, Default)]
pub struct FrameInput {
    pub dt_ms: f64,
    /// Local minute of day for the sky.
    pub now_minutes: f32,
    pub intent: ManualIntent,
    pub hovered: Option<EntityId>,
    pub pointer_downs: Vec<PointerTarget>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Activities the host should start this frame, in order.
    pub activities: Vec<Activity>,
    pub save_due: bool,
    pub clock_due: bool,
    pub sky_changed: bool,
    pub arrived: Option<EntityId>,
    pub edge: Option<MoveEdge>,
}

pub struct Simulation {
    config: WorldConfig,
    rotation: RotationController<Arrival>,
    interaction: InteractionSystem,
    notifications: NotificationQueue,
    timers: Scheduler<SessionTimer>,
    sun: SunTimes,
    sun_status: SunTimesStatus,
    sky: SkyPalette,
    now_minutes: f32,
    meter: ResourceMeter,
    status: String,
}

impl Simulation {
    pub fn new(
        config: WorldConfig,
        meter: ResourceMeter,
        now_minutes: f32,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let rotation = RotationController::new(config.rotation_speed)?;
        let interaction = InteractionSystem::new(&config)?;
        let notifications = NotificationQueue::new(config.notifications)?;

        let mut timers = Scheduler::new();
        timers.schedule_repeating(config.sky_recompute_ms, SessionTimer::RecomputeSky);
        timers.schedule_repeating(config.save_interval_ms, SessionTimer::Save);
        timers.schedule_repeating(config.clock_refresh_ms, SessionTimer::RefreshClock);

        let sun = config.sun.fallback();
        let sky = sky_color(
            now_minutes,
            sun.sunrise_minutes,
            sun.sunset_minutes,
            config.view_elevation,
        );

        let mut sim = Self {
            config,
            rotation,
            interaction,
            notifications,
            timers,
            sun,
            sun_status: SunTimesStatus::Pending,
            sky,
            now_minutes,
            meter,
            status: STATUS_WANDERING.to_string(),
        };
        sim.notifications.push("Arrived home");
        Ok(sim)
    }

    pub fn step(&mut self, input: FrameInput) -> FrameReport {
        let mut report = FrameReport::default();
        let dt = if input.dt_ms.is_finite() {
            input.dt_ms.max(0.0)
        } else {
            0.0
        };
        self.now_minutes = input.now_minutes;

        let mut sky_due = false;
        for timer in self.timers.advance(dt) {
            match timer {
                SessionTimer::RecomputeSky => sky_due = true,
                SessionTimer::Save => report.save_due = true,
                SessionTimer::RefreshClock => report.clock_due = true,
            }
        }
        self.interaction.advance_timers(dt);
        self.notifications.advance(dt);

        for target in &input.pointer_downs {
            match self.interaction.pointer_down(target) {
                PointerOutcome::Seek(request) => {
                    let name = self.display_name(&request.arrival.entity);
                    self.status = format!("Heading to {name}...");
                    self.notifications.push(format!("Heading to {name}"));
                    self.interaction.dismiss_transient();
                    self.rotation
                        .request_seek(request.target_angle, Some(request.arrival));
                }
                PointerOutcome::Activity(activity) => self.start_activity(activity, &mut report),
                PointerOutcome::Ignored => {}
            }
        }

        let step = self.rotation.update(dt as f32, input.intent);
        if step.moved_manually {
            self.interaction.dismiss_transient();
            self.status = STATUS_WANDERING.to_string();
        }
        if let Some(edge) = step.edge {
            self.notifications.push(edge.label());
            report.edge = Some(edge);
        }

        if let Some(arrival) = step.arrived {
            let name = self.display_name(&arrival.entity);
            info!(entity = %arrival.entity, "reached point of interest");
            self.notifications.push(format!("Arrived at {name}"));
            self.status = name;
            if let Some(activity) = self.interaction.arrive(&arrival) {
                self.start_activity(activity, &mut report);
            }
            report.arrived = Some(arrival.entity);
        }

        self.interaction
            .update_layout(self.rotation.current_angle(), input.hovered.as_ref());

        if sky_due {
            report.sky_changed = self.recompute_sky();
        }

        self.meter.drain(dt);
        report
    }

    /// Install fetched (or fallback) sun times and repaint the sky right away.
    pub fn resolve_sun_times(&mut self, times: SunTimes, status: SunTimesStatus) -> bool {
        info!(
            ?status,
            sunrise = times.sunrise_minutes,
            sunset = times.sunset_minutes,
            "sun times resolved"
        );
        self.sun = times;
        self.sun_status = status;
        self.recompute_sky()
    }

    pub fn save(&self, storage: &mut dyn Storage, now_epoch_ms: f64) {
        self.meter.save(storage, now_epoch_ms);
    }

    pub fn world_angle(&self) -> f32 {
        self.rotation.current_angle()
    }

    pub fn phase(&self) -> MotionPhase {
        self.rotation.phase()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn heading_label(&self) -> String {
        format!("Heading: {:.1}°", heading_degrees(self.world_angle()))
    }

    pub fn sky(&self) -> SkyPalette {
        self.sky
    }

    pub fn sun_times(&self) -> SunTimes {
        self.sun
    }

    pub fn sun_status(&self) -> SunTimesStatus {
        self.sun_status
    }

    pub fn now_minutes(&self) -> f32 {
        self.now_minutes
    }

    pub fn interaction(&self) -> &InteractionSystem {
        &self.interaction
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    pub fn meter(&self) -> &ResourceMeter {
        &self.meter
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    fn recompute_sky(&mut self) -> bool {
        let next = sky_color(
            self.now_minutes,
            self.sun.sunrise_minutes,
            self.sun.sunset_minutes,
            self.config.view_elevation,
        );
        let changed = next != self.sky;
        self.sky = next;
        changed
    }

    fn start_activity(&mut self, activity: Activity, report: &mut FrameReport) {
        match activity {
            Activity::Sleep => self.meter.refill(),
            Activity::Eat => self.meter.add(self.config.resource.eat_amount),
            Activity::Launch => {}
        }
        self.notifications.push(activity_notice(activity));
        report.activities.push(activity);
    }

    fn display_name(&self, id: &EntityId) -> String {
        self.interaction
            .entity_name(id)
            .map_or_else(|| id.to_string(), str::to_string)
    }
}

fn activity_notice(activity: Activity) -> &'static str {
    match activity {
        Activity::Sleep => "Went to sleep",
        Activity::Eat => "Ate something",
        Activity::Launch => "Launching!",
    }
}
