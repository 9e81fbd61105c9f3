use homeworld_shared::config::{Activity, EntityAction, EntityVisual, WorldObjectDef};
use homeworld_shared::interaction::{EntityId, PointerTarget};
use homeworld_shared::lighting::{sky_color, sky_weights, DAY_RAMP, ELEVATION_EXPONENT};
use homeworld_shared::persistence::{MemoryStorage, ResourceMeter, Storage};
use homeworld_shared::projection::{project, ScreenPos};
use homeworld_shared::rotation::MotionPhase;
use homeworld_shared::{FrameInput, Simulation, WorldConfig};

const DT: f64 = 16.0;

fn single_marker_world(base_angle: f32) -> WorldConfig {
    WorldConfig {
        objects: vec![WorldObjectDef {
            id: "spot".into(),
            name: "Spot".into(),
            base_angle,
            radial_offset: 0.0,
            depth: 0.5,
            approach_offset: 0.0,
            interactive: true,
            action: Some(EntityAction::Activity {
                activity: Activity::Eat,
            }),
            description: None,
            visual: EntityVisual::Marker {
                radius: 12.0,
                color: "#ff5722".into(),
            },
        }],
        ..WorldConfig::default()
    }
}

fn simulation(config: WorldConfig) -> Simulation {
    let meter = ResourceMeter::new(&config.resource);
    Simulation::new(config, meter, 720.0).unwrap()
}

fn idle_frame() -> FrameInput {
    FrameInput {
        dt_ms: DT,
        now_minutes: 720.0,
        ..FrameInput::default()
    }
}

#[test]
fn angle_zero_is_the_top_of_the_planet() {
    let c = ScreenPos::new(215.0, 1620.0);
    assert_eq!(project(0.0, 0.0, c, 1125.0), ScreenPos::new(215.0, 495.0));
}

#[test]
fn clicking_an_entity_walks_to_it_and_reveals_its_label() {
    let mut sim = simulation(single_marker_world(0.45));
    let spot = EntityId::new("spot");

    sim.step(idle_frame());
    let before = sim.interaction().layout(&spot).unwrap().clone();
    assert!(before.distance > 90.0);
    assert!(!before.label_visible);

    sim.step(FrameInput {
        pointer_downs: vec![PointerTarget::Entity(spot.clone())],
        ..idle_frame()
    });
    match sim.phase() {
        MotionPhase::Seeking { target } => assert!((target + 0.45).abs() < 1e-6),
        other => panic!("expected to be seeking, got {other:?}"),
    }

    let mut arrivals = 0;
    let mut activities = Vec::new();
    for _ in 0..2_000 {
        let report = sim.step(idle_frame());
        arrivals += report.arrived.is_some() as u32;
        activities.extend(report.activities);
    }

    assert_eq!(arrivals, 1);
    assert_eq!(activities, vec![Activity::Eat]);
    assert_eq!(sim.world_angle(), -0.45);
    let after = sim.interaction().layout(&spot).unwrap();
    assert!(after.distance < 90.0);
    assert!(after.label_visible);
}

#[test]
fn a_newer_click_replaces_the_pending_arrival() {
    let mut config = single_marker_world(0.45);
    let mut second = config.objects[0].clone();
    second.id = "other".into();
    second.name = "Other".into();
    second.base_angle = -0.3;
    config.objects.push(second);
    let mut sim = simulation(config);

    sim.step(FrameInput {
        pointer_downs: vec![PointerTarget::Entity(EntityId::new("spot"))],
        ..idle_frame()
    });
    sim.step(FrameInput {
        pointer_downs: vec![PointerTarget::Entity(EntityId::new("other"))],
        ..idle_frame()
    });

    let mut arrived = Vec::new();
    for _ in 0..2_000 {
        if let Some(id) = sim.step(idle_frame()).arrived {
            arrived.push(id);
        }
    }
    assert_eq!(arrived, vec![EntityId::new("other")]);
    assert!((sim.world_angle() - 0.3).abs() < 1e-6);
}

#[test]
fn noon_sky_is_the_day_blend() {
    let w = sky_weights(720.0, 360.0, 1080.0);
    assert!((w.day - 1.0).abs() < 1e-3);
    assert!(w.night.abs() < 1e-3);

    let palette = sky_color(720.0, 360.0, 1080.0, 0.35);
    let t = 0.35f32.powf(ELEVATION_EXPONENT);
    for i in 0..3 {
        let expected = DAY_RAMP.horizon[i] + (DAY_RAMP.zenith[i] - DAY_RAMP.horizon[i]) * t;
        let got = palette.rgb[i] as f32 / 255.0;
        assert!((got - expected).abs() < 2.0 / 255.0);
    }
}

#[test]
fn sunrise_and_sunset_are_neither_pure_day_nor_pure_night() {
    for now in [360.0, 1080.0] {
        let w = sky_weights(now, 360.0, 1080.0);
        assert!(w.twilight > 0.0);
        assert!(w.day < 1.0 && w.night < 1.0);
        let p = sky_color(now, 360.0, 1080.0, 0.35);
        assert_eq!(p, sky_color(now, 360.0, 1080.0, 0.35));
    }
}

#[test]
fn energy_decays_while_the_game_is_closed() {
    let mut config = WorldConfig::default();
    // A stored 50 runs dry in two hours.
    config.resource.drain_per_ms = 50.0 / 7_200_000.0;

    let mut storage = MemoryStorage::default();
    storage.save("energy", 50.0);
    storage.save("energy.savedAt", 1_000_000.0);

    let meter = ResourceMeter::restore(&config.resource, &storage, 1_000_000.0 + 3_600_000.0);
    assert!((meter.value() - 25.0).abs() < 1e-9);

    let resumed = Simulation::new(config, meter, 720.0).unwrap();
    assert!((resumed.meter().value() - 25.0).abs() < 1e-9);
}

#[test]
fn walking_produces_one_notification_per_edge() {
    let mut sim = simulation(WorldConfig::default());
    let start = sim.notifications().len();
    let walking = FrameInput {
        intent: homeworld_shared::rotation::ManualIntent {
            left_held: true,
            right_held: false,
        },
        ..idle_frame()
    };
    for _ in 0..30 {
        sim.step(walking.clone());
    }
    sim.step(idle_frame());
    let texts: Vec<String> = sim
        .notifications()
        .entries()
        .map(|e| e.text.clone())
        .collect();
    assert_eq!(sim.notifications().len(), start + 2);
    assert_eq!(texts[0], "Stopped moving");
    assert_eq!(texts[1], "Moving left");
}

#[test]
fn notification_feed_stays_bounded_during_play() {
    let mut sim = simulation(WorldConfig::default());
    let walking = |left| FrameInput {
        intent: homeworld_shared::rotation::ManualIntent {
            left_held: left,
            right_held: !left,
        },
        ..idle_frame()
    };
    for i in 0..50 {
        sim.step(walking(i % 2 == 0));
        assert!(sim.notifications().len() <= 4);
    }
    let slots: Vec<usize> = sim.notifications().entries().map(|e| e.slot_index).collect();
    assert_eq!(slots, vec![0, 1, 2, 3]);
}
