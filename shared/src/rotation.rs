//! World rotation state machine.
//!
//! The player never moves; the world turns under them. [`RotationController`]
//! owns the single world angle and decides every frame whether it follows the
//! held direction keys or a programmatic seek toward a target angle.

use tracing::debug;

use crate::angle::{shortest_diff, wrap_angle};
use crate::error::{ensure_positive, ConfigError};

/// Seeks closer than this arrive on the next update even with a zero step.
pub const ARRIVAL_EPSILON: f32 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn label(self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// Held-key intent for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ManualIntent {
    pub left_held: bool,
    pub right_held: bool,
}

impl ManualIntent {
    pub fn direction(self) -> Option<Direction> {
        match (self.left_held, self.right_held) {
            (true, false) => Some(Direction::Left),
            (false, true) => Some(Direction::Right),
            _ => None,
        }
    }
}

pub enum RotationState<A> {
    Idle,
    Moving(Direction),
    Seeking { target: f32, on_arrive: Option<A> },
}

/// Payload-free view of [`RotationState`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MotionPhase {
    Idle,
    Moving(Direction),
    Seeking { target: f32 },
}

/// Manual movement started or stopped. Emitted once per transition, not per frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveEdge {
    Started(Direction),
    Stopped,
}

impl MoveEdge {
    pub fn label(self) -> String {
        match self {
            MoveEdge::Started(dir) => format!("Moving {}", dir.label()),
            MoveEdge::Stopped => "Stopped moving".to_string(),
        }
    }
}

/// What one [`RotationController::update`] did.
pub struct RotationStep<A> {
    /// Arrival payload of a seek that completed this frame.
    pub arrived: Option<A>,
    pub edge: Option<MoveEdge>,
    pub moved_manually: bool,
}

pub struct RotationController<A> {
    angle: f32,
    /// Radians per millisecond.
    speed: f32,
    state: RotationState<A>,
    last_manual: Option<Direction>,
}

impl<A> RotationController<A> {
    pub fn new(speed: f32) -> Result<Self, ConfigError> {
        ensure_positive("rotation_speed", speed as f64)?;
        Ok(Self {
            angle: 0.0,
            speed,
            state: RotationState::Idle,
            last_manual: None,
        })
    }

    pub fn current_angle(&self) -> f32 {
        self.angle
    }

    pub fn phase(&self) -> MotionPhase {
        match &self.state {
            RotationState::Idle => MotionPhase::Idle,
            RotationState::Moving(dir) => MotionPhase::Moving(*dir),
            RotationState::Seeking { target, .. } => MotionPhase::Seeking { target: *target },
        }
    }

    pub fn is_seeking(&self) -> bool {
        matches!(self.state, RotationState::Seeking { .. })
    }

    /// Start turning toward `target`. A pending arrival payload from an earlier
    /// seek is dropped; only the latest request is honored. Arrival is reported
    /// by a later [`update`](Self::update), never synchronously.
    pub fn request_seek(&mut self, target: f32, on_arrive: Option<A>) {
        let target = wrap_angle(target);
        debug!(target_angle = target, from = self.angle, "seek requested");
        self.state = RotationState::Seeking { target, on_arrive };
    }

    pub fn update(&mut self, dt_ms: f32, intent: ManualIntent) -> RotationStep<A> {
        let step = self.speed * dt_ms.max(0.0);
        let mut arrived = None;
        let mut manual = None;

        match &mut self.state {
            RotationState::Seeking { target, on_arrive } => {
                let target = *target;
                let diff = shortest_diff(self.angle, target);
                if diff.abs() <= step.max(ARRIVAL_EPSILON) {
                    self.angle = target;
                    arrived = on_arrive.take();
                    self.state = RotationState::Idle;
                    debug!(angle = target, "seek arrived");
                } else {
                    self.angle = wrap_angle(self.angle + diff.signum() * step);
                }
            }
            _ => {
                manual = intent.direction();
                match manual {
                    Some(Direction::Left) => self.angle = wrap_angle(self.angle + step),
                    Some(Direction::Right) => self.angle = wrap_angle(self.angle - step),
                    None => {}
                }
                self.state = manual.map_or(RotationState::Idle, RotationState::Moving);
            }
        }

        let edge = if manual != self.last_manual {
            match manual {
                Some(dir) => Some(MoveEdge::Started(dir)),
                None => Some(MoveEdge::Stopped),
            }
        } else {
            None
        };
        self.last_manual = manual;

        RotationStep {
            arrived,
            edge,
            moved_manually: manual.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::PI;

    const SPEED: f32 = 0.0018;
    const DT: f32 = 16.0;

    const NONE: ManualIntent = ManualIntent {
        left_held: false,
        right_held: false,
    };
    const LEFT: ManualIntent = ManualIntent {
        left_held: true,
        right_held: false,
    };
    const RIGHT: ManualIntent = ManualIntent {
        left_held: false,
        right_held: true,
    };
    const BOTH: ManualIntent = ManualIntent {
        left_held: true,
        right_held: true,
    };

    fn controller() -> RotationController<u32> {
        RotationController::new(SPEED).unwrap()
    }

    mod construction {
        use super::*;

        #[test]
        fn rejects_zero_negative_and_nan_speed() {
            assert!(RotationController::<()>::new(0.0).is_err());
            assert!(RotationController::<()>::new(-0.1).is_err());
            assert!(RotationController::<()>::new(f32::NAN).is_err());
        }

        #[test]
        fn starts_idle_at_zero() {
            let c = controller();
            assert_eq!(c.current_angle(), 0.0);
            assert_eq!(c.phase(), MotionPhase::Idle);
        }
    }

    mod manual {
        use super::*;

        #[test]
        fn left_increases_angle() {
            let mut c = controller();
            c.update(DT, LEFT);
            assert!((c.current_angle() - SPEED * DT).abs() < 1e-6);
            assert_eq!(c.phase(), MotionPhase::Moving(Direction::Left));
        }

        #[test]
        fn right_decreases_angle() {
            let mut c = controller();
            c.update(DT, RIGHT);
            assert!((c.current_angle() + SPEED * DT).abs() < 1e-6);
            assert_eq!(c.phase(), MotionPhase::Moving(Direction::Right));
        }

        #[test]
        fn both_or_neither_held_is_idle() {
            let mut c = controller();
            c.update(DT, BOTH);
            assert_eq!(c.current_angle(), 0.0);
            assert_eq!(c.phase(), MotionPhase::Idle);
            c.update(DT, NONE);
            assert_eq!(c.phase(), MotionPhase::Idle);
        }

        #[test]
        fn angle_stays_wrapped_while_walking() {
            let mut c = controller();
            for _ in 0..10_000 {
                c.update(DT, LEFT);
                assert!(c.current_angle() > -PI - 1e-5 && c.current_angle() <= PI + 1e-5);
            }
        }
    }

    mod edges {
        use super::*;

        #[test]
        fn edge_only_on_transitions() {
            let mut c = controller();
            assert_eq!(c.update(DT, NONE).edge, None);
            assert_eq!(
                c.update(DT, LEFT).edge,
                Some(MoveEdge::Started(Direction::Left))
            );
            for _ in 0..20 {
                assert_eq!(c.update(DT, LEFT).edge, None);
            }
            assert_eq!(
                c.update(DT, RIGHT).edge,
                Some(MoveEdge::Started(Direction::Right))
            );
            assert_eq!(c.update(DT, NONE).edge, Some(MoveEdge::Stopped));
            assert_eq!(c.update(DT, NONE).edge, None);
        }

        #[test]
        fn seek_interrupting_manual_motion_reports_stop() {
            let mut c = controller();
            c.update(DT, LEFT);
            c.request_seek(1.0, Some(1));
            let step = c.update(DT, LEFT);
            assert_eq!(step.edge, Some(MoveEdge::Stopped));
            assert!(!step.moved_manually);
        }

        #[test]
        fn labels_name_the_direction() {
            assert_eq!(MoveEdge::Started(Direction::Left).label(), "Moving left");
            assert_eq!(MoveEdge::Started(Direction::Right).label(), "Moving right");
            assert_eq!(MoveEdge::Stopped.label(), "Stopped moving");
        }
    }

    mod seeking {
        use super::*;

        #[test]
        fn reaches_target_exactly_and_goes_idle() {
            let mut c = controller();
            c.request_seek(-0.45, Some(7));
            let mut arrivals = Vec::new();
            for _ in 0..1000 {
                if let Some(a) = c.update(DT, NONE).arrived {
                    arrivals.push(a);
                }
            }
            assert_eq!(arrivals, vec![7]);
            assert_eq!(c.current_angle(), -0.45);
            assert_eq!(c.phase(), MotionPhase::Idle);
        }

        #[test]
        fn ignores_manual_input_while_seeking() {
            let mut c = controller();
            c.request_seek(1.0, None);
            c.update(DT, RIGHT);
            assert!(c.current_angle() > 0.0);
            assert!(c.is_seeking());
        }

        #[test]
        fn takes_the_short_way_across_the_seam() {
            let mut c = controller();
            c.request_seek(3.0, None);
            while c.is_seeking() {
                c.update(DT, NONE);
            }
            c.request_seek(-3.0, None);
            c.update(DT, NONE);
            // Crossing +PI is shorter than sweeping back through zero.
            assert!(c.current_angle() > 3.0);
        }

        #[test]
        fn latest_request_wins() {
            let mut c = controller();
            c.request_seek(0.5, Some(1));
            c.update(DT, NONE);
            c.request_seek(-0.2, Some(2));
            let mut arrivals = Vec::new();
            for _ in 0..1000 {
                if let Some(a) = c.update(DT, NONE).arrived {
                    arrivals.push(a);
                }
            }
            assert_eq!(arrivals, vec![2]);
            assert_eq!(c.current_angle(), -0.2);
        }

        #[test]
        fn already_at_target_arrives_on_next_update() {
            let mut c = controller();
            c.request_seek(0.0, Some(9));
            assert!(c.is_seeking());
            let step = c.update(0.0, NONE);
            assert_eq!(step.arrived, Some(9));
            assert_eq!(c.update(DT, NONE).arrived, None);
        }

        #[test]
        fn target_is_wrapped() {
            let mut c = controller();
            c.request_seek(2.0 * PI + 0.1, None);
            assert_eq!(c.phase(), MotionPhase::Seeking { target: wrap_angle(2.0 * PI + 0.1) });
        }
    }

    proptest! {
        #[test]
        fn seeking_never_overshoots(
            target in -3.1f32..3.1,
            deltas in proptest::collection::vec(0.0f32..50.0, 1..400),
        ) {
            let mut c: RotationController<()> = RotationController::new(SPEED).unwrap();
            c.request_seek(target, Some(()));
            let mut remaining = shortest_diff(c.current_angle(), target).abs();
            let mut arrivals = 0;
            for dt in deltas {
                if c.update(dt, NONE).arrived.is_some() {
                    arrivals += 1;
                }
                let now = shortest_diff(c.current_angle(), target).abs();
                prop_assert!(now <= remaining + 1e-5);
                remaining = now;
                if !c.is_seeking() {
                    prop_assert_eq!(c.current_angle(), wrap_angle(target));
                }
            }
            prop_assert!(arrivals <= 1);
        }
    }
}
