//! Surface entities: where they are, when their labels show, and what a click does.
//!
//! A click never acts directly. It becomes a [`SeekRequest`] that the host
//! hands to the rotation controller together with an [`Arrival`] token; when
//! the world has turned the entity under the player, the token comes back via
//! [`InteractionSystem::arrive`] and the entity's action runs. At most one
//! transient element (description bubble or action button) is open at a time.

use std::fmt;

use tracing::{debug, info};

pub use crate::config::{Activity, EntityAction, EntityVisual};
use crate::angle::wrap_angle;
use crate::config::{PlayerConfig, WorldConfig, WorldObjectDef};
use crate::error::ConfigError;
use crate::projection::{along_normal, PolarProjector, ScreenPos};
use crate::timer::{Scheduler, TimerHandle};

/// Gap between a sprite's top and its label.
pub const LABEL_GAP: f32 = 8.0;
/// Gap between a sprite's bottom and the bubble or button under it.
pub const CONTEXT_GAP: f32 = 24.0;
pub const BUTTON_WIDTH: f32 = 96.0;
pub const BUTTON_HEIGHT: f32 = 36.0;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returned to [`InteractionSystem::arrive`] once a seek completes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Arrival {
    pub entity: EntityId,
}

/// What a pointer-down landed on, as resolved by the host (or by [`InteractionSystem::pick`]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PointerTarget {
    Entity(EntityId),
    ActionButton(EntityId),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SeekRequest {
    pub target_angle: f32,
    pub arrival: Arrival,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PointerOutcome {
    Seek(SeekRequest),
    Activity(Activity),
    Ignored,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ContextUi {
    Description {
        entity: EntityId,
        text: String,
        hide: TimerHandle,
    },
    ActionButton {
        entity: EntityId,
        label: String,
        activity: Activity,
    },
}

impl ContextUi {
    pub fn entity(&self) -> &EntityId {
        match self {
            ContextUi::Description { entity, .. } | ContextUi::ActionButton { entity, .. } => {
                entity
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EntityLayout {
    pub id: EntityId,
    /// Rim point under the entity.
    pub surface: ScreenPos,
    /// Sprite centre, offset from the rim along the outward normal.
    pub sprite: ScreenPos,
    /// Effective angle; sprites stand perpendicular to the surface.
    pub rotation: f32,
    /// Label anchor, kept upright in screen space.
    pub label: ScreenPos,
    pub label_visible: bool,
    /// Distance from the player in pixels.
    pub distance: f32,
    pub depth: f32,
    /// Centre of the drawn shape; pointer hits are measured from here.
    pub hit_center: ScreenPos,
    pub hit_radius: f32,
    pub interactive: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ContextKind {
    Description(String),
    Button(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ContextLayout {
    pub entity: EntityId,
    pub kind: ContextKind,
    pub position: ScreenPos,
}

impl ContextLayout {
    pub fn contains(&self, point: ScreenPos) -> bool {
        matches!(self.kind, ContextKind::Button(_))
            && (point.x - self.position.x).abs() <= BUTTON_WIDTH * 0.5
            && (point.y - self.position.y).abs() <= BUTTON_HEIGHT * 0.5
    }
}

struct SurfaceEntity {
    id: EntityId,
    def: WorldObjectDef,
}

pub struct InteractionSystem {
    projector: PolarProjector,
    proximity_threshold: f32,
    player: PlayerConfig,
    description_ms: f64,
    entities: Vec<SurfaceEntity>,
    layouts: Vec<EntityLayout>,
    active: Option<ContextUi>,
    context_layout: Option<ContextLayout>,
    timers: Scheduler<EntityId>,
}

impl InteractionSystem {
    pub fn new(config: &WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let entities: Vec<SurfaceEntity> = config
            .objects
            .iter()
            .map(|def| SurfaceEntity {
                id: EntityId::new(def.id.clone()),
                def: def.clone(),
            })
            .collect();
        let layouts = entities
            .iter()
            .map(|e| EntityLayout {
                id: e.id.clone(),
                surface: ScreenPos::default(),
                sprite: ScreenPos::default(),
                rotation: 0.0,
                label: ScreenPos::default(),
                label_visible: false,
                distance: f32::INFINITY,
                depth: e.def.depth,
                hit_center: ScreenPos::default(),
                hit_radius: e.def.visual.hit_radius(),
                interactive: e.def.interactive,
            })
            .collect();

        let mut system = Self {
            projector: config.projector(),
            proximity_threshold: config.proximity_threshold,
            player: config.player,
            description_ms: config.description_ms,
            entities,
            layouts,
            active: None,
            context_layout: None,
            timers: Scheduler::new(),
        };
        system.update_layout(0.0, None);
        Ok(system)
    }

    /// The player never moves on screen: it stands on top of the planet.
    pub fn player_position(&self) -> ScreenPos {
        self.projector
            .surface_point(0.0, 0.0, self.player.radial_offset)
    }

    pub fn entity_name(&self, id: &EntityId) -> Option<&str> {
        self.find(id).map(|e| e.def.name.as_str())
    }

    pub fn pointer_down(&mut self, target: &PointerTarget) -> PointerOutcome {
        match target {
            PointerTarget::Entity(id) => {
                let Some(entity) = self.find(id) else {
                    debug!(entity = %id, "pointer on unknown entity");
                    return PointerOutcome::Ignored;
                };
                if !entity.def.interactive || entity.def.action.is_none() {
                    debug!(entity = %id, "entity has no action");
                    return PointerOutcome::Ignored;
                }
                PointerOutcome::Seek(SeekRequest {
                    target_angle: wrap_angle(-(entity.def.base_angle + entity.def.approach_offset)),
                    arrival: Arrival { entity: id.clone() },
                })
            }
            PointerTarget::ActionButton(id) => match &self.active {
                Some(ContextUi::ActionButton {
                    entity, activity, ..
                }) if entity == id => {
                    let activity = *activity;
                    self.dismiss_transient();
                    PointerOutcome::Activity(activity)
                }
                _ => PointerOutcome::Ignored,
            },
        }
    }

    /// Run the entity's action. Any open transient element is closed first.
    pub fn arrive(&mut self, arrival: &Arrival) -> Option<Activity> {
        self.dismiss_transient();
        let entity = self.find(&arrival.entity)?;
        info!(entity = %entity.id, "arrived");

        let (id, action, description) = (
            entity.id.clone(),
            entity.def.action.clone(),
            entity.def.description.clone(),
        );
        match action? {
            EntityAction::Activity { activity } => Some(activity),
            EntityAction::Describe => {
                let text = description?;
                let hide = self.timers.schedule_once(self.description_ms, id.clone());
                self.active = Some(ContextUi::Description {
                    entity: id,
                    text,
                    hide,
                });
                None
            }
            EntityAction::OfferButton { label, activity } => {
                self.active = Some(ContextUi::ActionButton {
                    entity: id,
                    label,
                    activity,
                });
                None
            }
        }
    }

    /// Close the open bubble or button. Returns whether anything was open.
    pub fn dismiss_transient(&mut self) -> bool {
        match self.active.take() {
            Some(ContextUi::Description { hide, .. }) => {
                self.timers.cancel(hide);
                self.context_layout = None;
                true
            }
            Some(ContextUi::ActionButton { .. }) => {
                self.context_layout = None;
                true
            }
            None => false,
        }
    }

    pub fn advance_timers(&mut self, dt_ms: f64) {
        for entity in self.timers.advance(dt_ms) {
            if matches!(&self.active, Some(ContextUi::Description { entity: e, .. }) if *e == entity)
            {
                debug!(entity = %entity, "description hidden");
                self.active = None;
                self.context_layout = None;
            }
        }
    }

    pub fn active(&self) -> Option<&ContextUi> {
        self.active.as_ref()
    }

    /// Recompute every entity's placement from the current world angle.
    pub fn update_layout(&mut self, world_angle: f32, hovered: Option<&EntityId>) {
        let player = self.player_position();
        for (entity, layout) in self.entities.iter().zip(self.layouts.iter_mut()) {
            let def = &entity.def;
            let effective = def.base_angle + world_angle;
            let surface = self.projector.project(def.base_angle, world_angle);
            let sprite = along_normal(surface, effective, def.radial_offset);
            let distance = sprite.distance(player);

            layout.surface = surface;
            layout.sprite = sprite;
            layout.rotation = effective;
            layout.hit_center = along_normal(sprite, effective, def.visual.center_lift());
            layout.label = sprite.offset(0.0, -(def.visual.height() + LABEL_GAP));
            layout.distance = distance;
            layout.label_visible =
                distance <= self.proximity_threshold || hovered == Some(&entity.id);
        }

        self.context_layout = self.active.as_ref().and_then(|ui| {
            let idx = self.entities.iter().position(|e| &e.id == ui.entity())?;
            let below = self.layouts[idx].sprite.offset(
                0.0,
                self.entities[idx].def.visual.height() * 0.5 + CONTEXT_GAP,
            );
            let kind = match ui {
                ContextUi::Description { text, .. } => ContextKind::Description(text.clone()),
                ContextUi::ActionButton { label, .. } => ContextKind::Button(label.clone()),
            };
            Some(ContextLayout {
                entity: ui.entity().clone(),
                kind,
                position: below,
            })
        });
    }

    pub fn layouts(&self) -> &[EntityLayout] {
        &self.layouts
    }

    pub fn layout(&self, id: &EntityId) -> Option<&EntityLayout> {
        self.layouts.iter().find(|l| &l.id == id)
    }

    pub fn context_layout(&self) -> Option<&ContextLayout> {
        self.context_layout.as_ref()
    }

    /// Top-most thing under `point`: the action button first, then the
    /// interactive entity with the highest depth.
    pub fn pick(&self, point: ScreenPos) -> Option<PointerTarget> {
        if let Some(ctx) = &self.context_layout {
            if ctx.contains(point) {
                return Some(PointerTarget::ActionButton(ctx.entity.clone()));
            }
        }
        self.top_most(point, true)
            .map(|l| PointerTarget::Entity(l.id.clone()))
    }

    /// Entity under `point` for hover purposes. Unlike [`Self::pick`] this
    /// includes entities that ignore clicks, so their labels can still show.
    pub fn hover_at(&self, point: ScreenPos) -> Option<EntityId> {
        self.top_most(point, false).map(|l| l.id.clone())
    }

    fn top_most(&self, point: ScreenPos, interactive_only: bool) -> Option<&EntityLayout> {
        self.layouts
            .iter()
            .filter(|l| !interactive_only || l.interactive)
            .filter(|l| l.hit_center.distance(point) <= l.hit_radius)
            .max_by(|a, b| a.depth.total_cmp(&b.depth))
    }

    fn find(&self, id: &EntityId) -> Option<&SurfaceEntity> {
        self.entities.iter().find(|e| &e.id == id)
    }
}
