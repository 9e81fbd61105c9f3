use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, ensure_positive, ConfigError};
use crate::projection::{PolarProjector, ScreenPos};
use crate::sun_times::SunTimes;

const CANVAS_WIDTH: f32 = 430.0;
const CANVAS_HEIGHT: f32 = 900.0;
const MINUTES_PER_DAY: f32 = 1440.0;

/// Everything needed to build a [`Simulation`](crate::Simulation).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorldConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub planet_center: ScreenPos,
    pub planet_radius: f32,
    /// Radians per millisecond.
    pub rotation_speed: f32,
    /// Player-to-entity distance (px) under which labels show.
    pub proximity_threshold: f32,
    /// 0 = horizon, 1 = zenith.
    pub view_elevation: f32,
    pub sky_recompute_ms: f64,
    pub save_interval_ms: f64,
    pub clock_refresh_ms: f64,
    /// How long a description bubble stays up.
    pub description_ms: f64,
    pub player: PlayerConfig,
    pub objects: Vec<WorldObjectDef>,
    pub notifications: NotificationConfig,
    pub resource: ResourceConfig,
    pub sun: SunConfig,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerConfig {
    /// Pixels outward from the rim at the top of the planet.
    pub radial_offset: f32,
    pub depth: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            radial_offset: 30.0,
            depth: 1.0,
            width: 28.0,
            height: 44.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Activity {
    Sleep,
    Eat,
    Launch,
}

impl Activity {
    pub fn label(self) -> &'static str {
        match self {
            Activity::Sleep => "Getting ready for bed...",
            Activity::Eat => "Time to eat...",
            Activity::Launch => "Launching...",
        }
    }
}

/// What happens once the player has walked to an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EntityAction {
    Activity { activity: Activity },
    /// Show the entity's description in a bubble for a while.
    Describe,
    /// Reveal a button that starts `activity` when pressed.
    OfferButton { label: String, activity: Activity },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EntityVisual {
    Prop { width: f32, height: f32, color: String },
    Marker { radius: f32, color: String },
}

impl EntityVisual {
    pub fn height(&self) -> f32 {
        match self {
            EntityVisual::Prop { height, .. } => *height,
            EntityVisual::Marker { radius, .. } => radius * 2.0,
        }
    }

    /// How far the drawn shape's centre sits from its anchor along the
    /// outward normal. Props stand on their anchor; markers are centred on it.
    pub fn center_lift(&self) -> f32 {
        match self {
            EntityVisual::Prop { height, .. } => height * 0.5,
            EntityVisual::Marker { .. } => 0.0,
        }
    }

    /// Radius of the circle used for pointer hits, around the drawn centre.
    pub fn hit_radius(&self) -> f32 {
        match self {
            EntityVisual::Prop { width, height, .. } => width.max(*height) * 0.5,
            EntityVisual::Marker { radius, .. } => *radius,
        }
    }

    pub fn color(&self) -> &str {
        match self {
            EntityVisual::Prop { color, .. } | EntityVisual::Marker { color, .. } => color,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldObjectDef {
    pub id: String,
    pub name: String,
    pub base_angle: f32,
    #[serde(default)]
    pub radial_offset: f32,
    #[serde(default)]
    pub depth: f32,
    /// Added to `base_angle` before seeking, to stop beside rather than on top.
    #[serde(default)]
    pub approach_offset: f32,
    #[serde(default)]
    pub interactive: bool,
    #[serde(default)]
    pub action: Option<EntityAction>,
    #[serde(default)]
    pub description: Option<String>,
    pub visual: EntityVisual,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NotificationConfig {
    pub max_visible: usize,
    pub display_ms: f64,
    pub evict_fade_ms: f64,
    pub expire_fade_ms: f64,
    pub slot_spacing: f32,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            max_visible: 4,
            display_ms: 4000.0,
            evict_fade_ms: 200.0,
            expire_fade_ms: 250.0,
            slot_spacing: 22.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceConfig {
    pub max: f64,
    /// Units lost per millisecond, also applied across reloads.
    pub drain_per_ms: f64,
    pub storage_key: String,
    pub eat_amount: f64,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            max: 100.0,
            // Empty after eight hours.
            drain_per_ms: 100.0 / (8.0 * 3_600_000.0),
            storage_key: "energy".to_string(),
            eat_amount: 25.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SunConfig {
    pub fallback_sunrise_minutes: f32,
    pub fallback_sunset_minutes: f32,
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for SunConfig {
    fn default() -> Self {
        Self {
            fallback_sunrise_minutes: SunTimes::FALLBACK.sunrise_minutes,
            fallback_sunset_minutes: SunTimes::FALLBACK.sunset_minutes,
            latitude: 31.2304,
            longitude: 121.4737,
        }
    }
}

impl SunConfig {
    pub fn fallback(&self) -> SunTimes {
        SunTimes {
            sunrise_minutes: self.fallback_sunrise_minutes,
            sunset_minutes: self.fallback_sunset_minutes,
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            planet_center: ScreenPos::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT * 1.8),
            planet_radius: CANVAS_HEIGHT * 1.25,
            rotation_speed: 0.0018,
            proximity_threshold: 90.0,
            view_elevation: 0.35,
            sky_recompute_ms: 60_000.0,
            save_interval_ms: 5_000.0,
            clock_refresh_ms: 500.0,
            description_ms: 3_000.0,
            player: PlayerConfig::default(),
            objects: default_objects(),
            notifications: NotificationConfig::default(),
            resource: ResourceConfig::default(),
            sun: SunConfig::default(),
        }
    }
}

fn default_objects() -> Vec<WorldObjectDef> {
    vec![
        WorldObjectDef {
            id: "bed".into(),
            name: "Bed".into(),
            base_angle: -0.45,
            radial_offset: -8.0,
            depth: 0.4,
            approach_offset: 0.0,
            interactive: true,
            action: Some(EntityAction::Activity {
                activity: Activity::Sleep,
            }),
            description: None,
            visual: EntityVisual::Prop {
                width: 90.0,
                height: 44.0,
                color: "#8d6e63".into(),
            },
        },
        WorldObjectDef {
            id: "table".into(),
            name: "Table".into(),
            base_angle: 0.2,
            radial_offset: -6.0,
            depth: 0.45,
            approach_offset: 0.0,
            interactive: false,
            action: None,
            description: Some("A sturdy wooden table.".into()),
            visual: EntityVisual::Prop {
                width: 72.0,
                height: 40.0,
                color: "#a1887f".into(),
            },
        },
        WorldObjectDef {
            id: "eat".into(),
            name: "Eat".into(),
            base_angle: 0.45,
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
        },
        WorldObjectDef {
            id: "signpost".into(),
            name: "Signpost".into(),
            base_angle: 1.3,
            radial_offset: -10.0,
            depth: 0.45,
            approach_offset: 0.0,
            interactive: true,
            action: Some(EntityAction::Describe),
            description: Some("Home is behind you. The launch pad is over the hill.".into()),
            visual: EntityVisual::Prop {
                width: 18.0,
                height: 60.0,
                color: "#d7ccc8".into(),
            },
        },
        WorldObjectDef {
            id: "launch_pad".into(),
            name: "Launch pad".into(),
            base_angle: 2.4,
            radial_offset: -4.0,
            depth: 0.42,
            approach_offset: 0.0,
            interactive: true,
            action: Some(EntityAction::OfferButton {
                label: "Launch".into(),
                activity: Activity::Launch,
            }),
            description: None,
            visual: EntityVisual::Prop {
                width: 110.0,
                height: 18.0,
                color: "#90a4ae".into(),
            },
        },
    ]
}

impl WorldConfig {
    pub fn projector(&self) -> PolarProjector {
        PolarProjector::new(self.planet_center, self.planet_radius)
    }

    pub fn object(&self, id: &str) -> Option<&WorldObjectDef> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Read a JSON config; missing fields take their defaults.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: WorldConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("canvas_width", self.canvas_width as f64)?;
        ensure_positive("canvas_height", self.canvas_height as f64)?;
        ensure_finite("planet_center.x", self.planet_center.x as f64)?;
        ensure_finite("planet_center.y", self.planet_center.y as f64)?;
        ensure_positive("planet_radius", self.planet_radius as f64)?;
        ensure_positive("rotation_speed", self.rotation_speed as f64)?;
        ensure_positive("proximity_threshold", self.proximity_threshold as f64)?;
        if !(0.0..=1.0).contains(&self.view_elevation) {
            return Err(ConfigError::ElevationOutOfRange(self.view_elevation));
        }
        ensure_positive("sky_recompute_ms", self.sky_recompute_ms)?;
        ensure_positive("save_interval_ms", self.save_interval_ms)?;
        ensure_positive("clock_refresh_ms", self.clock_refresh_ms)?;
        ensure_positive("description_ms", self.description_ms)?;
        ensure_finite("player.radial_offset", self.player.radial_offset as f64)?;

        let mut seen = HashSet::new();
        for object in &self.objects {
            if object.id.trim().is_empty() {
                return Err(ConfigError::EmptyEntityId);
            }
            if !seen.insert(object.id.as_str()) {
                return Err(ConfigError::DuplicateEntityId(object.id.clone()));
            }
            ensure_finite("object.base_angle", object.base_angle as f64)?;
            ensure_finite("object.radial_offset", object.radial_offset as f64)?;
            ensure_finite("object.approach_offset", object.approach_offset as f64)?;
            ensure_positive("object.visual height", object.visual.height() as f64)?;
            if object.action == Some(EntityAction::Describe) && object.description.is_none() {
                return Err(ConfigError::MissingDescription(object.id.clone()));
            }
        }

        let n = &self.notifications;
        if n.max_visible == 0 {
            return Err(ConfigError::ZeroVisibleNotifications);
        }
        ensure_positive("notifications.display_ms", n.display_ms)?;
        ensure_positive("notifications.evict_fade_ms", n.evict_fade_ms)?;
        ensure_positive("notifications.expire_fade_ms", n.expire_fade_ms)?;
        ensure_positive("notifications.slot_spacing", n.slot_spacing as f64)?;

        ensure_positive("resource.max", self.resource.max)?;
        ensure_positive("resource.drain_per_ms", self.resource.drain_per_ms)?;
        ensure_finite("resource.eat_amount", self.resource.eat_amount)?;

        let (sunrise, sunset) = (
            self.sun.fallback_sunrise_minutes,
            self.sun.fallback_sunset_minutes,
        );
        let in_day = |m: f32| (0.0..=MINUTES_PER_DAY).contains(&m);
        if !(in_day(sunrise) && in_day(sunset)) || sunrise >= sunset {
            return Err(ConfigError::InvertedSunWindow { sunrise, sunset });
        }
        Ok(())
    }
}
