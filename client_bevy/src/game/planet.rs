use bevy::prelude::*;
use bevy_prototype_lyon::prelude::*;
use homeworld_shared::config::EntityVisual;
use homeworld_shared::interaction::{
    ContextKind, ContextLayout, EntityId, EntityLayout, BUTTON_HEIGHT, BUTTON_WIDTH,
};

use crate::constants::{
    color_from_css, color_from_hex, Colors, Z_CONTEXT, Z_ENTITIES, Z_LABELS, Z_PLANET, Z_PLAYER,
};
use crate::coord::{canvas_rotation, px_to_world};

use super::{SimState, UpdateSet};

pub struct PlanetPlugin;

#[derive(Component)]
pub(crate) struct PlanetDisc;

#[derive(Component)]
pub(crate) struct PlayerSprite;

#[derive(Component)]
pub(crate) struct SurfaceSprite {
    pub(crate) id: EntityId,
}

#[derive(Component)]
pub(crate) struct SurfaceLabel {
    pub(crate) id: EntityId,
}

/// Unit rectangle scaled to fit the open description or button.
#[derive(Component)]
pub(crate) struct ContextBackdrop;

#[derive(Component)]
pub(crate) struct ContextText;

const LABEL_FONT: f32 = 13.0;
const CONTEXT_FONT: f32 = 12.0;
const DESCRIPTION_HEIGHT: f32 = 28.0;
const DESCRIPTION_PADDING: f32 = 20.0;
// Rough glyph advance at CONTEXT_FONT, enough to size the bubble.
const GLYPH_WIDTH: f32 = 6.5;

/// (angle in radians, depth below rim, radius)
const CRATERS: [(f32, f32, f32); 6] = [
    (0.15, 60.0, 26.0),
    (0.9, 120.0, 40.0),
    (1.8, 45.0, 18.0),
    (3.1, 90.0, 34.0),
    (4.2, 70.0, 22.0),
    (5.4, 140.0, 48.0),
];

impl Plugin for PlanetPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (spawn_planet, spawn_surface_entities, spawn_context))
            .add_systems(
                Update,
                (sync_planet, sync_surface_entities, sync_context).in_set(UpdateSet::Visuals),
            );
    }
}

fn spawn_planet(mut commands: Commands, state: Res<SimState>) {
    let config = state.sim.config();
    let center = px_to_world(config.planet_center, Z_PLANET);
    let radius = config.planet_radius;

    commands
        .spawn((
            ShapeBuilder::with(&shapes::Circle {
                radius,
                center: Vec2::ZERO,
            })
            .fill(color_from_hex(Colors::PLANET))
            .stroke((color_from_hex(Colors::PLANET_RIM), 4.0))
            .build(),
            Transform::from_translation(center),
            PlanetDisc,
        ))
        .with_children(|parent| {
            for (angle, depth, crater_radius) in CRATERS {
                let r = radius - depth;
                parent.spawn((
                    ShapeBuilder::with(&shapes::Circle {
                        radius: crater_radius,
                        center: Vec2::ZERO,
                    })
                    .fill(color_from_hex(Colors::CRATER))
                    .build(),
                    Transform::from_xyz(angle.sin() * r, angle.cos() * r, 0.1),
                ));
            }
        });

    let player = state.sim.interaction().player_position();
    let size = Vec2::new(config.player.width, config.player.height);
    commands.spawn((
        ShapeBuilder::with(&shapes::Rectangle {
            extents: size,
            origin: shapes::RectangleOrigin::Center,
            radii: None,
        })
        .fill(color_from_hex(Colors::PLAYER))
        .stroke((color_from_hex(Colors::PLAYER_OUTLINE), 2.0))
        .build(),
        Transform::from_translation(px_to_world(player, Z_PLAYER + config.player.depth * 0.1)),
        PlayerSprite,
    ));
}

fn spawn_surface_entities(mut commands: Commands, state: Res<SimState>) {
    let config = state.sim.config();
    let label_font = TextFont::from_font_size(LABEL_FONT);

    for def in &config.objects {
        let id = EntityId::new(def.id.clone());
        let color = color_from_css(def.visual.color());
        let shape = match &def.visual {
            EntityVisual::Prop { width, height, .. } => ShapeBuilder::with(&shapes::Rectangle {
                extents: Vec2::new(*width, *height),
                // Props stand on their anchor point.
                origin: shapes::RectangleOrigin::CustomCenter(Vec2::new(0.0, height * 0.5)),
                radii: None,
            })
            .fill(color)
            .build(),
            EntityVisual::Marker { radius, .. } => ShapeBuilder::with(&shapes::Circle {
                radius: *radius,
                center: Vec2::ZERO,
            })
            .fill(color)
            .stroke((color_from_hex(Colors::LABEL).with_alpha(0.6), 1.5))
            .build(),
        };

        commands.spawn((
            shape,
            Transform::from_xyz(0.0, 0.0, Z_ENTITIES + def.depth),
            Visibility::Hidden,
            SurfaceSprite { id: id.clone() },
        ));

        commands.spawn((
            Text2d::new(def.name.clone()),
            label_font.clone(),
            TextColor(color_from_hex(Colors::LABEL)),
            Transform::from_xyz(0.0, 0.0, Z_LABELS),
            Visibility::Hidden,
            SurfaceLabel { id },
        ));
    }
}

fn spawn_context(mut commands: Commands) {
    commands.spawn((
        ShapeBuilder::with(&shapes::Rectangle {
            extents: Vec2::ONE,
            origin: shapes::RectangleOrigin::Center,
            radii: None,
        })
        .fill(color_from_hex(Colors::BUBBLE_BG).with_alpha(0.85))
        .build(),
        Transform::from_xyz(0.0, 0.0, Z_CONTEXT),
        Visibility::Hidden,
        ContextBackdrop,
    ));

    commands.spawn((
        Text2d::new(""),
        TextFont::from_font_size(CONTEXT_FONT),
        TextColor(color_from_hex(Colors::LABEL)),
        Transform::from_xyz(0.0, 0.0, Z_CONTEXT + 0.1),
        Visibility::Hidden,
        ContextText,
    ));
}

fn sync_planet(state: Res<SimState>, mut q_planet: Query<&mut Transform, With<PlanetDisc>>) {
    if let Ok(mut tf) = q_planet.single_mut() {
        tf.rotation = canvas_rotation(state.sim.world_angle());
    }
}

fn apply_sprite(layout: &EntityLayout, tf: &mut Transform) {
    let placed = px_to_world(layout.sprite, Z_ENTITIES + layout.depth);
    tf.translation = placed;
    tf.rotation = canvas_rotation(layout.rotation);
}

fn sync_surface_entities(
    state: Res<SimState>,
    mut q_sprites: Query<(&SurfaceSprite, &mut Transform, &mut Visibility), Without<SurfaceLabel>>,
    mut q_labels: Query<(&SurfaceLabel, &mut Transform, &mut Visibility), Without<SurfaceSprite>>,
) {
    let interaction = state.sim.interaction();

    for (sprite, mut tf, mut visibility) in &mut q_sprites {
        match interaction.layout(&sprite.id) {
            Some(layout) => {
                apply_sprite(layout, &mut tf);
                *visibility = Visibility::Visible;
            }
            None => *visibility = Visibility::Hidden,
        }
    }

    for (label, mut tf, mut visibility) in &mut q_labels {
        let Some(layout) = interaction.layout(&label.id) else {
            *visibility = Visibility::Hidden;
            continue;
        };
        tf.translation = px_to_world(layout.label, Z_LABELS);
        *visibility = if layout.label_visible {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
    }
}

/// Pixel size and text of the context bubble.
pub(crate) fn context_extent(context: &ContextLayout) -> (Vec2, &str) {
    match &context.kind {
        ContextKind::Button(label) => (Vec2::new(BUTTON_WIDTH, BUTTON_HEIGHT), label.as_str()),
        ContextKind::Description(text) => {
            let width = text.chars().count() as f32 * GLYPH_WIDTH + DESCRIPTION_PADDING;
            (Vec2::new(width, DESCRIPTION_HEIGHT), text.as_str())
        }
    }
}

fn sync_context(
    state: Res<SimState>,
    mut q_backdrop: Query<
        (&mut Transform, &mut Visibility, &mut Shape),
        (With<ContextBackdrop>, Without<ContextText>),
    >,
    mut q_text: Query<
        (&mut Text2d, &mut Transform, &mut Visibility),
        (With<ContextText>, Without<ContextBackdrop>),
    >,
) {
    let context = state.sim.interaction().context_layout();

    if let Ok((mut tf, mut visibility, mut shape)) = q_backdrop.single_mut() {
        match context {
            Some(context) => {
                let (size, _) = context_extent(context);
                tf.translation = px_to_world(context.position, Z_CONTEXT);
                tf.scale = Vec3::new(size.x, size.y, 1.0);
                let fill = match context.kind {
                    ContextKind::Button(_) => color_from_hex(Colors::BUTTON_IDLE),
                    ContextKind::Description(_) => {
                        color_from_hex(Colors::BUBBLE_BG).with_alpha(0.85)
                    }
                };
                if let Some(f) = shape.fill.as_mut() {
                    f.color = fill;
                }
                *visibility = Visibility::Visible;
            }
            None => *visibility = Visibility::Hidden,
        }
    }

    if let Ok((mut text, mut tf, mut visibility)) = q_text.single_mut() {
        match context {
            Some(context) => {
                let (_, body) = context_extent(context);
                if text.0 != body {
                    text.0 = body.to_string();
                }
                tf.translation = px_to_world(context.position, Z_CONTEXT + 0.1);
                *visibility = Visibility::Visible;
            }
            None => *visibility = Visibility::Hidden,
        }
    }
}
