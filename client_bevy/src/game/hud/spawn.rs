use bevy::prelude::*;
use homeworld_shared::rotation::Direction;

use crate::constants::{color_from_hex, Colors};

use super::types::{
    hold_button_color, HudClockText, HudEnergyFill, HudEnergyText, HudHeadingText, HudHoldButton,
    HudStatusText, CLOCK_TOP, ENERGY_BAR_HEIGHT, ENERGY_BAR_WIDTH, ENERGY_TOP, HEADING_TOP,
    HOLD_BUTTON_BOTTOM, HOLD_BUTTON_HEIGHT, HOLD_BUTTON_SIDE, HOLD_BUTTON_WIDTH, HUD_LEFT,
    STATUS_TOP,
};

pub(super) fn spawn_hud(mut commands: Commands) {
    let small = TextFont::from_font_size(12.0);
    let medium = TextFont::from_font_size(14.0);

    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(HUD_LEFT),
            top: Val::Px(CLOCK_TOP),
            ..default()
        },
        Text::new(""),
        small.clone(),
        TextColor(color_from_hex(Colors::LABEL)),
        HudClockText,
    ));

    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(HUD_LEFT),
            top: Val::Px(STATUS_TOP),
            ..default()
        },
        Text::new(""),
        medium.clone(),
        TextColor(color_from_hex(Colors::LABEL)),
        HudStatusText,
    ));

    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(HUD_LEFT),
            top: Val::Px(HEADING_TOP),
            ..default()
        },
        Text::new(""),
        small.clone(),
        TextColor(color_from_hex(Colors::LABEL).with_alpha(0.8)),
        HudHeadingText,
    ));

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(HUD_LEFT),
                top: Val::Px(ENERGY_TOP + 4.0),
                width: Val::Px(ENERGY_BAR_WIDTH),
                height: Val::Px(ENERGY_BAR_HEIGHT),
                border: UiRect::all(Val::Px(1.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.4)),
            BorderColor::all(color_from_hex(Colors::ENERGY).with_alpha(0.6)),
            BorderRadius::all(Val::Px(3.0)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Node {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    ..default()
                },
                BackgroundColor(color_from_hex(Colors::ENERGY)),
                BorderRadius::all(Val::Px(2.0)),
                HudEnergyFill,
            ));
        });

    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(HUD_LEFT + ENERGY_BAR_WIDTH + 8.0),
            top: Val::Px(ENERGY_TOP),
            ..default()
        },
        Text::new(""),
        small,
        TextColor(color_from_hex(Colors::ENERGY)),
        HudEnergyText,
    ));

    spawn_hold_button(&mut commands, Direction::Left, "< Left", &medium);
    spawn_hold_button(&mut commands, Direction::Right, "Right >", &medium);
}

fn spawn_hold_button(commands: &mut Commands, direction: Direction, label: &str, font: &TextFont) {
    let mut node = Node {
        position_type: PositionType::Absolute,
        bottom: Val::Px(HOLD_BUTTON_BOTTOM),
        width: Val::Px(HOLD_BUTTON_WIDTH),
        height: Val::Px(HOLD_BUTTON_HEIGHT),
        justify_content: JustifyContent::Center,
        align_items: AlignItems::Center,
        border: UiRect::all(Val::Px(1.0)),
        ..default()
    };
    match direction {
        Direction::Left => node.left = Val::Px(HOLD_BUTTON_SIDE),
        Direction::Right => node.right = Val::Px(HOLD_BUTTON_SIDE),
    }

    commands
        .spawn((
            Button,
            node,
            BackgroundColor(hold_button_color(false)),
            BorderColor::all(Color::srgba(1.0, 1.0, 1.0, 0.5)),
            BorderRadius::all(Val::Px(6.0)),
            HudHoldButton { direction },
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(label),
                font.clone(),
                TextColor(color_from_hex(Colors::LABEL)),
            ));
        });
}
