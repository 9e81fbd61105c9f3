pub const CANVAS_WIDTH: f32 = 430.0;
pub const CANVAS_HEIGHT: f32 = 900.0;

/// Z layers for world-space shapes. Entity depth is added on top of `Z_ENTITIES`.
pub const Z_SKY: f32 = 0.0;
pub const Z_PLANET: f32 = 1.0;
pub const Z_ENTITIES: f32 = 2.0;
pub const Z_PLAYER: f32 = 4.0;
pub const Z_LABELS: f32 = 5.0;
pub const Z_CONTEXT: f32 = 6.0;
pub const Z_NIGHT_OVERLAY: f32 = 8.0;

#[derive(Clone, Copy)]
pub struct Colors;

impl Colors {
    pub const SPACE_BG: u32 = 0x050510;
    pub const PLANET: u32 = 0x3e7d4f;
    pub const PLANET_RIM: u32 = 0x6fbf73;
    pub const CRATER: u32 = 0x2e5e3b;
    pub const PLAYER: u32 = 0xffe0b2;
    pub const PLAYER_OUTLINE: u32 = 0x5d4037;
    pub const LABEL: u32 = 0xffffff;
    pub const NIGHT_OVERLAY: u32 = 0x0a0a23;
    pub const BUBBLE_BG: u32 = 0x1a1a1a;
    pub const BUTTON_IDLE: u32 = 0x1a1a1a;
    pub const BUTTON_PRESSED: u32 = 0x333333;
    pub const MARQUEE_TEXT: u32 = 0xfffbe6;
    pub const ENERGY: u32 = 0xffca28;
}

pub fn color_from_hex(rgb: u32) -> bevy::prelude::Color {
    let r = ((rgb >> 16) & 0xff) as f32 / 255.0;
    let g = ((rgb >> 8) & 0xff) as f32 / 255.0;
    let b = (rgb & 0xff) as f32 / 255.0;
    bevy::prelude::Color::srgb(r, g, b)
}

/// `"#rrggbb"` or `"rrggbb"` to a packed RGB value.
pub fn parse_css_hex(s: &str) -> Option<u32> {
    let digits = s.trim().trim_start_matches('#');
    if digits.len() != 6 {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

/// Entity colors come from config; unparsable ones fall back to white.
pub fn color_from_css(s: &str) -> bevy::prelude::Color {
    color_from_hex(parse_css_hex(s).unwrap_or(0xffffff))
}
