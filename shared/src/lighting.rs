//! Procedural day/night sky.
//!
//! [`sky_color`] is a pure function of the time of day, the sunrise/sunset
//! window and a fixed viewing elevation. It keeps no memory between calls;
//! callers re-evaluate it on a cadence rather than every frame.

/// Minutes before sunrise / after sunset over which the sun fades out.
pub const TWILIGHT_WINDOW_MINUTES: f32 = 45.0;
/// Exponent applied to the viewing elevation; < 1 biases toward horizon tones.
pub const ELEVATION_EXPONENT: f32 = 0.6;

const MINUTES_PER_DAY: f32 = 1440.0;
const DAY_THRESHOLD: f32 = 0.35;
const NIGHT_THRESHOLD: f32 = 0.6;
const TWILIGHT_SPREAD: f32 = 0.5;
/// Twilight tones fade out this far from the nearer of sunrise/sunset.
const TWILIGHT_PROXIMITY_MINUTES: f32 = 2.0 * TWILIGHT_WINDOW_MINUTES;
const GLOW_COLOR: [f32; 3] = [1.0, 0.45, 0.2];
const GLOW_STRENGTH: f32 = 0.35;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkyRamp {
    pub zenith: [f32; 3],
    pub horizon: [f32; 3],
}

pub const DAY_RAMP: SkyRamp = SkyRamp {
    zenith: [0.25, 0.52, 0.90],
    horizon: [0.62, 0.80, 0.96],
};

pub const TWILIGHT_RAMP: SkyRamp = SkyRamp {
    zenith: [0.30, 0.25, 0.52],
    horizon: [0.98, 0.55, 0.32],
};

pub const NIGHT_RAMP: SkyRamp = SkyRamp {
    zenith: [0.02, 0.03, 0.10],
    horizon: [0.07, 0.09, 0.20],
};

/// Independent blend weights; they are not normalized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkyWeights {
    /// In [-1, 1]: 1 at solar noon, 0 at sunrise/sunset, -1 once the twilight window has passed.
    pub sun_height: f32,
    pub day: f32,
    pub twilight: f32,
    pub night: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkyPalette {
    pub rgb: [u8; 3],
    /// Opacity of the darkening overlay drawn above the scene.
    pub overlay_alpha: f32,
}

impl SkyPalette {
    pub fn hex(&self) -> u32 {
        let [r, g, b] = self.rgb;
        ((r as u32) << 16) | ((g as u32) << 8) | b as u32
    }

    /// Mean of the three channels in [0, 1].
    pub fn brightness(&self) -> f32 {
        let [r, g, b] = self.rgb;
        (r as f32 + g as f32 + b as f32) / (3.0 * 255.0)
    }
}

pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn circular_distance(a: f32, b: f32) -> f32 {
    let d = (a - b).abs().rem_euclid(MINUTES_PER_DAY);
    d.min(MINUTES_PER_DAY - d)
}

pub fn sun_height(now: f32, sunrise: f32, sunset: f32) -> f32 {
    if now >= sunrise && now <= sunset {
        let solar_noon = (sunrise + sunset) * 0.5;
        let half_day = ((sunset - sunrise) * 0.5).max(1.0);
        let x = ((now - solar_noon) / half_day).clamp(-1.0, 1.0);
        (x * std::f32::consts::FRAC_PI_2).cos()
    } else {
        let outside = if now < sunrise {
            (sunrise - now).min(now + MINUTES_PER_DAY - sunset)
        } else {
            (now - sunset).min(sunrise + MINUTES_PER_DAY - now)
        };
        -smoothstep(0.0, TWILIGHT_WINDOW_MINUTES, outside.max(0.0))
    }
}

pub fn sky_weights(now: f32, sunrise: f32, sunset: f32) -> SkyWeights {
    let h = sun_height(now, sunrise, sunset);
    let edge_distance = circular_distance(now, sunrise).min(circular_distance(now, sunset));
    let proximity = 1.0 - smoothstep(0.0, TWILIGHT_PROXIMITY_MINUTES, edge_distance);

    SkyWeights {
        sun_height: h,
        day: smoothstep(0.0, DAY_THRESHOLD, h),
        twilight: (1.0 - smoothstep(0.0, TWILIGHT_SPREAD, h.abs())) * proximity,
        night: smoothstep(0.0, NIGHT_THRESHOLD, -h),
    }
}

/// Weighted sum of the three ramps.
pub fn compose_ramp(weights: &SkyWeights) -> SkyRamp {
    let mix = |pick: fn(&SkyRamp) -> [f32; 3]| -> [f32; 3] {
        let (d, t, n) = (pick(&DAY_RAMP), pick(&TWILIGHT_RAMP), pick(&NIGHT_RAMP));
        [0usize, 1, 2].map(|i| d[i] * weights.day + t[i] * weights.twilight + n[i] * weights.night)
    };
    SkyRamp {
        zenith: mix(|r| r.zenith),
        horizon: mix(|r| r.horizon),
    }
}

/// Linear sky color in [0, 1] before quantization.
pub fn sky_rgb(weights: &SkyWeights, view_elevation: f32) -> [f32; 3] {
    let v = view_elevation.clamp(0.0, 1.0);
    let ramp = compose_ramp(weights);
    let t = v.powf(ELEVATION_EXPONENT);
    let glow = weights.twilight * (1.0 - v).powi(3) * GLOW_STRENGTH;

    [0usize, 1, 2].map(|i| {
        let base = ramp.horizon[i] + (ramp.zenith[i] - ramp.horizon[i]) * t;
        (base + GLOW_COLOR[i] * glow).clamp(0.0, 1.0)
    })
}

pub fn overlay_alpha(brightness: f32) -> f32 {
    (0.6 - brightness * 0.4 + 0.15).clamp(0.0, 1.0)
}

/// Sky color and overlay opacity for `now_minutes` (minutes since local midnight).
pub fn sky_color(
    now_minutes: f32,
    sunrise_minutes: f32,
    sunset_minutes: f32,
    view_elevation: f32,
) -> SkyPalette {
    let weights = sky_weights(now_minutes, sunrise_minutes, sunset_minutes);
    let rgb = sky_rgb(&weights, view_elevation);
    let brightness = (rgb[0] + rgb[1] + rgb[2]) / 3.0;

    SkyPalette {
        rgb: rgb.map(|c| (c * 255.0).round() as u8),
        overlay_alpha: overlay_alpha(brightness),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUNRISE: f32 = 360.0;
    const SUNSET: f32 = 1080.0;
    const ELEVATION: f32 = 0.35;

    fn day_blend(v: f32) -> [u8; 3] {
        let t = v.powf(ELEVATION_EXPONENT);
        [0usize, 1, 2].map(|i| {
            let c = DAY_RAMP.horizon[i] + (DAY_RAMP.zenith[i] - DAY_RAMP.horizon[i]) * t;
            (c * 255.0).round() as u8
        })
    }

    mod weights {
        use super::*;

        #[test]
        fn noon_is_pure_day() {
            let w = sky_weights(720.0, SUNRISE, SUNSET);
            assert!((w.sun_height - 1.0).abs() < 1e-6);
            assert!((w.day - 1.0).abs() < 1e-6);
            assert!(w.night.abs() < 1e-6);
            assert!(w.twilight.abs() < 1e-6);
        }

        #[test]
        fn midnight_is_pure_night() {
            let w = sky_weights(0.0, SUNRISE, SUNSET);
            assert!((w.sun_height + 1.0).abs() < 1e-6);
            assert!((w.night - 1.0).abs() < 1e-6);
            assert!(w.day.abs() < 1e-6);
            assert!(w.twilight.abs() < 1e-6);
        }

        #[test]
        fn sunrise_and_sunset_are_twilight() {
            for now in [SUNRISE, SUNSET] {
                let w = sky_weights(now, SUNRISE, SUNSET);
                assert!(w.twilight > 0.9, "twilight at {now}: {}", w.twilight);
                assert!(w.day < 1.0);
                assert!(w.night < 1.0);
            }
        }

        #[test]
        fn sun_fades_over_the_twilight_window() {
            let just_after = sun_height(SUNSET + 10.0, SUNRISE, SUNSET);
            let later = sun_height(SUNSET + 30.0, SUNRISE, SUNSET);
            let done = sun_height(SUNSET + TWILIGHT_WINDOW_MINUTES, SUNRISE, SUNSET);
            assert!(just_after < 0.0 && just_after > later);
            assert!((done + 1.0).abs() < 1e-6);
        }

        #[test]
        fn pre_dawn_counts_across_midnight() {
            // 23:50 is 350 minutes from sunset and 370 from sunrise: deep night.
            let w = sky_weights(1430.0, SUNRISE, SUNSET);
            assert!((w.night - 1.0).abs() < 1e-6);
            // Just before sunrise the sun is still close to the horizon.
            let h = sun_height(SUNRISE - 5.0, SUNRISE, SUNSET);
            assert!(h > -0.2 && h < 0.0);
        }

        #[test]
        fn low_afternoon_sun_has_little_twilight() {
            // 2 hours before sunset the sun is low but far from the transition.
            let w = sky_weights(SUNSET - 120.0, SUNRISE, SUNSET);
            assert!(w.twilight < 1e-6);
        }
    }

    mod palette {
        use super::*;

        #[test]
        fn noon_matches_day_ramp() {
            let p = sky_color(720.0, SUNRISE, SUNSET, ELEVATION);
            assert_eq!(p.rgb, day_blend(ELEVATION));
        }

        #[test]
        fn same_inputs_same_output() {
            for now in [0.0, 300.0, 360.0, 555.5, 720.0, 1079.0, 1100.0, 1439.0] {
                let a = sky_color(now, SUNRISE, SUNSET, ELEVATION);
                let b = sky_color(now, SUNRISE, SUNSET, ELEVATION);
                assert_eq!(a, b);
            }
        }

        #[test]
        fn night_is_darker_than_day() {
            let day = sky_color(720.0, SUNRISE, SUNSET, ELEVATION);
            let night = sky_color(0.0, SUNRISE, SUNSET, ELEVATION);
            assert!(night.brightness() < day.brightness());
            assert!(night.overlay_alpha > day.overlay_alpha);
        }

        #[test]
        fn sunset_is_warmer_than_noon() {
            let noon = sky_color(720.0, SUNRISE, SUNSET, ELEVATION);
            let dusk = sky_color(SUNSET, SUNRISE, SUNSET, ELEVATION);
            assert!(dusk.rgb[0] > noon.rgb[0]);
            assert!(dusk.rgb[2] < noon.rgb[2]);
        }

        #[test]
        fn overlay_alpha_formula() {
            assert!((overlay_alpha(0.0) - 0.75).abs() < 1e-6);
            assert!((overlay_alpha(1.0) - 0.35).abs() < 1e-6);
        }

        #[test]
        fn hex_packs_channels() {
            let p = SkyPalette {
                rgb: [0x12, 0x34, 0x56],
                overlay_alpha: 0.0,
            };
            assert_eq!(p.hex(), 0x123456);
        }
    }
}
