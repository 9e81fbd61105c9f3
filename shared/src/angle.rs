use std::f32::consts::{PI, TAU};

/// Wrap an angle in radians to (-PI, PI].
pub fn wrap_angle(angle: f32) -> f32 {
    if angle > -PI && angle <= PI {
        return angle;
    }
    let a = angle.rem_euclid(TAU);
    if a > PI {
        a - TAU
    } else {
        a
    }
}

/// Signed shortest rotation that takes `from` onto `to`, in (-PI, PI].
pub fn shortest_diff(from: f32, to: f32) -> f32 {
    wrap_angle(to - from)
}

/// Heading shown in the HUD: the world angle negated and mapped to [0, 360) degrees,
/// so walking right reads as increasing degrees.
pub fn heading_degrees(world_angle: f32) -> f32 {
    let deg = (-world_angle.to_degrees()).rem_euclid(360.0);
    // Also folds -0.0 so the readout never shows "-0.0".
    if deg >= 360.0 || deg == 0.0 {
        0.0
    } else {
        deg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn wrap_keeps_values_in_range() {
        for raw in [-10.0, -PI, -1.0, 0.0, 1.0, PI, 4.0, 7.5, 100.0] {
            let w = wrap_angle(raw);
            assert!(w > -PI - EPS && w <= PI + EPS, "{raw} -> {w}");
            assert!((w.sin() - raw.sin()).abs() < 1e-3);
            assert!((w.cos() - raw.cos()).abs() < 1e-3);
        }
    }

    #[test]
    fn minus_pi_maps_to_plus_pi() {
        assert!((wrap_angle(-PI) - PI).abs() < EPS);
        assert!((wrap_angle(PI) - PI).abs() < EPS);
    }

    #[test]
    fn shortest_diff_crosses_the_seam() {
        let d = shortest_diff(3.0, -3.0);
        assert!((d - (TAU - 6.0)).abs() < EPS);
        assert!(d > 0.0);
    }

    #[test]
    fn heading_inverts_sign() {
        assert!((heading_degrees(0.0) - 0.0).abs() < EPS);
        assert!((heading_degrees(-PI / 2.0) - 90.0).abs() < 1e-3);
        assert!((heading_degrees(PI / 2.0) - 270.0).abs() < 1e-3);
    }
}
