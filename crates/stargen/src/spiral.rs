//! Logarithmic spiral arm modulation.
//!
//! Each arm follows `θ(r) = θ0 + ln(r / r0) / tan(pitch)`. A point's angular
//! offset from that curve, wrapped into `[-π, π]`, feeds a Gaussian falloff.
//! Arm contributions add up and the disk term is scaled by `1 + sum`.

use galaxy_core::normalize_angle;

/// Named spiral features of the model galaxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArmName {
    Perseus,
    ScutumCentaurus,
    SagittariusCarina,
    Norma,
    OrionSpur,
}

impl ArmName {
    pub fn label(self) -> &'static str {
        match self {
            ArmName::Perseus => "perseus arm",
            ArmName::ScutumCentaurus => "scutum-centaurus arm",
            ArmName::SagittariusCarina => "sagittarius-carina arm",
            ArmName::Norma => "norma arm",
            ArmName::OrionSpur => "orion spur",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SpiralArm {
    pub name: ArmName,
    /// Arm angle at the reference radius, radians.
    pub theta0: f64,
    /// Reference radius, light-years.
    pub r0: f64,
    /// Pitch angle, degrees.
    pub pitch_deg: f64,
    /// Gaussian angular width (sigma), radians.
    pub width: f64,
    /// Peak contribution to the spiral sum.
    pub amplitude: f64,
    /// Radii over which the arm is present, light-years.
    pub r_start: f64,
    pub r_end: f64,
}

const ARM_REFERENCE_RADIUS: f64 = 8_000.0;

/// Taper length at the inner end of an arm.
const ARM_INNER_TAPER: f64 = 2_000.0;
/// Taper length at the outer end of an arm.
const ARM_OUTER_TAPER: f64 = 4_000.0;

pub static ARMS: [SpiralArm; 5] = [
    SpiralArm {
        name: ArmName::Perseus,
        theta0: 0.0,
        r0: ARM_REFERENCE_RADIUS,
        pitch_deg: 12.0,
        width: 0.30,
        amplitude: 1.0,
        r_start: 4_000.0,
        r_end: 48_000.0,
    },
    SpiralArm {
        name: ArmName::ScutumCentaurus,
        theta0: std::f64::consts::PI,
        r0: ARM_REFERENCE_RADIUS,
        pitch_deg: 12.0,
        width: 0.30,
        amplitude: 1.0,
        r_start: 4_000.0,
        r_end: 48_000.0,
    },
    SpiralArm {
        name: ArmName::SagittariusCarina,
        theta0: std::f64::consts::FRAC_PI_2,
        r0: ARM_REFERENCE_RADIUS,
        pitch_deg: 12.0,
        width: 0.25,
        amplitude: 0.6,
        r_start: 5_000.0,
        r_end: 42_000.0,
    },
    SpiralArm {
        name: ArmName::Norma,
        theta0: 3.0 * std::f64::consts::FRAC_PI_2,
        r0: ARM_REFERENCE_RADIUS,
        pitch_deg: 12.0,
        width: 0.25,
        amplitude: 0.6,
        r_start: 5_000.0,
        r_end: 42_000.0,
    },
    // Short spur threaded through the solar neighbourhood.
    SpiralArm {
        name: ArmName::OrionSpur,
        theta0: -6.687,
        r0: ARM_REFERENCE_RADIUS,
        pitch_deg: 10.0,
        width: 0.15,
        amplitude: 0.3,
        r_start: 20_000.0,
        r_end: 32_000.0,
    },
];

/// Hermite smoothstep between `edge0` and `edge1`.
pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

impl SpiralArm {
    /// Expected arm azimuth at radius `r`.
    pub fn expected_angle(&self, r: f64) -> f64 {
        self.theta0 + (r / self.r0).ln() / self.pitch_deg.to_radians().tan()
    }

    /// Radial presence of the arm, 0 outside its span and 1 well inside it.
    fn radial_weight(&self, r: f64) -> f64 {
        smoothstep(self.r_start - ARM_INNER_TAPER, self.r_start, r)
            * (1.0 - smoothstep(self.r_end, self.r_end + ARM_OUTER_TAPER, r))
    }

    /// Contribution of this arm at cylindrical `(r, theta)`.
    pub fn strength(&self, r: f64, theta: f64) -> f64 {
        if r <= 0.0 {
            return 0.0;
        }
        let weight = self.radial_weight(r);
        if weight == 0.0 {
            return 0.0;
        }
        let delta = normalize_angle(theta - self.expected_angle(r));
        let falloff = (-(delta * delta) / (2.0 * self.width * self.width)).exp();
        self.amplitude * falloff * weight
    }
}

/// Sum of all arm contributions at `(r, theta)`.
pub fn spiral_sum(r: f64, theta: f64) -> f64 {
    ARMS.iter().map(|arm| arm.strength(r, theta)).sum()
}

/// Multiplicative factor applied to the disk term (always ≥ 1).
pub fn spiral_factor(r: f64, theta: f64) -> f64 {
    1.0 + spiral_sum(r, theta)
}

/// Arm contributing most at `(r, theta)`, with its strength relative to the
/// arm's own amplitude.
pub fn dominant_arm(r: f64, theta: f64) -> Option<(&'static SpiralArm, f64)> {
    ARMS.iter()
        .map(|arm| (arm, arm.strength(r, theta)))
        .filter(|(_, s)| *s > 0.0)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(arm, s)| (arm, s / arm.amplitude))
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_core::{Cylindrical, solar_position};

    #[test]
    fn peak_sits_on_expected_angle() {
        let arm = &ARMS[0];
        let r = 20_000.0;
        let on = arm.strength(r, arm.expected_angle(r));
        let off = arm.strength(r, arm.expected_angle(r) + 0.5);
        assert!((on - arm.amplitude).abs() < 1e-9);
        assert!(off < on);
    }

    #[test]
    fn no_arms_in_core_or_beyond_edge() {
        assert_eq!(spiral_sum(500.0, 1.0), 0.0);
        assert_eq!(spiral_sum(60_000.0, 1.0), 0.0);
        assert_eq!(spiral_factor(0.0, 0.0), 1.0);
    }

    #[test]
    fn non_finite_angles_do_not_poison_the_sum() {
        let s = spiral_sum(20_000.0, f64::NAN);
        assert!(s.is_finite());
    }

    #[test]
    fn sun_lies_in_orion_spur() {
        let sun = solar_position();
        let (arm, rel) = dominant_arm(sun.radius(), sun.azimuth()).unwrap();
        assert_eq!(arm.name, ArmName::OrionSpur);
        assert!(rel > 0.9);
    }
}
