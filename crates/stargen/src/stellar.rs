//! Stellar and compact-object types with their fixed physical properties.

use serde::Serialize;
use std::fmt;

/// Broad grouping used by the classification tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StellarFamily {
    MainSequence,
    Giant,
    BrownDwarf,
    Remnant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StellarType {
    O,
    B,
    A,
    F,
    G,
    K,
    M,
    RedGiant,
    BlueGiant,
    RedSupergiant,
    BlueSupergiant,
    L,
    T,
    Y,
    WhiteDwarf,
    NeutronStar,
    StellarBlackHole,
    SupermassiveBlackHole,
}

/// Mass (M☉), effective temperature (K) and luminosity (L☉).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StellarProperties {
    pub mass: f64,
    pub temperature: f64,
    pub luminosity: f64,
}

const fn props(mass: f64, temperature: f64, luminosity: f64) -> StellarProperties {
    StellarProperties {
        mass,
        temperature,
        luminosity,
    }
}

/// Mass of the central compact object in solar masses.
pub const CENTRAL_BLACK_HOLE_MASS: f64 = 4.31e6;

impl StellarType {
    pub fn family(self) -> StellarFamily {
        use StellarType::*;
        match self {
            O | B | A | F | G | K | M => StellarFamily::MainSequence,
            RedGiant | BlueGiant | RedSupergiant | BlueSupergiant => StellarFamily::Giant,
            L | T | Y => StellarFamily::BrownDwarf,
            WhiteDwarf | NeutronStar | StellarBlackHole | SupermassiveBlackHole => {
                StellarFamily::Remnant
            }
        }
    }

    /// Representative properties for procedurally generated stars.
    pub fn properties(self) -> StellarProperties {
        use StellarType::*;
        match self {
            O => props(30.0, 38_000.0, 200_000.0),
            B => props(6.0, 18_000.0, 800.0),
            A => props(1.8, 8_500.0, 15.0),
            F => props(1.2, 6_700.0, 3.0),
            G => props(0.95, 5_600.0, 0.9),
            K => props(0.65, 4_400.0, 0.25),
            M => props(0.25, 3_100.0, 0.01),
            RedGiant => props(1.5, 4_200.0, 150.0),
            BlueGiant => props(8.0, 20_000.0, 10_000.0),
            RedSupergiant => props(15.0, 3_600.0, 100_000.0),
            BlueSupergiant => props(25.0, 20_000.0, 300_000.0),
            L => props(0.07, 1_800.0, 5e-5),
            T => props(0.04, 1_000.0, 5e-6),
            Y => props(0.015, 450.0, 5e-7),
            WhiteDwarf => props(0.6, 15_000.0, 0.003),
            NeutronStar => props(1.4, 600_000.0, 1e-4),
            StellarBlackHole => props(10.0, 0.0, 0.0),
            SupermassiveBlackHole => props(CENTRAL_BLACK_HOLE_MASS, 0.0, 0.0),
        }
    }

    /// Short class code, e.g. `"G"` or `"WD"`.
    pub fn code(self) -> &'static str {
        use StellarType::*;
        match self {
            O => "O",
            B => "B",
            A => "A",
            F => "F",
            G => "G",
            K => "K",
            M => "M",
            RedGiant => "RG",
            BlueGiant => "BG",
            RedSupergiant => "RSG",
            BlueSupergiant => "BSG",
            L => "L",
            T => "T",
            Y => "Y",
            WhiteDwarf => "WD",
            NeutronStar => "NS",
            StellarBlackHole => "BH",
            SupermassiveBlackHole => "SMBH",
        }
    }

    /// Map a catalog spectral class such as `"M5.5Ve"`, `"DA2"` or `"K1III"`.
    ///
    /// The first recognised letter picks the temperature class; a leading `D`
    /// means a white dwarf. Luminosity class `I` promotes to a supergiant and
    /// `II`/`III` to a giant. Anything unrecognised is treated as `M`.
    pub fn from_spectral_class(class: &str) -> Self {
        let upper = class.trim().to_ascii_uppercase();
        if upper.starts_with('D') {
            return StellarType::WhiteDwarf;
        }
        let Some(pos) = upper.find(|c: char| "OBAFGKMLTY".contains(c)) else {
            return StellarType::M;
        };
        let letter = upper.as_bytes()[pos] as char;
        let base = match letter {
            'O' => StellarType::O,
            'B' => StellarType::B,
            'A' => StellarType::A,
            'F' => StellarType::F,
            'G' => StellarType::G,
            'K' => StellarType::K,
            'L' => StellarType::L,
            'T' => StellarType::T,
            'Y' => StellarType::Y,
            _ => StellarType::M,
        };
        if base.family() != StellarFamily::MainSequence {
            return base;
        }

        // Skip the subclass digits, then read the roman numeral run.
        let rest = upper[pos + 1..].trim_start_matches(|c: char| c.is_ascii_digit() || c == '.');
        let numeral: String = rest.chars().take_while(|c| *c == 'I' || *c == 'V').collect();
        let hot = matches!(base, StellarType::O | StellarType::B | StellarType::A);
        match numeral.as_str() {
            "I" => {
                if hot {
                    StellarType::BlueSupergiant
                } else {
                    StellarType::RedSupergiant
                }
            }
            "II" | "III" => {
                if hot {
                    StellarType::BlueGiant
                } else {
                    StellarType::RedGiant
                }
            }
            _ => base,
        }
    }
}

impl fmt::Display for StellarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Approximate sRGB colour of a blackbody (Tanner Helland fit), channels in
/// `[0, 1]`. Zero temperature (black holes) is black.
pub fn blackbody_to_rgb(temperature: f64) -> [f32; 3] {
    if temperature.is_nan() || temperature <= 0.0 {
        return [0.0, 0.0, 0.0];
    }
    let t = temperature.clamp(1_000.0, 40_000.0) / 100.0;

    let r = if t <= 66.0 {
        255.0
    } else {
        (329.698727446 * (t - 60.0).powf(-0.1332047592)).clamp(0.0, 255.0)
    };
    let g = if t <= 66.0 {
        (99.4708025861 * t.ln() - 161.1195681661).clamp(0.0, 255.0)
    } else {
        (288.1221695283 * (t - 60.0).powf(-0.0755148492)).clamp(0.0, 255.0)
    };
    let b = if t >= 66.0 {
        255.0
    } else if t <= 19.0 {
        0.0
    } else {
        (138.5177312231 * (t - 10.0).ln() - 305.0447927307).clamp(0.0, 255.0)
    };

    [(r / 255.0) as f32, (g / 255.0) as f32, (b / 255.0) as f32]
}
