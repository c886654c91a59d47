//! Threshold ladders and fixed text fragments
//!
//! Each ladder is an ordered list of exclusive upper bounds. A value picks
//! the first rung whose bound it is strictly below, so a value sitting
//! exactly on a bound belongs to the next rung up. Values at or above the
//! last bound (or NaN) select the top fragment.

use crate::questionnaire::StarClass;

/// Ordered (upper bound, fragment) table with a catch-all top rung.
#[derive(Debug)]
pub struct Ladder<T: 'static> {
    rungs: &'static [(f64, T)],
    top: T,
}

impl<T> Ladder<T> {
    pub const fn new(rungs: &'static [(f64, T)], top: T) -> Self {
        Self { rungs, top }
    }

    pub fn select(&self, value: f64) -> &T {
        self.rungs
            .iter()
            .find(|(bound, _)| value < *bound)
            .map(|(_, fragment)| fragment)
            .unwrap_or(&self.top)
    }

    /// Number of buckets including the top rung
    pub fn len(&self) -> usize {
        self.rungs.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Visual palette chosen by temperature intensity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThermalLook {
    pub colors: &'static str,
    pub surface: &'static str,
    pub glow: &'static str,
}

pub static TEMPERATURE: Ladder<ThermalLook> = Ladder::new(
    &[
        (
            0.3,
            ThermalLook {
                colors: "predominantly icy blue and white with silver highlights, frosted crystalline appearance",
                surface: "frozen tundra with towering ice formations, frost-covered plains, and frozen methane seas",
                glow: "faint blue-white glow from ice reflections",
            },
        ),
        (
            0.5,
            ThermalLook {
                colors: "pale blue, grey, and white with hints of brown, cold barren appearance",
                surface: "cold rocky terrain with ice patches, frozen valleys, and sparse frost coverage",
                glow: "subtle dim lighting with cool tones",
            },
        ),
        (
            0.7,
            ThermalLook {
                colors: "deep blues, vibrant greens, and earthy browns, Earth-like appearance",
                surface: "diverse terrain with possible liquid water oceans, continents, and varied geography",
                glow: "natural balanced lighting with warm and cool tones",
            },
        ),
        (
            0.85,
            ThermalLook {
                colors: "warm oranges, yellows, and reddish-brown, heated appearance",
                surface: "hot rocky terrain with visible heat distortion, desert-like features, and warm atmosphere",
                glow: "warm orange-yellow glow with heat haze effects",
            },
        ),
    ],
    ThermalLook {
        colors: "intense reds, bright oranges, and molten yellows, extreme heat appearance",
        surface: "volcanic landscape with active lava rivers, magma pools, glowing fissures, and molten rock flows",
        glow: "intense red-orange glow from molten surface, heat radiation visible",
    },
);

pub static ATMOSPHERE: Ladder<&str> = Ladder::new(
    &[
        (0.2, "virtually no atmosphere, sharp shadows, crystal-clear view of cratered surface, stark and exposed"),
        (0.4, "thin, barely visible atmosphere with faint wisps, minimal cloud cover, transparent hazy layer"),
        (0.6, "moderate atmosphere with scattered clouds, visible weather patterns, Earth-like cloud formations"),
        (0.8, "thick, dense atmosphere with heavy cloud layers, obscured surface, Venus-like cloud coverage"),
    ],
    "extremely thick atmosphere with massive swirling storm systems, turbulent gas clouds, Jupiter-like bands and vortexes",
);

pub static LIGHTING: Ladder<&str> = Ladder::new(
    &[
        (0.3, "dimly lit, shadowy, twilight-like illumination, faint star in background"),
        (0.7, "well-balanced lighting, Earth-like day illumination, comfortable brightness"),
    ],
    "intensely bright, harsh lighting, overexposed sunny conditions, strong solar radiation",
);

/// Keyed on the raw surface gravity value, not its intensity.
pub static SHAPE: Ladder<&str> = Ladder::new(
    &[
        (0.0, "slightly oblate shape due to low gravity, fluffy atmosphere extending far"),
        (1.5, "near-perfect spherical shape, Earth-like proportions"),
    ],
    "slightly compressed shape due to high gravity, dense compact appearance",
);

pub static SIZE: Ladder<&str> = Ladder::new(
    &[
        (0.2, "tiny world, barely larger than a large moon"),
        (0.4, "small rocky world, Mars-like scale"),
        (0.6, "Earth-sized world, terrestrial planet scale"),
        (0.8, "large world, Neptune-class size with substantial volume"),
    ],
    "massive gas giant, Jupiter-class behemoth dominating the view",
);

/// How the host star should be drawn, with its temperature reading.
pub fn star_visual(class: StarClass, stellar_temp: f64) -> String {
    let look = match class {
        StarClass::RedDwarf => "small red dwarf star with deep crimson glow, emitting dim reddish light",
        StarClass::Orange => "medium-sized orange star with warm amber glow, casting orange-tinted light",
        StarClass::SunLike => "bright yellow sun-like star with golden radiance, similar to our Sun",
        StarClass::White => "brilliant white star with intense white-blue light, high luminosity",
        StarClass::BlueGiant => "massive blue-white giant star with intense blue radiance, extremely luminous",
    };
    format!("{} (stellar temp: {:.1})", look, stellar_temp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atmosphere_boundary_is_half_open() {
        assert!(ATMOSPHERE.select(0.1999).starts_with("virtually no atmosphere"));
        assert!(ATMOSPHERE.select(0.2).starts_with("thin, barely visible atmosphere"));
        assert!(ATMOSPHERE.select(0.3999).starts_with("thin, barely visible atmosphere"));
        assert!(ATMOSPHERE.select(0.4).starts_with("moderate atmosphere"));
    }

    #[test]
    fn test_top_rung_catches_high_and_nan() {
        assert!(ATMOSPHERE.select(0.8).starts_with("extremely thick"));
        assert!(ATMOSPHERE.select(7.0).starts_with("extremely thick"));
        assert!(SIZE.select(f64::NAN).starts_with("massive gas giant"));
    }

    #[test]
    fn test_ladder_bucket_counts() {
        assert_eq!(TEMPERATURE.len(), 5);
        assert_eq!(ATMOSPHERE.len(), 5);
        assert_eq!(SIZE.len(), 5);
        assert_eq!(LIGHTING.len(), 3);
        assert_eq!(SHAPE.len(), 3);
    }

    #[test]
    fn test_temperature_bands() {
        assert!(TEMPERATURE.select(-0.5).surface.starts_with("frozen tundra"));
        assert!(TEMPERATURE.select(0.6).colors.contains("Earth-like appearance"));
        assert!(TEMPERATURE.select(0.84).glow.starts_with("warm orange-yellow"));
        assert!(TEMPERATURE.select(0.85).surface.starts_with("volcanic landscape"));
    }

    #[test]
    fn test_shape_uses_raw_gravity() {
        assert!(SHAPE.select(-0.01).contains("oblate"));
        assert!(SHAPE.select(0.0).contains("spherical"));
        assert!(SHAPE.select(1.5).contains("compressed"));
    }

    #[test]
    fn test_star_visual_reports_temperature() {
        let visual = star_visual(StarClass::RedDwarf, -2.345);
        assert!(visual.starts_with("small red dwarf star"));
        assert!(visual.ends_with("(stellar temp: -2.3)"));
    }
}
