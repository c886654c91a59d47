//! Descriptive prompt synthesis
//!
//! Builds the structured passage describing an invented planet from the
//! chosen answers and an already-sampled feature vector. Nothing here draws
//! random numbers: the same inputs always give the same text.
//!
//! # Usage
//!
//! ```ignore
//! use exoplanet_explorer::{mapper, synthesis};
//!
//! let features = mapper::generate_feature_values(&answers, &mut rng);
//! let prompt = synthesis::generate_description(&answers, "Ada", &features);
//! ```

pub mod ladders;

use tracing::debug;

use crate::features::{self, FeatureVector};
use crate::questionnaire::{ClusterKey, CompleteAnswerSet, StarClass};

/// Raw readings and their normalized positions for the six intensity features.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intensities {
    pub planet_radius: f64,
    pub equilibrium_temp: f64,
    pub insolation: f64,
    pub transit_depth: f64,
    pub stellar_temp: f64,
    pub surface_gravity: f64,

    pub radius: f64,
    pub temperature: f64,
    pub light: f64,
    pub atmosphere: f64,
    pub star: f64,
    pub gravity: f64,
}

impl Intensities {
    /// Read the intensity features, treating absent values as 0.
    pub fn from_features(values: &FeatureVector) -> Self {
        let planet_radius = values.get_or_zero(features::PLANET_RADIUS);
        let equilibrium_temp = values.get_or_zero(features::EQUILIBRIUM_TEMP);
        let insolation = values.get_or_zero(features::INSOLATION);
        let transit_depth = values.get_or_zero(features::TRANSIT_DEPTH);
        let stellar_temp = values.get_or_zero(features::STELLAR_TEMP);
        let surface_gravity = values.get_or_zero(features::SURFACE_GRAVITY);

        Self {
            planet_radius,
            equilibrium_temp,
            insolation,
            transit_depth,
            stellar_temp,
            surface_gravity,
            radius: intensity(features::PLANET_RADIUS, planet_radius),
            temperature: intensity(features::EQUILIBRIUM_TEMP, equilibrium_temp),
            light: intensity(features::INSOLATION, insolation),
            atmosphere: intensity(features::TRANSIT_DEPTH, transit_depth),
            star: intensity(features::STELLAR_TEMP, stellar_temp),
            gravity: intensity(features::SURFACE_GRAVITY, surface_gravity),
        }
    }
}

fn intensity(label: &str, value: f64) -> f64 {
    features::feature_range(label)
        .map(|r| r.normalize(value))
        .unwrap_or(0.5)
}

/// Format a 0-1 fraction as a percentage with two decimals.
pub fn format_percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

/// Compose the image prompt for `explorer`'s planet.
pub fn generate_description(
    answers: &CompleteAnswerSet,
    explorer: &str,
    values: &FeatureVector,
) -> String {
    let readings = Intensities::from_features(values);

    let thermal = ladders::TEMPERATURE.select(readings.temperature);
    let atmosphere = ladders::ATMOSPHERE.select(readings.atmosphere);
    let lighting = ladders::LIGHTING.select(readings.light);
    let shape = ladders::SHAPE.select(readings.surface_gravity);
    let size_detail = ladders::SIZE.select(readings.radius);

    let star_class = answers
        .option(ClusterKey::StarType)
        .star_class
        .unwrap_or(StarClass::BlueGiant);
    let star = ladders::star_visual(star_class, readings.stellar_temp);

    debug!(
        "Intensities: radius {:.3}, temperature {:.3}, light {:.3}, atmosphere {:.3}",
        readings.radius, readings.temperature, readings.light, readings.atmosphere
    );

    format!(
        r#"A stunning hyper-realistic space illustration of '{name}'s Exoplanet', a {size_detail} that is {size_desc}.

PLANET DETAILS:
- Surface: {surface}
- Climate: {temp_desc}
- Colors: {colors}
- Atmosphere: {atmos_desc}, {atmosphere}
- Visual Glow: {glow}
- Shape: {shape}
- Lighting: {lighting}
- Gravity: {gravity_desc} (surface gravity: {surface_gravity:.2})
- Planet Radius: {planet_radius:.2} Earth radii

STAR DETAILS:
- Star: {star_desc}, {star}
- Orbital Period: {orbit_desc}
- Position: {location_desc}

VISUAL STYLE:
- Photorealistic 4K space photography
- Cinematic lighting with accurate physics-based rendering
- Epic sense of scale showing relative sizes
- Rich color grading with {colors}
- Detailed textures showing surface features
- Atmospheric scattering effects
- Cosmic background with distant nebulae and stars
- NASA-quality scientific visualization
- Similar to Hubble Space Telescope imagery and modern exoplanet concept art

Technical details visible: planet illumination intensity {light}, atmospheric density {density}, temperature visualization at {heat} heat scale."#,
        name = explorer,
        size_detail = size_detail,
        size_desc = answers.desc(ClusterKey::Size),
        surface = thermal.surface,
        temp_desc = answers.desc(ClusterKey::Temperature),
        colors = thermal.colors,
        atmos_desc = answers.desc(ClusterKey::Atmosphere),
        atmosphere = atmosphere,
        glow = thermal.glow,
        shape = shape,
        lighting = lighting,
        gravity_desc = answers.desc(ClusterKey::Gravity),
        surface_gravity = readings.surface_gravity,
        planet_radius = readings.planet_radius,
        star_desc = answers.desc(ClusterKey::StarType),
        star = star,
        orbit_desc = answers.desc(ClusterKey::Orbit),
        location_desc = answers.desc(ClusterKey::Location),
        light = format_percent(readings.light),
        density = format_percent(readings.atmosphere),
        heat = format_percent(readings.temperature),
    )
}

fn summary_heading(key: ClusterKey) -> &'static str {
    match key {
        ClusterKey::Size => "Size",
        ClusterKey::Temperature => "Temperature",
        ClusterKey::Orbit => "Year Length",
        ClusterKey::StarType => "Star Type",
        ClusterKey::Gravity => "Gravity",
        ClusterKey::Atmosphere => "Atmosphere",
        ClusterKey::Location => "Location",
    }
}

/// Short child-facing card listing each chosen answer.
pub fn planet_summary(answers: &CompleteAnswerSet, explorer: &str) -> String {
    let mut lines = vec![format!("{}'s Exoplanet is a magnificent world!", explorer)];
    for (cluster, option) in answers.iter() {
        lines.push(format!("{}: {}", summary_heading(cluster.key), option.desc));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::generate_feature_values;
    use crate::questionnaire::AnswerSet;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn earth_answers() -> CompleteAnswerSet {
        AnswerSet::new()
            .with(ClusterKey::Size, "Earth")
            .and_then(|a| a.with(ClusterKey::Temperature, "Earth"))
            .and_then(|a| a.with(ClusterKey::Orbit, "Earth"))
            .and_then(|a| a.with(ClusterKey::StarType, "Sun-like"))
            .and_then(|a| a.with(ClusterKey::Gravity, "Earth"))
            .and_then(|a| a.with(ClusterKey::Atmosphere, "Earth"))
            .and_then(|a| a.with(ClusterKey::Location, "Equatorial"))
            .unwrap()
            .complete()
            .unwrap()
    }

    #[test]
    fn test_earth_scenario_phrases() {
        let answers = earth_answers();
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let values = generate_feature_values(&answers, &mut rng);
        let text = generate_description(&answers, "Ada", &values);

        assert!(text.contains("'Ada's Exoplanet'"));
        for phrase in [
            "Earth-sized",
            "just right like Earth",
            "like Earth (365 days)",
            "yellow star like our Sun",
            "normal like Earth",
            "breathable air like Earth",
            "near the celestial equator",
        ] {
            assert!(text.contains(phrase), "missing phrase: {}", phrase);
        }
        assert!(text.contains("bright yellow sun-like star"));
    }

    #[test]
    fn test_description_is_repeatable() {
        let answers = earth_answers();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let values = generate_feature_values(&answers, &mut rng);
        let first = generate_description(&answers, "Ada", &values);
        let second = generate_description(&answers, "Ada", &values);
        assert_eq!(first, second);
    }

    #[test]
    fn test_absent_features_default_to_zero() {
        let answers = earth_answers();
        let readings = Intensities::from_features(&FeatureVector::new());
        assert_eq!(readings.planet_radius, 0.0);
        assert_eq!(readings.surface_gravity, 0.0);

        let text = generate_description(&answers, "Ada", &FeatureVector::new());
        assert!(text.contains("(surface gravity: 0.00)"));
        assert!(text.contains("Planet Radius: 0.00 Earth radii"));
        assert!(text.contains("(stellar temp: 0.0)"));
        // Zero gravity sits on the lower bound of the spherical rung
        assert!(text.contains("near-perfect spherical shape"));
    }

    #[test]
    fn test_fragments_follow_feature_values() {
        let answers = earth_answers();
        let mut values = FeatureVector::new();
        let depth = features::feature_range(features::TRANSIT_DEPTH).unwrap();
        let temp = features::feature_range(features::EQUILIBRIUM_TEMP).unwrap();
        values.insert(features::TRANSIT_DEPTH, depth.low + 0.25 * depth.span());
        values.insert(features::EQUILIBRIUM_TEMP, temp.high);
        values.insert(features::SURFACE_GRAVITY, 2.0);

        let text = generate_description(&answers, "Ada", &values);
        assert!(text.contains("thin, barely visible atmosphere"));
        assert!(text.contains("volcanic landscape"));
        assert!(text.contains("temperature visualization at 100.00% heat scale"));
        assert!(text.contains("slightly compressed shape"));
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.5), "50.00%");
        assert_eq!(format_percent(0.1234), "12.34%");
        assert_eq!(format_percent(0.0), "0.00%");
    }

    #[test]
    fn test_summary_lists_every_cluster() {
        let summary = planet_summary(&earth_answers(), "Ada");
        let lines: Vec<_> = summary.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "Ada's Exoplanet is a magnificent world!");
        assert_eq!(lines[3], "Year Length: like Earth (365 days)");
        assert_eq!(lines[7], "Location: near the celestial equator");
    }
}
