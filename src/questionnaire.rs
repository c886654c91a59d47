//! The planet configurator questionnaire
//!
//! Seven question clusters, each controlling a group of features. Every
//! option carries a nominal interval in answer space (roughly [-4, 4]) and
//! a short phrase used when describing the planet.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MissingAnswerError, UnknownOptionError};
use crate::features::*;

/// Identifier of a question cluster
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterKey {
    Size,
    Temperature,
    Orbit,
    StarType,
    Gravity,
    Atmosphere,
    Location,
}

impl ClusterKey {
    /// All clusters in questionnaire order
    pub const ALL: [ClusterKey; 7] = [
        ClusterKey::Size,
        ClusterKey::Temperature,
        ClusterKey::Orbit,
        ClusterKey::StarType,
        ClusterKey::Gravity,
        ClusterKey::Atmosphere,
        ClusterKey::Location,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClusterKey::Size => "size",
            ClusterKey::Temperature => "temperature",
            ClusterKey::Orbit => "orbit",
            ClusterKey::StarType => "star_type",
            ClusterKey::Gravity => "gravity",
            ClusterKey::Atmosphere => "atmosphere",
            ClusterKey::Location => "location",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    /// The cluster definition for this key.
    pub fn cluster(self) -> &'static QuestionCluster {
        &CLUSTERS[self.index()]
    }
}

impl fmt::Display for ClusterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClusterKey {
    type Err = UnknownOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        ClusterKey::ALL
            .into_iter()
            .find(|k| k.as_str() == normalized)
            .ok_or_else(|| UnknownOptionError::Cluster(s.to_string()))
    }
}

/// Stellar class attached to the star-type options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StarClass {
    RedDwarf,
    Orange,
    SunLike,
    White,
    BlueGiant,
}

/// One selectable answer of a cluster
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterOption {
    pub name: &'static str,
    /// Nominal (low, high) interval in answer space
    pub range: (f64, f64),
    pub desc: &'static str,
    /// Only set for star-type options
    pub star_class: Option<StarClass>,
}

/// A themed question controlling a group of features
#[derive(Clone, Debug)]
pub struct QuestionCluster {
    pub key: ClusterKey,
    pub question: &'static str,
    pub features: &'static [&'static str],
    pub options: &'static [ClusterOption],
}

impl QuestionCluster {
    /// Find an option by name, ignoring ASCII case.
    pub fn option(&self, name: &str) -> Option<&'static ClusterOption> {
        let name = name.trim();
        self.options.iter().find(|o| o.name.eq_ignore_ascii_case(name))
    }

    pub fn option_names(&self) -> impl Iterator<Item = &'static str> {
        self.options.iter().map(|o| o.name)
    }
}

const fn opt(name: &'static str, low: f64, high: f64, desc: &'static str) -> ClusterOption {
    ClusterOption {
        name,
        range: (low, high),
        desc,
        star_class: None,
    }
}

const fn star(
    name: &'static str,
    low: f64,
    high: f64,
    desc: &'static str,
    class: StarClass,
) -> ClusterOption {
    ClusterOption {
        name,
        range: (low, high),
        desc,
        star_class: Some(class),
    }
}

/// The questionnaire, indexed by `ClusterKey` order. Together the clusters
/// cover all 34 features, each exactly once.
pub static CLUSTERS: [QuestionCluster; 7] = [
    QuestionCluster {
        key: ClusterKey::Size,
        question: "🪐 How big is your planet?",
        features: &[
            PLANET_RADIUS,
            PLANET_RADIUS_ERR_POS,
            PLANET_RADIUS_ERR_NEG,
            PLANET_STAR_RADIUS_RATIO,
            DEPTH_TO_STELLAR_RADIUS,
        ],
        options: &[
            opt("Mercury", 0.0, 0.3, "tiny like Mercury"),
            opt("Mars", 0.3, 0.6, "small like Mars"),
            opt("Earth", 0.6, 1.4, "Earth-sized"),
            opt("Neptune", 1.4, 2.5, "big like Neptune"),
            opt("Jupiter", 2.5, 4.0, "huge like Jupiter"),
        ],
    },
    QuestionCluster {
        key: ClusterKey::Temperature,
        question: "🌡️ How hot or cold is your planet?",
        features: &[
            EQUILIBRIUM_TEMP,
            INSOLATION,
            INSOLATION_ERR_POS,
            LOG_INSOLATION,
        ],
        options: &[
            opt("Pluto", -1.5, -0.5, "freezing cold like Pluto"),
            opt("Neptune", -0.5, 0.5, "super cold like Neptune"),
            opt("Earth", 0.5, 1.5, "just right like Earth"),
            opt("Venus", 1.5, 2.5, "very hot like Venus"),
            opt("Mercury", 2.5, 4.0, "scorching hot like Mercury"),
        ],
    },
    QuestionCluster {
        key: ClusterKey::Orbit,
        question: "🌍 How long is a year on your planet?",
        features: &[
            ORBITAL_PERIOD,
            ORBITAL_PERIOD_ERR_POS,
            PERIOD_TO_IMPACT,
            TRANSIT_TIME,
            TRANSIT_TIME_ERR_POS,
        ],
        options: &[
            opt("Mercury", -0.5, 0.5, "super quick like Mercury (88 days)"),
            opt("Venus", 0.5, 1.2, "pretty fast like Venus (225 days)"),
            opt("Earth", 1.2, 2.0, "like Earth (365 days)"),
            opt("Jupiter", 2.0, 3.0, "long like Jupiter (12 years)"),
            opt("Neptune", 3.0, 4.0, "super long like Neptune (165 years)"),
        ],
    },
    QuestionCluster {
        key: ClusterKey::StarType,
        question: "⭐ What kind of star does your planet orbit?",
        features: &[
            STELLAR_TEMP,
            STELLAR_TEMP_ERR_POS,
            STELLAR_TEMP_ERR_NEG,
            KEPLER_MAGNITUDE,
            STELLAR_RADIUS_ERR_POS,
            STELLAR_RADIUS_ERR_NEG,
        ],
        options: &[
            star("Red Dwarf", -4.0, -1.0, "small cool red star", StarClass::RedDwarf),
            star("Orange Star", -1.0, 0.5, "medium orange star", StarClass::Orange),
            star("Sun-like", 0.5, 1.5, "yellow star like our Sun", StarClass::SunLike),
            star("White Star", 1.5, 2.5, "hot white star", StarClass::White),
            star("Blue Giant", 2.5, 4.0, "massive blue giant star", StarClass::BlueGiant),
        ],
    },
    QuestionCluster {
        key: ClusterKey::Gravity,
        question: "🎈 How strong is the gravity on your planet?",
        features: &[
            SURFACE_GRAVITY,
            SURFACE_GRAVITY_ERR_POS,
            SURFACE_GRAVITY_ERR_NEG,
            IMPACT,
            IMPACT_ERR_POS,
            IMPACT_ERR_NEG,
        ],
        options: &[
            opt("Moon", -4.0, -1.5, "super light like the Moon"),
            opt("Mars", -1.5, 0.0, "light like Mars"),
            opt("Earth", 0.0, 1.5, "normal like Earth"),
            opt("Jupiter", 1.5, 2.5, "heavy like Jupiter"),
            opt("Super Heavy", 2.5, 4.0, "crushing gravity"),
        ],
    },
    QuestionCluster {
        key: ClusterKey::Atmosphere,
        question: "💨 What's the atmosphere like on your planet?",
        features: &[
            TRANSIT_DURATION,
            TRANSIT_DURATION_ERR_POS,
            TRANSIT_DEPTH,
            TRANSIT_DEPTH_ERR_POS,
            TRANSIT_SNR,
            LOG_SNR,
        ],
        options: &[
            opt("Mercury", -1.5, 0.0, "no atmosphere like Mercury"),
            opt("Mars", 0.0, 1.0, "thin dusty air like Mars"),
            opt("Earth", 1.0, 2.0, "breathable air like Earth"),
            opt("Venus", 2.0, 3.0, "super thick clouds like Venus"),
            opt("Jupiter", 3.0, 4.0, "swirling gas storms like Jupiter"),
        ],
    },
    QuestionCluster {
        key: ClusterKey::Location,
        question: "🔭 Where in the sky is your planet located?",
        features: &[RIGHT_ASCENSION, DECLINATION],
        options: &[
            opt("Northern Sky", 0.5, 1.5, "in the northern constellations"),
            opt("Southern Sky", -1.5, -0.5, "in the southern constellations"),
            opt("Equatorial", -0.5, 0.5, "near the celestial equator"),
            opt("Deep North", 1.0, 2.0, "far in the northern sky"),
            opt("Deep South", -2.0, -1.0, "far in the southern sky"),
        ],
    },
];

/// Answers collected so far. Partial sets are valid while collecting.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnswerSet {
    slots: [Option<&'static ClusterOption>; 7],
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `option` for `key`, replacing any earlier choice.
    pub fn select(
        &mut self,
        key: ClusterKey,
        option: &str,
    ) -> Result<&'static ClusterOption, UnknownOptionError> {
        let chosen = key.cluster().option(option).ok_or_else(|| UnknownOptionError::NotOffered {
            cluster: key,
            option: option.to_string(),
        })?;
        self.slots[key.index()] = Some(chosen);
        Ok(chosen)
    }

    /// Builder form of [`AnswerSet::select`].
    pub fn with(mut self, key: ClusterKey, option: &str) -> Result<Self, UnknownOptionError> {
        self.select(key, option)?;
        Ok(self)
    }

    pub fn get(&self, key: ClusterKey) -> Option<&'static ClusterOption> {
        self.slots[key.index()]
    }

    pub fn unset(&mut self, key: ClusterKey) {
        self.slots[key.index()] = None;
    }

    pub fn clear(&mut self) {
        self.slots = Default::default();
    }

    /// Number of clusters answered
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn missing(&self) -> Vec<ClusterKey> {
        ClusterKey::ALL
            .into_iter()
            .filter(|k| self.get(*k).is_none())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(|s| s.is_some())
    }

    /// Freeze into a complete set, or report every unanswered cluster.
    pub fn complete(&self) -> Result<CompleteAnswerSet, MissingAnswerError> {
        let mut selected = [&CLUSTERS[0].options[0]; 7];
        let mut missing = Vec::new();
        for key in ClusterKey::ALL {
            match self.get(key) {
                Some(option) => selected[key.index()] = option,
                None => missing.push(key),
            }
        }
        if !missing.is_empty() {
            return Err(MissingAnswerError { missing });
        }
        Ok(CompleteAnswerSet { selected })
    }
}

/// An answer set with exactly one option chosen for every cluster.
#[derive(Clone, Debug, PartialEq)]
pub struct CompleteAnswerSet {
    selected: [&'static ClusterOption; 7],
}

impl CompleteAnswerSet {
    pub fn option(&self, key: ClusterKey) -> &'static ClusterOption {
        self.selected[key.index()]
    }

    /// Descriptive phrase of the chosen option for `key`.
    pub fn desc(&self, key: ClusterKey) -> &'static str {
        self.option(key).desc
    }

    /// (cluster, chosen option) pairs in questionnaire order
    pub fn iter(&self) -> impl Iterator<Item = (&'static QuestionCluster, &'static ClusterOption)> + '_ {
        ClusterKey::ALL
            .into_iter()
            .map(move |k| (k.cluster(), self.option(k)))
    }
}

impl From<&CompleteAnswerSet> for AnswerSet {
    fn from(complete: &CompleteAnswerSet) -> Self {
        Self {
            slots: complete.selected.map(Some),
        }
    }
}
