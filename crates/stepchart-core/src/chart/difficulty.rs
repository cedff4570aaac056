use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};

use crate::config::lanes;

/// Canonical difficulty names. Source formats use their own vocabularies
/// (SM: Easy/Medium/Hard, DWI: ANOTHER/MANIAC/SMANIAC), which parse into
/// these through the `serialize` aliases.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Difficulty {
    #[strum(to_string = "beginner")]
    Beginner,
    #[strum(to_string = "basic", serialize = "easy", serialize = "light")]
    Basic,
    #[strum(
        to_string = "difficult",
        serialize = "medium",
        serialize = "standard",
        serialize = "another",
        serialize = "trick"
    )]
    Difficult,
    #[strum(to_string = "expert", serialize = "hard", serialize = "heavy", serialize = "maniac")]
    Expert,
    #[strum(to_string = "challenge", serialize = "oni", serialize = "smaniac")]
    Challenge,
}

impl Difficulty {
    /// Parse a source-format difficulty name, trimming separators.
    pub fn from_source(raw: &str) -> Option<Self> {
        raw.trim().trim_end_matches(':').trim().parse().ok()
    }

    pub fn name(&self) -> &'static str {
        self.into()
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Play mode. Couple/versus/solo charts are not represented.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum Mode {
    Single,
    Double,
}

impl Mode {
    /// Parse an SM steps type such as `dance-single`.
    pub fn from_steps_type(raw: &str) -> Option<Self> {
        let raw = raw.trim().trim_end_matches(':').trim();
        let raw = raw.strip_prefix("dance-").unwrap_or(raw);
        raw.parse().ok()
    }

    pub fn name(&self) -> &'static str {
        self.into()
    }

    pub fn lanes(&self) -> usize {
        match self {
            Self::Single => lanes::SINGLE,
            Self::Double => lanes::DOUBLE,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
