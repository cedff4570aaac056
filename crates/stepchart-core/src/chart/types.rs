use serde::{Deserialize, Serialize};
use strum::FromRepr;

/// Rhythmic subdivision an arrow lands on, used for rendering emphasis.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, FromRepr,
)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum Beat {
    Quarter = 4,
    Sixth = 6,
    Eighth = 8,
    Twelfth = 12,
    Sixteenth = 16,
}

impl Beat {
    pub fn value(&self) -> u8 {
        *self as u8
    }
}

impl From<Beat> for u8 {
    fn from(beat: Beat) -> Self {
        beat as u8
    }
}

impl TryFrom<u8> for Beat {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_repr(value).ok_or_else(|| format!("Invalid beat class: {}", value))
    }
}

/// Lane pattern of one arrow: one character per lane, `0` idle, `1` tap,
/// `2` freeze head.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Direction(String);

impl Direction {
    /// Normalize a raw SM note row. Roll heads count as freeze heads, every
    /// other non-tap character (tails, mines, lifts, fakes) becomes idle.
    pub fn from_sm_row(row: &str) -> Self {
        Self(
            row.chars()
                .map(|c| match c {
                    '1' => '1',
                    '2' | '4' => '2',
                    _ => '0',
                })
                .collect(),
        )
    }

    /// Build a direction from a lane pattern that is already normalized.
    pub fn from_pattern(pattern: &str) -> Self {
        Self(pattern.to_string())
    }

    /// Same lanes, with every tap rewritten as a freeze head.
    pub fn as_freeze_head(&self) -> Self {
        Self(self.0.replace('1', "2"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn lane_count(&self) -> usize {
        self.0.len()
    }

    /// Indices of lanes that are not idle.
    pub fn active_lanes(&self) -> impl Iterator<Item = usize> + '_ {
        self.0
            .bytes()
            .enumerate()
            .filter(|(_, b)| *b != b'0')
            .map(|(i, _)| i)
    }

    pub fn active_count(&self) -> usize {
        self.active_lanes().count()
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    pub fn has_freeze_head(&self) -> bool {
        self.0.contains('2')
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One playable event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub direction: Direction,
    pub beat: Beat,
    /// Position in measures from the start of the chart.
    pub offset: f64,
}

/// One hold span on a single lane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreezeBody {
    /// 0-based lane index.
    pub direction: usize,
    pub start_offset: f64,
    pub end_offset: f64,
}

/// A scroll pause: `duration` seconds at `offset` measures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub offset: f64,
    pub duration: f64,
}
