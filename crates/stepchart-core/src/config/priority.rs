use serde::{Deserialize, Serialize};

use crate::chart::Difficulty;

/// Tie-break order used when several charts of a song share the highest
/// feet rating. Earlier entries win.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DifficultyPriority(Vec<Difficulty>);

impl Default for DifficultyPriority {
    fn default() -> Self {
        Self(vec![
            Difficulty::Expert,
            Difficulty::Challenge,
            Difficulty::Difficult,
            Difficulty::Basic,
            Difficulty::Beginner,
        ])
    }
}

impl DifficultyPriority {
    pub fn new(order: Vec<Difficulty>) -> Self {
        Self(order)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Difficulty> {
        self.0.iter()
    }

    pub fn contains(&self, difficulty: Difficulty) -> bool {
        self.0.contains(&difficulty)
    }

    /// Position in the order, lower is preferred.
    pub fn rank(&self, difficulty: Difficulty) -> Option<usize> {
        self.0.iter().position(|d| *d == difficulty)
    }
}
