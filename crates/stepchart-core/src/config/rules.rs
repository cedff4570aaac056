use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{BeatTable, DifficultyPriority};
use crate::error::Result;

/// Rule tables consumed by the parsers and the analyzer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Rules {
    pub beats: BeatTable,
    pub difficulty_priority: DifficultyPriority,
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load rules from a JSON file. Missing fields keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse rules from JSON content
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(content)?)
    }
}
