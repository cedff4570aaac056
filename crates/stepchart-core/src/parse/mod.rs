//! Chart text parsers.
//!
//! - `sm` - measure-delimited `.sm` files
//! - `dwi` - inline character-stream `.dwi` files
//! - `freeze` - per-lane hold matching used by both
//! - `tags` - the `#TAG:value;` reader used by both

pub mod dwi;
pub mod freeze;
pub mod sm;
pub mod tags;

use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr};

use crate::chart::RawStepchart;
use crate::config::Rules;
use crate::error::{Error, Result};

pub use dwi::parse_dwi;
pub use sm::parse_sm;

/// Source chart format.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum Format {
    Sm,
    Dwi,
}

impl Format {
    /// Pick the format from a file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))?;
        extension
            .parse()
            .map_err(|_| Error::UnsupportedFormat(extension.to_string()))
    }

    pub fn parse(&self, text: &str, id: &str, rules: &Rules) -> Result<RawStepchart> {
        match self {
            Self::Sm => parse_sm(text, id, &rules.beats),
            Self::Dwi => parse_dwi(text, id, &rules.beats),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name: &'static str = self.into();
        f.write_str(name)
    }
}

/// Parse one chart file's text.
pub fn parse_stepchart(text: &str, id: &str, format: Format, rules: &Rules) -> Result<RawStepchart> {
    format.parse(text, id, rules)
}
