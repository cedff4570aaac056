//! Chart data model.
//!
//! This module contains the normalized representation both parsers produce:
//! - `Arrow`, `Direction`, `Beat` - playable events
//! - `FreezeBody`, `Stop` - holds and scroll pauses
//! - `Difficulty`, `Mode`, `StepchartType` - chart variant metadata
//! - `RawStepchart`, `ChartData` - one song's parse result
//! - `Diagnostic` - recoverable anomalies found while parsing

mod diagnostic;
mod difficulty;
mod stepchart;
mod types;

pub use diagnostic::*;
pub use difficulty::*;
pub use stepchart::*;
pub use types::*;
