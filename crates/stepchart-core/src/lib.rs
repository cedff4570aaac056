pub mod chart;
pub mod config;
pub mod error;
pub mod fraction;
pub mod parse;
pub mod stats;

pub use chart::{
    Arrow, Beat, ChartData, Diagnostic, Difficulty, Direction, FreezeBody, Mode, RawStepchart,
    StepchartType, Stop,
};
pub use config::{BeatTable, DifficultyPriority, Rules};
pub use error::{Error, Result};
pub use fraction::Fraction;
pub use parse::{Format, parse_dwi, parse_sm, parse_stepchart};
pub use stats::{Stats, calculate_stats, select_hardest_chart};
