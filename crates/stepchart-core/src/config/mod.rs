//! Rule tables and format constants.
//!
//! This module contains the data the algorithms are parameterized over:
//! - `BeatTable` - offset to beat class table
//! - `DifficultyPriority` - tie-break order for the hardest-chart selector
//! - `Rules` - both of the above, loadable from JSON
//! - Lane counts and DWI step increments

mod beat;
mod priority;
mod rules;

pub use beat::*;
pub use priority::*;
pub use rules::*;

/// Lanes per play mode.
pub mod lanes {
    pub const SINGLE: usize = 4;
    pub const DOUBLE: usize = 8;
}

/// DWI note stream step sizes, as denominators of a measure.
pub mod dwi {
    /// Step used outside any bracket (8th notes).
    pub const DEFAULT_STEP: i64 = 8;
    /// `(` ... `)`
    pub const SIXTEENTH_STEP: i64 = 16;
    /// `[` ... `]`
    pub const TWENTY_FOURTH_STEP: i64 = 24;
    /// `{` ... `}`
    pub const SIXTY_FOURTH_STEP: i64 = 64;
    /// `` ` `` ... `'`
    pub const HUNDRED_NINETY_SECOND_STEP: i64 = 192;

    /// Quarter-measure tail added to a freeze when its closing arrow is
    /// reached, as a fraction `(numerator, denominator)`.
    pub const FREEZE_RELEASE: (i64, i64) = (1, 4);

    /// `#FREEZE` positions are counted in 16th notes.
    pub const STOP_POSITIONS_PER_MEASURE: f64 = 16.0;
}
