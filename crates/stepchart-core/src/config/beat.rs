use serde::{Deserialize, Serialize};

use crate::chart::Beat;
use crate::fraction::Fraction;

/// One row of the beat table: offsets (in `scale` units of a measure)
/// divisible by `divisor` belong to `beat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeatDivisor {
    pub divisor: i64,
    pub beat: Beat,
}

/// Ordered divisibility table mapping a position inside a measure to a beat
/// class. The first matching row wins, so quarter notes are listed first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeatTable {
    pub scale: i64,
    pub divisors: Vec<BeatDivisor>,
    /// Class for positions no row matches (5ths, 32nds, ...).
    pub fallback: Beat,
}

impl Default for BeatTable {
    fn default() -> Self {
        let row = |divisor, beat| BeatDivisor { divisor, beat };
        Self {
            scale: 10_000,
            divisors: vec![
                row(2500, Beat::Quarter),
                row(1250, Beat::Eighth),
                row(1667, Beat::Sixth),
                row(833, Beat::Twelfth),
                row(625, Beat::Sixteenth),
            ],
            fallback: Beat::Sixteenth,
        }
    }
}

impl BeatTable {
    /// Classify a chart offset. Only the position within its measure
    /// matters; whole measures are discarded first.
    pub fn classify(&self, offset: Fraction) -> Beat {
        let within = offset.fract();
        self.classify_step(within.numerator(), within.denominator())
    }

    /// Classify line `index` of a measure that has `lines` lines. The line
    /// count is the denominator, so 12-line measures scale by 833 per line.
    pub fn classify_line(&self, index: usize, lines: usize) -> Beat {
        let lines = lines.max(1) as i64;
        self.classify_step(index as i64 % lines, lines)
    }

    /// Step `step` of a measure cut into `steps` equal parts.
    ///
    /// Positions that land exactly on a `scale` unit (quarters inside 12 or
    /// 24 line measures) use that unit. Other positions are scaled by the
    /// rounded step size.
    fn classify_step(&self, step: i64, steps: i64) -> Beat {
        let scaled = if (step * self.scale) % steps == 0 {
            step * self.scale / steps
        } else {
            step * rounded_div(self.scale, steps)
        };
        self.class_of(scaled)
    }

    fn class_of(&self, scaled: i64) -> Beat {
        self.divisors
            .iter()
            .find(|row| row.divisor != 0 && scaled % row.divisor == 0)
            .map(|row| row.beat)
            .unwrap_or(self.fallback)
    }
}

/// `round(a / b)` for positive operands, halves rounding up.
fn rounded_div(a: i64, b: i64) -> i64 {
    (2 * a + b) / (2 * b)
}
