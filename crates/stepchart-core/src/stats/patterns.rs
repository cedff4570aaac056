//! Arrow pattern predicates.

use crate::chart::{Arrow, Beat, Direction};

/// Gap, in measures, that separates neighbouring arrows for gallop and drill
/// detection.
pub const PATTERN_GAP: f64 = 1.0 / 8.0;

/// Exactly two lanes active.
pub fn is_jump(direction: &Direction) -> bool {
    direction.active_count() == 2
}

pub fn is_freeze(direction: &Direction) -> bool {
    direction.has_freeze_head()
}

/// A quarter-note arrow reached quickly from a 12th or 16th note on another
/// lane, where that 12th or 16th note stands apart from the arrow before it.
pub fn is_gallop(current: &Arrow, prev: Option<&Arrow>, prev_prev: Option<&Arrow>) -> bool {
    let Some(prev) = prev else {
        return false;
    };

    if current.beat != Beat::Quarter || is_jump(&current.direction) {
        return false;
    }

    // same lane again is a drill
    if current.direction == prev.direction {
        return false;
    }

    if !matches!(prev.beat, Beat::Twelfth | Beat::Sixteenth) {
        return false;
    }

    let isolated = prev_prev.is_none_or(|pp| prev.offset - pp.offset >= PATTERN_GAP);
    isolated && current.offset - prev.offset < PATTERN_GAP
}

/// The same non-jump direction again within `PATTERN_GAP`.
pub fn is_drill(current: &Arrow, prev: Option<&Arrow>) -> bool {
    let Some(prev) = prev else {
        return false;
    };

    !is_jump(&current.direction)
        && current.direction == prev.direction
        && current.offset - prev.offset <= PATTERN_GAP
}
