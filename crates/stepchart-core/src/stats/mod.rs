//! Per-song pattern statistics.
//!
//! - `selector` - picks the hardest chart of a song
//! - `patterns` - jump, freeze, gallop and drill predicates

mod patterns;
mod selector;

pub use patterns::*;
pub use selector::*;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chart::{Arrow, RawStepchart};
use crate::config::DifficultyPriority;
use crate::error::Result;

/// Pattern counts for the hardest chart of a song.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub jumps: usize,
    pub freezes: usize,
    pub gallops: usize,
    pub drills: usize,
    pub stops: usize,
    /// Not detected yet, always 0.
    pub crossovers: usize,
}

impl Stats {
    /// Count every pattern over one arrow sequence. Gallops look back two
    /// arrows, drills one.
    pub fn from_arrows(arrows: &[Arrow]) -> Self {
        let mut stats = Stats::default();

        for (i, arrow) in arrows.iter().enumerate() {
            let prev = i.checked_sub(1).map(|j| &arrows[j]);
            let prev_prev = i.checked_sub(2).map(|j| &arrows[j]);

            if is_jump(&arrow.direction) {
                stats.jumps += 1;
            }
            if is_freeze(&arrow.direction) {
                stats.freezes += 1;
            }
            if is_gallop(arrow, prev, prev_prev) {
                stats.gallops += 1;
            }
            if is_drill(arrow, prev) {
                stats.drills += 1;
            }
        }

        stats
    }
}

/// Stats for the hardest chart of `song`, with the song's stop count.
pub fn calculate_stats(song: &RawStepchart, priority: &DifficultyPriority) -> Result<Stats> {
    let chart = select_hardest_chart(&song.available_types, &song.arrows, priority)?;
    let stats = Stats {
        stops: song.stops.len(),
        ..Stats::from_arrows(&chart.arrows)
    };
    debug!("{}: {:?}", song.title, stats);
    Ok(stats)
}
