//! Per-lane freeze (hold) matching shared by both parsers.

use crate::chart::{Diagnostic, FreezeBody};
use crate::fraction::Fraction;

/// Open/close state for every lane of one chart.
///
/// Anomalies never abort parsing; they are collected as diagnostics and
/// handed back by `finish`.
#[derive(Debug)]
pub struct FreezeTracker {
    slug: String,
    open: Vec<Option<Fraction>>,
    freezes: Vec<FreezeBody>,
    diagnostics: Vec<Diagnostic>,
}

impl FreezeTracker {
    pub fn new(slug: impl Into<String>, lanes: usize) -> Self {
        Self {
            slug: slug.into(),
            open: vec![None; lanes],
            freezes: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn is_open(&self, lane: usize) -> bool {
        matches!(self.open.get(lane), Some(Some(_)))
    }

    /// Start a freeze on `lane`. An already open freeze on that lane is
    /// replaced.
    pub fn open(&mut self, lane: usize, at: Fraction) {
        let Some(slot) = self.open.get_mut(lane) else {
            return;
        };
        if slot.is_some() {
            self.diagnostics.push(Diagnostic::OverlappingFreeze {
                slug: self.slug.clone(),
                lane,
                offset: at.to_f64(),
            });
        }
        *slot = Some(at);
    }

    /// Close the freeze on `lane` at `at + release`.
    pub fn close(&mut self, lane: usize, at: Fraction, release: Fraction) {
        match self.open.get_mut(lane).and_then(Option::take) {
            Some(start) => self.push(lane, start, at + release),
            None => self.diagnostics.push(Diagnostic::UnopenedFreezeClose {
                slug: self.slug.clone(),
                lane,
                offset: at.to_f64(),
            }),
        }
    }

    /// Report every freeze still open. With `release`, an open freeze ends
    /// that long after its own head instead of being dropped.
    pub fn finish(mut self, release: Option<Fraction>) -> (Vec<FreezeBody>, Vec<Diagnostic>) {
        let pending: Vec<(usize, Fraction)> = self
            .open
            .iter_mut()
            .enumerate()
            .filter_map(|(lane, slot)| slot.take().map(|start| (lane, start)))
            .collect();

        for (lane, start) in pending {
            let end = release.map(|release| start + release);
            self.diagnostics.push(Diagnostic::UnclosedFreeze {
                slug: self.slug.clone(),
                lane,
                start: start.to_f64(),
                resolved_at: end.map(|end| end.to_f64()),
            });
            if let Some(end) = end {
                self.push(lane, start, end);
            }
        }

        (self.freezes, self.diagnostics)
    }

    fn push(&mut self, lane: usize, start: Fraction, end: Fraction) {
        if end <= start {
            self.diagnostics.push(Diagnostic::EmptyFreeze {
                slug: self.slug.clone(),
                lane,
                start: start.to_f64(),
                end: end.to_f64(),
            });
            return;
        }
        self.freezes.push(FreezeBody {
            direction: lane,
            start_offset: start.to_f64(),
            end_offset: end.to_f64(),
        });
    }
}
