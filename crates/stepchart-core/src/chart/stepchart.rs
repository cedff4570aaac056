use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::chart::{Arrow, Diagnostic, Difficulty, FreezeBody, Mode, Stop};

/// One playable chart variant of a song.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepchartType {
    pub slug: String,
    pub mode: Mode,
    pub difficulty: Difficulty,
    pub feet: u32,
}

impl StepchartType {
    pub fn new(mode: Mode, difficulty: Difficulty, feet: u32) -> Self {
        Self {
            slug: Self::slug_for(mode, difficulty),
            mode,
            difficulty,
            feet,
        }
    }

    /// `"{mode}-{difficulty}"`, e.g. `single-expert`
    pub fn slug_for(mode: Mode, difficulty: Difficulty) -> String {
        format!("{}-{}", mode, difficulty)
    }
}

/// Arrows and freezes of one chart variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub arrows: Vec<Arrow>,
    pub freezes: Vec<FreezeBody>,
}

/// Parse result for one song file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStepchart {
    pub title: String,
    pub artist: String,
    pub banner: Option<String>,
    pub bpm: Vec<u32>,
    #[serde(default)]
    pub stops: Vec<Stop>,
    pub available_types: Vec<StepchartType>,
    /// Chart data keyed by `StepchartType::slug`.
    pub arrows: BTreeMap<String, ChartData>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl RawStepchart {
    pub fn chart(&self, slug: &str) -> Option<&ChartData> {
        self.arrows.get(slug)
    }

    pub fn has_type(&self, slug: &str) -> bool {
        self.available_types.iter().any(|t| t.slug == slug)
    }

    /// Register a parsed chart. A slug that is already present keeps its
    /// first chart and the new one is reported as a duplicate.
    pub fn add_chart(&mut self, chart_type: StepchartType, data: ChartData) -> bool {
        if self.has_type(&chart_type.slug) {
            self.report(Diagnostic::DuplicateChart {
                slug: chart_type.slug,
            });
            return false;
        }
        self.arrows.insert(chart_type.slug.clone(), data);
        self.available_types.push(chart_type);
        true
    }

    /// Record a recoverable anomaly and log it.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        warn!("{}: {}", self.title, diagnostic);
        self.diagnostics.push(diagnostic);
    }

    pub fn report_all(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.report(diagnostic);
        }
    }
}
