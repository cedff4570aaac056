use std::collections::BTreeMap;

use tracing::debug;

use crate::chart::{ChartData, StepchartType};
use crate::config::DifficultyPriority;
use crate::error::{Error, Result};

/// The chart with the highest feet rating. Ties are broken by `priority`,
/// so the result does not depend on the order of `types`.
pub fn select_hardest_chart<'a>(
    types: &[StepchartType],
    charts: &'a BTreeMap<String, ChartData>,
    priority: &DifficultyPriority,
) -> Result<&'a ChartData> {
    let chart_type = select_hardest_type(types, priority)?;
    debug!("Hardest chart: {} ({} feet)", chart_type.slug, chart_type.feet);
    charts
        .get(&chart_type.slug)
        .ok_or_else(|| Error::MissingChart(chart_type.slug.clone()))
}

/// Type half of `select_hardest_chart`.
pub fn select_hardest_type<'t>(
    types: &'t [StepchartType],
    priority: &DifficultyPriority,
) -> Result<&'t StepchartType> {
    let max_feet = types.iter().map(|t| t.feet).max().ok_or(Error::NoCharts)?;
    let tied: Vec<&StepchartType> = types.iter().filter(|t| t.feet == max_feet).collect();

    priority
        .iter()
        .find_map(|difficulty| tied.iter().copied().find(|t| t.difficulty == *difficulty))
        .ok_or(Error::NoMatchingDifficulty { feet: max_feet })
}
