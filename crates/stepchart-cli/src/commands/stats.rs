//! Stats command: pattern counts for the hardest chart.

use std::path::Path;

use anyhow::{Context, Result};
use stepchart_core::{Rules, calculate_stats};

use crate::cli::ChartInput;
use crate::cli_utils;

pub fn run(input: &ChartInput, output: Option<&Path>, rules: &Rules) -> Result<()> {
    let song = cli_utils::read_song(input, rules)?;
    let stats = calculate_stats(&song, &rules.difficulty_priority)
        .with_context(|| format!("Failed to select a chart from {}", input.file.display()))?;

    let json = cli_utils::to_json(&stats, input.pretty)?;
    cli_utils::write_output(&json, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepchart_core::Stats;
    use tempfile::TempDir;

    fn run_on(name: &str, text: &str, rules: &Rules) -> Result<Stats> {
        let dir = TempDir::new().unwrap();
        let chart = dir.path().join(name);
        std::fs::write(&chart, text).unwrap();
        let output = dir.path().join("stats.json");

        let input = ChartInput {
            file: chart,
            id: None,
            format: None,
            pretty: false,
        };
        run(&input, Some(output.as_path()), rules)?;
        Ok(serde_json::from_str(&std::fs::read_to_string(&output)?)?)
    }

    #[test]
    fn test_run_writes_stats_json() {
        let text = "#BPMS:0=150;\n#STOPS:4=0.5;\n#NOTES:dance-single::Hard:9::1001\n0000\n2000\n0000\n,\n3000\n0000\n0000\n0000\n;";
        let stats = run_on("stats.sm", text, &Rules::default()).unwrap();
        assert_eq!(
            stats,
            Stats {
                jumps: 1,
                freezes: 1,
                gallops: 0,
                drills: 0,
                stops: 1,
                crossovers: 0,
            }
        );
    }

    #[test]
    fn test_run_picks_chart_by_rules() {
        let text = "#BPM:150;\n#SINGLE:BASIC:9:B;\n#SINGLE:ANOTHER:9:2;";
        let stats = run_on("pick.dwi", text, &Rules::default()).unwrap();
        assert_eq!(stats.jumps, 0);

        let rules = Rules::parse(r#"{ "difficultyPriority": ["basic", "difficult"] }"#).unwrap();
        let stats = run_on("pick.dwi", text, &rules).unwrap();
        assert_eq!(stats.jumps, 1);
    }

    #[test]
    fn test_run_without_matching_difficulty_fails() {
        let rules = Rules::parse(r#"{ "difficultyPriority": ["challenge"] }"#).unwrap();
        let err = run_on("one.dwi", "#BPM:150;\n#SINGLE:BASIC:3:2;", &rules).unwrap_err();
        assert!(err.to_string().contains("Failed to select a chart"));
    }
}
