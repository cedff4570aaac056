//! Parse command: print a song as JSON.

use std::path::Path;

use anyhow::Result;
use stepchart_core::Rules;

use crate::cli::ChartInput;
use crate::cli_utils;

/// Parse one chart file and write the song JSON to `output` or stdout
pub fn run(input: &ChartInput, output: Option<&Path>, rules: &Rules) -> Result<()> {
    let song = cli_utils::read_song(input, rules)?;
    let json = cli_utils::to_json(&song, input.pretty)?;
    cli_utils::write_output(&json, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const SONG: &str = "#TITLE:Cli Song;\n#ARTIST:Someone;\n#BPMS:0.000=150.000;\n#NOTES:dance-single::Hard:9::1000\n0100\n0010\n2001\n,\n0000\n3000\n0000\n0000\n;";

    fn input(file: PathBuf, pretty: bool) -> ChartInput {
        ChartInput {
            file,
            id: None,
            format: None,
            pretty,
        }
    }

    #[test]
    fn test_run_writes_song_json() {
        let dir = TempDir::new().unwrap();
        let chart = dir.path().join("cli.sm");
        std::fs::write(&chart, SONG).unwrap();
        let output = dir.path().join("song.json");

        run(&input(chart, false), Some(output.as_path()), &Rules::default()).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(json["title"], "Cli Song");
        assert_eq!(json["artist"], "Someone");
        assert_eq!(json["bpm"], serde_json::json!([150]));
        assert_eq!(json["availableTypes"][0]["slug"], "single-expert");
    }

    #[test]
    fn test_run_pretty_output() {
        let dir = TempDir::new().unwrap();
        let chart = dir.path().join("cli.sm");
        std::fs::write(&chart, SONG).unwrap();
        let output = dir.path().join("song.json");

        run(&input(chart, true), Some(output.as_path()), &Rules::default()).unwrap();
        assert!(std::fs::read_to_string(&output).unwrap().contains("\n  \"title\""));
    }

    #[test]
    fn test_run_reports_parse_failure() {
        let dir = TempDir::new().unwrap();
        let chart = dir.path().join("broken.sm");
        std::fs::write(&chart, "#TITLE:No Bpm;\n#NOTES:dance-single::Hard:9::1000;").unwrap();
        let output = dir.path().join("song.json");

        let err =
            run(&input(chart, false), Some(output.as_path()), &Rules::default()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
        assert!(!output.exists());
    }
}
