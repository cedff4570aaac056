//! CLI argument definitions for stepchart.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use stepchart_core::Format;

#[derive(Parser)]
#[command(name = "stepchart")]
#[command(about = "Parse .sm/.dwi step charts and report pattern stats", version)]
pub struct Args {
    /// Rules file (JSON) overriding the beat table and difficulty priority
    #[arg(long, global = true, value_name = "FILE", env = "STEPCHART_RULES")]
    pub rules: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command that reads a chart file.
#[derive(ClapArgs, Debug, Clone)]
pub struct ChartInput {
    /// Chart file (.sm or .dwi)
    pub file: PathBuf,

    /// Chart id used in errors and the default DWI banner (default: file stem)
    #[arg(long)]
    pub id: Option<String>,

    /// Source format (default: from the file extension)
    #[arg(short, long)]
    pub format: Option<Format>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse a chart file and print the song as JSON
    Parse {
        #[command(flatten)]
        input: ChartInput,
        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print pattern stats for the hardest chart of a song
    Stats {
        #[command(flatten)]
        input: ChartInput,
        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
