//! CLI definitions for cppdeps.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cppdeps")]
#[command(about = "Include-dependency graphs for C/C++ codebases", version)]
pub struct Cli {
    /// Path to compile_commands.json
    #[arg(short, long)]
    pub commands: PathBuf,

    /// Output file for the Graphviz description (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file (default: cppdeps.toml next to the database)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Extra exclude pattern, appended to the configured set (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "SUBSTRING")]
    pub excludes: Vec<String>,

    /// Maximum concurrent preprocessor invocations
    /// (default: half the hardware parallelism)
    #[arg(short, long)]
    pub jobs: Option<usize>,
}
