//! cppdeps CLI — include-dependency graphs for C/C++ projects.
//!
//! Usage:
//!   cppdeps --commands build/compile_commands.json           # DOT on stdout
//!   cppdeps --commands ... --output deps.dot                 # DOT to a file
//!   cppdeps --commands ... -x third_party/ -j 4              # extra filter, 4 jobs
//!
//! Render the result with `neato -n2 -Tpng deps.dot -o deps.png`.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cppdeps::cli::Cli;
use cppdeps::commands::read_compile_commands;
use cppdeps::config::Config;
use cppdeps::graph::build_graph;

#[tokio::main]
async fn main() {
    // Diagnostics go to stderr so a stdout export stays a clean DOT
    // stream.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| cli.commands.with_file_name("cppdeps.toml"));
    let mut config = Config::load(&config_path)?;
    config.filter.exclude.extend(cli.excludes.iter().cloned());
    if let Some(jobs) = cli.jobs {
        config.scheduler.jobs = jobs;
    }

    let units = read_compile_commands(&cli.commands)?;
    let (graph, report) = build_graph(units, &config).await;
    if report.failed > 0 {
        tracing::warn!(
            failed = report.failed,
            "some translation units contributed no edges"
        );
    }

    graph.clean();
    graph.layout(&config.layout);
    graph
        .export(cli.output.as_deref())
        .context("failed to write graph description")?;
    Ok(())
}
