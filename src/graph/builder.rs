//! Pipeline driver — runs the preprocessor over every compile command
//! and assembles the shared dependency graph.
//!
//! Each task owns one translation unit: spawn the preprocessor, parse
//! its trace, merge the edges. Only the merge touches shared state.

use std::sync::Arc;

use tracing::info;

use super::engine::DepGraph;
use crate::commands::{self, CompileCommand};
use crate::config::Config;
use crate::parser;
use crate::scheduler::{self, RunReport};

/// Trace every translation unit and merge the results into one graph.
///
/// Per-task failures (preprocessor would not run, broken trace) are
/// counted in the report and never abort sibling tasks; a unit that
/// fails contributes zero edges.
pub async fn build_graph(units: Vec<CompileCommand>, config: &Config) -> (Arc<DepGraph>, RunReport) {
    let graph = Arc::new(DepGraph::new(config.filter.exclude.clone()));
    let jobs = config.scheduler.effective_jobs();
    info!(units = units.len(), jobs, "tracing translation units");

    let worker = {
        let graph = Arc::clone(&graph);
        move |unit: CompileCommand| {
            let graph = Arc::clone(&graph);
            async move {
                let trace = commands::run_preprocessor(&unit).await?;
                let edges = parser::parse_trace(&trace.root, &trace.text)?;
                graph.merge(&edges);
                Ok(())
            }
        }
    };
    let report = scheduler::run_tasks(units, jobs, worker).await;

    let stats = graph.stats();
    info!(
        vertices = stats.vertices,
        edges = stats.edges,
        completed = report.completed,
        failed = report.failed,
        "merge phase finished"
    );
    (graph, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    /// Fake the compiler with a shell one-liner that prints a trace
    /// naming real files, so canonicalization succeeds.
    fn fake_unit(dir: &std::path::Path, trace: &str) -> CompileCommand {
        let file = dir.join("main.cpp");
        fs::write(&file, "").unwrap();
        CompileCommand {
            file: PathBuf::from("main.cpp"),
            directory: dir.to_path_buf(),
            command: format!("sh -c 'printf \"{}\" 1>&2'", trace.replace('\n', "\\n")),
        }
    }

    #[tokio::test]
    async fn traces_flow_into_one_graph() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.h"), "").unwrap();
        fs::write(dir.path().join("b.h"), "").unwrap();

        let trace = format!(
            ". {}\n.. {}\n",
            dir.path().join("a.h").display(),
            dir.path().join("b.h").display()
        );
        let units = vec![fake_unit(dir.path(), &trace), fake_unit(dir.path(), &trace)];

        let (graph, report) = build_graph(units, &Config::default()).await;
        assert_eq!(report.completed, 2);
        assert_eq!(report.failed, 0);

        let stats = graph.stats();
        assert_eq!(stats.vertices, 3);
        assert_eq!(stats.edges, 2);
    }

    #[tokio::test]
    async fn a_failing_unit_contributes_zero_edges() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.h"), "").unwrap();

        let good = fake_unit(dir.path(), &format!(". {}\n", dir.path().join("a.h").display()));
        let mut bad = fake_unit(dir.path(), "");
        bad.command = "false".to_string();

        let (graph, report) = build_graph(vec![good, bad], &Config::default()).await;
        assert_eq!(report.completed, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(graph.stats().vertices, 2);
    }

    #[tokio::test]
    async fn a_protocol_violation_fails_only_its_unit() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.h"), "").unwrap();

        let good = fake_unit(dir.path(), &format!(". {}\n", dir.path().join("a.h").display()));
        // Depth two on the first line: illegal with only the root open.
        let bad = fake_unit(dir.path(), &format!(".. {}\n", dir.path().join("a.h").display()));

        let (graph, report) = build_graph(vec![good, bad], &Config::default()).await;
        assert_eq!(report.completed, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(graph.stats().edges, 1);
    }

    #[tokio::test]
    async fn no_units_still_yields_an_empty_graph() {
        let (graph, report) = build_graph(Vec::new(), &Config::default()).await;
        assert_eq!(report.total(), 0);
        assert_eq!(graph.stats().vertices, 0);
    }
}
