//! # cppdeps
//!
//! Include-dependency graphs for C/C++ codebases.
//!
//! cppdeps re-runs every entry of a `compile_commands.json` database
//! through the preprocessor with `-E -H`, parses the indented include
//! traces off stderr, and folds them into one deduplicated directed
//! graph. The graph is filtered by exclude rules, its labels are made
//! root-relative, a deterministic force-directed pass assigns 2-D
//! positions, and the result is exported as Graphviz DOT for rendering
//! with `neato`.
//!
//! ## Pipeline
//!
//! ```rust,no_run
//! use cppdeps::{build_graph, read_compile_commands, Config};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::default();
//! let units = read_compile_commands("compile_commands.json".as_ref())?;
//!
//! // Concurrent phase: bounded pool of preprocessor invocations, all
//! // merging into one shared graph.
//! let (graph, report) = build_graph(units, &config).await;
//! eprintln!("{} units traced, {} failed", report.completed, report.failed);
//!
//! // Sequential phase: prefix stripping, layout, export.
//! graph.clean();
//! graph.layout(&config.layout);
//! graph.export(None)?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod graph;
pub mod layout;
pub mod parser;
pub mod paths;
pub mod scheduler;

// Re-exports for convenience
pub use commands::{read_compile_commands, CompileCommand, TraceOutput};
pub use config::Config;
pub use error::{CppdepsError, Result};
pub use graph::{build_graph, DepGraph, GraphStats, IncludeEdge, Point, VertexData};
pub use layout::LayoutOptions;
pub use scheduler::{run_tasks, RunReport};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs::{self, File};
    use std::path::Path;

    /// A small project tree: a source file, two project headers, and a
    /// header inside a fake system include directory.
    fn project() -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::create_dir_all(dir.path().join("include")).unwrap();
        fs::create_dir_all(dir.path().join("sysroot/usr/include")).unwrap();
        for name in [
            "src/root.cpp",
            "include/a.h",
            "include/b.h",
            "sysroot/usr/include/stdio.h",
        ] {
            File::create(dir.path().join(name)).unwrap();
        }
        let root = paths::canonicalize(dir.path().join("src/root.cpp")).unwrap();
        (dir, root)
    }

    fn trace_for(dir: &Path) -> String {
        format!(
            ". {a}\n.. {b}\n. {sys}\n",
            a = dir.join("include/a.h").display(),
            b = dir.join("include/b.h").display(),
            sys = dir.join("sysroot/usr/include/stdio.h").display(),
        )
    }

    #[test]
    fn trace_to_dot_end_to_end() {
        let (dir, root) = project();
        let graph = DepGraph::new(vec!["/usr/include/".to_string()]);

        let edges = parser::parse_trace(&root, &trace_for(dir.path())).unwrap();
        graph.merge(&edges);
        graph.clean();
        graph.layout(&LayoutOptions::default());

        let labels: HashSet<_> = graph.labels().into_iter().collect();
        assert_eq!(
            labels,
            HashSet::from([
                "src/root.cpp".to_string(),
                "include/a.h".to_string(),
                "include/b.h".to_string(),
            ])
        );
        assert_eq!(
            graph.edges().into_iter().collect::<HashSet<_>>(),
            HashSet::from([
                ("src/root.cpp".to_string(), "include/a.h".to_string()),
                ("include/a.h".to_string(), "include/b.h".to_string()),
            ])
        );

        let mut buf = Vec::new();
        graph.write_dot(&mut buf).unwrap();
        let dot = String::from_utf8(buf).unwrap();
        assert!(dot.contains(r#"label="src/root.cpp""#));
        assert!(dot.contains("pos=\""));
        assert!(!dot.contains("stdio.h"));
    }

    #[test]
    fn two_traces_dedup_into_one_graph() {
        let (dir, root) = project();
        let graph = DepGraph::new(Vec::new());

        // Two translation units both include a.h -> b.h.
        let trace = format!(
            ". {a}\n.. {b}\n",
            a = dir.path().join("include/a.h").display(),
            b = dir.path().join("include/b.h").display(),
        );
        graph.merge(&parser::parse_trace(&root, &trace).unwrap());
        graph.merge(&parser::parse_trace(&root, &trace).unwrap());

        assert_eq!(
            graph.stats(),
            GraphStats {
                vertices: 3,
                edges: 2,
            }
        );
    }

    #[test]
    fn layout_is_reproducible_across_full_runs() {
        let build = || {
            let (dir, root) = project();
            let graph = DepGraph::new(Vec::new());
            graph.merge(&parser::parse_trace(&root, &trace_for(dir.path())).unwrap());
            graph.clean();
            graph.layout(&LayoutOptions::default());
            (graph.labels(), graph.positions())
        };

        // Labels were prefix-stripped, so both runs describe the same
        // graph even though the temp directories differ.
        assert_eq!(build(), build());
    }

    #[test]
    fn empty_run_exports_a_valid_description() {
        let graph = DepGraph::new(Vec::new());
        graph.clean();
        graph.layout(&LayoutOptions::default());

        let mut buf = Vec::new();
        graph.write_dot(&mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "digraph includes {\n}\n"
        );
    }

    #[test]
    fn rejected_trace_contributes_nothing() {
        let (dir, root) = project();
        let graph = DepGraph::new(Vec::new());

        let bad = format!(".. {}\n", dir.path().join("include/a.h").display());
        assert!(parser::parse_trace(&root, &bad).is_err());
        assert_eq!(graph.stats(), GraphStats::default());
    }
}
