//! Error types for cppdeps.
//!
//! Per-task errors (a broken trace, a preprocessor that would not run)
//! are recorded by the scheduler and never abort sibling tasks; only a
//! missing compile command list or an export failure reach the caller.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CppdepsError>;

#[derive(Error, Debug)]
pub enum CppdepsError {
    /// The compile command database could not be read or parsed.
    /// Fatal: without the task list there is nothing to run.
    #[error("failed to read compile commands from {path}: {reason}")]
    CompileCommands { path: PathBuf, reason: String },

    /// The config file exists but could not be parsed.
    #[error("failed to read config from {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    /// A trace line was indented more than one level past the deepest
    /// open entry. The whole trace is discarded; the run continues.
    #[error("trace line {line}: depth {depth} exceeds include stack of {stack}")]
    TraceProtocol {
        line: usize,
        depth: usize,
        stack: usize,
    },

    /// The preprocessor could not be spawned or exited abnormally.
    /// The translation unit contributes zero edges.
    #[error("preprocessor failed for {file}: {reason}")]
    Preprocessor { file: String, reason: String },

    /// Writing the graph description failed. The graph and layout are
    /// still intact; the caller may retry with another destination.
    #[error("export failed: {0}")]
    Export(#[from] std::io::Error),
}
