//! Compile-command handling.
//!
//! Reads the `compile_commands.json` database emitted by CMake (or
//! Bear, or any tool speaking the same format) and re-runs each
//! recorded command with `-E -H` appended, which makes the compiler
//! print its include closure on stderr instead of producing an object
//! file.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use crate::error::{CppdepsError, Result};
use crate::paths;

/// One entry of a `compile_commands.json` database.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompileCommand {
    /// The translation unit, possibly relative to `directory`.
    pub file: PathBuf,
    /// Working directory the command was recorded in.
    pub directory: PathBuf,
    /// The full compiler invocation.
    pub command: String,
}

impl CompileCommand {
    /// The translation unit resolved against its working directory.
    pub fn absolute_file(&self) -> PathBuf {
        if self.file.is_absolute() {
            self.file.clone()
        } else {
            self.directory.join(&self.file)
        }
    }
}

/// Raw preprocessor output for one translation unit.
#[derive(Debug, Clone)]
pub struct TraceOutput {
    /// Canonical identity of the translation unit itself.
    pub root: String,
    /// The stderr text carrying the include trace.
    pub text: String,
}

/// Read and parse a compile command database. Fatal on failure.
pub fn read_compile_commands(path: &Path) -> Result<Vec<CompileCommand>> {
    let raw = std::fs::read_to_string(path).map_err(|e| CppdepsError::CompileCommands {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let units: Vec<CompileCommand> =
        serde_json::from_str(&raw).map_err(|e| CppdepsError::CompileCommands {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    debug!(path = %path.display(), units = units.len(), "read compile commands");
    Ok(units)
}

/// Run the recorded command with `-E -H` in its recorded directory and
/// capture the trace. Spawn failure or an abnormal exit is a per-task
/// error; the unit then contributes zero edges.
pub async fn run_preprocessor(unit: &CompileCommand) -> Result<TraceOutput> {
    let file = unit.file.to_string_lossy().into_owned();
    let root =
        paths::canonicalize(unit.absolute_file()).map_err(|e| CppdepsError::Preprocessor {
            file: file.clone(),
            reason: format!("cannot resolve translation unit: {e}"),
        })?;

    let output = Command::new("sh")
        .arg("-c")
        .arg(format!("{} -E -H", unit.command))
        .current_dir(&unit.directory)
        .stdin(Stdio::null())
        // The preprocessed source on stdout can be enormous and is not
        // needed; only stderr carries the trace.
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| CppdepsError::Preprocessor {
            file: file.clone(),
            reason: format!("failed to spawn: {e}"),
        })?;

    if !output.status.success() {
        return Err(CppdepsError::Preprocessor {
            file,
            reason: format!("exited with {}", output.status),
        });
    }

    let text = String::from_utf8_lossy(&output.stderr).into_owned();
    debug!(file = %root, lines = text.lines().count(), "captured include trace");
    Ok(TraceOutput { root, text })
}
