//! Parser for preprocessor include traces.
//!
//! `gcc -E -H` (and clang with the same flags) reports the transitive
//! include closure of a translation unit on stderr as an indented
//! outline:
//!
//! ```text
//! . /project/include/a.h
//! .. /project/include/b.h
//! . /project/include/c.h
//! ```
//!
//! The run of leading dots is the include-stack depth: depth 1 is
//! included directly by the translation unit, depth 2 by whatever is
//! currently open at depth 1, and so on. The parser keeps an explicit
//! stack of file names seeded with the translation unit itself and
//! emits one parent/child edge per trace line. Anything that does not
//! match the line syntax (blank lines, diagnostics the compiler mixes
//! into stderr) is skipped.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{CppdepsError, Result};
use crate::graph::IncludeEdge;

static TRACE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\.+) (.+)$").expect("trace line pattern is valid"));

/// One successfully parsed line of trace text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceLine {
    /// Include-stack depth (count of leading dots, always >= 1).
    pub depth: usize,
    /// The file name as printed by the compiler.
    pub name: String,
}

/// Parse a single line. Returns `None` for anything that is not a
/// trace line.
pub fn parse_line(line: &str) -> Option<TraceLine> {
    let caps = TRACE_LINE.captures(line)?;
    Some(TraceLine {
        depth: caps[1].len(),
        name: caps[2].to_string(),
    })
}

/// Parse the full trace for one translation unit into the ordered list
/// of include edges it implies.
///
/// `root` is the translation unit's own identity and seeds the path
/// stack. A line indented more than one level past the deepest open
/// entry violates the trace format; the whole trace is rejected and
/// contributes zero edges.
pub fn parse_trace(root: &str, text: &str) -> Result<Vec<IncludeEdge>> {
    let mut stack: Vec<String> = vec![root.to_string()];
    let mut edges = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let Some(parsed) = parse_line(line) else {
            continue;
        };
        if parsed.depth > stack.len() {
            return Err(CppdepsError::TraceProtocol {
                line: line_no + 1,
                depth: parsed.depth,
                stack: stack.len(),
            });
        }
        if parsed.depth == stack.len() {
            // Child of the current top.
            stack.push(parsed.name);
        } else {
            // Sibling of whatever was previously at this depth.
            stack.truncate(parsed.depth + 1);
            stack[parsed.depth] = parsed.name;
        }
        let n = stack.len();
        edges.push(IncludeEdge::new(&stack[n - 2], &stack[n - 1]));
    }

    Ok(edges)
}
