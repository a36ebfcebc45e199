//! File identity handling.
//!
//! A vertex is keyed by its canonical, symlink-free filesystem path, so
//! the same header reached through different relative spellings lands
//! on the same vertex. Exclusion rules are plain substring patterns;
//! prefix stripping is a purely cosmetic pass that makes displayed
//! labels relative to the project root without hard-coding any path.

use std::fs;
use std::io;
use std::path::Path;

/// Resolve `raw` to its canonical form. Fails for paths that do not
/// exist; callers drop the offending edge rather than abort.
pub fn canonicalize(raw: impl AsRef<Path>) -> io::Result<String> {
    Ok(fs::canonicalize(raw)?.to_string_lossy().into_owned())
}

/// True iff any rule occurs as a substring of `identity`.
pub fn is_excluded(identity: &str, rules: &[String]) -> bool {
    rules.iter().any(|rule| identity.contains(rule.as_str()))
}

/// Longest string prefix shared by every label. Empty input yields the
/// empty string; a single label is its own prefix.
pub fn common_prefix<'a, I>(mut labels: I) -> String
where
    I: Iterator<Item = &'a str>,
{
    let Some(mut prefix) = labels.next() else {
        return String::new();
    };
    for label in labels {
        prefix = &prefix[..shared_len(prefix, label)];
        if prefix.is_empty() {
            break;
        }
    }
    prefix.to_string()
}

/// Byte length of the common prefix of `a` and `b`, cut at a char
/// boundary of both.
fn shared_len(a: &str, b: &str) -> usize {
    a.char_indices()
        .zip(b.chars())
        .find(|((_, ca), cb)| ca != cb)
        .map(|((i, _), _)| i)
        .unwrap_or_else(|| a.len().min(b.len()))
}
