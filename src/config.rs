//! Configuration for cppdeps.
//!
//! Settings load from an optional `cppdeps.toml` (looked up next to the
//! compile command database unless `--config` says otherwise), with CLI
//! flags layered on top. A missing file just means defaults.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{CppdepsError, Result};
use crate::layout::LayoutOptions;
use crate::scheduler;

/// Default substring rules: system headers and toolchain-internal
/// paths, never interesting in a project graph.
pub const DEFAULT_EXCLUDES: &[&str] = &["/usr/include/", "/usr/lib/"];

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub filter: FilterConfig,
    pub layout: LayoutOptions,
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilterConfig {
    /// Substring patterns; any match drops the file from the graph.
    pub exclude: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            exclude: DEFAULT_EXCLUDES.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Maximum concurrent preprocessor invocations. Zero means half
    /// the available hardware parallelism.
    pub jobs: usize,
}

impl SchedulerConfig {
    pub fn effective_jobs(&self) -> usize {
        if self.jobs == 0 {
            scheduler::default_parallelism()
        } else {
            self.jobs
        }
    }
}

impl Config {
    /// Load from `path` if it exists, defaults otherwise.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|e| CppdepsError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config = toml::from_str(&raw).map_err(|e| CppdepsError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_exclude_system_paths() {
        let config = Config::default();
        assert!(config
            .filter
            .exclude
            .contains(&"/usr/include/".to_string()));
        assert_eq!(config.layout, LayoutOptions::default());
        assert_eq!(config.scheduler.jobs, 0);
    }

    #[test]
    fn missing_file_means_defaults() {
        let config = Config::load(Path::new("/no/cppdeps.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn loads_partial_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cppdeps.toml");
        std::fs::write(
            &path,
            r#"
[filter]
exclude = ["third_party/"]

[layout]
iterations = 50

[scheduler]
jobs = 2
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.filter.exclude, vec!["third_party/".to_string()]);
        assert_eq!(config.layout.iterations, 50);
        assert_eq!(config.layout.radius, LayoutOptions::default().radius);
        assert_eq!(config.scheduler.effective_jobs(), 2);
    }

    #[test]
    fn broken_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cppdeps.toml");
        std::fs::write(&path, "[filter\nexclude = 3").unwrap();

        assert!(matches!(
            Config::load(&path),
            Err(CppdepsError::Config { .. })
        ));
    }

    #[test]
    fn zero_jobs_falls_back_to_hardware_parallelism() {
        assert!(SchedulerConfig::default().effective_jobs() >= 1);
    }
}
