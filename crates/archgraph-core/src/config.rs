//! Scan limits and environment-driven configuration.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Directories never descended into during a repository scan.
pub const DEFAULT_IGNORED_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "target",
    "dist",
    "build",
    ".venv",
    "venv",
    "__pycache__",
    "vendor",
    ".next",
    "coverage",
    ".idea",
    ".vscode",
];

pub const DEFAULT_MAX_FILES: usize = 2000;
pub const DEFAULT_MAX_EXCERPT_BYTES: usize = 4096;

/// Bounds applied to a repository scan before its output is sent to a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanLimits {
    /// Maximum number of file paths collected.
    pub max_files: usize,
    /// Maximum bytes kept from each manifest or config file.
    pub max_excerpt_bytes: usize,
    /// Directory names skipped wherever they appear.
    pub ignored_dirs: Vec<String>,
}

impl Default for ScanLimits {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            max_excerpt_bytes: DEFAULT_MAX_EXCERPT_BYTES,
            ignored_dirs: DEFAULT_IGNORED_DIRS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ScanLimits {
    /// Create limits from environment and defaults.
    ///
    /// `ARCHGRAPH_MAX_FILES` and `ARCHGRAPH_MAX_EXCERPT_BYTES` override the caps;
    /// `ARCHGRAPH_IGNORE` is a comma-separated list of extra directory names.
    pub fn from_env() -> Self {
        let mut limits = Self::default();

        if let Some(n) = parse_env_usize("ARCHGRAPH_MAX_FILES") {
            limits.max_files = n;
        }
        if let Some(n) = parse_env_usize("ARCHGRAPH_MAX_EXCERPT_BYTES") {
            limits.max_excerpt_bytes = n;
        }
        if let Ok(extra) = std::env::var("ARCHGRAPH_IGNORE") {
            limits.add_ignored(extra.split(','));
        }

        limits
    }

    /// Append directory names to the ignore list, skipping blanks and duplicates.
    pub fn add_ignored<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        for name in names {
            let name = name.trim();
            if !name.is_empty() && !self.ignored_dirs.iter().any(|d| d == name) {
                self.ignored_dirs.push(name.to_string());
            }
        }
    }

    pub fn is_ignored(&self, dir_name: &str) -> bool {
        self.ignored_dirs.iter().any(|d| d == dir_name)
    }
}

fn parse_env_usize(key: &str) -> Option<usize> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Some(n),
        _ => {
            warn!("Ignoring invalid {}={:?}", key, raw);
            None
        }
    }
}
