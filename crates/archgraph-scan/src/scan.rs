//! Repository walk producing a [`RepoSnapshot`] for the analyzer.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use archgraph_core::{Error, Result, ScanLimits};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::file::{language_for, truncate_utf8, FileRole};

/// Contents of one manifest or config file, possibly truncated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileExcerpt {
    pub path: String,
    pub content: String,
    pub truncated: bool,
}

/// What the analyzer is told about a repository.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoSnapshot {
    pub root: PathBuf,
    /// Directory name of the root, used as the default repository label.
    pub name: String,
    /// Relative paths, forward slashes, sorted walk order.
    pub files: Vec<String>,
    pub manifests: Vec<FileExcerpt>,
    pub configs: Vec<FileExcerpt>,
    /// Source file count per language.
    pub languages: BTreeMap<String, usize>,
    /// Set when `max_files` cut the walk short.
    pub truncated: bool,
}

impl RepoSnapshot {
    /// Plain-text rendering handed to a model.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Repository: {}", self.name);

        if !self.languages.is_empty() {
            let mut langs: Vec<(&String, &usize)> = self.languages.iter().collect();
            langs.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
            let summary: Vec<String> = langs
                .iter()
                .map(|(lang, n)| format!("{} ({})", lang, n))
                .collect();
            let _ = writeln!(out, "Languages: {}", summary.join(", "));
        }

        let _ = writeln!(out, "\n## File listing ({} files)", self.files.len());
        for file in &self.files {
            let _ = writeln!(out, "{}", file);
        }
        if self.truncated {
            let _ = writeln!(out, "... (listing truncated)");
        }

        for (title, excerpts) in [("Manifests", &self.manifests), ("Config files", &self.configs)] {
            if excerpts.is_empty() {
                continue;
            }
            let _ = writeln!(out, "\n## {}", title);
            for excerpt in excerpts {
                let _ = writeln!(out, "\n### {}\n```\n{}", excerpt.path, excerpt.content);
                if excerpt.truncated {
                    let _ = writeln!(out, "... (truncated)");
                }
                let _ = writeln!(out, "```");
            }
        }

        out
    }
}

/// Walk `root` and collect the listing, manifests and configs within `limits`.
pub fn scan(root: &Path, limits: &ScanLimits) -> Result<RepoSnapshot> {
    if !root.is_dir() {
        return Err(Error::Scan(format!("Not a directory: {}", root.display())));
    }

    let name = root
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| root.display().to_string());

    let mut snapshot = RepoSnapshot {
        root: root.to_path_buf(),
        name,
        files: Vec::new(),
        manifests: Vec::new(),
        configs: Vec::new(),
        languages: BTreeMap::new(),
        truncated: false,
    };

    walk_dir(root, "", limits, &mut snapshot)?;

    info!(
        "Scanned {}: {} files, {} manifests, {} configs{}",
        root.display(),
        snapshot.files.len(),
        snapshot.manifests.len(),
        snapshot.configs.len(),
        if snapshot.truncated { " (truncated)" } else { "" }
    );

    Ok(snapshot)
}

fn walk_dir(dir: &Path, prefix: &str, limits: &ScanLimits, snapshot: &mut RepoSnapshot) -> Result<()> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        if snapshot.truncated {
            return Ok(());
        }

        let file_name = entry.file_name().to_string_lossy().into_owned();
        let rel_path = if prefix.is_empty() {
            file_name.clone()
        } else {
            format!("{}/{}", prefix, file_name)
        };

        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(e) => {
                warn!("Skipping {}: {}", rel_path, e);
                continue;
            }
        };

        if file_type.is_symlink() {
            debug!("Skipping symlink {}", rel_path);
            continue;
        }

        if file_type.is_dir() {
            if limits.is_ignored(&file_name) {
                debug!("Ignoring directory {}", rel_path);
                continue;
            }
            walk_dir(&entry.path(), &rel_path, limits, snapshot)?;
            continue;
        }

        if snapshot.files.len() >= limits.max_files {
            snapshot.truncated = true;
            return Ok(());
        }

        let role = FileRole::classify(&rel_path);
        if let Some(lang) = language_for(&rel_path) {
            *snapshot.languages.entry(lang.to_string()).or_insert(0) += 1;
        }
        if role.is_excerpted() {
            if let Some(excerpt) = read_excerpt(&entry.path(), &rel_path, limits.max_excerpt_bytes) {
                match role {
                    FileRole::Manifest => snapshot.manifests.push(excerpt),
                    _ => snapshot.configs.push(excerpt),
                }
            }
        }
        snapshot.files.push(rel_path);
    }

    Ok(())
}

fn read_excerpt(path: &Path, rel_path: &str, max_bytes: usize) -> Option<FileExcerpt> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let (kept, truncated) = truncate_utf8(&content, max_bytes);
            Some(FileExcerpt {
                path: rel_path.to_string(),
                content: kept.to_string(),
                truncated,
            })
        }
        Err(e) => {
            warn!("Could not read {}: {}", rel_path, e);
            None
        }
    }
}
