//! File classification for repository scans.

use std::path::Path;

/// Role a file plays in describing a repository's architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    /// Dependency/build manifest (`Cargo.toml`, `package.json`, ...).
    Manifest,
    /// Deployment or infrastructure config (`Dockerfile`, `*.tf`, CI workflows, ...).
    Config,
    Source,
    Other,
}

const MANIFEST_NAMES: &[&str] = &[
    "Cargo.toml",
    "package.json",
    "go.mod",
    "pyproject.toml",
    "requirements.txt",
    "setup.py",
    "Pipfile",
    "pom.xml",
    "build.gradle",
    "build.gradle.kts",
    "settings.gradle",
    "Gemfile",
    "composer.json",
    "mix.exs",
    "pubspec.yaml",
    "Package.swift",
    "CMakeLists.txt",
];

const CONFIG_NAMES: &[&str] = &[
    "Dockerfile",
    "docker-compose.yml",
    "docker-compose.yaml",
    "compose.yml",
    "compose.yaml",
    "Makefile",
    "Procfile",
    ".env.example",
    "serverless.yml",
    "serverless.yaml",
    "nginx.conf",
    "Chart.yaml",
    "skaffold.yaml",
    "fly.toml",
    "vercel.json",
    "netlify.toml",
];

impl FileRole {
    /// Classify a path relative to the repository root (forward slashes).
    pub fn classify(rel_path: &str) -> Self {
        let name = rel_path.rsplit('/').next().unwrap_or(rel_path);

        if MANIFEST_NAMES.contains(&name) || name.ends_with(".csproj") {
            return Self::Manifest;
        }

        if CONFIG_NAMES.contains(&name)
            || name.starts_with("Dockerfile.")
            || name.ends_with(".tf")
            || name.ends_with(".proto")
            || is_ci_workflow(rel_path)
            || is_k8s_manifest(rel_path)
        {
            return Self::Config;
        }

        match language_for(rel_path) {
            Some(_) => Self::Source,
            None => Self::Other,
        }
    }

    /// Whether the file's contents should be excerpted for the analyzer.
    pub fn is_excerpted(&self) -> bool {
        matches!(self, Self::Manifest | Self::Config)
    }
}

fn is_ci_workflow(rel_path: &str) -> bool {
    (rel_path.starts_with(".github/workflows/") || rel_path == ".gitlab-ci.yml")
        && (rel_path.ends_with(".yml") || rel_path.ends_with(".yaml"))
}

fn is_k8s_manifest(rel_path: &str) -> bool {
    let in_k8s_dir = rel_path
        .split('/')
        .any(|seg| matches!(seg, "k8s" | "kubernetes" | "helm" | "deploy" | "manifests"));
    in_k8s_dir && (rel_path.ends_with(".yml") || rel_path.ends_with(".yaml"))
}

/// Programming language for a source file, by extension.
pub fn language_for(rel_path: &str) -> Option<&'static str> {
    let ext = Path::new(rel_path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    let lang = match ext.to_lowercase().as_str() {
        "rs" => "rust",
        "py" => "python",
        "js" | "mjs" | "cjs" | "jsx" => "javascript",
        "ts" | "tsx" => "typescript",
        "go" => "go",
        "java" => "java",
        "kt" | "kts" => "kotlin",
        "scala" => "scala",
        "rb" => "ruby",
        "php" => "php",
        "cs" => "csharp",
        "c" | "h" => "c",
        "cpp" | "cc" | "hpp" | "hh" => "cpp",
        "swift" => "swift",
        "ex" | "exs" => "elixir",
        "dart" => "dart",
        "sql" => "sql",
        "sh" | "bash" | "zsh" => "shell",
        "vue" => "vue",
        "svelte" => "svelte",
        _ => return None,
    };
    Some(lang)
}

/// Truncate to at most `max_bytes`, backing off to a char boundary.
pub fn truncate_utf8(text: &str, max_bytes: usize) -> (&str, bool) {
    if text.len() <= max_bytes {
        return (text, false);
    }
    let mut end = max_bytes;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    (&text[..end], true)
}
