//! Subcommand implementations. Each returns the process exit code.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use archgraph_analyze::{Analyzer, HttpModelClient, LlmConfig};
use archgraph_core::ScanLimits;
use archgraph_query::{check_consistency, GraphStats, ViewState};
use archgraph_schema::sample::sample_envelope;
use archgraph_schema::{parse_any, parse_graph, AnalysisEnvelope, DetailLevel, LoadError};
use serde_json::json;
use tracing::info;

use crate::output;

/// Positional arguments plus `--flag` / `--key value` options.
#[derive(Debug, Default)]
pub struct ArgList {
    positional: Vec<String>,
    options: Vec<(String, Option<String>)>,
}

/// Options that take a value.
const VALUED: &[&str] = &["--level", "--expand", "-o", "--output", "--max-files"];

impl ArgList {
    pub fn parse(args: &[String]) -> anyhow::Result<Self> {
        let mut list = ArgList::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            if let Some((key, value)) = arg.split_once('=').filter(|(k, _)| k.starts_with('-')) {
                list.options.push((key.to_string(), Some(value.to_string())));
            } else if VALUED.contains(&arg.as_str()) {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("{} requires a value", arg))?;
                list.options.push((arg.clone(), Some(value.clone())));
            } else if arg.starts_with('-') && arg.len() > 1 {
                list.options.push((arg.clone(), None));
            } else {
                list.positional.push(arg.clone());
            }
        }
        Ok(list)
    }

    pub fn flag(&self, name: &str) -> bool {
        self.options.iter().any(|(k, _)| k == name)
    }

    pub fn value(&self, names: &[&str]) -> Option<&str> {
        self.options
            .iter()
            .rev()
            .find(|(k, _)| names.contains(&k.as_str()))
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn positional(&self, index: usize) -> Option<&str> {
        self.positional.get(index).map(String::as_str)
    }
}

/// Outcome of loading a file: either a graph, or violations already printed.
enum Loaded {
    Envelope(AnalysisEnvelope),
    Invalid,
}

/// Read and validate `path`. Parse and I/O failures are errors; schema
/// violations are printed and reported as `Loaded::Invalid`.
fn load(path: &Path, bare_graph: bool, json_output: bool) -> anyhow::Result<Loaded> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let parsed = if bare_graph {
        parse_graph(&text)
    } else {
        parse_any(&text)
    };

    match parsed {
        Ok(envelope) => Ok(Loaded::Envelope(envelope)),
        Err(LoadError::Parse(e)) => Err(anyhow!("{} is not valid JSON: {}", path.display(), e)),
        Err(LoadError::Invalid(report)) => {
            if json_output {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "valid": false,
                        "errors": report.violations,
                    }))?
                );
            } else {
                output::print_violations(path, &report);
            }
            Ok(Loaded::Invalid)
        }
    }
}

fn required_file(args: &ArgList, usage: &str) -> anyhow::Result<PathBuf> {
    args.positional(0)
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("Usage: {}", usage))
}

pub fn validate(raw: &[String]) -> anyhow::Result<i32> {
    let args = ArgList::parse(raw)?;
    let path = required_file(&args, "archgraph validate <file> [--graph] [--json]")?;
    let json_output = args.flag("--json");

    let envelope = match load(&path, args.flag("--graph"), json_output)? {
        Loaded::Envelope(e) => e,
        Loaded::Invalid => return Ok(1),
    };

    let issues = check_consistency(&envelope.architecture);
    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "valid": true,
                "consistency": issues,
            }))?
        );
    } else {
        output::print_valid(&path, &envelope, &GraphStats::compute(&envelope.architecture));
        output::print_issues(&issues);
    }
    Ok(0)
}

pub fn summary(raw: &[String]) -> anyhow::Result<i32> {
    let args = ArgList::parse(raw)?;
    let path = required_file(&args, "archgraph summary <file> [--json]")?;
    let json_output = args.flag("--json");

    let envelope = match load(&path, args.flag("--graph"), json_output)? {
        Loaded::Envelope(e) => e,
        Loaded::Invalid => return Ok(1),
    };

    let stats = GraphStats::compute(&envelope.architecture);
    let issues = check_consistency(&envelope.architecture);

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "name": envelope.architecture.name,
                "version": envelope.architecture.version,
                "stats": stats,
                "consistency": issues,
                "summary": envelope.summary,
                "insights": envelope.insights,
                "warnings": envelope.warnings,
            }))?
        );
    } else {
        output::print_summary(&envelope, &stats);
        output::print_issues(&issues);
    }
    Ok(0)
}

pub fn tree(raw: &[String]) -> anyhow::Result<i32> {
    let args = ArgList::parse(raw)?;
    let path = required_file(
        &args,
        "archgraph tree <file> [--level overview|service|module|code] [--expand id,id]",
    )?;

    let envelope = match load(&path, args.flag("--graph"), false)? {
        Loaded::Envelope(e) => e,
        Loaded::Invalid => return Ok(1),
    };
    let graph = &envelope.architecture;

    let mut view = ViewState::for_graph(graph);
    if let Some(level) = args.value(&["--level"]) {
        let level: DetailLevel = level.parse()?;
        view.set_detail_level(level);
    }
    if let Some(ids) = args.value(&["--expand"]) {
        for id in ids.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            view.expand(id);
        }
    }

    output::print_tree(graph, &view);
    Ok(0)
}

pub fn sample(raw: &[String]) -> anyhow::Result<i32> {
    let args = ArgList::parse(raw)?;
    let json = serde_json::to_string_pretty(&sample_envelope())?;

    match args.positional(0) {
        Some(out) => {
            write_output(Path::new(out), &json)?;
            println!("Wrote sample architecture to {}", out);
        }
        None => println!("{}", json),
    }
    Ok(0)
}

pub async fn analyze(raw: &[String]) -> anyhow::Result<i32> {
    let args = ArgList::parse(raw)?;
    let repo = required_file(&args, "archgraph analyze <repo> [-o out] [--max-files N]")?;

    let mut limits = ScanLimits::from_env();
    if let Some(n) = args.value(&["--max-files"]) {
        limits.max_files = n
            .parse()
            .with_context(|| format!("--max-files expects a number, got '{}'", n))?;
    }

    let snapshot = archgraph_scan::scan(&repo, &limits)?;

    let config = LlmConfig::load(&LlmConfig::default_path());
    let client = HttpModelClient::from_config(&config)?;
    let analyzer = Analyzer::new(client, config.max_attempts);

    let envelope = match analyzer.run(&snapshot).await {
        Ok(e) => e,
        Err(archgraph_core::Error::Model(msg)) => {
            eprintln!("Analysis failed: {}", msg);
            return Ok(1);
        }
        Err(e) => bail!(e),
    };

    let out = args
        .value(&["-o", "--output"])
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(format!("{}-architecture.json", snapshot.name)));
    write_output(&out, &serde_json::to_string_pretty(&envelope)?)?;
    info!("Wrote {}", out.display());

    output::print_summary(&envelope, &GraphStats::compute(&envelope.architecture));
    output::print_issues(&check_consistency(&envelope.architecture));
    Ok(0)
}

fn write_output(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_arg_list_parsing() {
        let args = ArgList::parse(&strings(&[
            "arch.json",
            "--level",
            "module",
            "--expand=a,b",
            "--json",
        ]))
        .unwrap();
        assert_eq!(args.positional(0), Some("arch.json"));
        assert_eq!(args.value(&["--level"]), Some("module"));
        assert_eq!(args.value(&["--expand"]), Some("a,b"));
        assert!(args.flag("--json"));
        assert!(!args.flag("--graph"));
    }

    #[test]
    fn test_arg_list_missing_value() {
        assert!(ArgList::parse(&strings(&["x", "-o"])).is_err());
    }

    #[test]
    fn test_validate_exit_codes() {
        let dir = tempfile::tempdir().unwrap();

        let good = dir.path().join("good.json");
        std::fs::write(&good, serde_json::to_string(&sample_envelope()).unwrap()).unwrap();
        assert_eq!(validate(&strings(&[good.to_str().unwrap()])).unwrap(), 0);

        let bad = dir.path().join("bad.json");
        std::fs::write(
            &bad,
            r#"{"architecture":{"name":"x","version":"1","nodes":[],"connections":[]},"summary":"","insights":[],"warnings":[]}"#,
        )
        .unwrap();
        assert_eq!(validate(&strings(&[bad.to_str().unwrap()])).unwrap(), 1);

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{").unwrap();
        assert!(validate(&strings(&[broken.to_str().unwrap()])).is_err());

        let missing = dir.path().join("missing.json");
        assert!(validate(&strings(&[missing.to_str().unwrap()])).is_err());
    }

    #[test]
    fn test_sample_writes_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out/sample.json");
        assert_eq!(sample(&strings(&[out.to_str().unwrap()])).unwrap(), 0);
        let text = std::fs::read_to_string(&out).unwrap();
        assert!(parse_any(&text).is_ok());
    }

    #[test]
    fn test_tree_rejects_unknown_level() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("s.json");
        std::fs::write(&file, serde_json::to_string(&sample_envelope()).unwrap()).unwrap();
        let path = file.to_str().unwrap();
        assert_eq!(tree(&strings(&[path, "--level", "code"])).unwrap(), 0);
        assert!(tree(&strings(&[path, "--level", "galaxy"])).is_err());
    }
}
