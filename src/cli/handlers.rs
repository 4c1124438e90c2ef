//! Command handlers
//!
//! Each handler returns a process exit code; errors are printed to stderr
//! rather than propagated, so `main` stays a thin dispatcher.

use crate::cli::commands::{OutputFormatArg, SynthesizeArgs};
use crate::config::SynthesisOptions;
use crate::graph::{synthesize_workspace, ReportCache};
use crate::host::SnapshotHost;
use crate::output::schema::Report;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{error, info};

/// Handles `gradlegraph synthesize`.
pub fn handle_synthesize(args: &SynthesizeArgs) -> i32 {
    match run_synthesize(args) {
        Ok(()) => 0,
        Err(err) => {
            error!("synthesis failed: {:#}", err);
            eprintln!("Error: {:#}", err);
            1
        }
    }
}

fn run_synthesize(args: &SynthesizeArgs) -> Result<()> {
    let host = SnapshotHost::from_file(&args.snapshot_path)?;
    let options = load_options(args.options.as_deref())?;
    let cache = ReportCache::new();

    let report = synthesize_workspace(&host, &options, &cache)?;
    let rendered = render(&report, args.format)?;

    match &args.output {
        Some(path) => write_if_changed(path, &rendered)?,
        None => println!("{rendered}"),
    }
    Ok(())
}

fn load_options(path: Option<&Path>) -> Result<SynthesisOptions> {
    let Some(path) = path else {
        return Ok(SynthesisOptions::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read options file {}", path.display()))?;
    let options: SynthesisOptions = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse options file {}", path.display()))?;
    Ok(options.normalized())
}

fn render(report: &Report, format: OutputFormatArg) -> Result<String> {
    Ok(match format {
        OutputFormatArg::Json => {
            serde_json::to_string(report).context("failed to serialize report")?
        }
        OutputFormatArg::Pretty => {
            serde_json::to_string_pretty(report).context("failed to serialize report")?
        }
        OutputFormatArg::Summary => report.to_string(),
    })
}

/// Writes the report file only when its content changed, so downstream
/// file-watchers and build caches are not invalidated by identical rewrites.
fn write_if_changed(path: &Path, content: &str) -> Result<()> {
    if let Ok(existing) = std::fs::read_to_string(path) {
        if existing == content {
            info!(path = %path.display(), "report unchanged, not rewriting");
            return Ok(());
        }
    }
    std::fs::write(path, content)
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    info!(path = %path.display(), "report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_options_defaults_without_file() {
        let options = load_options(None).unwrap();
        assert_eq!(options, SynthesisOptions::default());
    }

    #[test]
    fn test_load_options_normalizes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.json");
        fs::write(&path, r#"{"ciTargetName": "", "testTargetName": "verify"}"#).unwrap();

        let options = load_options(Some(&path)).unwrap();
        assert!(options.ci_target_name.is_none());
        assert_eq!(options.test_target_name, "verify");
    }

    #[test]
    fn test_write_if_changed_skips_identical_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        write_if_changed(&path, "{}").unwrap();
        let first_mtime = fs::metadata(&path).unwrap().modified().unwrap();

        write_if_changed(&path, "{}").unwrap();
        let second_mtime = fs::metadata(&path).unwrap().modified().unwrap();
        assert_eq!(first_mtime, second_mtime);

        write_if_changed(&path, r#"{"nodes":{}}"#).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"nodes":{}}"#);
    }

    #[test]
    fn test_render_summary_mentions_counts() {
        let summary = render(&Report::default(), OutputFormatArg::Summary).unwrap();
        assert!(summary.contains("Projects: 0"));
    }
}
