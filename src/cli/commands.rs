use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Project graph ingestion for Gradle workspaces
#[derive(Parser, Debug)]
#[command(
    name = "gradlegraph",
    about = "Project graph ingestion for Gradle workspaces",
    version,
    author,
    long_about = "gradlegraph converts a Gradle workspace's introspection snapshot into a \
                  normalized project graph report: per-project targets, target groups, \
                  inter-project dependency edges, and resolved external dependency nodes, \
                  ready to be merged into a monorepo orchestrator's project graph."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Increase verbosity")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Synthesize a project graph report from a workspace snapshot",
        long_about = "Reads a workspace introspection snapshot (JSON, produced by the Gradle \
                      init script) and synthesizes the project graph report.\n\n\
                      Examples:\n  \
                      gradlegraph synthesize snapshot.json\n  \
                      gradlegraph synthesize snapshot.json -o report.json\n  \
                      gradlegraph synthesize snapshot.json --options options.json --format summary"
    )]
    Synthesize(SynthesizeArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct SynthesizeArgs {
    #[arg(value_name = "SNAPSHOT", help = "Path to the workspace introspection snapshot (JSON)")]
    pub snapshot_path: PathBuf,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write the report to this file instead of stdout; the file is only rewritten when the report changed"
    )]
    pub output: Option<PathBuf>,

    #[arg(long, value_name = "FILE", help = "Synthesis options (JSON)")]
    pub options: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "json",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    /// Compact JSON (machine-readable)
    Json,
    /// Pretty-printed JSON
    Pretty,
    /// Human-readable summary
    Summary,
}
