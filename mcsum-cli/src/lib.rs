#![warn(missing_docs)]
//! mcsum CLI Library
//!
//! Command-line driver: reads a Monte Carlo export, streams it through the aggregation core,
//! and writes one table per statistic.
//!
//! # Example
//!
//! ```ignore
//! fn main() -> anyhow::Result<()> {
//!     mcsum_cli::run()
//! }
//! ```

mod config;
mod formatting;
mod metadata;
mod pipeline;

pub use config::*;
pub use formatting::format_human_summary;
pub use metadata::build_report_meta;
pub use pipeline::{AggregateOptions, Aggregator, PipelineError, Summary, aggregate_reader};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use mcsum_report::{OutputFormat, build_tables, write_report};
use mcsum_stats::TrackingMode;
use rayon::ThreadPoolBuilder;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;

/// Export file read when none is given
pub const DEFAULT_INPUT: &str = "results.tab";

/// mcsum CLI arguments
#[derive(Parser, Debug)]
#[command(name = "mcsum")]
#[command(
    author,
    version,
    about = "mcsum - single-pass summary statistics for Monte Carlo exports"
)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Optional subcommand (Stats, Means, Init); defaults to Stats
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Arguments for the default `stats` run
    #[command(flatten)]
    pub run: RunArgs,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Arguments shared by the aggregation subcommands
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Export file to summarize (defaults to results.tab)
    pub input: Option<PathBuf>,

    /// Directory for the output tables
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Output format: tab, csv, json
    #[arg(long)]
    pub format: Option<String>,

    /// Configuration file (otherwise mcsum.toml is discovered)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Leave the final time step's quantiles uncorrected (legacy behavior)
    #[arg(long)]
    pub no_correct_last_step: bool,

    /// Blend raw quantile estimates without clamping to the observed range (legacy numbers)
    #[arg(long)]
    pub no_clamp: bool,

    /// Number of threads for finalization
    /// 0 = use all available cores (default), 1 = single-threaded
    #[arg(long, short = 'j', default_value = "0")]
    pub threads: usize,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Mean, min, max, and corrected quantiles (default)
    Stats(RunArgs),
    /// Running means only, written as `average`
    Means(RunArgs),
    /// Print or write a default mcsum.toml
    Init {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Result of a completed run
#[derive(Debug)]
pub struct RunOutput {
    /// Finalized aggregation
    pub summary: Summary,
    /// Files written
    pub written: Vec<PathBuf>,
}

/// Run the mcsum CLI with the process arguments.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the mcsum CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    // Initialize logging; stdout stays free for the summary and `init` output
    let filter = if cli.verbose { "mcsum=debug" } else { "mcsum=info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match cli.command {
        Some(Commands::Init { output, force }) => init_config(output.as_deref(), force),
        Some(Commands::Stats(args)) => run_and_print(&args, TrackingMode::Full),
        Some(Commands::Means(args)) => run_and_print(&args, TrackingMode::MeanOnly),
        None => run_and_print(&cli.run, TrackingMode::Full),
    }
}

fn run_and_print(args: &RunArgs, mode: TrackingMode) -> anyhow::Result<()> {
    let output = execute(args, mode)?;
    println!("{}", format_human_summary(&output.summary, &output.written));
    Ok(())
}

/// Build the effective configuration by layering: mcsum.toml → CLI overrides.
pub fn resolve_config(args: &RunArgs) -> anyhow::Result<McsumConfig> {
    let mut config = match &args.config {
        Some(path) => McsumConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => McsumConfig::discover().unwrap_or_default(),
    };

    if let Some(dir) = &args.output_dir {
        config.output.directory = dir.display().to_string();
    }
    if let Some(format) = &args.format {
        config.output.format = format.clone();
    }
    if args.no_correct_last_step {
        config.stats.correct_last_step = false;
    }
    if args.no_clamp {
        config.stats.clamp_to_range = false;
    }
    Ok(config)
}

/// Execute one aggregation run as described by `args`
pub fn execute(args: &RunArgs, mode: TrackingMode) -> anyhow::Result<RunOutput> {
    let config = resolve_config(args)?;

    // Configure Rayon thread pool for finalization
    if args.threads > 0 {
        ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()
            .ok();
    }

    let input = args
        .input
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));
    summarize_file(&input, &config, mode)
}

/// Aggregate `input` with `config` and write the tables
pub fn summarize_file(
    input: &Path,
    config: &McsumConfig,
    mode: TrackingMode,
) -> anyhow::Result<RunOutput> {
    let format: OutputFormat = config
        .output
        .format
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let finalize = config.finalize_options();
    let options = AggregateOptions {
        targets: config.quantile_targets()?,
        mode,
        skip_variables: config.input.skip_variables.clone(),
        progress_interval: config.stats.progress_interval,
        finalize,
        header_sentinel: config.input.header_sentinel.clone(),
    };

    let file =
        File::open(input).with_context(|| format!("failed to open {}", input.display()))?;
    info!(input = %input.display(), "summarizing export");

    let summary = aggregate_reader(BufReader::new(file), config.decoder()?, options)
        .with_context(|| format!("failed to summarize {}", input.display()))?;

    let tables = build_tables(&summary.store)?;
    let meta = build_report_meta(&summary, Some(input), finalize);
    let written = write_report(
        Path::new(&config.output.directory),
        format,
        &config.input.header_sentinel,
        &summary.time_axis,
        &tables,
        meta,
    )?;

    Ok(RunOutput { summary, written })
}

fn init_config(output: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let content = McsumConfig::default_toml();
    match output {
        Some(path) => {
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            std::fs::write(path, content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "wrote default configuration");
        }
        None => print!("{}", content),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_to_stats() {
        let cli = Cli::parse_from(["mcsum"]);
        assert!(cli.command.is_none());
        assert!(cli.run.input.is_none());
        assert_eq!(cli.run.threads, 0);
    }

    #[test]
    fn test_cli_top_level_input_and_flags() {
        let cli = Cli::parse_from([
            "mcsum",
            "export.tab",
            "-o",
            "out",
            "--format",
            "csv",
            "--no-correct-last-step",
        ]);
        assert_eq!(cli.run.input, Some(PathBuf::from("export.tab")));
        assert_eq!(cli.run.output_dir, Some(PathBuf::from("out")));
        assert_eq!(cli.run.format.as_deref(), Some("csv"));
        assert!(cli.run.no_correct_last_step);
    }

    #[test]
    fn test_cli_means_subcommand() {
        let cli = Cli::parse_from(["mcsum", "-v", "means", "results.tab", "-j", "2"]);
        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Means(args)) => {
                assert_eq!(args.input, Some(PathBuf::from("results.tab")));
                assert_eq!(args.threads, 2);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_init_subcommand() {
        let cli = Cli::parse_from(["mcsum", "init", "--output", "mcsum.toml"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Init { output: Some(_), force: false })
        ));
    }

    #[test]
    fn test_cli_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("custom.toml");
        std::fs::write(&config_path, "[output]\nformat = \"json\"\ndirectory = \"a\"\n").unwrap();

        let args = RunArgs {
            config: Some(config_path),
            output_dir: Some(PathBuf::from("b")),
            no_correct_last_step: true,
            no_clamp: true,
            ..RunArgs::default()
        };
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.output.format, "json");
        assert_eq!(config.output.directory, "b");
        assert!(!config.stats.correct_last_step);
        assert!(!config.stats.clamp_to_range);
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mcsum.toml");
        init_config(Some(&path), false).unwrap();
        assert!(init_config(Some(&path), false).is_err());
        init_config(Some(&path), true).unwrap();

        let config = McsumConfig::load(&path).unwrap();
        assert_eq!(config, McsumConfig::default());
    }
}
