use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use linkrank_core::defaults::{DEFAULT_GROWTH_RATE, DEFAULT_LOG_LEVEL};
use linkrank_core::ingest::load_graph;
use linkrank_core::report::{generate_check_report, generate_rank_report, save_report};
use linkrank_core::{RankOptions, ReportFormat, analyze, rank};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};

/// Settings shared by both modes
#[derive(Debug, Clone)]
pub struct CommonOptions {
    pub network_file: PathBuf,
    pub verbosity: u8,
    pub growth_rate: usize,
    pub format: ReportFormat,
    pub output: Option<PathBuf>,
    pub show_progress: bool,
}

impl CommonOptions {
    pub fn new(network_file: impl Into<PathBuf>) -> Self {
        Self {
            network_file: network_file.into(),
            verbosity: DEFAULT_LOG_LEVEL,
            growth_rate: DEFAULT_GROWTH_RATE,
            format: ReportFormat::Text,
            output: None,
            show_progress: false,
        }
    }

    /// Reads the shared options; `mode` holds the mode's own matches, where
    /// clap has propagated the global arguments.
    pub fn from_matches(top: &ArgMatches, mode: &ArgMatches) -> Result<Self> {
        let network_file = top
            .get_one::<PathBuf>("NETWORK_FILE")
            .cloned()
            .context("A network file must be provided")?;

        let format = mode
            .get_one::<String>("format")
            .and_then(|f| ReportFormat::from_str(f))
            .unwrap_or(ReportFormat::Text);

        Ok(Self {
            network_file,
            verbosity: verbosity(mode),
            growth_rate: mode
                .get_one::<usize>("growth-rate")
                .copied()
                .unwrap_or(DEFAULT_GROWTH_RATE),
            format,
            output: mode.get_one::<PathBuf>("output").cloned(),
            show_progress: mode.get_flag("progress"),
        })
    }
}

/// `-l` value of the chosen mode, or the default
pub fn verbosity(mode: &ArgMatches) -> u8 {
    mode.get_one::<u8>("log-level")
        .copied()
        .unwrap_or(DEFAULT_LOG_LEVEL)
}

/// Maps the numeric `-l` level onto a tracing filter
pub fn level_filter(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::OFF,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Installs the stderr log subscriber for this process
pub fn init_tracing(verbosity: u8) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level_filter(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Builds the power iteration parameters from `run` arguments
pub fn rank_options(decay: f64, iterations: usize, epsilon: Option<f64>) -> Result<RankOptions> {
    let options = RankOptions::new(decay, iterations)?;
    match epsilon {
        Some(epsilon) => Ok(options.with_tolerance(epsilon)?),
        None => Ok(options),
    }
}

/// Reads the network and renders its leak/sink report
pub fn run_check(options: &CommonOptions) -> Result<String> {
    let graph = load_graph(
        &options.network_file,
        options.growth_rate,
        options.show_progress,
    )?;

    info!("Finding rank leaks and rank sinks...");
    let analysis = analyze(&graph);

    let report = generate_check_report(&graph, &analysis, options.format)
        .context("Failed to render check report")?;
    Ok(report)
}

/// Reads the network, computes PageRank and renders the rank listing
pub fn run_rank(options: &CommonOptions, rank_options: &RankOptions) -> Result<String> {
    let graph = load_graph(
        &options.network_file,
        options.growth_rate,
        options.show_progress,
    )?;

    info!("Finding PageRanks...");
    let ranks = rank::compute(graph, rank_options)?;
    info!(
        "PageRank computation complete after {} iteration(s)",
        ranks.iterations()
    );
    debug!("Sigma PageRanks = {}", ranks.total());

    let report = generate_rank_report(&ranks, options.format)
        .context("Failed to render PageRank report")?;
    Ok(report)
}

pub fn handle_check(top: &ArgMatches, mode: &ArgMatches) {
    let result = CommonOptions::from_matches(top, mode)
        .and_then(|options| run_check(&options).map(|report| (options, report)));

    match result {
        Ok((options, report)) => emit_report(&report, &options),
        Err(e) => fail(e),
    }
}

pub fn handle_run(top: &ArgMatches, mode: &ArgMatches) {
    let result = CommonOptions::from_matches(top, mode).and_then(|options| {
        let decay = *mode.get_one::<f64>("DECAY").context("A decay factor must be provided")?;
        let iterations = *mode
            .get_one::<usize>("ITERATIONS")
            .context("A number of iterations must be provided")?;
        let epsilon = mode.get_one::<f64>("epsilon").copied();

        // validate before reading a potentially large network
        let params = rank_options(decay, iterations, epsilon)?;
        let report = run_rank(&options, &params)?;
        Ok((options, report))
    });

    match result {
        Ok((options, report)) => emit_report(&report, &options),
        Err(e) => fail(e),
    }
}

fn emit_report(report: &str, options: &CommonOptions) {
    match options.output {
        Some(ref path) => match save_report(report, path) {
            Ok(()) => {
                if options.verbosity > 0 {
                    eprintln!(
                        "{} Report saved to {}",
                        "✓".green().bold(),
                        path.display().to_string().bright_white()
                    );
                }
            }
            Err(e) => fail(anyhow::Error::new(e).context(format!(
                "Failed to write report to {}",
                path.display()
            ))),
        },
        None => print!("{}", report),
    }
}

fn fail(error: anyhow::Error) -> ! {
    eprintln!("{} {:#}", "✗".red().bold(), error);
    std::process::exit(1);
}
