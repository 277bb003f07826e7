// JobTimeline - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading (CLI > config.toml > defaults)
// 3. Logging initialisation (debug mode support)
// 4. Running the pipeline and printing the report to stdout

use jobtimeline::app::pipeline;
use jobtimeline::core::timeline::InvalidTimestampPolicy;
use jobtimeline::core::report;
use jobtimeline::platform::config::{self, AppConfig};
use jobtimeline::util::{self, error::JobTimelineError};

use clap::Parser;
use std::path::PathBuf;

/// JobTimeline - chronological start/finish report for backup job logs.
///
/// Scans a directory of job logs, extracts timestamped events, and prints
/// one line per start/finish event with same-day synthetic full, chain
/// completion, and retention flags plus a first-Monday-of-month marker.
#[derive(Parser, Debug)]
#[command(name = "jobtimeline", version, about)]
struct Cli {
    /// Directory to scan (overrides [scan] root in config.toml).
    path: Option<PathBuf>,

    /// Config file to use instead of the per-user config.toml.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Regex matched against file names, anchored at the start.
    #[arg(short = 'n', long = "filename-pattern")]
    filename_pattern: Option<String>,

    /// Maximum directory recursion depth (1-128). Unlimited when unset.
    #[arg(long = "max-depth", value_parser = parse_max_depth)]
    max_depth: Option<usize>,

    /// Drop unparseable timestamps instead of failing the run.
    #[arg(long = "skip-invalid-timestamps")]
    skip_invalid_timestamps: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

impl Cli {
    /// Layer CLI overrides on top of the loaded config.
    fn apply(&self, config: &mut AppConfig) {
        if let Some(ref path) = self.path {
            config.root = Some(path.clone());
        }
        if let Some(ref pattern) = self.filename_pattern {
            config.discovery.filename_pattern = pattern.clone();
        }
        if let Some(depth) = self.max_depth {
            config.discovery.max_depth = Some(depth);
        }
        if self.skip_invalid_timestamps {
            config.timeline.on_invalid_timestamp = InvalidTimestampPolicy::Skip;
        }
    }
}

/// Same bounds as `[scan] max_depth` in config.toml.
fn parse_max_depth(s: &str) -> Result<usize, String> {
    let depth: usize = s.parse().map_err(|e: std::num::ParseIntError| e.to_string())?;
    if (1..=util::constants::ABSOLUTE_MAX_DEPTH).contains(&depth) {
        Ok(depth)
    } else {
        Err(format!(
            "must be between 1 and {}",
            util::constants::ABSOLUTE_MAX_DEPTH
        ))
    }
}

fn main() {
    let cli = Cli::parse();

    // Config first: it carries the log level.
    let loaded = match cli.config {
        Some(ref path) => config::load_config(path),
        None => config::load_default_config(),
    };
    let (mut app_config, config_warnings) = match loaded {
        Ok(c) => c,
        Err(e) => {
            util::logging::init(cli.debug, None);
            fail(&JobTimelineError::from(e));
        }
    };
    cli.apply(&mut app_config);

    util::logging::init(cli.debug, app_config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "JobTimeline starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    let outcome = match pipeline::run(&app_config) {
        Ok(o) => o,
        Err(e) => fail(&e),
    };

    let stdout = std::io::stdout();
    if let Err(e) = report::write_report(&outcome.rows, stdout.lock()) {
        fail(&JobTimelineError::Io {
            path: PathBuf::from("<stdout>"),
            operation: "report write",
            source: e,
        });
    }

    if !outcome.warnings.is_empty() {
        tracing::warn!(
            count = outcome.warnings.len(),
            "Report produced with warnings"
        );
    }
}

/// Report a fatal error and exit non-zero.
fn fail(e: &JobTimelineError) -> ! {
    tracing::error!(error = %e, "Run failed");
    eprintln!("Error: {e}");
    std::process::exit(1);
}
