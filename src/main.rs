//! Botsight main entry point
//!
//! This is the command-line interface for the Botsight crawler-readiness
//! auditor.

use anyhow::Context;
use botsight::config::{compute_config_hash, load_config_with_hash, validate, Config};
use botsight::report::{
    format_markdown_report, to_json, write_json_report, write_markdown_report, AuditReport,
};
use botsight::{AuditError, AuditOptions, Auditor};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Botsight: a crawler-readiness auditor
///
/// Botsight fetches a page under several search and AI crawler identities,
/// checks robots.txt and on-page directives, and scores how ready the page
/// is to be crawled and indexed.
#[derive(Parser, Debug)]
#[command(name = "botsight")]
#[command(version = "1.0.0")]
#[command(about = "A crawler-readiness auditor", long_about = None)]
struct Cli {
    /// Page to audit (https:// is assumed when no scheme is given)
    #[arg(value_name = "URL", required_unless_present = "dry_run")]
    url: Option<String>,

    /// Use the stricter text-to-markup threshold
    #[arg(long)]
    strict: bool,

    /// Path to TOML configuration file (built-in defaults otherwise)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Validate config and show the agents and weights without auditing
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Markdown,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = exit_code(&e);
            match e.downcast_ref::<AuditError>() {
                Some(audit) => eprintln!("error: {} ({})", audit.user_message(), audit),
                None => eprintln!("error: {:#}", e),
            }
            ExitCode::from(code)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let (config, config_hash) = load(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config, &config_hash);
        return Ok(());
    }

    let url = cli.url.as_deref().unwrap_or_default();
    let report = handle_audit(config, url, cli.strict).await?;

    match (&cli.output, cli.format) {
        (Some(path), Format::Json) => {
            write_json_report(&report, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            tracing::info!("Report written to {}", path.display());
        }
        (Some(path), Format::Markdown) => {
            write_markdown_report(&report, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            tracing::info!("Report written to {}", path.display());
        }
        (None, Format::Json) => println!("{}", to_json(&report)?),
        (None, Format::Markdown) => println!("{}", format_markdown_report(&report)),
    }

    Ok(())
}

/// Loads the configuration file, or falls back to the built-in defaults
fn load(cli: &Cli) -> anyhow::Result<(Config, String)> {
    match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .map_err(AuditError::from)
                .with_context(|| format!("Invalid configuration in {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok((config, hash))
        }
        None => {
            let config = Config::default();
            validate(&config).map_err(AuditError::from)?;
            let hash = compute_config_hash(&config);
            tracing::debug!("Using built-in configuration (hash: {})", hash);
            Ok((config, hash))
        }
    }
}

/// Maps a failure onto the process exit code
fn exit_code(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<AuditError>() {
        Some(AuditError::InvalidUrl(_)) => 2,
        Some(AuditError::NotFound { .. }) => 3,
        Some(AuditError::Unreachable { .. }) => 4,
        _ => 1,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries only the report.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("botsight=info,warn"),
            1 => EnvFilter::new("botsight=debug,info"),
            2 => EnvFilter::new("botsight=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows the agents
fn handle_dry_run(config: &Config, config_hash: &str) {
    println!("=== Botsight Dry Run ===\n");

    println!("Fetcher Configuration:");
    println!("  Timeout: {}s", config.fetcher.timeout_secs);
    println!("  Max redirects: {}", config.fetcher.max_redirects);
    println!("  User agent: {}", config.fetcher.default_user_agent);
    println!("  Robots token: {}", config.fetcher.default_robots_token);

    println!("\nScoring:");
    println!("  Text ratio threshold: {}", config.scoring.text_ratio_min);
    println!(
        "  Strict text ratio threshold: {}",
        config.scoring.strict_text_ratio_min
    );
    let weights = &config.scoring.category_weights;
    println!(
        "  Category weights: crawlability {}, discoverability {}, content {}, render {}, i18n {}",
        weights.crawlability, weights.discoverability, weights.content, weights.render, weights.i18n
    );

    let profiles = config.agent_profiles();
    println!("\nAgents ({}):", profiles.len());
    for profile in &profiles {
        println!(
            "  - {} [{}] token {} (total {})",
            profile.name,
            profile.key,
            profile.robots_token,
            profile.weights.total()
        );
        println!("    User-Agent: {}", profile.user_agent);
        let weights: Vec<String> = profile
            .weights
            .iter()
            .map(|(signal, points)| format!("{}={}", signal, points))
            .collect();
        println!("    Weights: {}", weights.join(", "));
    }

    println!("\n✓ Configuration is valid (hash: {})", config_hash);
}

/// Handles the main audit operation
async fn handle_audit(config: Config, url: &str, strict: bool) -> anyhow::Result<AuditReport> {
    tracing::info!("Auditing with {} agents", config.agent_profiles().len());

    let auditor = Auditor::new(config)?;
    match auditor.run(url, AuditOptions { strict }).await {
        Ok(report) => {
            tracing::info!("Audit completed successfully");
            Ok(report)
        }
        Err(e) => {
            tracing::error!("Audit failed: {}", e);
            Err(e.into())
        }
    }
}
