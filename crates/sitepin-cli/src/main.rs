//! # sitepin CLI entry point
//!
//! Loads configuration from the environment, runs one deployment, and maps
//! the outcome to the process exit status: 0 on success (or when there is
//! nothing to deploy), 1 on any error.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sitepin_cli::{DeployOutcome, Pipeline};
use sitepin_client::{DeployConfig, DnsProviderKind};

/// Pin a built static site to IPFS and point its DNSLink at the new CID.
///
/// Credentials and provider identifiers are read from the environment
/// (`PINATA_API_KEY`, `PINATA_API_SECRET`, and either the `CLOUDFLARE_*` or
/// the `NETLIFY_*` variables), falling back to a `.env` file in the working
/// directory or one of its parents.
#[derive(Parser, Debug)]
#[command(name = "sitepin", version, about, long_about = None)]
struct Cli {
    /// Directory holding the built site.
    #[arg(long, default_value = "./dist")]
    dist: PathBuf,

    /// DNS provider (`cloudflare` or `netlify`). Defaults to
    /// `SITEPIN_DNS_PROVIDER`, then `cloudflare`.
    #[arg(long)]
    provider: Option<DnsProviderKind>,

    /// Enable verbose output. Repeat for more verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v when set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("info"),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();

    match run(&cli).await {
        Ok(DeployOutcome::Published { cid, files }) => {
            tracing::info!(cid = %cid, files, "published");
            ExitCode::SUCCESS
        }
        Ok(DeployOutcome::NothingToDeploy) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            // Printed unconditionally so the cause survives RUST_LOG=off.
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<DeployOutcome> {
    // Variables already set in the process environment take precedence.
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => return Err(e).context("failed to read .env"),
    }

    let config = DeployConfig::from_env(cli.provider)
        .map_err(sitepin_cli::DeployError::Config)?;
    tracing::debug!(provider = %config.dns.kind(), dist = %cli.dist.display(), "configuration loaded");

    let pipeline = Pipeline::from_config(&config)?;
    let outcome = pipeline
        .run(&cli.dist)
        .await
        .with_context(|| format!("deployment of {} failed", cli.dist.display()))?;
    Ok(outcome)
}
