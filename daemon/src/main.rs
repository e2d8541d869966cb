//! Surety daemon: operator entry point for engine snapshots.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use surety_app::{AppConfig, AppSnapshot};
use surety_types::Timestamp;
use surety_utils::LogFormat;

#[derive(Parser)]
#[command(name = "surety-daemon", about = "Flight surety engine operator tool")]
struct Cli {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(long, env = "SURETY_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter; overrides the config file.
    #[arg(long, env = "SURETY_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json"; overrides the config file.
    #[arg(long, env = "SURETY_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Build genesis state from the configuration and write it to a file.
    Init {
        /// Snapshot file to create.
        #[arg(long)]
        out: PathBuf,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Print a JSON summary of a snapshot file.
    Inspect {
        #[arg(long)]
        state: PathBuf,
    },
    /// Print the effective configuration as TOML.
    ShowConfig,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::default(),
    };

    let format = cli.log_format.unwrap_or(config.log_format);
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    surety_utils::init_logging(format, level)?;

    match cli.command {
        Command::Init { out, force } => init(&config, &out, force),
        Command::Inspect { state } => inspect(&state),
        Command::ShowConfig => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

fn init(config: &AppConfig, out: &Path, force: bool) -> anyhow::Result<()> {
    if out.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", out.display());
    }
    let snapshot = AppSnapshot::genesis(config, Timestamp::now())?;
    let bytes = snapshot.to_bytes()?;
    std::fs::write(out, &bytes).with_context(|| format!("writing {}", out.display()))?;
    tracing::info!(
        path = %out.display(),
        bytes = bytes.len(),
        owner = %config.owner,
        airline = %config.genesis_airline,
        "genesis snapshot written"
    );
    Ok(())
}

fn inspect(state: &Path) -> anyhow::Result<()> {
    let bytes = std::fs::read(state).with_context(|| format!("reading {}", state.display()))?;
    let snapshot = AppSnapshot::from_bytes(&bytes)
        .with_context(|| format!("decoding {}", state.display()))?;
    println!("{}", serde_json::to_string_pretty(&snapshot.summary())?);
    Ok(())
}
