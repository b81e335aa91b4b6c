// Crew client CLI

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crew::client::{CrewClient, CrewConfig, Wizard};
use crew::config::crew_dir;
use crew::telemetry::init_tracing;

/// Request timeout for client calls
const CLIENT_TIMEOUT_SECS: u64 = 10;

#[derive(Parser, Debug)]
#[command(version, about = "Join and manage a private crew", long_about = None)]
struct Cli {
    /// Crew directory holding config.json (defaults to $CREW_HOME or ~/.crew)
    #[arg(long, global = true)]
    crew_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Capture the server URL and API key (default)
    Setup {
        /// Ask again even if a complete config exists
        #[arg(long)]
        reconfigure: bool,
    },
    /// Check that the configured server is up
    Status,
    /// Register a user with the configured server
    Register {
        /// Name to register
        name: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());
    init_tracing(&log_level, "text").map_err(anyhow::Error::msg)?;

    let dir = match cli.crew_dir {
        Some(dir) => dir,
        None => crew_dir()?,
    };
    let config_path = CrewConfig::path_in(&dir);

    match cli.command.unwrap_or(Command::Setup { reconfigure: false }) {
        Command::Setup { reconfigure } => setup(&config_path, reconfigure).await,
        Command::Status => {
            let client = client_from(&config_path)?;
            client.health().await?;
            println!("Crew server is up");
            Ok(())
        }
        Command::Register { name } => {
            let client = client_from(&config_path)?;
            let confirmation = client.register(&name).await?;
            println!("{}", confirmation);
            Ok(())
        }
    }
}

/// Build a client from the saved config
fn client_from(config_path: &Path) -> anyhow::Result<CrewClient> {
    let config = CrewConfig::load(config_path)?
        .filter(CrewConfig::is_complete)
        .context("No crew configured; run `crew setup` first")?;
    Ok(CrewClient::new(&config, CLIENT_TIMEOUT_SECS)?)
}

/// Run the setup wizard on stdin/stdout and save the result
async fn setup(config_path: &Path, reconfigure: bool) -> anyhow::Result<()> {
    let existing = CrewConfig::load(config_path)?;

    let mut wizard = match &existing {
        Some(config) if config.is_complete() && !reconfigure => Wizard::resume(config),
        Some(config) => Wizard::with_defaults(config),
        None => Wizard::new(),
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();

    while !wizard.is_done() {
        writeln!(stdout, "{}", wizard.prompt())?;
        stdout.flush()?;

        let Some(line) = lines.next_line().await? else {
            bail!("Setup aborted");
        };
        wizard.submit(line.trim_end_matches('\r'));
    }

    let config = wizard.config().context("Wizard finished without a config")?;
    if existing.as_ref() != Some(&config) {
        config.save(config_path)?;
        debug!(path = ?config_path, "Saved crew config");
    }

    writeln!(stdout, "{}", wizard.prompt())?;

    match CrewClient::new(&config, CLIENT_TIMEOUT_SECS) {
        Ok(client) => {
            if let Err(e) = client.health().await {
                warn!(error = %e, "Crew server is not reachable");
            }
        }
        Err(e) => warn!(error = %e, "Saved config has an unusable server URL"),
    }

    Ok(())
}
