//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `console`: chat driver reading `user: message` lines from stdin
//! - `catalogue`: playlist listing and query preview
//! - `config`: writing and showing the config file

mod catalogue;
mod config;
mod console;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Runtime;

pub use catalogue::{cmd_catalogue, cmd_search};
pub use config::{cmd_config_init, cmd_config_show};
pub use console::cmd_console;

use crate::catalogue::Catalogue;
use crate::config::Config;
use crate::cooldown::CooldownLedger;
use crate::curation::FileUnmatchedLog;
use crate::error::{Error, ResultExt};
use crate::player::{FoobarClient, PlaylistSource};
use crate::request::RequestService;

/// songreq CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (defaults to the OS config directory)
    #[arg(long, global = true, env = "SONGREQ_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Read chat lines ("user: !sr query") from stdin and answer them
    Console {
        /// Sender for lines without a "user:" part
        #[arg(long, default_value = "viewer")]
        user: String,
    },
    /// List the player's playlist with catalogue indices
    Catalogue,
    /// Show which tracks a query matches, without queueing anything
    Search {
        /// Search terms
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Config {
            action: ConfigAction::Init { force },
        } => cmd_config_init(cli.config.as_deref(), *force),
        Commands::Config {
            action: ConfigAction::Show,
        } => {
            let config = load_config(cli.config.as_deref())?;
            cmd_config_show(&config)
        }
        Commands::Console { user } => {
            let rt = Runtime::new()?;
            let config = load_config(cli.config.as_deref())?;
            cmd_console(&rt, &config, user)
        }
        Commands::Catalogue => {
            let rt = Runtime::new()?;
            let config = load_config(cli.config.as_deref())?;
            cmd_catalogue(&rt, &config)
        }
        Commands::Search { query } => {
            let rt = Runtime::new()?;
            let config = load_config(cli.config.as_deref())?;
            cmd_search(&rt, &config, &query.join(" "))
        }
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Load config from an explicit path (strict) or the default location.
pub(crate) fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Ok(crate::config::load_from(path)?),
        None => Ok(crate::config::load()),
    }
}

/// Build the player client described by `config`.
pub(crate) fn player_client(config: &Config) -> crate::error::Result<FoobarClient> {
    Ok(FoobarClient::new(
        &config.player.base_url,
        &config.player.template,
        config.player_timeout(),
    )?)
}

/// Fetch the playlist and index it.
pub(crate) async fn load_catalogue(source: &dyn PlaylistSource) -> crate::error::Result<Catalogue> {
    let labels = source
        .load_catalogue()
        .await
        .with_context("loading playlist")?;
    if labels.is_empty() {
        return Err(Error::EmptyCatalogue);
    }
    Ok(Catalogue::from_labels(labels))
}

/// Load the catalogue from the player and wire up a request service.
pub(crate) async fn build_service(config: &Config) -> crate::error::Result<RequestService> {
    let client = Arc::new(player_client(config)?);
    let catalogue = load_catalogue(client.as_ref()).await?;
    tracing::info!(tracks = catalogue.len(), "Catalogue ready");

    Ok(RequestService::new(
        catalogue,
        CooldownLedger::new(config.cooldown_policy()),
        client,
        Arc::new(FileUnmatchedLog::new(&config.curation.unmatched_log)),
    ))
}
