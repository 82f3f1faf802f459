//! songreq - song requests from chat for a running foobar2000.
//!
//! Viewers search the player's playlist with free text; a match is queued
//! in the player, and per-song and per-user cooldowns keep the queue from
//! being flooded. The chat side is driven from the console.

pub mod catalogue;
pub mod chat;
pub mod cli;
pub mod config;
pub mod cooldown;
pub mod curation;
pub mod error;
pub mod matcher;
pub mod player;
pub mod request;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging (stderr, so replies on stdout stay clean)
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("songreq=info".parse()?))
        .init();

    cli::run_command(&args)
}
