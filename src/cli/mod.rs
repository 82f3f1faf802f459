//! Command-line interface for songreq.
//!
//! Provides the console chat driver plus catalogue inspection and config
//! helpers.

mod commands;

pub use commands::{Cli, Commands, run_command};
