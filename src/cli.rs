//! CLI interface for the beacon bridge.
//!
//! Each subcommand is non-interactive: arguments in, structured output out.
//! Beacons go to stdout (or `--out`) as JSONL; human-readable summaries and
//! logs go to stderr.

mod format;
mod replay;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;

use format::format_catalog;
use replay::cmd_replay;

/// Beacon bridge: derive ATS beacons from simulator telemetry.
#[derive(Debug, Parser)]
#[command(name = "beacon-bridge", after_long_help = USAGE_HELP)]
pub struct Cli {
    /// Config file. Defaults to `~/.beacon-bridge/config.toml` when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

const USAGE_HELP: &str = r#"Replaying a recorded trace:
  beacon-bridge replay run.jsonl --out beacons.jsonl
  RUST_LOG=beacon_bridge=debug beacon-bridge replay run.jsonl

Inspecting the aspect table sent at the start of every run:
  beacon-bridge catalog"#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Replay a recorded trace through the bridge.
    ///
    /// Frames are gated exactly as in a live session: run boundaries reset
    /// the engine, and frames outside driving or with a stalled simulation
    /// are skipped. Beacons are written as JSONL, one per line.
    Replay {
        /// Trace file: one frame per line, JSONL.
        trace: PathBuf,

        /// Write beacons to this file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print the signal aspect catalog.
    Catalog,
}

/// Run the parsed CLI, returning an error message on failure.
pub fn run(cli: Cli, config: &Config) -> Result<(), String> {
    match cli.command {
        Command::Replay { trace, out } => cmd_replay(config, &trace, out.as_deref()),
        Command::Catalog => {
            print!("{}", format_catalog());
            Ok(())
        }
    }
}
