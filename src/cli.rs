use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// A one-way directory mirror.
///
/// dirmirror watches configured source folders and replicates every create,
/// modify, delete and move into paired target folders, preserving relative
/// paths.
#[derive(Parser, Debug)]
#[command(
    name = "dirmirror",
    version,
    about,
    long_about = None,
    propagate_version = true,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watch the configured folders and mirror changes until interrupted.
    ///
    /// On Ctrl-C every watch loop stops accepting new notifications, drains
    /// its already-queued events, and the process exits cleanly.
    Run {
        /// Path to the configuration file (.toml or .json).
        #[arg(short, long, default_value = "Config.json")]
        config: PathBuf,

        /// Append the audit log to this file instead of writing to stderr.
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Replay every watched tree into its mirror once, then exit.
    ///
    /// Use after inspecting the log for failed events: there is no
    /// automatic retry, so this is how a drifted mirror is brought back
    /// into line.
    Resync {
        /// Path to the configuration file (.toml or .json).
        #[arg(short, long, default_value = "Config.json")]
        config: PathBuf,

        /// Append the audit log to this file instead of writing to stderr.
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Validate the configuration and print the resolved folder pairs.
    Check {
        /// Path to the configuration file (.toml or .json).
        #[arg(short, long, default_value = "Config.json")]
        config: PathBuf,

        /// Output the resolved pairs as JSON instead of human-readable text.
        #[arg(long)]
        json: bool,
    },
}
