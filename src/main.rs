mod actions;
mod cli;
mod config;
mod engine;
mod mapper;
mod resync;
mod watcher;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, log_file } => {
            init_logging(log_file.as_deref())?;
            run(&config)
        }
        Commands::Resync { config, log_file } => {
            init_logging(log_file.as_deref())?;
            run_resync(&config)
        }
        Commands::Check { config, json } => check(&config, json),
    }
}

/// Install the global subscriber: stderr by default, or an append-only file
/// when `--log-file` is given. `RUST_LOG` overrides the default `info`
/// level.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}

/// Start one watch loop per configured pair and block until Ctrl-C, then
/// drain every loop before exiting.
fn run(config_path: &Path) -> Result<()> {
    let pairs = config::load_pairs(config_path)
        .with_context(|| format!("loading configuration from {}", config_path.display()))?;

    let mut handles = Vec::with_capacity(pairs.len());
    for pair in pairs {
        info!(
            watch_root = %pair.watch_root.display(),
            mirror_root = %pair.mirror_root.display(),
            "watching",
        );
        let handle = watcher::start_pair(pair).context("starting watch loop")?;
        handles.push(handle);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building signal runtime")?;
    runtime
        .block_on(tokio::signal::ctrl_c())
        .context("waiting for interrupt")?;

    info!("interrupt received, draining in-flight events");
    for handle in handles {
        handle.drain();
    }
    info!("all watch loops stopped");

    Ok(())
}

fn run_resync(config_path: &Path) -> Result<()> {
    let pairs = config::load_pairs(config_path)
        .with_context(|| format!("loading configuration from {}", config_path.display()))?;

    let mut total = resync::ResyncReport::default();
    for pair in &pairs {
        let report = resync::resync_pair(pair);
        total.files_copied += report.files_copied;
        total.dirs_created += report.dirs_created;
        total.failures += report.failures;
    }

    println!(
        "Resynced {} pair(s): {} file(s) copied, {} dir(s) created, {} failure(s).",
        pairs.len(),
        total.files_copied,
        total.dirs_created,
        total.failures
    );

    Ok(())
}

fn check(config_path: &Path, json: bool) -> Result<()> {
    let pairs = config::load_pairs(config_path)
        .with_context(|| format!("loading configuration from {}", config_path.display()))?;

    if json {
        let entries: Vec<serde_json::Value> = pairs
            .iter()
            .map(|pair| {
                serde_json::json!({
                    "watch_root": pair.watch_root,
                    "mirror_root": pair.mirror_root,
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::json!({ "pair_count": pairs.len(), "pairs": entries })
        );
    } else {
        println!("Configuration OK: {} pair(s).", pairs.len());
        for pair in &pairs {
            println!(
                "  {} -> {}",
                pair.watch_root.display(),
                pair.mirror_root.display()
            );
        }
    }

    Ok(())
}
