//! tdnet - fetch a weather report and icon without blocking the main thread.
//!
//! # Architecture
//!
//! ```text
//! stdin pump ──Line──▶ main thread (App) ──submit──▶ runtime workers
//!                          ▲                               │
//!                          └──────── DeliveryQueue ◀───────┘
//! ```
//!
//! The main thread owns the [`App`] and is the only place display state
//! changes. Each command starts a fetch; the loop then waits on whichever
//! comes first: the next input line or the next completed fetch.

mod input;
mod render;

use std::{
    fs::{self, OpenOptions},
    path::PathBuf,
    sync::Mutex,
};

use anyhow::{Context, Result};
use tokio::runtime::Handle;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use tdnet_config::{ConfigError, TdnetConfig};
use tdnet_engine::{App, Collaborators, FetchError, Target};

use input::{Command, InputMsg, StdinPump};

fn init_tracing(default_filter: Option<&str>) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter.unwrap_or("info")))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // Without a log file, stay silent rather than interleave logs with output.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new().create(true).append(true).open(&candidate) {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.tdnet/logs/tdnet.log
    if let Some(config_path) = TdnetConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("tdnet.log"));
    }

    // Fallback: ./.tdnet/logs/tdnet.log
    candidates.push(PathBuf::from(".tdnet").join("logs").join("tdnet.log"));

    candidates
}

fn load_config() -> (TdnetConfig, Option<ConfigError>) {
    match TdnetConfig::load() {
        Ok(config) => (config.unwrap_or_default(), None),
        Err(e) => (TdnetConfig::default(), Some(e)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let (config, config_error) = load_config();
    init_tracing(config.log_filter());
    if let Some(err) = config_error {
        eprintln!("{err}; using defaults");
    }

    let fetch = config.resolved_fetch();
    tracing::info!(text_url = %fetch.text_url, image_url = %fetch.image_url, "starting");
    let collaborators =
        Collaborators::standard(&fetch).context("failed to set up the HTTP transport")?;
    let mut app = App::new(fetch, Handle::current(), collaborators);

    let mut input = StdinPump::new().context("failed to start the stdin reader")?;
    println!("{}", render::HELP);

    run(&mut app, &mut input).await
}

async fn run(app: &mut App, input: &mut StdinPump) -> Result<()> {
    loop {
        tokio::select! {
            msg = input.recv() => {
                let line = match msg {
                    Some(InputMsg::Line(line)) => line,
                    Some(InputMsg::Error(e)) => anyhow::bail!("failed to read stdin: {e}"),
                    None => break,
                };
                match Command::parse(&line) {
                    Some(Command::FetchText) => trigger(app, Target::Text),
                    Some(Command::FetchImage) => trigger(app, Target::Image),
                    Some(Command::Quit) => break,
                    Some(Command::Help) => println!("{}", render::HELP),
                    None if line.trim().is_empty() => {}
                    None => println!("unknown command: {}\n{}", line.trim(), render::HELP),
                }
            }
            delivered = app.next_delivery() => {
                if !delivered {
                    break;
                }
                println!("{}", render::render(app.state()));
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    if app.in_flight() > 0 {
        tracing::info!(in_flight = app.in_flight(), "exiting with fetches in flight");
    }
    Ok(())
}

fn trigger(app: &mut App, target: Target) {
    match app.trigger(target) {
        Ok(Some(task)) => println!("fetching {target} ({task})..."),
        Ok(None) => {}
        Err(FetchError::NetworkUnavailable) => {
            while let Some(note) = app.pop_notification() {
                println!("{}", note.format());
            }
        }
        Err(e) => println!("{target} fetch not started: {e}"),
    }
}
