//! # CLI Entry
//!
//! 1. Parse arguments
//! 2. Install the log subscriber
//! 3. Build the `AppContext`
//! 4. Dispatch, render, tear down

use super::handlers;
use super::render::{print_result, OutputMode};
use super::setup::{Cli, Commands};
use anyhow::Context;
use clap::Parser;
use stickerapp::init::{initialize, InitOptions};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable naming the data directory when `--data-dir` is absent.
pub const DATA_DIR_ENV: &str = "STICKER_DATA_DIR";

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = InitOptions {
        data_dir: cli
            .data_dir
            .clone()
            .or_else(|| std::env::var_os(DATA_DIR_ENV).map(PathBuf::from)),
        config_file: cli.config.clone(),
    };
    let mut ctx = initialize(options).context("could not set up the sticker store")?;

    let mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Text
    };
    let command = cli.command.unwrap_or(Commands::Stickers);
    debug!(?command, ?mode, "dispatching");

    let result = handlers::dispatch(&mut ctx.api, command)?;
    print_result(&result, mode)?;

    ctx.teardown();
    Ok(())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
