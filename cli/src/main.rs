//! `micro-shop` command line client
//!
//! # Usage
//!
//! ```bash
//! micro-shop login alice
//! micro-shop dashboard
//! micro-shop cart add P1 --quantity 2
//! micro-shop checkout
//! micro-shop logout
//! ```

mod app;
mod args;
mod commands;
mod render;

use anyhow::Result;
use clap::Parser;
use tracing::error;

use ms_infra::{init_tracing, ConfigLoader};

use crate::app::App;
use crate::args::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }
    let mut config = loader.load()?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    init_tracing(&config.logging)?;

    let app = App::start(config).await?;
    let result = commands::run(&app, cli.command).await;
    if let Err(e) = app.finish().await {
        error!(error = %e, "Failed to save session state");
    }
    result
}
