// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = cli::Cli::parse();

    commands::cmd_build(commands::BuildOptions {
        recipes: cli.recipes,
        namespace: cli.namespace,
        depot_url: cli.depot_url,
        builder: cli.builder,
        skip_checks: cli.skip_checks,
        python_versions: cli.python_versions,
        numpy_versions: cli.numpy_versions,
    })
}
