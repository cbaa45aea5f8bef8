use std::env;

use anyhow::Result;
use clap::Parser;

use mef_core::XmlOptions;
use mef_translators::cli::{Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cwd = env::current_dir()?;

    dispatch(cli.command, &cwd)
}

fn dispatch(command: Commands, cwd: &std::path::Path) -> Result<()> {
    match command {
        Commands::Aralia {
            input,
            multi_top,
            out,
            nest,
            indent,
        } => mef_translators::cli::aralia::run(
            cwd,
            &input,
            multi_top,
            out.as_deref(),
            &XmlOptions { nest, indent },
        ),
    }
}
