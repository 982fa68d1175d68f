// ABOUTME: Entry point for the deploy-relay CLI application.
// ABOUTME: Parses arguments, sets up logging, and maps the run's outcome to an exit code.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use deploy_relay::error::Result;
use deploy_relay::output::Output;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise --debug/DEBUG selects debug over info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.debug {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli.debug)
        .with_writer(std::io::stderr)
        .init();

    let output = Output::new(cli.output.into());
    let error_output = Output::new(cli.output.into());

    match run(cli, output).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error_output.error(&e.to_string());
            std::process::exit(1);
        }
    }
}

/// Dispatch a command. `Ok(false)` means it ran but did not succeed.
async fn run(cli: Cli, output: Output) -> Result<bool> {
    match cli.command {
        Commands::Deploy(args) => {
            let config = args.into_settings(cli.debug).resolve()?;
            let outcome = commands::deploy(config, output).await?;
            Ok(outcome.is_success())
        }
        Commands::Status(args) => {
            commands::status(args, cli.debug, output).await?;
            Ok(true)
        }
    }
}
