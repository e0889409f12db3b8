mod commands;
mod exit;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{check_config, export, serve, Context};
use crate::exit::{exit_code_for, report_error};
use intake_config as config;
use intake_server::logging::init_logging;

#[derive(Debug, Parser)]
#[command(name = "intake", version, about = "Club form intake service")]
struct Cli {
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP intake server
    Serve(serve::ServeArgs),
    /// Print stored submissions as JSON
    Export(export::ExportArgs),
    /// Validate the config file and print the resolved settings
    #[command(name = "check-config")]
    CheckConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        db_path,
        config: config_path,
        verbose,
        command,
    } = cli;

    let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
    if verbose {
        match config::resolve_config_path(config_path.clone()) {
            Ok(path) if path.exists() => debug!(path = %path.display(), "config resolved"),
            Ok(path) => debug!(path = %path.display(), "config missing, using defaults"),
            Err(err) => debug!(error = %err, "config unavailable"),
        }
    }

    let ctx = Context {
        config: &app_config,
        config_path,
        db_path,
    };

    match command {
        Command::Serve(args) => serve::serve(&ctx, args),
        Command::Export(args) => export::export(&ctx, args),
        Command::CheckConfig => check_config::check_config(&ctx),
    }
}
